//! Portfolio-level risk metrics: value series, Sharpe, volatility, beta,
//! and the pairwise correlation matrix.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::align::align_values;
use crate::correlation::correlate;
use crate::provider::{fetch_histories, PriceHistoryProvider};
use crate::returns::daily_returns;
use crate::stats::{covariance, mean, round_to, std_dev};
use crate::{AssetClass, Holding, PriceSeries, Symbol, TradingDay};

/// Trading sessions per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Default annual risk-free rate for the Sharpe ratio.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Combined portfolio value on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub day: TradingDay,
    pub value: f64,
}

/// Risk summary computed fresh per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub sharpe_ratio: f64,
    pub volatility_pct: f64,
    pub beta: f64,
    pub total_return_pct: f64,
}

/// One cell of the N×N correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrixEntry {
    pub asset_a: Symbol,
    pub asset_b: Symbol,
    pub coefficient: f64,
    pub row: usize,
    pub col: usize,
}

/// Combined daily portfolio value across holdings.
///
/// The axis is the union of all observed days; a holding without a price on
/// a given day is excluded from that day's sum (partial coverage, not an
/// error, no forward fill).
pub fn portfolio_value_series(holdings: &[(Holding, PriceSeries)]) -> Vec<ValuePoint> {
    let lookups: Vec<(f64, HashMap<TradingDay, f64>)> = holdings
        .iter()
        .map(|(holding, series)| {
            let closes: HashMap<TradingDay, f64> = series.dated_closes().into_iter().collect();
            (holding.quantity, closes)
        })
        .collect();

    let union: BTreeSet<TradingDay> = holdings
        .iter()
        .flat_map(|(_, series)| series.points.iter().map(|point| point.day))
        .collect();

    union
        .into_iter()
        .map(|day| {
            let value = lookups
                .iter()
                .filter_map(|(quantity, closes)| closes.get(&day).map(|close| quantity * close))
                .sum();
            ValuePoint { day, value }
        })
        .collect()
}

/// Daily returns of a portfolio value series.
pub fn value_returns(values: &[ValuePoint]) -> Vec<f64> {
    let raw: Vec<f64> = values.iter().map(|point| point.value).collect();
    daily_returns(&raw)
}

/// Annualized Sharpe ratio, rounded to 2 decimal places.
///
/// Guarded, never thrown: fewer than 2 return points or zero variance yield 0.
pub fn sharpe_ratio(returns: &[f64], annual_risk_free_rate: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let daily_std = std_dev(returns);
    if daily_std == 0.0 {
        return 0.0;
    }

    let annualized_return = mean(returns) * TRADING_DAYS_PER_YEAR;
    let annualized_std = daily_std * TRADING_DAYS_PER_YEAR.sqrt();
    round_to((annualized_return - annual_risk_free_rate) / annualized_std, 2)
}

/// Annualized volatility in percent, rounded to 1 decimal place.
pub fn volatility_pct(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    round_to(std_dev(returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0, 1)
}

/// Portfolio beta against a benchmark, aligned by day, rounded to 2 places.
///
/// Both series are put on a shared forward-filled day axis before their
/// returns are compared; truncating to the shorter tail would silently
/// misalign mixed calendars (a crypto-heavy portfolio against an equity
/// benchmark). Insufficient data or a flat benchmark yield the
/// market-neutral 1.0.
pub fn beta(portfolio: &[ValuePoint], benchmark: &PriceSeries) -> f64 {
    let portfolio_values: Vec<(TradingDay, f64)> = portfolio
        .iter()
        .map(|point| (point.day, point.value))
        .collect();
    let aligned = align_values(&portfolio_values, &benchmark.dated_closes());
    if aligned.len() < 2 {
        return 1.0;
    }

    let portfolio_returns = daily_returns(&aligned.left);
    let benchmark_returns = daily_returns(&aligned.right);
    if portfolio_returns.len() < 2 || portfolio_returns.len() != benchmark_returns.len() {
        return 1.0;
    }

    let benchmark_variance = covariance(&benchmark_returns, &benchmark_returns);
    if benchmark_variance == 0.0 {
        return 1.0;
    }

    round_to(
        covariance(&portfolio_returns, &benchmark_returns) / benchmark_variance,
        2,
    )
}

/// Total return over a value series in percent, rounded to 2 places.
pub fn total_return_pct(values: &[ValuePoint]) -> f64 {
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return 0.0;
    };
    if values.len() < 2 || first.value <= 0.0 {
        return 0.0;
    }
    round_to((last.value - first.value) / first.value * 100.0, 2)
}

/// Pairwise correlation matrix over the given histories.
///
/// Diagonal cells are fixed at 1.0. Each off-diagonal pair is aligned by
/// day, reduced to returns, and correlated; a pair that cannot be
/// correlated (no overlap, zero variance) degrades to 0.0 rather than
/// failing the matrix. Histories are fetched once per asset and shared
/// across the row and column they participate in.
pub fn correlation_matrix(histories: &[PriceSeries]) -> Vec<CorrelationMatrixEntry> {
    let count = histories.len();
    let mut coefficients = vec![vec![0.0_f64; count]; count];

    for row in 0..count {
        coefficients[row][row] = 1.0;
        for col in row + 1..count {
            let aligned = align_values(
                &histories[row].dated_closes(),
                &histories[col].dated_closes(),
            );
            let coefficient = correlate(
                &daily_returns(&aligned.left),
                &daily_returns(&aligned.right),
            )
            .unwrap_or(0.0);
            coefficients[row][col] = coefficient;
            coefficients[col][row] = coefficient;
        }
    }

    let mut entries = Vec::with_capacity(count * count);
    for row in 0..count {
        for col in 0..count {
            entries.push(CorrelationMatrixEntry {
                asset_a: histories[row].symbol.clone(),
                asset_b: histories[col].symbol.clone(),
                coefficient: coefficients[row][col],
                row,
                col,
            });
        }
    }
    entries
}

/// Provider-backed facade over the pure risk functions.
///
/// Fetches fan out one task per symbol and fan in preserving holding order.
/// A failed or empty fetch is logged and degraded to an empty history, so
/// metrics always render (possibly as safe defaults) instead of erroring.
pub struct PortfolioRiskEngine {
    provider: Arc<dyn PriceHistoryProvider>,
    risk_free_rate: f64,
}

/// Metrics plus the degradation warnings accumulated while fetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub metrics: PortfolioMetrics,
    pub warnings: Vec<String>,
}

/// Correlation matrix plus degradation warnings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixReport {
    pub entries: Vec<CorrelationMatrixEntry>,
    pub warnings: Vec<String>,
}

impl PortfolioRiskEngine {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
        Self {
            provider,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
        }
    }

    pub fn with_risk_free_rate(mut self, annual_rate: f64) -> Self {
        self.risk_free_rate = annual_rate;
        self
    }

    /// Sharpe, volatility, beta, and total return for the holdings over the
    /// trailing window, with beta measured against `benchmark`.
    pub async fn metrics(
        &self,
        holdings: &[Holding],
        benchmark: Symbol,
        benchmark_class: AssetClass,
        days: u32,
    ) -> RiskReport {
        let mut warnings = Vec::new();

        let mut fetch_targets: Vec<(Symbol, AssetClass)> = holdings
            .iter()
            .map(|holding| (holding.symbol.clone(), holding.asset_class))
            .collect();
        fetch_targets.push((benchmark.clone(), benchmark_class));

        let mut histories =
            fetch_histories(&self.provider, &fetch_targets, days, &mut warnings).await;
        let benchmark_history = histories.pop().expect("benchmark fetch result is present");

        let positions: Vec<(Holding, PriceSeries)> =
            holdings.iter().cloned().zip(histories).collect();
        let values = portfolio_value_series(&positions);
        if values.is_empty() {
            warnings.push(String::from(
                "no holding history available; metrics degraded to defaults",
            ));
        }

        let returns = value_returns(&values);
        let metrics = PortfolioMetrics {
            sharpe_ratio: sharpe_ratio(&returns, self.risk_free_rate),
            volatility_pct: volatility_pct(&returns),
            beta: beta(&values, &benchmark_history),
            total_return_pct: total_return_pct(&values),
        };

        RiskReport { metrics, warnings }
    }

    /// N×N correlation matrix over the holdings' trailing histories.
    pub async fn correlation_matrix(&self, holdings: &[Holding], days: u32) -> MatrixReport {
        let mut warnings = Vec::new();
        let fetch_targets: Vec<(Symbol, AssetClass)> = holdings
            .iter()
            .map(|holding| (holding.symbol.clone(), holding.asset_class))
            .collect();

        let histories =
            fetch_histories(&self.provider, &fetch_targets, days, &mut warnings).await;
        MatrixReport {
            entries: correlation_matrix(&histories),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricePoint;

    fn day(input: &str) -> TradingDay {
        TradingDay::parse(input).expect("valid day")
    }

    fn series(symbol: &str, closes: &[(&str, f64)]) -> PriceSeries {
        let points = closes
            .iter()
            .map(|(d, close)| {
                PricePoint::new(day(d), *close, *close, *close, *close).expect("valid point")
            })
            .collect();
        PriceSeries::new(Symbol::parse(symbol).expect("valid symbol"), points)
            .expect("valid series")
    }

    fn holding(symbol: &str, quantity: f64) -> Holding {
        Holding::new(
            Symbol::parse(symbol).expect("valid symbol"),
            quantity,
            AssetClass::Equity,
        )
        .expect("valid holding")
    }

    #[test]
    fn value_series_sums_quantity_times_price() {
        let positions = vec![
            (
                holding("AAPL", 2.0),
                series("AAPL", &[("2024-01-02", 100.0), ("2024-01-03", 110.0)]),
            ),
            (
                holding("MSFT", 1.0),
                series("MSFT", &[("2024-01-02", 50.0), ("2024-01-03", 55.0)]),
            ),
        ];

        let values = portfolio_value_series(&positions);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, 250.0);
        assert_eq!(values[1].value, 275.0);
    }

    #[test]
    fn value_series_excludes_uncovered_holdings_per_day() {
        let positions = vec![
            (
                holding("AAPL", 1.0),
                series("AAPL", &[("2024-01-02", 100.0), ("2024-01-03", 110.0)]),
            ),
            (
                holding("BTC-USD", 1.0),
                series("BTC-USD", &[("2024-01-03", 40000.0)]),
            ),
        ];

        let values = portfolio_value_series(&positions);
        assert_eq!(values.len(), 2);
        // 2024-01-02 only covers AAPL.
        assert_eq!(values[0].value, 100.0);
        assert_eq!(values[1].value, 40110.0);
    }

    #[test]
    fn sharpe_and_volatility_guard_degenerate_inputs() {
        assert_eq!(sharpe_ratio(&[], DEFAULT_RISK_FREE_RATE), 0.0);
        assert_eq!(sharpe_ratio(&[0.01], DEFAULT_RISK_FREE_RATE), 0.0);
        assert_eq!(sharpe_ratio(&[0.0, 0.0, 0.0], DEFAULT_RISK_FREE_RATE), 0.0);
        assert_eq!(volatility_pct(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(volatility_pct(&[0.01]), 0.0);
    }

    #[test]
    fn constant_price_series_yields_zero_sharpe_and_volatility() {
        let closes: Vec<f64> = vec![42.0; 10];
        let returns = daily_returns(&closes);
        assert_eq!(sharpe_ratio(&returns, DEFAULT_RISK_FREE_RATE), 0.0);
        assert_eq!(volatility_pct(&returns), 0.0);
        assert!(sharpe_ratio(&returns, DEFAULT_RISK_FREE_RATE).is_finite());
    }

    #[test]
    fn sharpe_annualizes_daily_moments() {
        let returns = [0.01, -0.005, 0.008, 0.002, -0.001];
        let expected = {
            let annual_return = mean(&returns) * TRADING_DAYS_PER_YEAR;
            let annual_std = std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt();
            round_to((annual_return - DEFAULT_RISK_FREE_RATE) / annual_std, 2)
        };
        assert_eq!(sharpe_ratio(&returns, DEFAULT_RISK_FREE_RATE), expected);
    }

    #[test]
    fn beta_of_portfolio_tracking_benchmark_is_one() {
        // Portfolio value is exactly 10x the benchmark close on each day.
        let benchmark = series(
            "SPY",
            &[
                ("2024-01-02", 100.0),
                ("2024-01-03", 102.0),
                ("2024-01-04", 99.0),
                ("2024-01-05", 103.0),
            ],
        );
        let values: Vec<ValuePoint> = benchmark
            .points
            .iter()
            .map(|point| ValuePoint {
                day: point.day,
                value: point.close * 10.0,
            })
            .collect();

        assert_eq!(beta(&values, &benchmark), 1.0);
    }

    #[test]
    fn beta_defaults_to_one_for_flat_benchmark() {
        let benchmark = series(
            "SPY",
            &[
                ("2024-01-02", 100.0),
                ("2024-01-03", 100.0),
                ("2024-01-04", 100.0),
            ],
        );
        let values = vec![
            ValuePoint {
                day: day("2024-01-02"),
                value: 10.0,
            },
            ValuePoint {
                day: day("2024-01-03"),
                value: 12.0,
            },
            ValuePoint {
                day: day("2024-01-04"),
                value: 11.0,
            },
        ];

        assert_eq!(beta(&values, &benchmark), 1.0);
    }

    #[test]
    fn beta_aligns_mixed_calendars_by_day() {
        // Benchmark skips the weekend; the portfolio trades through it. The
        // weekend days forward-fill the benchmark close, so its aligned
        // returns stay well-defined.
        let benchmark = series(
            "SPY",
            &[
                ("2024-01-05", 100.0),
                ("2024-01-08", 104.0),
                ("2024-01-09", 102.0),
            ],
        );
        let values = vec![
            ValuePoint { day: day("2024-01-05"), value: 50.0 },
            ValuePoint { day: day("2024-01-06"), value: 51.0 },
            ValuePoint { day: day("2024-01-07"), value: 49.5 },
            ValuePoint { day: day("2024-01-08"), value: 52.0 },
            ValuePoint { day: day("2024-01-09"), value: 51.0 },
        ];

        let result = beta(&values, &benchmark);
        assert!(result.is_finite());
        assert_ne!(result, 1.0);
    }

    #[test]
    fn total_return_over_value_series() {
        let values = vec![
            ValuePoint { day: day("2024-01-02"), value: 200.0 },
            ValuePoint { day: day("2024-01-03"), value: 210.0 },
            ValuePoint { day: day("2024-01-04"), value: 215.0 },
        ];
        assert_eq!(total_return_pct(&values), 7.5);
        assert_eq!(total_return_pct(&[]), 0.0);
    }

    #[test]
    fn matrix_diagonal_is_fixed_at_one() {
        let histories = vec![
            series("AAPL", &[("2024-01-02", 100.0), ("2024-01-03", 102.0), ("2024-01-04", 99.0)]),
            series("MSFT", &[("2024-01-02", 50.0), ("2024-01-03", 51.0), ("2024-01-04", 49.5)]),
        ];

        let entries = correlation_matrix(&histories);
        assert_eq!(entries.len(), 4);
        for entry in &entries {
            if entry.row == entry.col {
                assert_eq!(entry.coefficient, 1.0);
            }
        }
    }

    #[test]
    fn matrix_is_symmetric() {
        let histories = vec![
            series("AAPL", &[("2024-01-02", 100.0), ("2024-01-03", 102.0), ("2024-01-04", 99.0)]),
            series("MSFT", &[("2024-01-02", 50.0), ("2024-01-03", 49.0), ("2024-01-04", 52.0)]),
            series("GLD", &[("2024-01-02", 180.0), ("2024-01-03", 181.0), ("2024-01-04", 180.5)]),
        ];

        let entries = correlation_matrix(&histories);
        let cell = |row: usize, col: usize| {
            entries
                .iter()
                .find(|entry| entry.row == row && entry.col == col)
                .expect("cell present")
                .coefficient
        };
        for row in 0..3 {
            for col in 0..3 {
                assert_eq!(cell(row, col), cell(col, row));
            }
        }
    }

    #[test]
    fn uncorrelatable_matrix_cell_degrades_to_zero() {
        let histories = vec![
            series("AAPL", &[("2024-01-02", 100.0), ("2024-01-03", 102.0)]),
            // No overlapping range with AAPL.
            series("MSFT", &[("2024-02-01", 50.0), ("2024-02-02", 51.0)]),
        ];

        let entries = correlation_matrix(&histories);
        let off_diagonal = entries
            .iter()
            .find(|entry| entry.row == 0 && entry.col == 1)
            .expect("cell present");
        assert_eq!(off_diagonal.coefficient, 0.0);
    }
}
