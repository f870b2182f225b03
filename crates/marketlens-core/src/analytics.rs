//! Provider-driven correlation workflows.
//!
//! Each method runs the same pipeline: fetch histories, optionally extend
//! them with live closes, align onto the shared day axis, reduce to daily
//! returns, then hand the aligned arrays to the pure engines. Fetch failures
//! degrade to empty input and surface as warnings.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::align::align_series;
use crate::correlation::{analyze_trend, correlation_result, CorrelationResult, TrendResult};
use crate::live::extend_with_live_close;
use crate::provider::{fetch_histories, PriceHistoryProvider};
use crate::returns::daily_returns;
use crate::whatif::{what_if, WhatIfResult};
use crate::{AnalyticsError, AssetClass, LiveQuote, PriceSeries, Symbol, TradingDay};

/// A symbol plus the asset class that decides its trading calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    pub symbol: Symbol,
    pub asset_class: AssetClass,
}

impl AssetRef {
    pub fn new(symbol: Symbol, asset_class: AssetClass) -> Self {
        Self {
            symbol,
            asset_class,
        }
    }
}

/// Pairwise correlation with the pipeline context it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCorrelation {
    pub asset_a: Symbol,
    pub asset_b: Symbol,
    pub result: CorrelationResult,
    /// Aligned return points that fed the coefficient.
    pub sample_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Correlation trend with pipeline context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTrend {
    pub asset_a: Symbol,
    pub asset_b: Symbol,
    pub result: TrendResult,
    pub sample_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// What-if projection with pipeline context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairWhatIf {
    pub asset_a: Symbol,
    pub asset_b: Symbol,
    pub hypothesis_pct: f64,
    pub result: WhatIfResult,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One candidate in a top-correlated ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCorrelation {
    pub symbol: Symbol,
    pub result: CorrelationResult,
    pub sample_size: usize,
}

/// Ranking of a universe against a target, strongest association first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCorrelated {
    pub target: Symbol,
    pub ranked: Vec<RankedCorrelation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Correlation workflows over the external history provider.
pub struct Analytics {
    provider: Arc<dyn PriceHistoryProvider>,
}

impl Analytics {
    pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
        Self { provider }
    }

    /// Correlate two assets' trailing daily returns.
    ///
    /// Any live quote matching one of the symbols extends that history with
    /// today's not-yet-closed observation before alignment.
    pub async fn pair_correlation(
        &self,
        asset_a: &AssetRef,
        asset_b: &AssetRef,
        days: u32,
        live: &[LiveQuote],
        today: TradingDay,
    ) -> Result<PairCorrelation, AnalyticsError> {
        let (returns_a, returns_b, warnings) = self
            .aligned_pair_returns(asset_a, asset_b, days, live, today)
            .await;
        let sample_size = returns_a.len();
        let result = correlation_result(&returns_a, &returns_b)?;

        Ok(PairCorrelation {
            asset_a: asset_a.symbol.clone(),
            asset_b: asset_b.symbol.clone(),
            result,
            sample_size,
            warnings,
        })
    }

    /// Whether the pair's correlation is strengthening, weakening, or stable.
    pub async fn correlation_trend(
        &self,
        asset_a: &AssetRef,
        asset_b: &AssetRef,
        days: u32,
    ) -> Result<PairTrend, AnalyticsError> {
        let (returns_a, returns_b, warnings) = self
            .aligned_pair_returns(asset_a, asset_b, days, &[], TradingDay::today_utc())
            .await;
        let sample_size = returns_a.len();
        let result = analyze_trend(&returns_a, &returns_b)?;

        Ok(PairTrend {
            asset_a: asset_a.symbol.clone(),
            asset_b: asset_b.symbol.clone(),
            result,
            sample_size,
            warnings,
        })
    }

    /// Conditional projection of `asset_b` given a hypothesized move of
    /// `asset_a`. Total: degenerate histories produce the zero projection.
    pub async fn what_if_move(
        &self,
        asset_a: &AssetRef,
        asset_b: &AssetRef,
        days: u32,
        hypothesis_pct: f64,
    ) -> PairWhatIf {
        let (returns_a, returns_b, warnings) = self
            .aligned_pair_returns(asset_a, asset_b, days, &[], TradingDay::today_utc())
            .await;
        let result = what_if(&returns_a, &returns_b, hypothesis_pct);

        PairWhatIf {
            asset_a: asset_a.symbol.clone(),
            asset_b: asset_b.symbol.clone(),
            hypothesis_pct,
            result,
            warnings,
        }
    }

    /// Rank a universe of candidates by the magnitude of their correlation
    /// with the target. Candidates that cannot be correlated against the
    /// target (no overlapping history, zero variance) are skipped with a
    /// warning rather than failing the scan.
    pub async fn top_correlated(
        &self,
        target: &AssetRef,
        universe: &[AssetRef],
        days: u32,
        limit: usize,
    ) -> TopCorrelated {
        let mut warnings = Vec::new();
        let mut targets: Vec<(Symbol, AssetClass)> = Vec::with_capacity(universe.len() + 1);
        targets.push((target.symbol.clone(), target.asset_class));
        for candidate in universe {
            targets.push((candidate.symbol.clone(), candidate.asset_class));
        }

        let mut histories =
            fetch_histories(&self.provider, &targets, days, &mut warnings).await;
        let target_history = histories.remove(0);

        let mut ranked = Vec::new();
        for candidate in histories {
            if candidate.symbol == target.symbol {
                continue;
            }

            let aligned = align_series(&target_history, &candidate);
            let returns_target = daily_returns(&aligned.left);
            let returns_candidate = daily_returns(&aligned.right);

            match correlation_result(&returns_target, &returns_candidate) {
                Ok(result) => ranked.push(RankedCorrelation {
                    symbol: candidate.symbol,
                    result,
                    sample_size: returns_target.len(),
                }),
                Err(error) => {
                    warnings.push(format!(
                        "skipped '{}' in correlation scan: {error}",
                        candidate.symbol
                    ));
                }
            }
        }

        ranked.sort_by(|left, right| {
            right
                .result
                .coefficient
                .abs()
                .total_cmp(&left.result.coefficient.abs())
        });
        ranked.truncate(limit);

        TopCorrelated {
            target: target.symbol.clone(),
            ranked,
            warnings,
        }
    }

    /// Fetch, live-extend, align, and reduce a pair to daily returns.
    async fn aligned_pair_returns(
        &self,
        asset_a: &AssetRef,
        asset_b: &AssetRef,
        days: u32,
        live: &[LiveQuote],
        today: TradingDay,
    ) -> (Vec<f64>, Vec<f64>, Vec<String>) {
        let mut warnings = Vec::new();
        let targets = [
            (asset_a.symbol.clone(), asset_a.asset_class),
            (asset_b.symbol.clone(), asset_b.asset_class),
        ];
        let mut histories =
            fetch_histories(&self.provider, &targets, days, &mut warnings).await;

        for history in &mut histories {
            apply_live_close(history, live, today);
        }

        let aligned = align_series(&histories[0], &histories[1]);
        (
            daily_returns(&aligned.left),
            daily_returns(&aligned.right),
            warnings,
        )
    }
}

fn apply_live_close(history: &mut PriceSeries, live: &[LiveQuote], today: TradingDay) {
    if let Some(quote) = live.iter().find(|quote| quote.symbol == history.symbol) {
        extend_with_live_close(history, quote.price, today);
    }
}
