//! Price-history provider contract.
//!
//! Retrieval, caching, and vendor adapters live outside this crate; the core
//! only depends on this trait. Timeouts and retry policy belong to the
//! implementation. A fetch failure is degraded to "no data" by every caller
//! in this crate, so providers never take the analytics down with them.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::{AssetClass, PricePoint, PriceSeries, Symbol, TradingDay, ValidationError};

/// Request for one symbol's daily history.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub days: u32,
    pub asset_class: AssetClass,
}

impl HistoryRequest {
    pub fn new(
        symbol: Symbol,
        days: u32,
        asset_class: AssetClass,
    ) -> Result<Self, ValidationError> {
        if days == 0 {
            return Err(ValidationError::ZeroHistoryDays);
        }
        Ok(Self {
            symbol,
            days,
            asset_class,
        })
    }
}

/// Provider-side failure classification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("provider rejected request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

pub type HistoryFuture<'a> =
    Pin<Box<dyn Future<Output = Result<PriceSeries, ProviderError>> + Send + 'a>>;

/// External collaborator supplying ordered daily price points.
///
/// Implementations must be `Send + Sync`; multi-symbol operations fan out
/// one concurrent call per symbol.
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetch up to `days` daily observations, ascending by day.
    fn history(&self, req: HistoryRequest) -> HistoryFuture<'_>;
}

/// Deterministic synthetic provider for tests and demos.
///
/// Prices follow a seeded random walk per symbol, so the same symbol always
/// produces the same history. Equity-like classes skip weekends; crypto
/// observes every calendar day.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    /// Final day of every generated history.
    pub end_day: TradingDay,
}

impl FixtureProvider {
    pub fn new(end_day: TradingDay) -> Self {
        Self { end_day }
    }

    /// Generate the same series the async contract would return.
    pub fn generate(&self, req: &HistoryRequest) -> Result<PriceSeries, ProviderError> {
        let seed = symbol_seed(&req.symbol);
        let mut rng = fastrand::Rng::with_seed(seed);
        let base = 40.0 + (seed % 400) as f64 / 2.0;

        let mut days = Vec::with_capacity(req.days as usize);
        let mut cursor = self.end_day;
        while days.len() < req.days as usize {
            let tradable = req.asset_class.trades_continuously() || !cursor.is_weekend();
            if tradable {
                days.push(cursor);
            }
            cursor = cursor.pred();
        }
        days.reverse();

        let mut close = base;
        let mut points = Vec::with_capacity(days.len());
        for day in days {
            let drift = (rng.f64() - 0.5) * 0.04;
            let next = (close * (1.0 + drift)).max(0.01);
            let open = close;
            let high = open.max(next) * 1.004;
            let low = open.min(next) * 0.996;
            close = next;

            let point = PricePoint::new(day, open, high, low, close)
                .map_err(|error| ProviderError::InvalidRequest(error.to_string()))?;
            points.push(point);
        }

        PriceSeries::new(req.symbol.clone(), points)
            .map_err(|error| ProviderError::InvalidRequest(error.to_string()))
    }
}

impl PriceHistoryProvider for FixtureProvider {
    fn history(&self, req: HistoryRequest) -> HistoryFuture<'_> {
        Box::pin(async move { self.generate(&req) })
    }
}

/// Fetch one history per target concurrently, results in input order.
///
/// Each failure is logged, degraded to an empty series, and recorded in
/// `warnings`; the pipeline downstream renders a degraded result instead of
/// propagating the fault.
pub async fn fetch_histories(
    provider: &Arc<dyn PriceHistoryProvider>,
    targets: &[(Symbol, AssetClass)],
    days: u32,
    warnings: &mut Vec<String>,
) -> Vec<PriceSeries> {
    let mut handles = Vec::with_capacity(targets.len());
    for (symbol, asset_class) in targets {
        match HistoryRequest::new(symbol.clone(), days, *asset_class) {
            Ok(request) => {
                let provider = Arc::clone(provider);
                handles.push(Some(tokio::spawn(async move {
                    provider.history(request).await
                })));
            }
            Err(error) => {
                warnings.push(format!("invalid history request for '{symbol}': {error}"));
                handles.push(None);
            }
        }
    }

    let mut histories = Vec::with_capacity(targets.len());
    for ((symbol, _), handle) in targets.iter().zip(handles) {
        let series = match handle {
            Some(handle) => match handle.await {
                Ok(Ok(series)) => series,
                Ok(Err(error)) => {
                    warn!(symbol = %symbol, %error, "history fetch failed, degrading to empty");
                    warnings.push(format!("no history for '{symbol}': {error}"));
                    PriceSeries::empty(symbol.clone())
                }
                Err(join_error) => {
                    warn!(symbol = %symbol, %join_error, "history task failed, degrading to empty");
                    warnings.push(format!("no history for '{symbol}': {join_error}"));
                    PriceSeries::empty(symbol.clone())
                }
            },
            None => PriceSeries::empty(symbol.clone()),
        };
        histories.push(series);
    }
    histories
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(u64::from(byte))
    })
}
