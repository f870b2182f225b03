//! Computational core for marketlens.
//!
//! This crate contains:
//! - Validated domain models for daily price histories
//! - Alignment of irregular series onto a shared, forward-filled day axis
//! - Pearson correlation, classification, and rolling-window trend
//! - Conditional what-if projection with a correlation fallback
//! - Portfolio risk metrics (Sharpe, volatility, beta, correlation matrix)
//! - Cross-sectional divergence detection over live quote snapshots
//!
//! Retrieval, persistence, and presentation are external collaborators; the
//! only inbound seams are [`PriceHistoryProvider`] for history and
//! [`LiveQuote`] snapshots for the live cross-section.

pub mod align;
pub mod analytics;
pub mod correlation;
pub mod divergence;
pub mod domain;
pub mod error;
pub mod live;
pub mod provider;
pub mod report;
pub mod returns;
pub mod risk;
pub mod stats;
pub mod whatif;

pub use align::{align_series, align_values, AlignedPair};
pub use analytics::{
    Analytics, AssetRef, PairCorrelation, PairTrend, PairWhatIf, RankedCorrelation, TopCorrelated,
};
pub use correlation::{
    analyze_trend, correlate, correlation_result, CorrelationResult, Direction, Strength, Trend,
    TrendResult,
};
pub use divergence::{
    find_opposite_pairs, pair_alerts, AlertType, AssetMove, CorrelationTable, DivergencePair,
    DivergenceStrength, VolatilityAlert,
};
pub use domain::{AssetClass, Holding, PricePoint, PriceSeries, Symbol, TradingDay};
pub use error::{AnalyticsError, ValidationError};
pub use live::{extend_with_live_close, LiveQuote};
pub use provider::{
    fetch_histories, FixtureProvider, HistoryFuture, HistoryRequest, PriceHistoryProvider,
    ProviderError,
};
pub use report::{Report, ReportError, ReportMeta};
pub use returns::{daily_returns, dated_returns, DatedReturn};
pub use risk::{
    beta, correlation_matrix, portfolio_value_series, sharpe_ratio, total_return_pct,
    value_returns, volatility_pct, CorrelationMatrixEntry, MatrixReport, PortfolioMetrics,
    PortfolioRiskEngine, RiskReport, ValuePoint, DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR,
};
pub use whatif::{what_if, WhatIfResult};
