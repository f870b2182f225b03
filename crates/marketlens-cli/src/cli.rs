//! CLI argument definitions for marketlens.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `correlate` | Correlate two assets' trailing daily returns |
//! | `trend` | Report whether a pair's correlation is strengthening |
//! | `whatif` | Project one asset's move given a hypothesized move of another |
//! | `risk` | Portfolio Sharpe, volatility, beta, and total return |
//! | `matrix` | Pairwise correlation matrix over a set of holdings |
//! | `divergence` | Scan a live snapshot for opposite-moving pairs |
//!
//! # Examples
//!
//! ```bash
//! marketlens correlate SPY BTC-USD --class-b crypto --days 90
//! marketlens risk --holding AAPL:10 --holding BTC-USD:0.5:crypto --benchmark SPY
//! marketlens divergence snapshot.json --pretty
//! ```

use clap::{Args, Parser, Subcommand};

/// Correlation, projection, and portfolio-risk analytics over daily price
/// histories. Histories come from the built-in deterministic provider, so
/// every run is reproducible.
#[derive(Debug, Parser)]
#[command(
    name = "marketlens",
    author,
    version,
    about = "Correlation and portfolio-risk analytics CLI"
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Final day of generated histories (ISO date). Defaults to today (UTC).
    #[arg(long, global = true)]
    pub end_day: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Correlate two assets' trailing daily returns.
    Correlate(PairArgs),
    /// Report whether a pair's correlation is strengthening or weakening.
    Trend(PairArgs),
    /// Project one asset's average move given a hypothesized move of another.
    Whatif(WhatIfArgs),
    /// Portfolio Sharpe ratio, volatility, beta, and total return.
    Risk(RiskArgs),
    /// Pairwise correlation matrix over a set of symbols.
    Matrix(MatrixArgs),
    /// Scan a live snapshot file for opposite-moving pairs.
    Divergence(DivergenceArgs),
}

#[derive(Debug, Args)]
pub struct PairArgs {
    /// First symbol.
    pub asset_a: String,
    /// Second symbol.
    pub asset_b: String,

    /// Asset class of the first symbol.
    #[arg(long, default_value = "equity")]
    pub class_a: String,
    /// Asset class of the second symbol.
    #[arg(long, default_value = "equity")]
    pub class_b: String,

    /// Trailing window in days.
    #[arg(long, default_value_t = 90)]
    pub days: u32,
}

#[derive(Debug, Args)]
pub struct WhatIfArgs {
    #[command(flatten)]
    pub pair: PairArgs,

    /// Hypothesized move of the first asset, in percent (e.g. 5 or -3.5).
    #[arg(long = "move", allow_hyphen_values = true)]
    pub move_pct: f64,
}

#[derive(Debug, Args)]
pub struct RiskArgs {
    /// Holding as SYMBOL:QUANTITY[:CLASS], repeatable.
    #[arg(long = "holding", required = true)]
    pub holdings: Vec<String>,

    /// Benchmark symbol for beta.
    #[arg(long, default_value = "SPY")]
    pub benchmark: String,

    /// Benchmark asset class.
    #[arg(long, default_value = "index")]
    pub benchmark_class: String,

    /// Trailing window in days.
    #[arg(long, default_value_t = 90)]
    pub days: u32,

    /// Annual risk-free rate used by the Sharpe ratio.
    #[arg(long, default_value_t = marketlens_core::DEFAULT_RISK_FREE_RATE)]
    pub risk_free_rate: f64,
}

#[derive(Debug, Args)]
pub struct MatrixArgs {
    /// Symbol as SYMBOL[:CLASS], repeatable; at least two.
    #[arg(long = "symbol", required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Trailing window in days.
    #[arg(long, default_value_t = 90)]
    pub days: u32,
}

#[derive(Debug, Args)]
pub struct DivergenceArgs {
    /// Path to a JSON file holding an array of live quote snapshots.
    pub snapshot: String,

    /// Trailing window used to derive historical correlations.
    #[arg(long, default_value_t = 90)]
    pub days: u32,

    /// Skip historical classification; report raw opposite pairs only.
    #[arg(long, default_value_t = false)]
    pub no_history: bool,
}
