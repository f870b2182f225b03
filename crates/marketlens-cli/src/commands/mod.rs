mod correlate;
mod divergence;
mod matrix;
mod risk;
mod trend;
mod whatif;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use marketlens_core::{
    AnalyticsError, AssetClass, AssetRef, FixtureProvider, Holding, PriceHistoryProvider, Report,
    ReportError, ReportMeta, Symbol, TradingDay,
};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<ReportError>,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: ReportError) -> Self {
        self.errors.push(error);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Report<Value>, CliError> {
    let end_day = match &cli.end_day {
        Some(value) => TradingDay::parse(value)?,
        None => TradingDay::today_utc(),
    };
    let provider: Arc<dyn PriceHistoryProvider> = Arc::new(FixtureProvider::new(end_day));

    let started = Instant::now();
    let command_result = match &cli.command {
        Command::Correlate(args) => correlate::run(args, &provider, end_day).await?,
        Command::Trend(args) => trend::run(args, &provider).await?,
        Command::Whatif(args) => whatif::run(args, &provider).await?,
        Command::Risk(args) => risk::run(args, &provider).await?,
        Command::Matrix(args) => matrix::run(args, &provider).await?,
        Command::Divergence(args) => divergence::run(args, &provider).await?,
    };
    let latency_ms = started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64;

    let CommandResult {
        data,
        warnings,
        errors,
    } = command_result;

    let meta = ReportMeta::new(Uuid::new_v4().to_string(), latency_ms).with_warnings(warnings);
    Ok(Report::with_errors(meta, data, errors))
}

pub fn parse_asset(symbol: &str, class: &str) -> Result<AssetRef, CliError> {
    Ok(AssetRef::new(
        Symbol::parse(symbol)?,
        AssetClass::from_str(class)?,
    ))
}

/// Parse `SYMBOL:QUANTITY[:CLASS]` into a holding.
pub fn parse_holding(spec: &str) -> Result<Holding, CliError> {
    let mut parts = spec.split(':');
    let symbol = parts
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| bad_holding(spec))?;
    let quantity = parts
        .next()
        .ok_or_else(|| bad_holding(spec))?
        .parse::<f64>()
        .map_err(|_| bad_holding(spec))?;
    let class = parts.next().unwrap_or("equity");
    if parts.next().is_some() {
        return Err(bad_holding(spec));
    }

    Holding::new(Symbol::parse(symbol)?, quantity, AssetClass::from_str(class)?)
        .map_err(CliError::from)
}

/// Parse `SYMBOL[:CLASS]` into an asset reference.
pub fn parse_symbol_spec(spec: &str) -> Result<AssetRef, CliError> {
    let mut parts = spec.split(':');
    let symbol = parts
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(|| bad_symbol_spec(spec))?;
    let class = parts.next().unwrap_or("equity");
    if parts.next().is_some() {
        return Err(bad_symbol_spec(spec));
    }

    parse_asset(symbol, class)
}

pub fn analytics_error(error: &AnalyticsError) -> ReportError {
    let code = match error {
        AnalyticsError::TooFewPoints { .. } => "analytics.too_few_points",
        AnalyticsError::LengthMismatch { .. } => "analytics.length_mismatch",
        AnalyticsError::ZeroVariance => "analytics.zero_variance",
    };
    ReportError::new(code, error.to_string())
}

fn bad_holding(spec: &str) -> CliError {
    CliError::Command(format!(
        "invalid holding '{spec}', expected SYMBOL:QUANTITY[:CLASS]"
    ))
}

fn bad_symbol_spec(spec: &str) -> CliError {
    CliError::Command(format!("invalid symbol '{spec}', expected SYMBOL[:CLASS]"))
}
