use std::str::FromStr;
use std::sync::Arc;

use marketlens_core::{AssetClass, PortfolioRiskEngine, PriceHistoryProvider, Symbol};

use crate::cli::RiskArgs;
use crate::error::CliError;

use super::{parse_holding, CommandResult};

pub async fn run(
    args: &RiskArgs,
    provider: &Arc<dyn PriceHistoryProvider>,
) -> Result<CommandResult, CliError> {
    let holdings = args
        .holdings
        .iter()
        .map(|spec| parse_holding(spec))
        .collect::<Result<Vec<_>, _>>()?;
    let benchmark = Symbol::parse(&args.benchmark)?;
    let benchmark_class = AssetClass::from_str(&args.benchmark_class)?;

    let engine = PortfolioRiskEngine::new(Arc::clone(provider))
        .with_risk_free_rate(args.risk_free_rate);
    let report = engine
        .metrics(&holdings, benchmark, benchmark_class, args.days)
        .await;

    Ok(CommandResult::ok(serde_json::to_value(report.metrics)?).with_warnings(report.warnings))
}
