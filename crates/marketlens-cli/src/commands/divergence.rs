use std::sync::Arc;

use marketlens_core::{
    find_opposite_pairs, pair_alerts, AssetClass, CorrelationTable, Holding, LiveQuote,
    PortfolioRiskEngine, PriceHistoryProvider,
};

use crate::cli::DivergenceArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(
    args: &DivergenceArgs,
    provider: &Arc<dyn PriceHistoryProvider>,
) -> Result<CommandResult, CliError> {
    let raw = std::fs::read_to_string(&args.snapshot)?;
    let quotes: Vec<LiveQuote> = serde_json::from_str(&raw)?;

    if args.no_history {
        let pairs = find_opposite_pairs(&quotes);
        return Ok(CommandResult::ok(serde_json::to_value(pairs)?));
    }

    // Historical correlations for the snapshot's symbols come from the same
    // pipeline the matrix command uses; dash-separated symbols follow the
    // continuous crypto calendar.
    let holdings = quotes
        .iter()
        .map(|quote| {
            let class = if quote.symbol.as_str().contains('-') {
                AssetClass::Crypto
            } else {
                AssetClass::Equity
            };
            Holding::new(quote.symbol.clone(), 1.0, class).map_err(CliError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let engine = PortfolioRiskEngine::new(Arc::clone(provider));
    let matrix = engine.correlation_matrix(&holdings, args.days).await;
    let known = CorrelationTable::from_matrix(&matrix.entries);

    let alerts = pair_alerts(&quotes, &known);
    Ok(CommandResult::ok(serde_json::to_value(alerts)?).with_warnings(matrix.warnings))
}
