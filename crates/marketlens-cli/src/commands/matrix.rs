use std::sync::Arc;

use marketlens_core::{Holding, PortfolioRiskEngine, PriceHistoryProvider};

use crate::cli::MatrixArgs;
use crate::error::CliError;

use super::{parse_symbol_spec, CommandResult};

pub async fn run(
    args: &MatrixArgs,
    provider: &Arc<dyn PriceHistoryProvider>,
) -> Result<CommandResult, CliError> {
    if args.symbols.len() < 2 {
        return Err(CliError::Command(String::from(
            "matrix needs at least two --symbol entries",
        )));
    }

    let holdings = args
        .symbols
        .iter()
        .map(|spec| {
            let asset = parse_symbol_spec(spec)?;
            // Quantity does not matter for pairwise correlation.
            Holding::new(asset.symbol, 1.0, asset.asset_class).map_err(CliError::from)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let engine = PortfolioRiskEngine::new(Arc::clone(provider));
    let report = engine.correlation_matrix(&holdings, args.days).await;

    Ok(CommandResult::ok(serde_json::to_value(report.entries)?).with_warnings(report.warnings))
}
