use std::sync::Arc;

use marketlens_core::{Analytics, PriceHistoryProvider};
use serde_json::Value;

use crate::cli::PairArgs;
use crate::error::CliError;

use super::{analytics_error, parse_asset, CommandResult};

pub async fn run(
    args: &PairArgs,
    provider: &Arc<dyn PriceHistoryProvider>,
) -> Result<CommandResult, CliError> {
    let asset_a = parse_asset(&args.asset_a, &args.class_a)?;
    let asset_b = parse_asset(&args.asset_b, &args.class_b)?;
    let analytics = Analytics::new(Arc::clone(provider));

    match analytics
        .correlation_trend(&asset_a, &asset_b, args.days)
        .await
    {
        Ok(mut pair) => {
            let warnings = std::mem::take(&mut pair.warnings);
            Ok(CommandResult::ok(serde_json::to_value(pair)?).with_warnings(warnings))
        }
        Err(error) => {
            Ok(CommandResult::ok(Value::Null).with_error(analytics_error(&error)))
        }
    }
}
