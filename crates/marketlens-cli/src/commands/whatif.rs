use std::sync::Arc;

use marketlens_core::{Analytics, PriceHistoryProvider};

use crate::cli::WhatIfArgs;
use crate::error::CliError;

use super::{parse_asset, CommandResult};

pub async fn run(
    args: &WhatIfArgs,
    provider: &Arc<dyn PriceHistoryProvider>,
) -> Result<CommandResult, CliError> {
    let asset_a = parse_asset(&args.pair.asset_a, &args.pair.class_a)?;
    let asset_b = parse_asset(&args.pair.asset_b, &args.pair.class_b)?;
    let analytics = Analytics::new(Arc::clone(provider));

    let mut projection = analytics
        .what_if_move(&asset_a, &asset_b, args.pair.days, args.move_pct)
        .await;
    let warnings = std::mem::take(&mut projection.warnings);

    Ok(CommandResult::ok(serde_json::to_value(projection)?).with_warnings(warnings))
}
