use std::io::Write;

use marketlens_core::Report;
use serde_json::Value;

use crate::error::CliError;

/// Print a report as JSON on stdout.
pub fn render(report: &Report<Value>, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, report)?;
    } else {
        serde_json::to_writer(&mut stdout, report)?;
    }
    writeln!(stdout)?;
    Ok(())
}
