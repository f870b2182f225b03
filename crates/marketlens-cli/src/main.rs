mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("error: {error}");
        std::process::exit(error.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let report = commands::run(&cli).await?;
    output::render(&report, cli.pretty)?;

    if cli.strict && (!report.meta.warnings.is_empty() || !report.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: report.meta.warnings.len(),
            error_count: report.errors.len(),
        });
    }

    Ok(())
}
