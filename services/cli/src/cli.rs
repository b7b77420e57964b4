use crate::commands::{run_check_config, run_report, CheckConfigArgs, ReportArgs};
use clap::{Parser, Subcommand};
use loot_council::config::AppConfig;
use loot_council::error::AppError;
use loot_council::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "loot-council-cli",
    about = "Rank raiders for a loot drop and validate guild scoring configs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a roster export for one item and print the ranked report
    Report(ReportArgs),
    /// Validate a guild scoring config and print the effective values
    CheckConfig(CheckConfigArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    tracing::debug!(environment = ?config.environment, "configuration loaded");

    match cli.command {
        Command::Report(args) => run_report(args, &config),
        Command::CheckConfig(args) => run_check_config(args, &config),
    }
}
