mod cli;
mod commands;
mod infra;

use loot_council::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
