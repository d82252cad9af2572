mod cli;
mod demo;
mod evaluate;
mod infra;

use placement_ai::config::AppConfig;
use placement_ai::error::AppError;
use placement_ai::telemetry;

pub fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    cli::run(&config)
}
