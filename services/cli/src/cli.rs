use crate::demo::{run_demo, DemoArgs};
use crate::evaluate::{run_evaluate, EvaluateArgs};
use clap::{Parser, Subcommand};
use placement_ai::config::AppConfig;
use placement_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "placement-ai",
    about = "Evaluate candidates against placement drive criteria from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one candidate against a drive's criteria and print the outcome as JSON
    Evaluate(EvaluateArgs),
    /// Run an end-to-end demo with sample drives and a sample student
    Demo(DemoArgs),
}

pub(crate) fn run(config: &AppConfig) -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Evaluate(args) => run_evaluate(args),
        Command::Demo(args) => run_demo(args, config),
    }
}
