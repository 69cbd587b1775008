mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::metrics::{MetricArgs, SummaryArgs};
use commands::scenarios::{InfoArgs, ScenariosArgs};

/// Financial and carbon metrics for ocean-based drawdown solutions
#[derive(Parser)]
#[command(
    name = "ocean",
    version,
    about = "Financial and carbon metrics for ocean-based drawdown solutions",
    long_about = "A CLI comparing a solution's PDS adoption scenario against its reference \
                  scenario with decimal precision. Reports adoption growth, first and \
                  operating cost, NPV, payback, abatement cost and CO2 sequestration."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every metric for one scenario
    Summary(SummaryArgs),
    /// Evaluate a single metric by name
    Metric(MetricArgs),
    /// List the scenarios in a solution's catalog
    Scenarios(ScenariosArgs),
    /// Describe one scenario and its settings
    Info(InfoArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::metrics::run_summary(args),
        Commands::Metric(args) => commands::metrics::run_metric(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Info(args) => commands::scenarios::run_info(args),
        Commands::Version => {
            println!("ocean {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
