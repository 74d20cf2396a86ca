mod commands;
mod input;
mod output;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commands::payoff::{PayoffArgs, SelectArgs};

/// Debt payoff strategy projections
#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Debt payoff strategy projections",
    long_about = "Simulates month-by-month debt paydown with decimal precision. \
                  Supports Snowball, Avalanche and minimum-payment projections, \
                  a three-way comparison with a recommendation, and the payload \
                  for saving a chosen strategy."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Path to a TOML or JSON file with engine settings
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Project payoff paying the smallest balance first
    Snowball(PayoffArgs),
    /// Project payoff paying the highest interest rate first
    Avalanche(PayoffArgs),
    /// Project payoff paying only the minimums
    MinimumOnly(PayoffArgs),
    /// Compare Snowball, Avalanche and minimum payments
    Compare(PayoffArgs),
    /// Build the payload for saving a chosen strategy
    Select(SelectArgs),
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
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match settings::load(cli.config.as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Snowball(args) => commands::payoff::run_snowball(args, &settings),
        Commands::Avalanche(args) => commands::payoff::run_avalanche(args, &settings),
        Commands::MinimumOnly(args) => commands::payoff::run_minimum_only(args, &settings),
        Commands::Compare(args) => commands::payoff::run_compare(args, &settings),
        Commands::Select(args) => commands::payoff::run_select(args, &settings),
        Commands::Version => {
            println!("payoff {}", env!("CARGO_PKG_VERSION"));
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
