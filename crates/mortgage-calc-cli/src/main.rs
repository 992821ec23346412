mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::eligibility::EligibilityArgs;
use commands::payment::PaymentArgs;
use commands::programs::ProgramsArgs;
use commands::schedule::ScheduleArgs;
use commands::sensitivity::SensitivityArgs;

/// Mortgage payment calculations
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "Mortgage payment, insurance and amortisation calculations",
    long_about = "A CLI for pricing home loans with decimal precision. Computes the \
                  monthly payment breakdown (principal & interest, escrow, PMI/MIP, HOA), \
                  amortisation schedules, loan-program eligibility and payment sensitivity."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly payment breakdown for a home purchase
    Payment(PaymentArgs),
    /// Build a month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// List or show loan programs
    Programs(ProgramsArgs),
    /// Check a scenario against loan program minimums
    Eligibility(EligibilityArgs),
    /// Vary one or two scenario fields and report the payment
    Sensitivity(SensitivityArgs),
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

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::payment::run_payment(args),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Programs(args) => commands::programs::run_programs(args),
        Commands::Eligibility(args) => commands::eligibility::run_eligibility(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
