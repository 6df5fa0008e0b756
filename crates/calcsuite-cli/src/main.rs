mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::chemistry::{DilutionArgs, MolarityArgs};
use commands::fitness::{HeartRateArgs, Vo2maxArgs};
use commands::forms::ShareLinkArgs;
use commands::housing::{RentVsBuyArgs, RentalArgs};
use commands::numerology::LifePathArgs;
use commands::personal_finance::{DtiArgs, FutureValueArgs};
use commands::projection::{AmortizeArgs, ProjectArgs};
use commands::student_loans::StudentLoanArgs;

/// Loan, property, fitness and chemistry calculators
#[derive(Parser)]
#[command(
    name = "calc",
    version,
    about = "Deterministic calculators with decimal precision",
    long_about = "Run the calculator engine from the command line. Every calculator \
                  accepts a JSON file (--input), JSON piped on stdin, or individual flags. \
                  Rates are decimals: 0.07 means 7%. Set RUST_LOG=debug for tracing on stderr."
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
    /// Monthly payment and amortization schedule for a fixed-rate loan
    Amortize(AmortizeArgs),
    /// Year-by-year property projection (JSON input only)
    Project(ProjectArgs),
    /// Rental property investment analysis and rating
    Rental(RentalArgs),
    /// Compare renting against buying a home
    RentVsBuy(RentVsBuyArgs),
    /// Compare student loan repayment plans
    StudentLoans(StudentLoanArgs),
    /// VO2max from a 12-minute Cooper run
    Vo2max(Vo2maxArgs),
    /// Maximum heart rate and Karvonen training zones
    HeartRate(HeartRateArgs),
    /// Molarity of a solution
    Molarity(MolarityArgs),
    /// Solve M1·V1 = M2·V2 for the missing quantity
    Dilution(DilutionArgs),
    /// Life path and expression numbers
    LifePath(LifePathArgs),
    /// Future value of savings with regular contributions
    FutureValue(FutureValueArgs),
    /// Debt-to-income ratio
    Dti(DtiArgs),
    /// Build or open a rental calculator share link
    ShareLink(ShareLinkArgs),
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

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::projection::run_amortize(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Rental(args) => commands::housing::run_rental(args),
        Commands::RentVsBuy(args) => commands::housing::run_rent_vs_buy(args),
        Commands::StudentLoans(args) => commands::student_loans::run_student_loans(args),
        Commands::Vo2max(args) => commands::fitness::run_vo2max(args),
        Commands::HeartRate(args) => commands::fitness::run_heart_rate(args),
        Commands::Molarity(args) => commands::chemistry::run_molarity(args),
        Commands::Dilution(args) => commands::chemistry::run_dilution(args),
        Commands::LifePath(args) => commands::numerology::run_life_path(args),
        Commands::FutureValue(args) => commands::personal_finance::run_future_value(args),
        Commands::Dti(args) => commands::personal_finance::run_dti(args),
        Commands::ShareLink(args) => commands::forms::run_share_link(args),
        Commands::Version => {
            println!("calc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "calculation failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
