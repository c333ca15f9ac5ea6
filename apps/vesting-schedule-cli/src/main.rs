use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;
mod error;

use error::CliResult;

#[derive(Parser)]
#[command(name = "vesting-schedule")]
#[command(about = "Vesting Schedule CLI - Validate vesting tables and convert them to schedules")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a vesting table (CSV export) into a schedule JSON file
    Convert {
        /// Vesting table exported as CSV
        table: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Conversion configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rows above the grand total row
        #[arg(long)]
        header_height: Option<usize>,
    },

    /// Validate a vesting table and print its summary
    Check {
        /// Vesting table exported as CSV
        table: PathBuf,

        /// Conversion configuration file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Rows above the grand total row
        #[arg(long)]
        header_height: Option<usize>,

        /// Also fail when the last pool does not add up
        #[arg(long)]
        strict: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the summary of a schedule JSON file
    Summarize {
        /// Schedule JSON file
        schedule: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> CliResult<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            table,
            output,
            config,
            header_height,
        } => commands::convert::execute(table, output, config, header_height),

        Commands::Check {
            table,
            config,
            header_height,
            strict,
            json,
        } => commands::check::execute(table, config, header_height, strict, json),

        Commands::Summarize { schedule, json } => commands::summarize::execute(schedule, json),
    }
}
