mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use secular_forum_core::DataConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Secular Forum outlook data tooling", long_about = None)]
struct Cli {
    /// Spreadsheet to read (defaults to SECULAR_FORUM_DATA_FILE, then data/outlooks.csv)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the spreadsheet's columns, leading rows and per-field fill counts
    Inspect(InspectArgs),
    /// Run the narrative transformation and print the base-case spine
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Number of leading rows to print
    #[arg(long, default_value_t = 3)]
    rows: usize,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Year whose theme nodes are listed
    #[arg(long, default_value_t = 2024)]
    year: i64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();
    let config = match cli.data_file {
        Some(path) => DataConfig::new(path),
        None => DataConfig::from_env(),
    };

    match cli.command {
        Command::Inspect(args) => commands::inspect::run(&config, args.rows),
        Command::Verify(args) => commands::verify::run(&config, args.year),
    }
}
