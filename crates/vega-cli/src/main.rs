use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use vega_core::EngineConfig;

use vega_cli::commands::{self, QuoteArgs};

#[derive(Parser, Debug)]
#[command(name = "vega")]
#[command(about = "Deterministic Black-Scholes quotes and GWAV series")]
struct Args {
    /// Path to engine configuration file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a call/put pair with greeks
    Quote(QuoteArgs),

    /// Record a value into a series file, creating it if missing
    Record {
        #[arg(long)]
        series: PathBuf,
        #[arg(long)]
        value: String,
        #[arg(long)]
        timestamp: u64,
    },

    /// Geometric mean of a series between two lookbacks
    Gwav {
        #[arg(long)]
        series: PathBuf,
        /// Current time in seconds
        #[arg(long)]
        now: u64,
        /// Window start, seconds before `now`
        #[arg(long)]
        from: u64,
        /// Window end, seconds before `now`
        #[arg(long, default_value = "0")]
        to: u64,
    },

    /// Raw accumulators at each lookback
    Observe {
        #[arg(long)]
        series: PathBuf,
        #[arg(long)]
        now: u64,
        /// Lookbacks in seconds
        #[arg(required = true)]
        seconds_ago: Vec<u64>,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    // Load configuration
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match args.command {
        Command::Quote(quote) => print_json(&commands::quote(&config, &quote)?),
        Command::Record { series, value, timestamp } => {
            let outcome = commands::record(&config, &series, &value, timestamp)
                .with_context(|| format!("Failed to record into {}", series.display()))?;
            print_json(&outcome)
        }
        Command::Gwav { series, now, from, to } => print_json(&commands::gwav(&config, &series, now, from, to)?),
        Command::Observe { series, now, seconds_ago } => {
            print_json(&commands::observe(&config, &series, now, &seconds_ago)?)
        }
    }
}
