//! tickbar CLI - Tick-to-minute-bar aggregation and signal emission.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tickbar_lib::prelude::*;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

#[derive(Parser)]
#[command(name = "tickbar")]
#[command(about = "Aggregate price ticks into one-minute OHLCV bars", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and info logs)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate a recorded tick file and write the closed bars
    Replay {
        /// Tick file (`instrument,price[,timestamp_ms]` or NDJSON)
        input: PathBuf,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv, json, ndjson)
        #[arg(short, long, default_value = "csv")]
        format: OutputFormat,

        /// Input line format (csv, ndjson)
        #[arg(long, default_value = "csv")]
        input_format: InputFormat,

        /// Lookback window in minutes (sizes the per-instrument history)
        #[arg(long, default_value_t = AggregatorConfig::DEFAULT_WINDOW_MINUTES)]
        window: usize,

        /// Handling of ticks older than the open bar (accept, reject, coalesce)
        #[arg(long, default_value = "accept")]
        policy: BackdatedPolicy,

        /// Also write each instrument's still-open bar
        #[arg(long)]
        include_partial: bool,

        /// Only aggregate these instruments (repeatable)
        #[arg(long = "symbol")]
        symbols: Vec<String>,
    },

    /// Aggregate ticks from stdin and post signals on every closed bar
    Stream {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input line format (csv, ndjson)
        #[arg(long, default_value = "csv")]
        input_format: InputFormat,

        /// Log closed bars without contacting the signal endpoint
        #[arg(long)]
        no_signal: bool,
    },

    /// Print the effective configuration
    Config {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Replay {
            input,
            output,
            format,
            input_format,
            window,
            policy,
            include_partial,
            symbols,
        } => {
            let options = commands::replay::ReplayOptions {
                format,
                input_format,
                config: AggregatorConfig::new(window).with_policy(policy),
                include_partial,
                symbols: symbols.into_iter().collect(),
            };
            commands::replay::replay(&input, output.as_deref(), &options, cli.quiet).await
        }
        Commands::Stream {
            config,
            input_format,
            no_signal,
        } => commands::stream::stream(config.as_deref(), input_format, no_signal).await,
        Commands::Config { config } => commands::config::show_config(config.as_deref()),
    }
}
