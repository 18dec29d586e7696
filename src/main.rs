//! Indodax signals - main entry point
//!
//! This binary provides four subcommands:
//! - analyze: Bollinger band + volume signal for one pair (BUY/SELL/HOLD)
//! - screen: Lower band screener over several pairs (BUY_AREA/WAIT)
//! - markets: List market ids
//! - serve: Run the JSON API server

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "indodax-signals")]
#[command(about = "Bollinger band and volume signals for Indodax crypto pairs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one pair from its ticker and recent trades
    Analyze {
        /// Trading pair. E.g., "btcidr"
        #[arg(short, long)]
        pair: String,
    },

    /// Screen pairs against the lower Bollinger band
    Screen {
        /// Pairs to screen (comma-separated). E.g., "btc_idr,eth_idr"
        #[arg(short, long)]
        pairs: Option<String>,

        /// Chart timeframe. E.g., "15m", "1h"
        #[arg(short, long)]
        tf: Option<String>,

        /// Also write the results to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },

    /// List available market ids
    Markets,

    /// Run the JSON API server
    Serve {
        /// Bind address (overrides config). E.g., "127.0.0.1:8080"
        #[arg(short, long)]
        bind: Option<String>,
    },
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // Log file naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn,tower_http=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr)
        .with_ansi(true);

    // Same format without ANSI colors
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized");
    info!("Log file: {}", log_path.display());

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let command_name = match &cli.command {
        Commands::Analyze { .. } => "analyze",
        Commands::Screen { .. } => "screen",
        Commands::Markets => "markets",
        Commands::Serve { .. } => "serve",
    };

    setup_logging(cli.verbose, command_name)?;

    let config = indodax_signals::Config::load(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {}", path);
    }

    match cli.command {
        Commands::Analyze { pair } => commands::analyze::run(config, pair),
        Commands::Screen { pairs, tf, csv } => commands::screen::run(config, pairs, tf, csv),
        Commands::Markets => commands::markets::run(config),
        Commands::Serve { bind } => commands::serve::run(config, bind),
    }
}
