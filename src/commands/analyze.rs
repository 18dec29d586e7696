//! Analyze command implementation

use anyhow::{Context, Result};
use indodax_signals::scanner;
use indodax_signals::{Config, SignalEngine};
use itertools::Itertools;
use tracing::info;

pub fn run(config: Config, pair: String) -> Result<()> {
    info!("Starting analysis for {}", pair);

    let engine =
        SignalEngine::new(config.heuristic_signal()).context("Failed to create signal engine")?;
    let client = super::client(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let analysis = rt
        .block_on(scanner::analyze_pair(
            &client,
            &engine,
            &pair,
            config.exchange.trade_limit,
        ))
        .with_context(|| format!("Analysis failed for {}", pair))?;

    let result = &analysis.result;
    let reasons = if result.reasons.is_empty() {
        "-".to_string()
    } else {
        result.reasons.iter().join("; ")
    };

    println!("\n{}", "=".repeat(60));
    println!("SIGNAL: {}", analysis.pair.to_uppercase());
    println!("{}", "=".repeat(60));
    println!("Last Price:         {:.2}", result.last_price);
    println!("SMA({}):            {:.2}", config.signal.period, result.stats.mean);
    println!("Upper Band:         {:.2}", result.stats.upper);
    println!("Lower Band:         {:.2}", result.stats.lower);
    println!("Avg Volume:         {:.2}", result.avg_volume);
    println!("Recent Volume:      {:.2}", result.recent_volume);
    println!("Skipped Trades:     {}", analysis.skipped);
    println!("Signal:             {}", result.signal);
    println!("Reasons:            {}", reasons);
    println!("{}", "=".repeat(60));

    Ok(())
}
