//! Screen command implementation

use anyhow::{Context, Result};
use itertools::Itertools;
use indodax_signals::scanner::{self, ScreenOutcome};
use indodax_signals::{Config, SignalEngine};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};

/// One CSV output line
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    pair: &'a str,
    price: Option<f64>,
    lower: Option<f64>,
    vol_idr: Option<f64>,
    signal: String,
}

pub fn run(
    config: Config,
    pairs_override: Option<String>,
    tf_override: Option<String>,
    csv_path: Option<String>,
) -> Result<()> {
    let pairs = match pairs_override {
        Some(list) => scanner::parse_pair_list(&list),
        None => config.screener.pairs.clone(),
    };
    anyhow::ensure!(!pairs.is_empty(), "No pairs to screen");

    let interval = tf_override.unwrap_or_else(|| config.screener.interval.clone());
    info!("Screening {} pairs on {}", pairs.len(), interval);

    let engine =
        SignalEngine::new(config.screener_signal()).context("Failed to create screener")?;
    let client = super::client(&config)?;

    let rt = tokio::runtime::Runtime::new()?;
    let (outcomes, tickers) = rt.block_on(async {
        let outcomes = scanner::screen_pairs(
            &client,
            &engine,
            &pairs,
            &interval,
            config.screener.candle_limit,
            config.exchange.concurrency,
        )
        .await;

        // 24h volume is informational only
        let tickers = match client.get_all_tickers().await {
            Ok(tickers) => tickers,
            Err(e) => {
                warn!("Failed to fetch tickers for volume column: {:#}", e);
                HashMap::new()
            }
        };

        (outcomes, tickers)
    });

    let vol_idr = |pair: &str| tickers.get(pair).and_then(|t| t.vol_idr_f64());

    println!("\n{}", "=".repeat(92));
    println!("SCREENER ({} - Bollinger Band)", interval);
    println!("{}", "=".repeat(92));
    println!(
        "{:<12} {:>18} {:>18} {:>20} {:>20}",
        "Pair", "Price", "Lower BB", "Vol 24h (IDR)", "Signal"
    );
    println!("{}", "-".repeat(92));

    for outcome in &outcomes {
        let volume = format_volume(vol_idr(&outcome.pair));
        match &outcome.result {
            Ok(row) => println!(
                "{:<12} {:>18.0} {:>18.0} {:>20} {:>20}",
                row.pair.to_uppercase(),
                row.close,
                row.lower,
                volume,
                row.signal
            ),
            Err(e) => println!(
                "{:<12} {:>18} {:>18} {:>20} {:>20}",
                outcome.pair.to_uppercase(),
                "-",
                "-",
                volume,
                format!("ERROR ({})", short_error(&e.to_string()))
            ),
        }
    }
    println!("{}", "=".repeat(92));

    let buy_count = outcomes
        .iter()
        .filter(|o| matches!(&o.result, Ok(row) if row.signal.is_bullish()))
        .count();
    println!("Buy area: {} / {}", buy_count, outcomes.len());

    if let Some(path) = csv_path {
        write_csv(&path, &outcomes, vol_idr)?;
        info!("Results written to {}", path);
        println!("Results written to {}", path);
    }

    Ok(())
}

/// Whole rupiah with thousands separators, `-` when the ticker has no volume
fn format_volume(volume: Option<f64>) -> String {
    let Some(volume) = volume.filter(|v| v.is_finite()) else {
        return "-".to_string();
    };

    let digits = format!("{:.0}", volume.abs());
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",");

    if volume < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn short_error(message: &str) -> &str {
    message.split(':').next().unwrap_or(message)
}

fn write_csv(
    path: &str,
    outcomes: &[ScreenOutcome],
    vol_idr: impl Fn(&str) -> Option<f64>,
) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to create {}", path))?;

    for outcome in outcomes {
        let row = match &outcome.result {
            Ok(row) => CsvRow {
                pair: &outcome.pair,
                price: Some(row.close),
                lower: Some(row.lower),
                vol_idr: vol_idr(&outcome.pair),
                signal: row.signal.to_string(),
            },
            Err(_) => CsvRow {
                pair: &outcome.pair,
                price: None,
                lower: None,
                vol_idr: vol_idr(&outcome.pair),
                signal: "ERROR".to_string(),
            },
        };
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}
