//! Pair scanning
//!
//! Fetches market data for a pair through a [`MarketData`] source, builds
//! the series and runs the signal engine on them.

use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::data;
use crate::indodax::MarketData;
use crate::signal::{SignalEngine, SignalError};
use crate::types::{Signal, SignalResult};

#[derive(Debug, Error)]
pub enum ScanError {
    /// Upstream request or payload decoding failed
    #[error("{0}")]
    Fetch(String),

    #[error("ticker invalid: {0}")]
    InvalidTicker(String),

    #[error(transparent)]
    Signal(#[from] SignalError),
}

impl ScanError {
    fn fetch(what: &str, err: anyhow::Error) -> Self {
        ScanError::Fetch(format!("failed to fetch {}: {:#}", what, err))
    }
}

/// Heuristic analysis of one pair from its ticker and recent trades
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAnalysis {
    pub pair: String,
    pub result: SignalResult,
    /// Trade records dropped as malformed
    pub skipped: usize,
}

/// Screener outcome for one pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenRow {
    pub pair: String,
    pub close: f64,
    pub lower: f64,
    pub signal: Signal,
}

/// Per-pair screen outcome; failures stay local to their pair
#[derive(Debug)]
pub struct ScreenOutcome {
    pub pair: String,
    pub result: Result<ScreenRow, ScanError>,
}

/// Normalize user-supplied pair names ("BTC_IDR " -> "btc_idr")
pub fn normalize_pair(pair: &str) -> String {
    pair.trim().to_lowercase()
}

/// Split a comma-separated pair list, dropping blanks
pub fn parse_pair_list(pairs: &str) -> Vec<String> {
    pairs
        .split(',')
        .map(normalize_pair)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Fetch ticker and trades concurrently, then run the engine
pub async fn analyze_pair<M: MarketData>(
    market: &M,
    engine: &SignalEngine,
    pair: &str,
    trade_limit: usize,
) -> Result<PairAnalysis, ScanError> {
    let pair = normalize_pair(pair);

    let (ticker, trades) = tokio::join!(market.ticker(&pair), market.trades(&pair));
    let ticker = ticker.map_err(|e| ScanError::fetch("ticker", e))?;
    let trades = trades.map_err(|e| ScanError::fetch("trades", e))?;

    let last_price = ticker
        .last_f64()
        .filter(|p| p.is_finite())
        .ok_or_else(|| ScanError::InvalidTicker(format!("unusable last price {}", ticker.last)))?;

    let filtered = data::trade_series(&trades, trade_limit)?;
    let series = filtered.items;

    let result = engine.analyze(last_price, &series.prices(), &series.volumes())?;

    info!(
        pair = %pair,
        signal = %result.signal,
        last_price,
        trades = series.len(),
        skipped = filtered.skipped,
        "Pair analyzed"
    );

    Ok(PairAnalysis {
        pair,
        result,
        skipped: filtered.skipped,
    })
}

/// Screen one pair against the lower band of its recent closes
pub async fn screen_pair<M: MarketData>(
    market: &M,
    engine: &SignalEngine,
    pair: &str,
    interval: &str,
    limit: u32,
) -> Result<ScreenRow, ScanError> {
    let pair = normalize_pair(pair);

    let rows = market
        .candles(&pair, interval, limit)
        .await
        .map_err(|e| ScanError::fetch("chart", e))?;

    let filtered = data::candles(&rows)?;
    let (closes, volumes) = data::closes_newest_first(&filtered.items);
    let result = engine.analyze_closes(&closes, &volumes)?;

    debug!(
        pair = %pair,
        close = result.last_price,
        lower = result.stats.lower,
        signal = %result.signal,
        skipped = filtered.skipped,
        "Pair screened"
    );

    Ok(ScreenRow {
        pair,
        close: result.last_price,
        lower: result.stats.lower,
        signal: result.signal,
    })
}

/// Screen many pairs with at most `concurrency` requests in flight.
/// Output order follows input order.
pub async fn screen_pairs<M: MarketData>(
    market: &M,
    engine: &SignalEngine,
    pairs: &[String],
    interval: &str,
    limit: u32,
    concurrency: usize,
) -> Vec<ScreenOutcome> {
    info!(
        pairs = pairs.len(),
        interval,
        concurrency,
        "Screening pairs"
    );

    stream::iter(pairs.to_vec())
        .map(|pair| async move {
            let result = screen_pair(market, engine, &pair, interval, limit).await;
            if let Err(ref e) = result {
                warn!(pair = %pair, error = %e, "Screen failed");
            }
            ScreenOutcome {
                pair: normalize_pair(&pair),
                result,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}
