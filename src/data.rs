//! Series building
//!
//! Turns raw exchange records into newest-first price and value-volume
//! series. Malformed records are skipped one by one and counted; only an
//! entirely unusable input fails.

use serde_json::Value;
use tracing::debug;

use crate::indodax::{as_f64, Candle};
use crate::signal::{EngineResult, SignalError};
use crate::types::PricePoint;

/// Newest-first trade observations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeSeries {
    points: Vec<PricePoint>,
}

impl TradeSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        TradeSeries { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }

    /// Value-volume (price x amount), aligned with `prices()`
    pub fn volumes(&self) -> Vec<f64> {
        self.points.iter().map(PricePoint::value_volume).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Usable items plus the number of records dropped while parsing
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered<T> {
    pub items: T,
    pub skipped: usize,
}

/// Parse one trade record. A missing amount counts as zero, a missing or
/// non-positive price makes the record unusable.
pub fn trade_point(record: &Value) -> Option<PricePoint> {
    let price = as_f64(record.get("price")?)?;
    let amount = match record.get("amount") {
        Some(value) => as_f64(value)?,
        None => 0.0,
    };
    PricePoint::new(price, amount)
}

/// Build a trade series from the first `limit` raw records
pub fn trade_series(records: &[Value], limit: usize) -> EngineResult<Filtered<TradeSeries>> {
    let window = &records[..records.len().min(limit)];
    let points: Vec<PricePoint> = window.iter().filter_map(trade_point).collect();
    let skipped = window.len() - points.len();

    if skipped > 0 {
        debug!(skipped, total = window.len(), "Skipped malformed trade records");
    }

    if points.is_empty() {
        return Err(SignalError::InvalidInput(format!(
            "no usable trade records ({} skipped)",
            skipped
        )));
    }

    Ok(Filtered {
        items: TradeSeries::new(points),
        skipped,
    })
}

/// Parse chart rows, keeping their original (oldest-first) order
pub fn candles(rows: &[Value]) -> EngineResult<Filtered<Vec<Candle>>> {
    let parsed: Vec<Candle> = rows
        .iter()
        .filter_map(Candle::from_raw)
        .filter(|c| c.close.is_finite() && c.close > 0.0)
        .collect();
    let skipped = rows.len() - parsed.len();

    if skipped > 0 {
        debug!(skipped, total = rows.len(), "Skipped malformed chart rows");
    }

    if parsed.is_empty() {
        return Err(SignalError::InvalidInput(format!(
            "no usable candles ({} skipped)",
            skipped
        )));
    }

    Ok(Filtered {
        items: parsed,
        skipped,
    })
}

/// Newest-first closes and value-volumes (close x volume) from oldest-first candles
pub fn closes_newest_first(candles: &[Candle]) -> (Vec<f64>, Vec<f64>) {
    candles
        .iter()
        .rev()
        .map(|c| (c.close, c.close * c.volume))
        .unzip()
}
