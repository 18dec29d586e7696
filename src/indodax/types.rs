//! Indodax API payload types
//!
//! Numeric fields arrive either as JSON strings or numbers, so they are kept
//! as raw values and parsed on access.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Parse a JSON string or number as `f64`
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Ticker snapshot for one pair
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ticker {
    #[serde(default)]
    pub high: Value,
    #[serde(default)]
    pub low: Value,
    #[serde(default)]
    pub last: Value,
    #[serde(default)]
    pub buy: Value,
    #[serde(default)]
    pub sell: Value,
    /// 24h traded value in IDR
    #[serde(default)]
    pub vol_idr: Value,
    #[serde(default)]
    pub server_time: Value,
}

impl Ticker {
    pub fn last_f64(&self) -> Option<f64> {
        as_f64(&self.last)
    }

    pub fn vol_idr_f64(&self) -> Option<f64> {
        as_f64(&self.vol_idr)
    }

    pub fn high_f64(&self) -> Option<f64> {
        as_f64(&self.high)
    }

    pub fn low_f64(&self) -> Option<f64> {
        as_f64(&self.low)
    }
}

/// `GET /api/ticker/{pair}`
#[derive(Debug, Clone, Deserialize)]
pub struct TickerResponse {
    pub ticker: Ticker,
}

/// `GET /api/ticker_all`, keyed by underscored pair (e.g. "btc_idr")
#[derive(Debug, Clone, Deserialize)]
pub struct TickerAllResponse {
    #[serde(default)]
    pub tickers: HashMap<String, Ticker>,
}

/// `GET /api/chart/{pair}/{interval}`
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Extract the lowercased market id from a `GET /api/pairs` entry
pub fn pair_id(entry: &Value) -> Option<String> {
    let id = match entry.get("id")? {
        Value::String(s) => s.trim().to_lowercase(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// OHLCV candle from the chart endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Parse a chart row: either `[timestamp, open, high, low, close, volume]`
    /// or an object with those keys (any capitalization of the first letter)
    pub fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Array(row) => {
                if row.len() < 6 {
                    return None;
                }
                Some(Candle {
                    timestamp: as_i64(&row[0])?,
                    open: as_f64(&row[1])?,
                    high: as_f64(&row[2])?,
                    low: as_f64(&row[3])?,
                    close: as_f64(&row[4])?,
                    volume: as_f64(&row[5])?,
                })
            }
            Value::Object(_) => {
                let field = |name: &str| {
                    let mut capitalized = name.to_string();
                    capitalized[..1].make_ascii_uppercase();
                    raw.get(name).or_else(|| raw.get(capitalized.as_str()))
                };
                Some(Candle {
                    timestamp: field("timestamp").or_else(|| field("time")).and_then(as_i64)?,
                    open: field("open").and_then(as_f64)?,
                    high: field("high").and_then(as_f64)?,
                    low: field("low").and_then(as_f64)?,
                    close: field("close").and_then(as_f64)?,
                    volume: field("volume").and_then(as_f64)?,
                })
            }
            _ => None,
        }
    }
}
