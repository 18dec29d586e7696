//! Core data types shared by the signal engine and its collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Single trade observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    pub amount: f64,
}

impl PricePoint {
    /// Create a point, rejecting non-finite or non-positive prices and negative amounts
    pub fn new(price: f64, amount: f64) -> Option<Self> {
        if !price.is_finite() || price <= 0.0 || !amount.is_finite() || amount < 0.0 {
            return None;
        }
        Some(Self { price, amount })
    }

    /// Traded value (price x amount), used as the liquidity proxy
    pub fn value_volume(&self) -> f64 {
        self.price * self.amount
    }
}

/// Bollinger band statistics over one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandStats {
    pub mean: f64,
    pub stddev: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Discrete trading signal
///
/// `Buy`, `Sell` and `Hold` come from the heuristic policy; `BuyArea` and
/// `Wait` from the lower-band screener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    BuyArea,
    Wait,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::BuyArea => "BUY_AREA",
            Signal::Wait => "WAIT",
        }
    }

    /// True for the signals that suggest entering a position
    pub fn is_bullish(&self) -> bool {
        matches!(self, Signal::Buy | Signal::BuyArea)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalResult {
    pub signal: Signal,
    /// Human-readable reasons, in the order the rules fired
    pub reasons: Vec<String>,
    pub last_price: f64,
    pub stats: BandStats,
    pub avg_volume: f64,
    pub recent_volume: f64,
}
