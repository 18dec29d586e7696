//! Bollinger Band + Volume Signal Engine
//!
//! Classifies the latest observation of a pair against Bollinger bands
//! computed over the most recent `period` prices, optionally confirmed by
//! value-volume. Two decision policies share the same band math:
//!
//! - **Heuristic**: four ordered rules producing BUY / SELL / HOLD
//! - **Screener**: BUY_AREA when price sits within a tolerance of the lower band
//!
//! All series are newest-first.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{SignalConfig, SignalMode, VolumeWindow};
pub use engine::{
    SignalEngine, REASON_ABOVE_MEAN_RISING_VOLUME, REASON_BELOW_LOWER_BAND,
    REASON_BELOW_MEAN_RISING_VOLUME, REASON_NEAR_LOWER_BAND, REASON_UPPER_BAND_SPIKE,
};
pub use error::{EngineResult, SignalError};
