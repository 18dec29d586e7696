//! Signal engine
//!
//! Pure, synchronous band math and rule evaluation. The engine holds only
//! its configuration, so one instance can be shared freely across tasks.

use tracing::trace;

use super::config::{SignalConfig, SignalMode, VolumeWindow};
use super::error::{EngineResult, SignalError};
use crate::indicators;
use crate::types::{BandStats, Signal, SignalResult};

pub const REASON_UPPER_BAND_SPIKE: &str = "Price above upper band with volume spike";
pub const REASON_BELOW_LOWER_BAND: &str = "Price below lower band";
pub const REASON_ABOVE_MEAN_RISING_VOLUME: &str = "Above mean with rising volume";
pub const REASON_BELOW_MEAN_RISING_VOLUME: &str = "Below mean with rising volume";
pub const REASON_NEAR_LOWER_BAND: &str = "Price within tolerance of lower band";

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: SignalConfig,
}

impl SignalEngine {
    pub fn new(config: SignalConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(SignalEngine { config })
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn mode(&self) -> SignalMode {
        self.config.mode
    }

    /// Bollinger statistics over the first `period` prices of a newest-first window
    pub fn compute_band_stats(&self, window: &[f64]) -> EngineResult<BandStats> {
        let period = self.config.period;
        if window.len() < period {
            return Err(SignalError::InsufficientData {
                required: period,
                available: window.len(),
            });
        }

        let window = &window[..period];
        ensure_finite("price", window)?;

        Ok(indicators::bollinger_bands(window, self.config.band_multiplier))
    }

    /// Heuristic decision policy. Rules are checked in order and the first
    /// match wins, since the conditions overlap.
    pub fn classify(
        &self,
        last_price: f64,
        stats: &BandStats,
        avg_volume: f64,
        recent_volume: f64,
    ) -> (Signal, Vec<String>) {
        let spike = recent_volume > avg_volume * self.config.volume_spike_threshold;
        let rising = recent_volume > avg_volume * self.config.volume_rise_threshold;

        let (signal, reason) = if last_price > stats.upper && spike {
            (Signal::Buy, Some(REASON_UPPER_BAND_SPIKE))
        } else if last_price < stats.lower {
            (Signal::Sell, Some(REASON_BELOW_LOWER_BAND))
        } else if last_price > stats.mean && rising {
            (Signal::Buy, Some(REASON_ABOVE_MEAN_RISING_VOLUME))
        } else if last_price < stats.mean && rising {
            (Signal::Sell, Some(REASON_BELOW_MEAN_RISING_VOLUME))
        } else {
            (Signal::Hold, None)
        };

        (signal, reason.map(str::to_string).into_iter().collect())
    }

    /// Lower band screener: BUY_AREA while the close is within `tolerance` of the band
    pub fn screen(&self, close_price: f64, lower_band: f64) -> Signal {
        if close_price <= lower_band * self.config.tolerance {
            Signal::BuyArea
        } else {
            Signal::Wait
        }
    }

    /// Analyze the latest price against newest-first price and value-volume series
    ///
    /// Prices are windowed to `period`. The volume average covers the whole
    /// supplied series unless `volume_window` is `Period`.
    pub fn analyze(
        &self,
        last_price: f64,
        prices: &[f64],
        volumes: &[f64],
    ) -> EngineResult<SignalResult> {
        if !last_price.is_finite() {
            return Err(SignalError::InvalidInput(format!(
                "last price is not a finite number: {}",
                last_price
            )));
        }

        let stats = self.compute_band_stats(prices)?;

        let volume_slice = match self.config.volume_window {
            VolumeWindow::FullSeries => volumes,
            VolumeWindow::Period => &volumes[..volumes.len().min(self.config.period)],
        };
        ensure_finite("volume", volume_slice)?;
        let avg_volume = indicators::mean(volume_slice);
        let recent_volume = volumes.first().copied().unwrap_or(0.0);

        let (signal, reasons) = match self.config.mode {
            SignalMode::Heuristic => self.classify(last_price, &stats, avg_volume, recent_volume),
            SignalMode::Screener => {
                let signal = self.screen(last_price, stats.lower);
                let reasons = if signal == Signal::BuyArea {
                    vec![REASON_NEAR_LOWER_BAND.to_string()]
                } else {
                    Vec::new()
                };
                (signal, reasons)
            }
        };

        trace!(
            last_price,
            mean = stats.mean,
            upper = stats.upper,
            lower = stats.lower,
            avg_volume,
            recent_volume,
            signal = %signal,
            "Signal evaluated"
        );

        Ok(SignalResult {
            signal,
            reasons,
            last_price,
            stats,
            avg_volume,
            recent_volume,
        })
    }

    /// Analyze a newest-first close series, taking the newest close as the last price
    pub fn analyze_closes(&self, closes: &[f64], volumes: &[f64]) -> EngineResult<SignalResult> {
        let last_price = closes.first().copied().ok_or_else(|| {
            SignalError::InvalidInput("close series is empty".to_string())
        })?;
        self.analyze(last_price, closes, volumes)
    }
}

fn ensure_finite(label: &str, values: &[f64]) -> EngineResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(SignalError::InvalidInput(format!(
            "{} at index {} is not a finite number: {}",
            label, index, values[index]
        ))),
        None => Ok(()),
    }
}
