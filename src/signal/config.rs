//! Signal engine configuration
//!
//! Every threshold of the decision policies is a tunable parameter here.

use serde::{Deserialize, Serialize};

use super::error::SignalError;

/// Decision policy applied after the band math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalMode {
    /// Four ordered band/volume rules (BUY / SELL / HOLD)
    Heuristic,
    /// Lower band tolerance check (BUY_AREA / WAIT)
    Screener,
}

/// Which volume observations feed the average volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeWindow {
    /// Average over every supplied volume, while prices use only `period`
    FullSeries,
    /// Average over the same `period` most recent observations as prices
    Period,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Number of most recent prices in the band window (default: 20)
    pub period: usize,
    /// Standard deviation multiplier for the bands (default: 2.0)
    pub band_multiplier: f64,
    /// Recent volume must exceed average x this to count as a spike (default: 2.0)
    pub volume_spike_threshold: f64,
    /// Recent volume must exceed average x this to count as rising (default: 1.2)
    pub volume_rise_threshold: f64,
    /// Screener: BUY_AREA while close <= lower x tolerance (default: 1.02)
    pub tolerance: f64,
    pub mode: SignalMode,
    pub volume_window: VolumeWindow,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            period: 20,
            band_multiplier: 2.0,
            volume_spike_threshold: 2.0,
            volume_rise_threshold: 1.2,
            tolerance: 1.02,
            mode: SignalMode::Heuristic,
            volume_window: VolumeWindow::FullSeries,
        }
    }
}

impl SignalConfig {
    /// Default heuristic configuration
    pub fn heuristic() -> Self {
        Self::default()
    }

    /// Default screener configuration
    pub fn screener() -> Self {
        Self::default().with_mode(SignalMode::Screener)
    }

    pub fn with_mode(mut self, mode: SignalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_period(mut self, period: usize) -> Self {
        self.period = period;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_volume_window(mut self, volume_window: VolumeWindow) -> Self {
        self.volume_window = volume_window;
        self
    }

    /// Reject parameters the engine cannot work with
    pub fn validate(&self) -> Result<(), SignalError> {
        if self.period == 0 {
            return Err(SignalError::InvalidConfig(
                "period must be at least 1".to_string(),
            ));
        }

        let params = [
            ("band_multiplier", self.band_multiplier),
            ("volume_spike_threshold", self.volume_spike_threshold),
            ("volume_rise_threshold", self.volume_rise_threshold),
            ("tolerance", self.tolerance),
        ];
        for (name, value) in params {
            if !value.is_finite() || value < 0.0 {
                return Err(SignalError::InvalidConfig(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SignalConfig::default();
        assert_eq!(config.period, 20);
        assert_eq!(config.band_multiplier, 2.0);
        assert_eq!(config.volume_spike_threshold, 2.0);
        assert_eq!(config.volume_rise_threshold, 1.2);
        assert_eq!(config.tolerance, 1.02);
        assert_eq!(config.mode, SignalMode::Heuristic);
        assert_eq!(config.volume_window, VolumeWindow::FullSeries);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SignalConfig =
            serde_json::from_str(r#"{"period": 30, "mode": "screener"}"#).unwrap();
        assert_eq!(config.period, 30);
        assert_eq!(config.mode, SignalMode::Screener);
        assert_eq!(config.tolerance, 1.02);
    }

    #[test]
    fn test_volume_window_parsing() {
        let config: SignalConfig =
            serde_json::from_str(r#"{"volume_window": "period"}"#).unwrap();
        assert_eq!(config.volume_window, VolumeWindow::Period);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SignalConfig::default().with_period(0).validate().is_err());
        assert!(SignalConfig::default().with_tolerance(f64::NAN).validate().is_err());

        let mut config = SignalConfig::default();
        config.band_multiplier = -1.0;
        assert!(matches!(
            config.validate(),
            Err(SignalError::InvalidConfig(msg)) if msg.contains("band_multiplier")
        ));
    }
}
