//! Configuration management
//!
//! Handles loading and parsing of JSON configuration files with environment
//! variable overrides. Every section is optional and falls back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::indodax::API_BASE_URL;
use crate::signal::{SignalConfig, SignalMode, VolumeWindow};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub exchange: ExchangeConfig,
    /// Band and volume parameters shared by both engine modes
    pub signal: BandConfig,
    pub screener: ScreenerConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file {}", path.as_ref().display())
        })?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise defaults with environment overrides
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Config::default();
                config.apply_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Override values from environment variables (`.env` is honored by the binary)
    pub fn apply_env(&mut self) {
        if let Ok(base_url) = std::env::var("INDODAX_BASE_URL") {
            self.exchange.base_url = base_url;
        }
        if let Ok(bind) = std::env::var("SIGNALS_BIND_ADDR") {
            self.server.bind = bind;
        }
    }

    /// Engine configuration for the heuristic (BUY/SELL/HOLD) policy
    pub fn heuristic_signal(&self) -> SignalConfig {
        self.signal.engine_config(SignalMode::Heuristic)
    }

    /// Engine configuration for the lower band screener, sharing the band parameters
    pub fn screener_signal(&self) -> SignalConfig {
        self.signal
            .engine_config(SignalMode::Screener)
            .with_tolerance(self.screener.tolerance)
    }

    /// Reject values that would make every request fail
    pub fn validate(&self) -> Result<()> {
        self.heuristic_signal()
            .validate()
            .context("Invalid signal section")?;
        self.screener_signal()
            .validate()
            .context("Invalid screener section")?;

        anyhow::ensure!(
            self.exchange.trade_limit > 0,
            "exchange.trade_limit must be at least 1"
        );
        anyhow::ensure!(
            self.exchange.timeout_secs > 0,
            "exchange.timeout_secs must be at least 1"
        );
        anyhow::ensure!(
            self.screener.candle_limit > 0,
            "screener.candle_limit must be at least 1"
        );
        Ok(())
    }
}

/// `signal` section
///
/// Parameters shared by both engine modes. The mode comes from the command
/// and the tolerance from the `screener` section; any other key is an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BandConfig {
    pub period: usize,
    pub band_multiplier: f64,
    pub volume_spike_threshold: f64,
    pub volume_rise_threshold: f64,
    pub volume_window: VolumeWindow,
}

impl BandConfig {
    fn engine_config(&self, mode: SignalMode) -> SignalConfig {
        SignalConfig {
            period: self.period,
            band_multiplier: self.band_multiplier,
            volume_spike_threshold: self.volume_spike_threshold,
            volume_rise_threshold: self.volume_rise_threshold,
            volume_window: self.volume_window,
            ..SignalConfig::default()
        }
        .with_mode(mode)
    }
}

impl Default for BandConfig {
    fn default() -> Self {
        let engine = SignalConfig::default();
        BandConfig {
            period: engine.period,
            band_multiplier: engine.band_multiplier,
            volume_spike_threshold: engine.volume_spike_threshold,
            volume_rise_threshold: engine.volume_rise_threshold,
            volume_window: engine.volume_window,
        }
    }
}

/// Exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Most recent trades fed to the heuristic analysis
    pub trade_limit: usize,
    /// Maximum concurrent chart requests while screening
    pub concurrency: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        ExchangeConfig {
            base_url: API_BASE_URL.to_string(),
            timeout_secs: 10,
            trade_limit: 200,
            concurrency: 4,
        }
    }
}

/// Screener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenerConfig {
    pub pairs: Vec<String>,
    pub interval: String,
    pub candle_limit: u32,
    /// BUY_AREA while close <= lower band x tolerance
    pub tolerance: f64,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        ScreenerConfig {
            pairs: vec![
                "btc_idr".to_string(),
                "eth_idr".to_string(),
                "bnb_idr".to_string(),
                "cng_idr".to_string(),
                "dupe_idr".to_string(),
            ],
            interval: "15m".to_string(),
            candle_limit: 100,
            tolerance: 1.02,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}
