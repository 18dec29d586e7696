//! Indodax API client for ticker, trade and chart data
//!
//! # Example
//! ```no_run
//! use indodax_signals::indodax::IndodaxClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = IndodaxClient::new()?;
//!     let ticker = client.get_ticker("btcidr").await?;
//!     println!("Last: {:?}", ticker.last_f64());
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use super::types::{pair_id, ChartResponse, Ticker, TickerAllResponse, TickerResponse};

/// Base URL for the Indodax API
pub const API_BASE_URL: &str = "https://indodax.com";

/// Default request timeout (seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct IndodaxClient {
    client: Client,
    base_url: String,
}

impl IndodaxClient {
    /// Create a client against the public Indodax API
    pub fn new() -> Result<Self> {
        Self::with_config(API_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom base URL and request timeout
    pub fn with_config(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(IndodaxClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}{path}` and decode the JSON body, failing on non-2xx status
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Indodax API error {}: {}", status, body);
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))
    }

    /// List market ids (lowercased, empty ids dropped)
    pub async fn get_pairs(&self) -> Result<Vec<String>> {
        let entries: Vec<Value> = self.get_json("/api/pairs").await?;
        Ok(entries.iter().filter_map(pair_id).collect())
    }

    /// Ticker for one pair (e.g. "btcidr")
    pub async fn get_ticker(&self, pair: &str) -> Result<Ticker> {
        let response: TickerResponse = self
            .get_json(&format!("/api/ticker/{}", pair))
            .await
            .with_context(|| format!("Failed to fetch ticker for {}", pair))?;
        Ok(response.ticker)
    }

    /// Tickers for every market, keyed by underscored pair (e.g. "btc_idr")
    pub async fn get_all_tickers(&self) -> Result<HashMap<String, Ticker>> {
        let response: TickerAllResponse = self
            .get_json("/api/ticker_all")
            .await
            .context("Failed to fetch all tickers")?;
        Ok(response.tickers)
    }

    /// Recent trades, newest first. Records are returned raw so callers can
    /// skip malformed entries individually.
    pub async fn get_trades(&self, pair: &str) -> Result<Vec<Value>> {
        self.get_json(&format!("/api/{}/trades", pair))
            .await
            .with_context(|| format!("Failed to fetch trades for {}", pair))
    }

    /// Chart rows for a pair, oldest first
    ///
    /// # Arguments
    /// * `pair` - Trading pair (e.g. "btc_idr")
    /// * `interval` - Timeframe (e.g. "15m", "1h")
    /// * `limit` - Number of candles to request
    pub async fn get_candles(&self, pair: &str, interval: &str, limit: u32) -> Result<Vec<Value>> {
        let response: ChartResponse = self
            .get_json(&format!("/api/chart/{}/{}?limit={}", pair, interval, limit))
            .await
            .with_context(|| format!("Failed to fetch {} chart for {}", interval, pair))?;
        Ok(response.data)
    }
}
