//! Indodax public REST API client
//!
//! No API key needed: only public market data endpoints are used.

mod client;
pub mod types;

pub use client::{IndodaxClient, API_BASE_URL};
pub use types::*;

use anyhow::Result;
use serde_json::Value;
use std::future::Future;

/// Source of market data consumed by the scanner and the API server.
///
/// Implemented by [`IndodaxClient`]; tests substitute canned data.
pub trait MarketData: Send + Sync + 'static {
    /// Lowercased market ids
    fn pairs(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn ticker(&self, pair: &str) -> impl Future<Output = Result<Ticker>> + Send;

    /// Raw trade records, newest first
    fn trades(&self, pair: &str) -> impl Future<Output = Result<Vec<Value>>> + Send;

    /// Raw chart rows, oldest first
    fn candles(
        &self,
        pair: &str,
        interval: &str,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<Value>>> + Send;
}

impl MarketData for IndodaxClient {
    async fn pairs(&self) -> Result<Vec<String>> {
        self.get_pairs().await
    }

    async fn ticker(&self, pair: &str) -> Result<Ticker> {
        self.get_ticker(pair).await
    }

    async fn trades(&self, pair: &str) -> Result<Vec<Value>> {
        self.get_trades(pair).await
    }

    async fn candles(&self, pair: &str, interval: &str, limit: u32) -> Result<Vec<Value>> {
        self.get_candles(pair, interval, limit).await
    }
}
