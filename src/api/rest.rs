// =============================================================================
// REST API Endpoints - Axum 0.7
// =============================================================================
//
// All endpoints are public and read-only:
//   GET /api/health
//   GET /api/markets
//   GET /api/analyze?pair=btcidr
//   GET /api/screen?pairs=btc_idr,eth_idr&tf=15m
//
// Errors are returned as {"success": false, "error": "..."} with a status
// code chosen by `ApiError`.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::error::ApiError;
use crate::config::{Config, ScreenerConfig};
use crate::indodax::MarketData;
use crate::scanner::{self, ScanError};
use crate::signal::{SignalEngine, SignalError};
use crate::types::Signal;

/// Shared, read-only state handed to every handler
pub struct AppState<M: MarketData> {
    pub market: M,
    pub heuristic: SignalEngine,
    pub screener: SignalEngine,
    pub screener_defaults: ScreenerConfig,
    pub trade_limit: usize,
    pub concurrency: usize,
}

impl<M: MarketData> AppState<M> {
    pub fn from_config(market: M, config: &Config) -> Result<Self, SignalError> {
        Ok(AppState {
            market,
            heuristic: SignalEngine::new(config.heuristic_signal())?,
            screener: SignalEngine::new(config.screener_signal())?,
            screener_defaults: config.screener.clone(),
            trade_limit: config.exchange.trade_limit,
            concurrency: config.exchange.concurrency,
        })
    }
}

// =============================================================================
// Router construction
// =============================================================================

/// Build the API router with CORS middleware and shared state.
pub fn router<M: MarketData>(state: Arc<AppState<M>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/markets", get(markets::<M>))
        .route("/api/analyze", get(analyze::<M>))
        .route("/api/screen", get(screen::<M>))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Markets
// =============================================================================

#[derive(Serialize)]
struct MarketsResponse {
    success: bool,
    markets: Vec<String>,
}

async fn markets<M: MarketData>(
    State(state): State<Arc<AppState<M>>>,
) -> Result<Json<MarketsResponse>, ApiError> {
    let markets = state
        .market
        .pairs()
        .await
        .map_err(|e| ScanError::Fetch(format!("failed to fetch market list: {:#}", e)))?;

    Ok(Json(MarketsResponse {
        success: true,
        markets,
    }))
}

// =============================================================================
// Analyze (heuristic)
// =============================================================================

#[derive(Deserialize)]
struct AnalyzeQuery {
    #[serde(default)]
    pair: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    success: bool,
    pair: String,
    last_price: f64,
    sma: f64,
    stddev: f64,
    bb_upper: f64,
    bb_lower: f64,
    avg_volume: f64,
    recent_volume: f64,
    signal: Signal,
    reasons: Vec<String>,
    skipped_trades: usize,
}

async fn analyze<M: MarketData>(
    State(state): State<Arc<AppState<M>>>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let pair = scanner::normalize_pair(&query.pair);
    if pair.is_empty() {
        return Err(ApiError::BadRequest("pair parameter required".to_string()));
    }

    let analysis =
        scanner::analyze_pair(&state.market, &state.heuristic, &pair, state.trade_limit).await?;
    let result = analysis.result;

    Ok(Json(AnalyzeResponse {
        success: true,
        pair: analysis.pair,
        last_price: result.last_price,
        sma: result.stats.mean,
        stddev: result.stats.stddev,
        bb_upper: result.stats.upper,
        bb_lower: result.stats.lower,
        avg_volume: result.avg_volume,
        recent_volume: result.recent_volume,
        signal: result.signal,
        reasons: result.reasons,
        skipped_trades: analysis.skipped,
    }))
}

// =============================================================================
// Screen (lower band tolerance)
// =============================================================================

#[derive(Deserialize)]
struct ScreenQuery {
    pairs: Option<String>,
    tf: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ScreenEntry {
    Row {
        pair: String,
        price: f64,
        lower: f64,
        signal: Signal,
    },
    Failed {
        pair: String,
        error: String,
    },
}

#[derive(Serialize)]
struct ScreenResponse {
    success: bool,
    interval: String,
    results: Vec<ScreenEntry>,
}

async fn screen<M: MarketData>(
    State(state): State<Arc<AppState<M>>>,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<ScreenResponse>, ApiError> {
    let pairs = match query.pairs.as_deref() {
        Some(list) => scanner::parse_pair_list(list),
        None => state.screener_defaults.pairs.clone(),
    };
    if pairs.is_empty() {
        return Err(ApiError::BadRequest("no pairs to screen".to_string()));
    }

    let interval = query
        .tf
        .filter(|tf| !tf.trim().is_empty())
        .unwrap_or_else(|| state.screener_defaults.interval.clone());

    let outcomes = scanner::screen_pairs(
        &state.market,
        &state.screener,
        &pairs,
        &interval,
        state.screener_defaults.candle_limit,
        state.concurrency,
    )
    .await;

    let results: Vec<ScreenEntry> = outcomes
        .into_iter()
        .map(|outcome| match outcome.result {
            Ok(row) => ScreenEntry::Row {
                pair: row.pair,
                price: row.close,
                lower: row.lower,
                signal: row.signal,
            },
            Err(e) => ScreenEntry::Failed {
                pair: outcome.pair,
                error: e.to_string(),
            },
        })
        .collect();

    info!(interval = %interval, pairs = results.len(), "Screen served");

    Ok(Json(ScreenResponse {
        success: true,
        interval,
        results,
    }))
}
