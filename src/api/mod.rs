//! JSON HTTP API
//!
//! Thin axum layer over the scanner. Market data source, engines and
//! screener defaults are injected through [`AppState`].

pub mod error;
pub mod rest;

pub use error::ApiError;
pub use rest::{router, AppState};
