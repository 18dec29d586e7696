//! Indodax Signals
//!
//! Bollinger band and value-volume trading signals for Indodax crypto pairs.
//!
//! The core is the pure [`signal::SignalEngine`]; the [`indodax`] client,
//! [`scanner`] pipeline and [`api`] server are thin collaborators around it.
//!
//! # Example
//! ```
//! use indodax_signals::signal::{SignalConfig, SignalEngine};
//! use indodax_signals::Signal;
//!
//! let engine = SignalEngine::new(SignalConfig::default()).unwrap();
//! let prices = vec![100.0; 20];
//! let result = engine.analyze(90.0, &prices, &[]).unwrap();
//! assert_eq!(result.signal, Signal::Sell);
//! ```

pub mod api;
pub mod config;
pub mod data;
pub mod indicators;
pub mod indodax;
pub mod scanner;
pub mod signal;
pub mod types;

pub use config::Config;
pub use indodax::IndodaxClient;
pub use signal::{SignalConfig, SignalEngine, SignalError, SignalMode};
pub use types::*;
