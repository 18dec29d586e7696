//! Signal engine error types

use thiserror::Error;

/// Failures of a single analysis call. None of them are fatal to the process.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("insufficient data: need {required} observations, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type EngineResult<T> = Result<T, SignalError>;
