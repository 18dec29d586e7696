//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::scanner::ScanError;
use crate::signal::SignalError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Scan(ScanError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Scan(ScanError::Fetch(_)) | ApiError::Scan(ScanError::InvalidTicker(_)) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Scan(ScanError::Signal(SignalError::InvalidConfig(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Scan(ScanError::Signal(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Scan(err) => err.to_string(),
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        ApiError::Scan(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "success": false,
            "error": self.message(),
        }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("pair parameter required".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Scan(ScanError::Fetch("down".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Scan(ScanError::InvalidTicker("null".into())).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Scan(ScanError::Signal(SignalError::InsufficientData {
                required: 20,
                available: 2
            }))
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Scan(ScanError::Signal(SignalError::InvalidInput("empty".into()))).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
