use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use med_alert_domain::services::ServiceError;
use med_alert_domain::sync::SyncError;

/// Error response format for API
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error type/code - machine-readable identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,
}

impl ErrorResponse {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }

    /// Create a not found error response
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    /// Create a validation error response
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an unauthorized error response
    pub fn unauthorized() -> Self {
        Self::new("unauthorized", "User not authenticated")
    }

    /// Create an upstream error response
    pub fn bad_gateway() -> Self {
        Self::new("bad_gateway", "The remote data store is unavailable")
    }

    /// Create an internal error response
    pub fn internal_error() -> Self {
        Self::new("internal_error", "An unexpected error occurred")
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::BAD_REQUEST,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_gateway" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(msg) => {
                warn!("Rejected request: {}", msg);
                ErrorResponse::validation_error(msg)
            }
            ServiceError::NotFound(msg) => {
                warn!("{}", msg);
                ErrorResponse::not_found(msg)
            }
            ServiceError::Sync(SyncError::NotAuthenticated) => {
                warn!("Request without a valid session reached the remote store");
                ErrorResponse::unauthorized()
            }
            ServiceError::Sync(e @ (SyncError::Network(_) | SyncError::Backend(_))) => {
                error!("Remote store failure: {}", e);
                ErrorResponse::bad_gateway()
            }
            ServiceError::Sync(e @ SyncError::LocalIo(_)) => {
                error!("Local store failure: {}", e);
                ErrorResponse::internal_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::Validation("Dosage is required".into()), StatusCode::BAD_REQUEST),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::Sync(SyncError::NotAuthenticated), StatusCode::UNAUTHORIZED),
            (ServiceError::Sync(SyncError::Network("down".into())), StatusCode::BAD_GATEWAY),
            (ServiceError::Sync(SyncError::Backend("500".into())), StatusCode::BAD_GATEWAY),
            (ServiceError::Sync(SyncError::LocalIo("disk".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ErrorResponse::from(err).status(), status);
        }
    }

    #[test]
    fn test_store_details_are_not_leaked() {
        let response = ErrorResponse::from(ServiceError::Sync(SyncError::Backend("secret table".into())));
        assert!(!response.message.contains("secret"));

        let response = ErrorResponse::from(ServiceError::Validation("Dosage is required".into()));
        assert_eq!(response.message, "Dosage is required");
    }
}
