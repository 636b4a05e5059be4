//! API error type with IntoResponse
//!
//! Client mistakes come back as 400 with a readable message. Failures of
//! the database or broker are logged and returned as a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use dsasocio_core::ValidationError;

use crate::broker::{AuthError, BrokerError};
use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// A required field was absent or blank (400)
    MissingData,

    /// Validation failed (400)
    Validation(ValidationError),

    /// Malformed request body or header (400)
    BadRequest(String),

    /// Feature needs a collaborator that isn't configured (503)
    Unavailable { what: &'static str },

    /// Database failure (500, logged)
    Store(StoreError),

    /// Broker failure (500, logged)
    Broker(BrokerError),

    /// Anything else (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::MissingData => (StatusCode::BAD_REQUEST, "Missing data".to_string()),
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unavailable { what } => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{} is not configured", what),
            ),
            Self::Store(e) => {
                tracing::error!(error = %e, "store error");
                internal()
            }
            Self::Broker(e) => {
                tracing::error!(error = %e, "broker error");
                internal()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                internal()
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "an internal error occurred".to_string(),
    )
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<BrokerError> for ApiError {
    fn from(e: BrokerError) -> Self {
        Self::Broker(e)
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_data_is_400() {
        let response = ApiError::MissingData.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing data");
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty { field: "channel" });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unavailable_is_503() {
        let response = ApiError::Unavailable { what: "message store" }.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn broker_errors_are_generic_500() {
        let err = ApiError::Broker(BrokerError::Rejected {
            status: 401,
            body: "Invalid signature: secret leaked here".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "an internal error occurred");
    }
}
