use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request failed validation; the message is shown to the client verbatim
    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Unsupported response_type")]
    UnsupportedResponseType(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body. `message` carries detail for server-side failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::InvalidJson(_) | Self::UnsupportedResponseType(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) => ErrorResponse {
                error: msg.clone(),
                message: None,
            },
            Self::UnsupportedResponseType(_) => ErrorResponse {
                error: "Unsupported response_type".to_string(),
                message: None,
            },
            Self::InvalidJson(detail) => ErrorResponse {
                error: "Invalid JSON body".to_string(),
                message: Some(detail.clone()),
            },
            Self::Internal(detail) => ErrorResponse {
                error: "Internal server error".to_string(),
                message: Some(detail.clone()),
            },
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Server-side failures are logged with context where they occur
        if status.is_server_error() {
            tracing::debug!(error = %self, status = %status.as_u16(), "Request failed");
        } else {
            tracing::warn!(error = %self, status = %status.as_u16(), "Request rejected");
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
