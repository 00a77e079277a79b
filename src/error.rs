use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;

use crate::domain::shared::error_dto::ErrorResponse;

pub const UPSTREAM_ERROR_PREFIX: &str = "خطأ من الخادم";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "حدث خطأ غير متوقع";
pub const NO_RESPONSE_MESSAGE: &str = "لم يتم استلام استجابة من الخادم";
pub const REQUEST_SETUP_MESSAGE: &str = "حدث خطأ أثناء إعداد الطلب";

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream error: status {status}")]
    Upstream {
        status: u16,
        message: Option<String>,
        headers: BTreeMap<String, String>,
        data: serde_json::Value,
    },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to the client-facing error body
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            Self::InvalidInput(msg) | Self::PayloadTooLarge(msg) | Self::Configuration(msg) => {
                ErrorResponse::message(msg.clone())
            }
            Self::Upstream {
                status,
                message,
                headers,
                data,
            } => ErrorResponse {
                error: format!(
                    "{}: {}",
                    UPSTREAM_ERROR_PREFIX,
                    message.as_deref().unwrap_or(UNEXPECTED_ERROR_MESSAGE)
                ),
                status: Some(*status),
                headers: Some(headers.clone()),
                data: Some(data.clone()),
                details: None,
            },
            Self::UpstreamUnavailable(details) => {
                ErrorResponse::message(NO_RESPONSE_MESSAGE).with_details(details.clone())
            }
            Self::Internal(details) => {
                ErrorResponse::message(REQUEST_SETUP_MESSAGE).with_details(details.clone())
            }
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Upstream { data, .. } => tracing::error!(
                error = %self,
                status = %status.as_u16(),
                upstream_data = %data,
                "Request failed"
            ),
            _ => tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            ),
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
