use std::collections::BTreeMap;

use crate::error::AppError;
use crate::infrastructure::repositories::UpstreamError;

/// Localized messages shown to the end user
pub const INVALID_TEXT_MESSAGE: &str = "النص غير صالح";
pub const TEXT_LENGTH_MESSAGE: &str = "يجب أن يكون النص بين 3 و1000 حرف";
pub const INVALID_CREDENTIAL_MESSAGE: &str = "مفتاح API غير صالح";
pub const INVALID_VOICE_MESSAGE: &str = "بيانات الصوت غير صالحة";
pub const REQUEST_TOO_LARGE_MESSAGE: &str = "حجم الطلب كبير جداً";

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("upstream returned status {status}")]
    Upstream {
        status: u16,
        message: Option<String>,
        headers: BTreeMap<String, String>,
        data: serde_json::Value,
    },
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<UpstreamError> for TtsServiceError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status {
                status,
                headers,
                body,
            } => {
                let data = serde_json::from_slice::<serde_json::Value>(&body)
                    .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&body).into_owned()));
                let message = data
                    .get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.is_empty())
                    .map(str::to_string);

                TtsServiceError::Upstream {
                    status,
                    message,
                    headers,
                    data,
                }
            }
            UpstreamError::NoResponse(reason) => TtsServiceError::Unavailable(reason),
            UpstreamError::Request(reason) => TtsServiceError::Other(anyhow::anyhow!(reason)),
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::InvalidInput(msg),
            TtsServiceError::Configuration(msg) => AppError::Configuration(msg),
            TtsServiceError::Upstream {
                status,
                message,
                headers,
                data,
            } => AppError::Upstream {
                status,
                message,
                headers,
                data,
            },
            TtsServiceError::Unavailable(msg) => AppError::UpstreamUnavailable(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
