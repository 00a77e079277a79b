use super::error::{ClientError, UNKNOWN_ERROR_MESSAGE, UNPARSABLE_RESPONSE_MESSAGE};
use crate::domain::shared::error_dto::ErrorResponse;
use crate::domain::tts::dto::AUDIO_MIME;
use crate::domain::tts::SynthesisRequest;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;

/// Audio returned by the relay, owned by the requester until replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Anything able to turn a synthesis request into audio
#[async_trait]
pub trait SynthesisRelay: Send + Sync {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        cancel: &CancellationToken,
    ) -> Result<AudioClip, ClientError>;
}

/// HTTP client for the relay's `POST /tts`
pub struct RelayClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/tts", base_url.trim_end_matches('/')),
        }
    }

    async fn post(&self, request: &SynthesisRequest) -> Result<AudioClip, ClientError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            text_length = request.text.chars().count(),
            voice = request.voice.kind(),
            "Sending synthesis request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Relay responded");

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = match serde_json::from_slice::<ErrorResponse>(&body) {
                Ok(error) if !error.error.is_empty() => error.error,
                Ok(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
                Err(_) => UNPARSABLE_RESPONSE_MESSAGE.to_string(),
            };
            tracing::error!(status = status.as_u16(), message = %message, "Relay returned an error");
            return Err(ClientError::Relay {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(AUDIO_MIME)
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(AudioClip {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

#[async_trait]
impl SynthesisRelay for RelayClient {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
        cancel: &CancellationToken,
    ) -> Result<AudioClip, ClientError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = self.post(request) => result,
        }
    }
}
