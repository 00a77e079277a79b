use crate::domain::tts::ProviderRequest;
use crate::infrastructure::config::ApiKey;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

/// Failure talking to the upstream synthesis provider
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The provider answered with a non-success status
    #[error("provider responded with status {status}")]
    Status {
        status: u16,
        headers: BTreeMap<String, String>,
        body: Vec<u8>,
    },
    /// No response arrived: connection failure, timeout or cancellation
    #[error("no response from provider: {0}")]
    NoResponse(String),
    /// The request could not be built
    #[error("failed to build provider request: {0}")]
    Request(String),
}

/// Repository for TTS synthesis operations.
/// Abstracts the upstream speech provider so the relay can be exercised without it.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize already-sanitized text
    ///
    /// Returns the raw audio bytes (MP3 unless the request asks otherwise)
    ///
    /// # Errors
    /// Returns `UpstreamError::NoResponse` if `cancel` fires before the provider answers
    async fn synthesize(
        &self,
        request: &ProviderRequest,
        api_key: &ApiKey,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, UpstreamError>;
}
