use super::tts_repository::{TtsRepository, UpstreamError};
use crate::domain::tts::dto::AUDIO_MIME;
use crate::domain::tts::ProviderRequest;
use crate::infrastructure::config::ApiKey;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Upstream provider reached over HTTP with bearer authentication
pub struct HttpTtsRepository {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpTtsRepository {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    async fn call_provider(
        &self,
        request: &ProviderRequest,
        api_key: &ApiKey,
    ) -> Result<Vec<u8>, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose())
            .header(ACCEPT, AUDIO_MIME)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let headers = header_map_to_strings(response.headers());
            let body = match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    tracing::warn!(
                        status = status.as_u16(),
                        error = %e,
                        "Failed to read provider error body"
                    );
                    Vec::new()
                }
            };

            tracing::error!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "Provider returned an error response"
            );

            return Err(UpstreamError::Status {
                status: status.as_u16(),
                headers,
                body,
            });
        }

        let audio = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(audio.to_vec())
    }

    fn classify(&self, err: reqwest::Error) -> UpstreamError {
        if err.is_builder() {
            tracing::error!(error = %err, "Provider request could not be built");
            return UpstreamError::Request(err.to_string());
        }

        if err.is_timeout() {
            tracing::error!(
                error = %err,
                timeout_secs = self.timeout.as_secs(),
                "Provider did not respond in time"
            );
        } else {
            tracing::error!(error = %err, "No response received from provider");
        }
        UpstreamError::NoResponse(err.to_string())
    }
}

fn header_map_to_strings(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

#[async_trait]
impl TtsRepository for HttpTtsRepository {
    async fn synthesize(
        &self,
        request: &ProviderRequest,
        api_key: &ApiKey,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, UpstreamError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            endpoint = %self.endpoint,
            text_length = request.text.chars().count(),
            format = %request.format,
            quality = %request.quality,
            "Calling TTS provider"
        );

        let audio_data = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::warn!("TTS provider call cancelled");
                return Err(UpstreamError::NoResponse("request cancelled".to_string()));
            }
            result = self.call_provider(request, api_key) => result?,
        };

        let duration = start_time.elapsed();
        tracing::info!(
            latency_ms = duration.as_millis(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }
}
