use super::dto::{ProviderRequest, VoiceSelection};
use super::error::{TtsServiceError, INVALID_CREDENTIAL_MESSAGE, TEXT_LENGTH_MESSAGE};
use super::sanitize::{char_count as count_chars, is_within_limits, sanitize_arabic_text};
use crate::infrastructure::config::ApiKey;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Input accepted by the relay once the text has been confirmed to be a string
#[derive(Debug, Clone, Default)]
pub struct SynthesisInput {
    pub text: String,
    pub voice: Option<VoiceSelection>,
    pub format: Option<String>,
    pub quality: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TtsSynthesisResult {
    pub audio_data: Vec<u8>,
    pub char_count: usize,
}

pub struct TtsService {
    tts_repo: Arc<dyn TtsRepository>,
    api_key: ApiKey,
}

impl TtsService {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, api_key: ApiKey) -> Self {
        Self { tts_repo, api_key }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Sanitize the text, check the credential and forward the request upstream.
    ///
    /// The upstream call is abandoned as soon as `cancel` fires.
    async fn synthesize(
        &self,
        input: SynthesisInput,
        cancel: &CancellationToken,
    ) -> Result<TtsSynthesisResult, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(
        &self,
        input: SynthesisInput,
        cancel: &CancellationToken,
    ) -> Result<TtsSynthesisResult, TtsServiceError> {
        let SynthesisInput {
            text,
            voice,
            format,
            quality,
        } = input;

        // 1. Sanitize and validate length
        let sanitized = sanitize_arabic_text(&text);
        let char_count = count_chars(&sanitized);

        tracing::info!(
            original_length = count_chars(&text),
            sanitized_length = char_count,
            voice = voice.as_ref().map(|v| v.kind()).unwrap_or("default"),
            "TTS synthesis request"
        );

        if !is_within_limits(&sanitized) {
            return Err(TtsServiceError::Invalid(TEXT_LENGTH_MESSAGE.to_string()));
        }

        // 2. Refuse to call upstream without a credential
        if !self.api_key.is_present() {
            tracing::error!("Provider credential is not configured");
            return Err(TtsServiceError::Configuration(
                INVALID_CREDENTIAL_MESSAGE.to_string(),
            ));
        }

        // 3. Forward the sanitized text
        let request = ProviderRequest::new(sanitized, voice, format, quality);
        let audio_data = self
            .tts_repo
            .synthesize(&request, &self.api_key, cancel)
            .await?;

        Ok(TtsSynthesisResult {
            audio_data,
            char_count,
        })
    }
}
