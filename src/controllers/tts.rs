use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::tts::{
        dto::AUDIO_MIME,
        error::{INVALID_TEXT_MESSAGE, INVALID_VOICE_MESSAGE, REQUEST_TOO_LARGE_MESSAGE},
        SynthesisInput, TtsServiceApi, VoiceSelection,
    },
    error::{AppError, AppResult},
};

/// Upper bound for a POST /tts body. Sized for a base64 encoded 60 second
/// voice sample of uncompressed 48 kHz 16-bit stereo audio.
pub const MAX_TTS_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Body for POST /tts. `text` and `voice` are kept loose so each can be
/// reported with its own message instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SynthesizeBody {
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub voice: Option<Value>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

pub struct TtsController {
    tts_service: Arc<dyn TtsServiceApi>,
}

impl TtsController {
    pub fn new(tts_service: Arc<dyn TtsServiceApi>) -> Self {
        Self { tts_service }
    }

    /// POST /tts - Convert Arabic text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        payload: Result<Json<SynthesizeBody>, JsonRejection>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let Json(body) = payload.map_err(reject_body)?;

        let text = match body.text {
            Some(Value::String(text)) if !text.is_empty() => text,
            _ => return Err(AppError::InvalidInput(INVALID_TEXT_MESSAGE.to_string())),
        };
        let voice = body.voice.map(parse_voice).transpose()?;

        // Dropping the handler (client went away) cancels the upstream call
        let cancel = CancellationToken::new();
        let _cancel_on_drop = cancel.clone().drop_guard();

        let result = controller
            .tts_service
            .synthesize(
                SynthesisInput {
                    text,
                    voice,
                    format: body.format,
                    quality: body.quality,
                },
                &cancel,
            )
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(AUDIO_MIME));
        headers.insert(header::CONTENT_DISPOSITION, HeaderValue::from_static("inline"));
        headers.insert("x-character-count", HeaderValue::from(result.char_count));

        Ok((StatusCode::OK, headers, Body::from(result.audio_data)))
    }
}

fn reject_body(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(limit_bytes = MAX_TTS_BODY_BYTES, "TTS request body too large");
        return AppError::PayloadTooLarge(REQUEST_TOO_LARGE_MESSAGE.to_string());
    }

    tracing::warn!(error = %rejection, "Rejected malformed TTS request body");
    AppError::InvalidInput(INVALID_TEXT_MESSAGE.to_string())
}

fn parse_voice(voice: Value) -> Result<VoiceSelection, AppError> {
    serde_json::from_value(voice).map_err(|e| {
        tracing::warn!(error = %e, "Rejected voice selection");
        AppError::InvalidInput(INVALID_VOICE_MESSAGE.to_string())
    })
}
