pub mod dto;
pub mod error;
pub mod sanitize;
pub mod service;

pub use dto::{ProviderRequest, ProviderVoice, SynthesisRequest, VoiceSelection};
pub use error::TtsServiceError;
pub use sanitize::{sanitize_arabic_text, MAX_TEXT_CHARS, MIN_TEXT_CHARS};
pub use service::{SynthesisInput, TtsService, TtsServiceApi, TtsSynthesisResult};
