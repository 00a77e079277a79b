use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// Language tag sent upstream for every synthesis
pub const ARABIC_LANGUAGE: &str = "ar";
/// Locale attached to preset voices
pub const ARABIC_LOCALE: &str = "ar-SA";
pub const DEFAULT_FORMAT: &str = "mp3";
pub const DEFAULT_QUALITY: &str = "high";
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Voice requested by the caller.
///
/// A custom selection carries the recorded voice sample (base64 on the wire).
/// Without a usable sample it behaves exactly like the male default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VoiceSelection {
    #[default]
    Male,
    Female,
    Custom {
        #[serde(
            default,
            with = "sample_base64",
            skip_serializing_if = "Option::is_none"
        )]
        sample: Option<Vec<u8>>,
    },
}

impl VoiceSelection {
    /// Collapse a custom selection without a captured sample to the male default
    pub fn resolve(self) -> Self {
        match self {
            VoiceSelection::Custom { sample: Some(bytes) } if !bytes.is_empty() => {
                VoiceSelection::Custom { sample: Some(bytes) }
            }
            VoiceSelection::Custom { .. } => VoiceSelection::Male,
            other => other,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            VoiceSelection::Male => "male",
            VoiceSelection::Female => "female",
            VoiceSelection::Custom { .. } => "custom",
        }
    }
}

/// Request body for POST /tts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: VoiceSelection,
    pub format: String,
    pub quality: String,
    pub language: String,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: VoiceSelection) -> Self {
        Self {
            text: text.into(),
            voice,
            format: DEFAULT_FORMAT.to_string(),
            quality: DEFAULT_QUALITY.to_string(),
            language: ARABIC_LANGUAGE.to_string(),
        }
    }
}

/// Voice shape understood by the upstream provider
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProviderVoice {
    Preset {
        gender: &'static str,
        language: &'static str,
    },
    Custom {
        custom_voice: String,
    },
}

impl From<VoiceSelection> for ProviderVoice {
    fn from(voice: VoiceSelection) -> Self {
        match voice.resolve() {
            VoiceSelection::Female => ProviderVoice::Preset {
                gender: "female",
                language: ARABIC_LOCALE,
            },
            VoiceSelection::Custom { sample: Some(bytes) } => ProviderVoice::Custom {
                custom_voice: STANDARD.encode(bytes),
            },
            _ => ProviderVoice::Preset {
                gender: "male",
                language: ARABIC_LOCALE,
            },
        }
    }
}

/// Payload forwarded to the upstream synthesis provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRequest {
    pub text: String,
    pub voice: ProviderVoice,
    pub format: String,
    pub quality: String,
    pub language: &'static str,
    pub rate: f32,
    pub pitch: f32,
}

impl ProviderRequest {
    pub fn new(
        text: String,
        voice: Option<VoiceSelection>,
        format: Option<String>,
        quality: Option<String>,
    ) -> Self {
        Self {
            text,
            voice: voice.unwrap_or_default().into(),
            format: non_empty_or(format, DEFAULT_FORMAT),
            quality: non_empty_or(quality, DEFAULT_QUALITY),
            language: ARABIC_LANGUAGE,
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

mod sample_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(sample: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match sample {
            Some(bytes) => serializer.serialize_str(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s.as_bytes()).map_err(D::Error::custom))
            .transpose()
    }
}
