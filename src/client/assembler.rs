use super::error::{ClientError, EMPTY_TEXT_MESSAGE, OFFLINE_MESSAGE, TEXT_TOO_LONG_MESSAGE};
use super::file_import::{extract_text, DocumentExtractor, ImportedFile};
use super::recorder::{CapturedSample, DeviceError, Microphone, Recorder, RecordingTick};
use super::relay_client::{AudioClip, SynthesisRelay};
use crate::domain::tts::{SynthesisRequest, VoiceSelection, MAX_TEXT_CHARS};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Voice picked in the voice selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VoiceMode {
    #[default]
    Male,
    Female,
    Custom,
}

impl VoiceMode {
    /// Map a selector value; anything unrecognised means the male default
    pub fn from_select_value(value: &str) -> Self {
        match value {
            "female" => VoiceMode::Female,
            "custom" => VoiceMode::Custom,
            _ => VoiceMode::Male,
        }
    }
}

#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, clip: &AudioClip) -> Result<(), ClientError>;
}

pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity check for environments without a network status signal
pub struct AssumeOnline;

impl Connectivity for AssumeOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// External services the assembler drives
pub struct Collaborators {
    /// `None` when the platform has no audio capture at all
    pub microphone: Option<Arc<dyn Microphone>>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub relay: Arc<dyn SynthesisRelay>,
    pub player: Arc<dyn AudioPlayer>,
    pub connectivity: Arc<dyn Connectivity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingToggle {
    Started,
    Stopped(Option<CapturedSample>),
    /// Recording only runs in custom voice mode
    Ignored,
}

/// Clears the busy flag when the in-flight synthesis goes away, however it ends
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A validated request waiting to be sent. The assembler stays busy while
/// this value is alive.
pub struct PendingSynthesis {
    relay: Arc<dyn SynthesisRelay>,
    request: SynthesisRequest,
    _busy: BusyGuard,
}

impl PendingSynthesis {
    pub fn request(&self) -> &SynthesisRequest {
        &self.request
    }

    pub async fn send(&self, cancel: &CancellationToken) -> Result<AudioClip, ClientError> {
        self.relay.synthesize(&self.request, cancel).await
    }
}

/// State owned by the text-to-speech form
pub struct InputAssembler {
    collaborators: Collaborators,
    text: String,
    voice_mode: VoiceMode,
    recorder: Recorder,
    sample: Option<CapturedSample>,
    last_audio: Option<AudioClip>,
    busy: Arc<AtomicBool>,
    custom_voice_available: bool,
}

impl InputAssembler {
    pub fn new(collaborators: Collaborators) -> Self {
        let custom_voice_available = collaborators.microphone.is_some();
        if !custom_voice_available {
            tracing::warn!("No microphone available, custom voice disabled");
        }

        Self {
            collaborators,
            text: String::new(),
            voice_mode: VoiceMode::default(),
            recorder: Recorder::new(),
            sample: None,
            last_audio: None,
            busy: Arc::new(AtomicBool::new(false)),
            custom_voice_available,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn voice_mode(&self) -> VoiceMode {
        self.voice_mode
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn recording_display(&self) -> String {
        self.recorder.display()
    }

    pub fn custom_voice_available(&self) -> bool {
        self.custom_voice_available
    }

    pub fn captured_sample(&self) -> Option<&CapturedSample> {
        self.sample.as_ref()
    }

    pub fn last_audio(&self) -> Option<&AudioClip> {
        self.last_audio.as_ref()
    }

    pub fn can_download(&self) -> bool {
        self.last_audio.is_some() && !self.is_busy()
    }

    /// Switch voice. Returns whether the recording controls should be shown.
    pub fn set_voice_mode(&mut self, mode: VoiceMode) -> bool {
        self.voice_mode = mode;
        if mode != VoiceMode::Custom {
            self.stop_recording();
        }
        mode == VoiceMode::Custom && self.custom_voice_available
    }

    /// Start capturing when idle, finalize the sample when recording
    pub async fn toggle_recording(&mut self) -> Result<RecordingToggle, ClientError> {
        if self.recorder.is_recording() {
            return Ok(RecordingToggle::Stopped(self.stop_recording()));
        }
        if self.voice_mode != VoiceMode::Custom {
            tracing::debug!(voice_mode = ?self.voice_mode, "Ignoring record toggle outside custom voice");
            return Ok(RecordingToggle::Ignored);
        }

        let microphone = match (&self.collaborators.microphone, self.custom_voice_available) {
            (Some(microphone), true) => microphone.clone(),
            _ => return Err(DeviceError::Unavailable.into()),
        };

        if let Err(e) = self.recorder.start(microphone.as_ref()).await {
            tracing::error!(error = %e, "Microphone access failed");
            self.custom_voice_available = false;
            return Err(e.into());
        }

        Ok(RecordingToggle::Started)
    }

    /// One second of recording clock; keeps the sample if the cap is hit
    pub fn tick_recording(&mut self) -> RecordingTick {
        let tick = self.recorder.tick();
        if let RecordingTick::TimedOut(sample) = &tick {
            self.sample = Some(sample.clone());
        }
        tick
    }

    fn stop_recording(&mut self) -> Option<CapturedSample> {
        let sample = self.recorder.stop()?;
        self.sample = Some(sample.clone());
        Some(sample)
    }

    /// Replace the text field with the file's content; untouched on failure
    pub async fn import_file(&mut self, file: &ImportedFile) -> Result<(), ClientError> {
        let text = extract_text(file, self.collaborators.extractor.as_ref()).await?;
        self.text = text;
        Ok(())
    }

    fn voice_selection(&self) -> VoiceSelection {
        match self.voice_mode {
            VoiceMode::Male => VoiceSelection::Male,
            VoiceMode::Female => VoiceSelection::Female,
            VoiceMode::Custom => match &self.sample {
                Some(sample) if !sample.is_empty() => VoiceSelection::Custom {
                    sample: Some(sample.bytes.clone()),
                },
                _ => VoiceSelection::Male,
            },
        }
    }

    /// Validate the form and mark the assembler busy
    pub fn begin_generation(&mut self) -> Result<PendingSynthesis, ClientError> {
        if self.is_busy() {
            return Err(ClientError::Busy);
        }

        let text = self.text.trim();
        if text.is_empty() {
            return Err(ClientError::InvalidInput(EMPTY_TEXT_MESSAGE.to_string()));
        }
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ClientError::InvalidInput(TEXT_TOO_LONG_MESSAGE.to_string()));
        }
        if !self.collaborators.connectivity.is_online() {
            return Err(ClientError::Network(OFFLINE_MESSAGE.to_string()));
        }

        let request = SynthesisRequest::new(text, self.voice_selection());
        self.busy.store(true, Ordering::SeqCst);

        Ok(PendingSynthesis {
            relay: self.collaborators.relay.clone(),
            request,
            _busy: BusyGuard(self.busy.clone()),
        })
    }

    /// Record the outcome of a pending synthesis; plays the audio on success
    pub async fn finish_generation(
        &mut self,
        pending: PendingSynthesis,
        result: Result<AudioClip, ClientError>,
    ) -> Result<(), ClientError> {
        drop(pending);

        let clip = result.map_err(|e| {
            tracing::error!(error = %e, "TTS generation failed");
            e
        })?;

        tracing::info!(audio_size = clip.bytes.len(), "Audio generated");
        self.last_audio = Some(clip);

        if let Some(clip) = &self.last_audio {
            if let Err(e) = self.collaborators.player.play(clip).await {
                tracing::warn!(error = %e, "Playback failed");
            }
        }
        Ok(())
    }

    pub async fn generate_audio(&mut self, cancel: &CancellationToken) -> Result<(), ClientError> {
        let pending = self.begin_generation()?;
        let result = pending.send(cancel).await;
        self.finish_generation(pending, result).await
    }

    /// The "read" button: same as generating, reached from a second control
    pub async fn read_aloud(&mut self, cancel: &CancellationToken) -> Result<(), ClientError> {
        self.generate_audio(cancel).await
    }

    /// Save the last generated audio into `dir`. `None` if nothing was generated.
    pub async fn download_audio(&self, dir: &Path) -> Result<Option<PathBuf>, ClientError> {
        let Some(clip) = &self.last_audio else {
            return Ok(None);
        };

        let path = dir.join(download_file_name());
        tokio::fs::write(&path, &clip.bytes).await?;
        tracing::info!(path = %path.display(), "Audio saved");
        Ok(Some(path))
    }
}

fn download_file_name() -> String {
    format!(
        "generated_audio_{}.mp3",
        Utc::now().format("%Y-%m-%dT%H-%M-%S%.3fZ")
    )
}

/// Run the one-second recording clock until the current session ends
pub async fn drive_recording(shared: &Mutex<InputAssembler>) {
    let Some(session) = shared.lock().await.recorder.session_id() else {
        return;
    };

    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        interval.tick().await;
        let mut assembler = shared.lock().await;
        if assembler.recorder.session_id() != Some(session) {
            break;
        }
        match assembler.tick_recording() {
            RecordingTick::Running { display: elapsed } => tracing::trace!(display = %elapsed, "Recording"),
            _ => break,
        }
    }
}

/// Generate without holding the lock across the network call, so the busy
/// state stays observable and a second trigger is refused. Dropping this
/// future mid-flight releases the busy state.
pub async fn generate_shared(
    shared: &Mutex<InputAssembler>,
    cancel: &CancellationToken,
) -> Result<(), ClientError> {
    let pending = shared.lock().await.begin_generation()?;
    let result = pending.send(cancel).await;
    shared.lock().await.finish_generation(pending, result).await
}
