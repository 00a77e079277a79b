use async_trait::async_trait;

/// Recording is cut off once this many seconds have elapsed
pub const MAX_RECORDING_SECS: u32 = 60;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    #[error("تم رفض الإذن باستخدام الميكروفون")]
    PermissionDenied,
    #[error("ميزة التسجيل غير مدعومة في هذا المتصفح")]
    Unavailable,
    #[error("{0}")]
    Other(String),
}

/// Exclusive access to an audio input device
#[async_trait]
pub trait Microphone: Send + Sync {
    async fn open(&self) -> Result<Box<dyn CaptureStream>, DeviceError>;
}

/// A live capture from an opened microphone
pub trait CaptureStream: Send {
    /// Chunks captured since the previous call
    fn drain(&mut self) -> Vec<Vec<u8>>;

    /// Stop capturing, free the device and hand back whatever was still buffered
    fn release(self: Box<Self>) -> Vec<Vec<u8>>;
}

/// A finished voice sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSample {
    pub bytes: Vec<u8>,
    pub duration_secs: u32,
}

impl CapturedSample {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub struct RecordingSession {
    id: u64,
    chunks: Vec<Vec<u8>>,
    elapsed_secs: u32,
    stream: Box<dyn CaptureStream>,
}

impl RecordingSession {
    fn finish(mut self) -> CapturedSample {
        self.chunks.extend(self.stream.release());
        CapturedSample {
            bytes: self.chunks.concat(),
            duration_secs: self.elapsed_secs,
        }
    }
}

pub enum RecordingState {
    Idle,
    Recording(RecordingSession),
}

/// Outcome of one clock tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingTick {
    Idle,
    Running { display: String },
    TimedOut(CapturedSample),
}

/// `Idle -> Recording -> Idle`, driven by explicit toggles and a one-second clock
pub struct Recorder {
    state: RecordingState,
    next_session_id: u64,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            state: RecordingState::Idle,
            next_session_id: 1,
        }
    }

    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording(_))
    }

    /// Id of the active session, if any
    pub fn session_id(&self) -> Option<u64> {
        match &self.state {
            RecordingState::Recording(session) => Some(session.id),
            RecordingState::Idle => None,
        }
    }

    pub fn elapsed_secs(&self) -> u32 {
        match &self.state {
            RecordingState::Recording(session) => session.elapsed_secs,
            RecordingState::Idle => 0,
        }
    }

    /// Elapsed time as `MM:SS`; `00:00` while idle
    pub fn display(&self) -> String {
        format_elapsed(self.elapsed_secs())
    }

    /// Open the microphone and begin a session. No-op while already recording.
    pub async fn start(&mut self, microphone: &dyn Microphone) -> Result<(), DeviceError> {
        if self.is_recording() {
            return Ok(());
        }

        let stream = microphone.open().await?;
        let id = self.next_session_id;
        self.next_session_id += 1;
        self.state = RecordingState::Recording(RecordingSession {
            id,
            chunks: Vec::new(),
            elapsed_secs: 0,
            stream,
        });

        tracing::debug!(session_id = id, "Recording started");
        Ok(())
    }

    /// Finalize the active session and release the device
    pub fn stop(&mut self) -> Option<CapturedSample> {
        match std::mem::replace(&mut self.state, RecordingState::Idle) {
            RecordingState::Recording(session) => {
                let id = session.id;
                let sample = session.finish();
                tracing::debug!(
                    session_id = id,
                    duration_secs = sample.duration_secs,
                    sample_bytes = sample.bytes.len(),
                    "Recording stopped"
                );
                Some(sample)
            }
            RecordingState::Idle => None,
        }
    }

    /// Advance the clock by one second, stopping at the cap
    pub fn tick(&mut self) -> RecordingTick {
        let elapsed = match &mut self.state {
            RecordingState::Recording(session) => {
                let drained = session.stream.drain();
                session.chunks.extend(drained);
                session.elapsed_secs += 1;
                session.elapsed_secs
            }
            RecordingState::Idle => return RecordingTick::Idle,
        };

        if elapsed >= MAX_RECORDING_SECS {
            tracing::info!(elapsed_secs = elapsed, "Recording reached the time limit");
            return match self.stop() {
                Some(sample) => RecordingTick::TimedOut(sample),
                None => RecordingTick::Idle,
            };
        }

        RecordingTick::Running {
            display: format_elapsed(elapsed),
        }
    }
}

pub fn format_elapsed(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
