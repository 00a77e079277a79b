pub mod assembler;
pub mod error;
pub mod file_import;
pub mod recorder;
pub mod relay_client;

pub use assembler::{
    drive_recording, generate_shared, AssumeOnline, AudioPlayer, Collaborators, Connectivity,
    InputAssembler, PendingSynthesis, RecordingToggle, VoiceMode,
};
pub use error::ClientError;
pub use file_import::{DocumentExtractor, FileKind, ImportedFile};
pub use recorder::{CapturedSample, CaptureStream, DeviceError, Microphone, Recorder};
pub use relay_client::{AudioClip, RelayClient, SynthesisRelay};
