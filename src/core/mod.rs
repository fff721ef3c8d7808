pub mod audio;
pub mod capabilities;
pub mod model;
pub mod synthesis;
pub mod voices;

// Re-export commonly used types for convenience
pub use audio::{SAMPLE_RATE, SampleBuffer, encode_wav};
pub use capabilities::{CapabilityReporter, HealthReport, VoiceInfo, VoiceList};
pub use model::{
    ChunkIter, ModelAdapter, ModelBackend, ModelConfig, ModelDescription, ModelError, ModelState,
    SpeechModel, SynthesisFailure,
};
pub use synthesis::{SpeechError, SpeechRequest, SpeechSynthesizer, SynthesisResult};
pub use voices::{VoiceDescriptor, VoiceRegistry};
