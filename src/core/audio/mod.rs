//! Raw sample buffers and their WAV container encoding.

mod wav;

pub use wav::{EncodeError, WAV_MEDIA_TYPE, encode_wav};

/// Output sample rate of every synthesized buffer (Hz)
pub const SAMPLE_RATE: u32 = 24000;

/// Mono PCM samples in the nominal range [-1.0, 1.0]
pub type SampleBuffer = Vec<f32>;

/// Build a buffer of zero samples lasting `duration_ms` at `sample_rate`
pub fn silence(duration_ms: u32, sample_rate: u32) -> SampleBuffer {
    let count = (sample_rate as u64 * duration_ms as u64 / 1000) as usize;
    vec![0.0; count]
}
