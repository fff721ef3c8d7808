use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

/// Media type advertised for encoded payloads
pub const WAV_MEDIA_TYPE: &str = "audio/wav";

const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Sample rate must be greater than 0")]
    InvalidSampleRate,
    #[error("WAV encoding failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Encode mono float samples as a 16-bit PCM WAV file held in memory.
///
/// Each sample is clamped to [-1.0, 1.0], scaled by `i16::MAX` and rounded.
/// NaN samples are written as zero. The output carries the canonical 44-byte
/// RIFF header followed by the little-endian sample data, so identical input
/// always produces identical bytes.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, EncodeError> {
    if sample_rate == 0 {
        return Err(EncodeError::InvalidSampleRate);
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let capacity = 44 + samples.len() * (BITS_PER_SAMPLE as usize / 8);
    let mut cursor = Cursor::new(Vec::with_capacity(capacity));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(to_pcm16(sample))?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

fn to_pcm16(sample: f32) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn read_u16(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_fields() {
        let bytes = encode_wav(&[0.0; 100], 24000).unwrap();

        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
        assert_eq!(&bytes[12..16], b"fmt ");
        assert_eq!(read_u16(&bytes, 20), 1); // PCM
        assert_eq!(read_u16(&bytes, 22), 1); // mono
        assert_eq!(read_u32(&bytes, 24), 24000);
        assert_eq!(read_u32(&bytes, 28), 48000); // byte rate
        assert_eq!(read_u16(&bytes, 34), 16);
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(read_u32(&bytes, 40), 200);
        assert_eq!(bytes.len(), 44 + 200);
    }

    #[test]
    fn test_empty_buffer_is_header_only() {
        let bytes = encode_wav(&[], 24000).unwrap();
        assert_eq!(bytes.len(), 44);
        assert_eq!(read_u32(&bytes, 40), 0);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let samples: Vec<f32> = (0..480).map(|i| (i as f32 * 0.05).sin() * 0.8).collect();
        assert_eq!(
            encode_wav(&samples, 24000).unwrap(),
            encode_wav(&samples, 24000).unwrap()
        );
    }

    #[test]
    fn test_samples_are_clamped_and_scaled() {
        let bytes = encode_wav(&[1.0, -1.0, 2.5, -3.0, 0.5, f32::NAN], 24000).unwrap();
        let pcm: Vec<i16> = bytes[44..]
            .chunks_exact(2)
            .map(|c| i16::from_le_bytes([c[0], c[1]]))
            .collect();

        assert_eq!(pcm, vec![32767, -32767, 32767, -32767, 16384, 0]);
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        assert!(matches!(
            encode_wav(&[0.0], 0),
            Err(EncodeError::InvalidSampleRate)
        ));
    }

    #[test]
    fn test_readable_by_hound() {
        let samples = vec![0.25f32; 2400];
        let bytes = encode_wav(&samples, 24000).unwrap();

        let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 24000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 2400);
    }
}
