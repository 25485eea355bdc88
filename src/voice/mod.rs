//! Voice collaborators: speech-to-text and text-to-speech
//!
//! The session controller talks to these through the [`SpeechRecognizer`] and
//! [`SpeechSynthesizer`] traits; the concrete implementations call hosted
//! speech APIs.

mod stt;
mod tts;

pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use async_trait::async_trait;
use thiserror::Error;

use crate::{Error, Result};

/// Sample rate expected from audio producers
pub const SAMPLE_RATE: u32 = 16000;

/// Mid-capture recognition failures, mirroring the platform error codes
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecognitionError {
    /// No speech was captured before stop
    #[error("no speech detected")]
    NoSpeech,

    /// Microphone permission denied
    #[error("audio capture not allowed")]
    NotAllowed,

    /// Audio capture failed or was mis-sequenced
    #[error("audio capture error: {0}")]
    AudioCapture(String),

    /// Network failure reaching the recognition service
    #[error("recognition network error: {0}")]
    Network(String),

    /// The recognition service declined or misbehaved
    #[error("recognition service error: {0}")]
    Service(String),
}

/// External speech-to-text collaborator
///
/// One capture at a time: `start` arms a capture in the given language,
/// audio is pushed in between, and `stop` resolves exactly once to the final
/// transcript or a [`RecognitionError`].
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether speech-to-text is available at all
    fn is_supported(&self) -> bool;

    /// Begin capturing in the given language
    async fn start(&self, language: &str) -> std::result::Result<(), RecognitionError>;

    /// Deliver audio samples to the active capture
    async fn push_samples(&self, samples: &[f32]);

    /// End the capture and resolve to the final transcript
    async fn stop(&self) -> std::result::Result<String, RecognitionError>;
}

/// External speech-synthesis collaborator
///
/// `speak` is fire-and-forget: no completion is reported and failures are
/// handled internally.
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether speech synthesis is available at all
    fn is_supported(&self) -> bool;

    /// Render `text` aloud in the given language
    fn speak(&self, text: &str, language: &str);
}

/// Convert f32 samples to WAV bytes for the STT API
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_header_is_well_formed() {
        let samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0];
        let wav = samples_to_wav(&samples, SAMPLE_RATE).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        assert!(wav.len() > 44);
    }

    #[test]
    fn sample_values_are_clamped() {
        // Out-of-range input must not wrap
        let wav = samples_to_wav(&[2.0, -2.0], SAMPLE_RATE).unwrap();
        let mut reader = hound::WavReader::new(std::io::Cursor::new(wav)).unwrap();
        let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(decoded, vec![i16::MAX, i16::MIN]);
    }
}
