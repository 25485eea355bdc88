//! Session controller for one speech → translate → speak interaction
//!
//! Owns the phase state machine and the session data (transcript,
//! translation, language selection). Collaborators sit behind traits so the
//! whole lifecycle is testable without audio hardware or a network.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::translator::TranslationBackend;
use crate::voice::{RecognitionError, SpeechRecognizer, SpeechSynthesizer};

/// Translation text substituted when the gateway call fails
///
/// The failure is terminal for that request; retry is user-driven.
pub const TRANSLATION_FAILED_TEXT: &str = "Error translating text.";

/// Phase of the interaction state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight; transcript/translation may or may not be present
    Idle,
    /// The recognizer is capturing audio
    Recording,
    /// A translation request is in flight
    Translating,
}

/// Illegal calls and collaborator failures surfaced by the controller
#[derive(Debug, Error)]
pub enum SessionError {
    /// The platform offers no speech capability
    #[error("speech capability unavailable")]
    CapabilityUnavailable,

    /// `start_recording` while already recording
    #[error("already recording")]
    AlreadyRecording,

    /// `stop_recording` without an active recording
    #[error("not recording")]
    NotRecording,

    /// `translate` with nothing to translate
    #[error("no transcript to translate")]
    EmptyTranscript,

    /// A translation request is already in flight
    #[error("translation already in flight")]
    TranslationInFlight,

    /// `speak` with nothing to speak
    #[error("no translation to speak")]
    EmptyTranslation,

    /// The recognizer delivered a terminal error
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
}

/// Point-in-time view of the session
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub input_language: String,
    pub output_language: String,
    pub transcript: String,
    pub translation: String,
}

/// Mutable session data, guarded by one lock
struct SessionState {
    phase: Phase,
    input_language: String,
    output_language: String,
    transcript: String,
    translation: String,
}

/// Coordinates the lifecycle of one speech → translate → speak interaction
pub struct SessionController {
    recognizer: Arc<dyn SpeechRecognizer>,
    gateway: Arc<dyn TranslationBackend>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    state: Mutex<SessionState>,
}

impl SessionController {
    /// Create a controller with the given collaborators and language pair
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        gateway: Arc<dyn TranslationBackend>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        input_language: impl Into<String>,
        output_language: impl Into<String>,
    ) -> Self {
        Self {
            recognizer,
            gateway,
            synthesizer,
            state: Mutex::new(SessionState {
                phase: Phase::Idle,
                input_language: input_language.into(),
                output_language: output_language.into(),
                transcript: String::new(),
                translation: String::new(),
            }),
        }
    }

    /// Begin capturing speech in the configured input language
    ///
    /// # Errors
    ///
    /// Rejected while recording or while a translation is in flight, when the
    /// platform lacks speech-to-text, or when the recognizer fails to start.
    pub async fn start_recording(&self) -> Result<(), SessionError> {
        if !self.recognizer.is_supported() {
            return Err(SessionError::CapabilityUnavailable);
        }

        let language = {
            let mut state = self.state.lock().await;
            match state.phase {
                Phase::Recording => return Err(SessionError::AlreadyRecording),
                Phase::Translating => return Err(SessionError::TranslationInFlight),
                Phase::Idle => {}
            }
            state.phase = Phase::Recording;
            state.input_language.clone()
        };

        if let Err(e) = self.recognizer.start(&language).await {
            self.state.lock().await.phase = Phase::Idle;
            tracing::warn!(error = %e, "recognizer failed to start");
            return Err(e.into());
        }

        tracing::debug!(language, "recording started");
        Ok(())
    }

    /// Stop capturing and wait for the recognizer's terminal outcome
    ///
    /// On success the transcript is replaced in full and any prior
    /// translation is cleared as stale. On a recognition error the transcript
    /// is left unchanged. Either way the phase returns to idle.
    ///
    /// # Errors
    ///
    /// Rejected when not recording; propagates the recognizer's terminal
    /// error.
    pub async fn stop_recording(&self) -> Result<String, SessionError> {
        {
            let state = self.state.lock().await;
            if state.phase != Phase::Recording {
                return Err(SessionError::NotRecording);
            }
        }

        let outcome = self.recognizer.stop().await;

        let mut state = self.state.lock().await;
        state.phase = Phase::Idle;
        match outcome {
            Ok(transcript) => {
                tracing::info!(chars = transcript.len(), "transcript received");
                state.transcript = transcript.clone();
                state.translation.clear();
                Ok(transcript)
            }
            Err(e) => {
                tracing::warn!(error = %e, "recognition failed");
                Err(e.into())
            }
        }
    }

    /// Translate the current transcript into the output language
    ///
    /// Issues exactly one gateway request; a second call while one is in
    /// flight is rejected. A gateway failure is absorbed by substituting
    /// [`TRANSLATION_FAILED_TEXT`] into the translation; there is no
    /// automatic retry.
    ///
    /// # Errors
    ///
    /// Rejected with an empty transcript, while recording, or while another
    /// translation is in flight.
    pub async fn translate(&self) -> Result<(), SessionError> {
        let (text, target_lang) = {
            let mut state = self.state.lock().await;
            match state.phase {
                Phase::Translating => return Err(SessionError::TranslationInFlight),
                Phase::Recording => return Err(SessionError::AlreadyRecording),
                Phase::Idle => {}
            }
            if state.transcript.is_empty() {
                return Err(SessionError::EmptyTranscript);
            }
            state.phase = Phase::Translating;
            (state.transcript.clone(), state.output_language.clone())
        };

        let result = self.gateway.translate(&text, &target_lang).await;

        let mut state = self.state.lock().await;
        state.phase = Phase::Idle;
        match result {
            Ok(translation) => {
                // May legitimately be empty: the service produced no content
                tracing::info!(chars = translation.len(), "translation stored");
                state.translation = translation;
            }
            Err(e) => {
                tracing::warn!(error = %e, "translation request failed");
                state.translation = TRANSLATION_FAILED_TEXT.to_string();
            }
        }
        Ok(())
    }

    /// Speak the current translation in the output language
    ///
    /// Fire-and-forget: no phase change and no completion guarantee.
    ///
    /// # Errors
    ///
    /// Rejected without a translation (the synthesizer is not called) or when
    /// speech synthesis is unavailable.
    pub async fn speak(&self) -> Result<(), SessionError> {
        let (text, language) = {
            let state = self.state.lock().await;
            if state.translation.is_empty() {
                return Err(SessionError::EmptyTranslation);
            }
            (state.translation.clone(), state.output_language.clone())
        };

        if !self.synthesizer.is_supported() {
            return Err(SessionError::CapabilityUnavailable);
        }

        self.synthesizer.speak(&text, &language);
        Ok(())
    }

    /// Replace the input (spoken) language
    pub async fn set_input_language(&self, code: impl Into<String>) {
        self.state.lock().await.input_language = code.into();
    }

    /// Replace the output (translation) language
    pub async fn set_output_language(&self, code: impl Into<String>) {
        self.state.lock().await.output_language = code.into();
    }

    /// Current phase
    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    /// Point-in-time view of the session
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            phase: state.phase,
            input_language: state.input_language.clone(),
            output_language: state.output_language.clone(),
            transcript: state.transcript.clone(),
            translation: state.translation.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedRecognizer {
        supported: bool,
        transcript: &'static str,
    }

    #[async_trait]
    impl SpeechRecognizer for FixedRecognizer {
        fn is_supported(&self) -> bool {
            self.supported
        }
        async fn start(&self, _language: &str) -> Result<(), RecognitionError> {
            Ok(())
        }
        async fn push_samples(&self, _samples: &[f32]) {}
        async fn stop(&self) -> Result<String, RecognitionError> {
            Ok(self.transcript.to_string())
        }
    }

    struct EchoGateway;

    #[async_trait]
    impl TranslationBackend for EchoGateway {
        async fn translate(&self, text: &str, target_lang: &str) -> crate::Result<String> {
            Ok(format!("{target_lang}:{text}"))
        }
    }

    struct CountingSynthesizer(AtomicUsize);

    impl SpeechSynthesizer for CountingSynthesizer {
        fn is_supported(&self) -> bool {
            true
        }
        fn speak(&self, _text: &str, _language: &str) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn controller() -> SessionController {
        SessionController::new(
            Arc::new(FixedRecognizer { supported: true, transcript: "hello" }),
            Arc::new(EchoGateway),
            Arc::new(CountingSynthesizer(AtomicUsize::new(0))),
            "en",
            "es",
        )
    }

    #[tokio::test]
    async fn starts_idle_with_empty_session() {
        let ctl = controller();
        let snap = ctl.snapshot().await;
        assert_eq!(snap.phase, Phase::Idle);
        assert!(snap.transcript.is_empty());
        assert!(snap.translation.is_empty());
        assert_eq!(snap.input_language, "en");
        assert_eq!(snap.output_language, "es");
    }

    #[tokio::test]
    async fn unsupported_recognizer_blocks_recording() {
        let ctl = SessionController::new(
            Arc::new(FixedRecognizer { supported: false, transcript: "" }),
            Arc::new(EchoGateway),
            Arc::new(CountingSynthesizer(AtomicUsize::new(0))),
            "en",
            "es",
        );
        assert!(matches!(
            ctl.start_recording().await,
            Err(SessionError::CapabilityUnavailable)
        ));
        assert_eq!(ctl.phase().await, Phase::Idle);
    }

    #[tokio::test]
    async fn record_translate_speak_lifecycle() {
        let ctl = controller();

        ctl.start_recording().await.unwrap();
        assert_eq!(ctl.phase().await, Phase::Recording);

        let transcript = ctl.stop_recording().await.unwrap();
        assert_eq!(transcript, "hello");
        assert_eq!(ctl.phase().await, Phase::Idle);

        ctl.translate().await.unwrap();
        let snap = ctl.snapshot().await;
        assert_eq!(snap.translation, "es:hello");
        assert_eq!(snap.phase, Phase::Idle);

        ctl.speak().await.unwrap();
    }

    #[tokio::test]
    async fn stop_without_start_is_rejected() {
        let ctl = controller();
        assert!(matches!(
            ctl.stop_recording().await,
            Err(SessionError::NotRecording)
        ));
    }

    #[tokio::test]
    async fn translate_without_transcript_is_rejected() {
        let ctl = controller();
        assert!(matches!(
            ctl.translate().await,
            Err(SessionError::EmptyTranscript)
        ));
    }

    #[tokio::test]
    async fn output_language_change_applies_to_next_translation() {
        let ctl = controller();
        ctl.start_recording().await.unwrap();
        ctl.stop_recording().await.unwrap();

        ctl.set_output_language("fr").await;
        ctl.translate().await.unwrap();
        assert_eq!(ctl.snapshot().await.translation, "fr:hello");
    }
}
