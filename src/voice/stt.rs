//! Speech-to-text via the OpenAI Whisper transcription API

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use super::{RecognitionError, SpeechRecognizer, samples_to_wav, SAMPLE_RATE};
use crate::{Error, Result};

/// Default transcription endpoint
const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Response from the Whisper transcription API
#[derive(serde::Deserialize)]
struct WhisperResponse {
    text: String,
}

/// An armed capture, buffering audio until `stop`
#[derive(Debug)]
struct Capture {
    language: String,
    samples: Vec<f32>,
}

/// Transcribes speech to text
#[derive(Debug)]
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
    capture: Mutex<Option<Capture>>,
}

impl SpeechToText {
    /// Create a new STT instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: SecretString, model: String) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "OpenAI API key required for Whisper".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            endpoint: TRANSCRIPTION_URL.to_string(),
            capture: Mutex::new(None),
        })
    }

    /// Override the transcription endpoint (OpenAI-compatible servers)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Transcribe WAV audio to text
    ///
    /// # Arguments
    ///
    /// * `audio` - WAV audio bytes
    /// * `language` - optional ISO 639-1 hint for the recognizer
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(&self, audio: &[u8], language: Option<&str>) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), ?language, "starting transcription");

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name("audio.wav")
                    .mime_str("audio/wav")
                    .map_err(|e| Error::Stt(e.to_string()))?,
            )
            .text("model", self.model.clone());

        if let Some(lang) = language {
            form = form.text("language", lang.to_string());
        }

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Whisper request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Whisper API error");
            return Err(Error::Stt(format!("Whisper API error {status}: {body}")));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse Whisper response");
            e
        })?;

        tracing::info!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}

#[async_trait]
impl SpeechRecognizer for SpeechToText {
    fn is_supported(&self) -> bool {
        // Construction already validated the credential
        true
    }

    async fn start(&self, language: &str) -> std::result::Result<(), RecognitionError> {
        let mut capture = self.capture.lock().await;
        if capture.is_some() {
            return Err(RecognitionError::AudioCapture(
                "capture already active".to_string(),
            ));
        }

        tracing::debug!(language, "capture armed");
        *capture = Some(Capture {
            language: language.to_string(),
            samples: Vec::new(),
        });
        Ok(())
    }

    async fn push_samples(&self, samples: &[f32]) {
        if let Some(capture) = self.capture.lock().await.as_mut() {
            capture.samples.extend_from_slice(samples);
        }
    }

    async fn stop(&self) -> std::result::Result<String, RecognitionError> {
        let Some(capture) = self.capture.lock().await.take() else {
            return Err(RecognitionError::AudioCapture(
                "no active capture".to_string(),
            ));
        };

        if capture.samples.is_empty() {
            return Err(RecognitionError::NoSpeech);
        }

        let wav = samples_to_wav(&capture.samples, SAMPLE_RATE)
            .map_err(|e| RecognitionError::AudioCapture(e.to_string()))?;

        match self.transcribe(&wav, Some(&capture.language)).await {
            Ok(text) => Ok(text),
            Err(Error::Http(e)) => Err(RecognitionError::Network(e.to_string())),
            Err(e) => Err(RecognitionError::Service(e.to_string())),
        }
    }
}
