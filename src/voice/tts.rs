//! Text-to-speech via the OpenAI speech API

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use super::SpeechSynthesizer;
use crate::{Error, Result};

/// Default speech endpoint
const SPEECH_URL: &str = "https://api.openai.com/v1/audio/speech";

/// Receives synthesized audio (MP3 bytes) from fire-and-forget playback
pub type AudioSink = Arc<dyn Fn(Vec<u8>) + Send + Sync>;

/// Synthesizes speech from text
#[derive(Clone)]
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    voice: String,
    speed: f64,
    endpoint: String,
    sink: Option<AudioSink>,
}

impl std::fmt::Debug for TextToSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextToSpeech")
            .field("client", &self.client)
            .field("api_key", &self.api_key)
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("speed", &self.speed)
            .field("endpoint", &self.endpoint)
            .field("sink", &self.sink.as_ref().map(|_| "AudioSink"))
            .finish()
    }
}

impl TextToSpeech {
    /// Create a new TTS instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: SecretString, model: String, voice: String, speed: f64) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("OpenAI API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            voice,
            speed,
            endpoint: SPEECH_URL.to_string(),
            sink: None,
        })
    }

    /// Override the speech endpoint (OpenAI-compatible servers)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the sink that receives audio from [`SpeechSynthesizer::speak`]
    #[must_use]
    pub fn with_sink(mut self, sink: AudioSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct TtsRequest<'a> {
            model: &'a str,
            input: &'a str,
            voice: &'a str,
            speed: f64,
        }

        let request = TtsRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("OpenAI TTS error {status}: {body}")));
        }

        let audio = response.bytes().await?;
        Ok(audio.to_vec())
    }
}

impl SpeechSynthesizer for TextToSpeech {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&self, text: &str, language: &str) {
        // Fire-and-forget: no completion callback is consumed and failures
        // stay inside the collaborator.
        let tts = self.clone();
        let text = text.to_string();
        let language = language.to_string();

        tokio::spawn(async move {
            match tts.synthesize(&text).await {
                Ok(audio) => {
                    tracing::debug!(language, bytes = audio.len(), "speech synthesized");
                    if let Some(sink) = &tts.sink {
                        sink(audio);
                    }
                }
                Err(e) => tracing::warn!(error = %e, "speech synthesis failed"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        let err = TextToSpeech::new(
            SecretString::from(String::new()),
            "tts-1".to_string(),
            "alloy".to_string(),
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
