//! Configuration for the Parley gateway
//!
//! Settings resolve env > config file > default. The completion-service
//! credential is validated here, at startup, so a missing key is a
//! configuration error rather than a per-request failure.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

/// Default chat-completion model for translation
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for the outbound completion call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parley gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP API listens on
    pub port: u16,

    /// Chat-completion model used for translation
    pub model: String,

    /// Timeout for outbound completion requests
    pub request_timeout: Duration,

    /// Default input (spoken) language code
    pub input_language: String,

    /// Default output (translation) language code
    pub output_language: String,

    /// Voice configuration
    pub voice: VoiceConfig,

    /// Completion-service API key
    pub api_key: SecretString,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable the STT/TTS endpoints and collaborators
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stt_model: "whisper-1".to_string(),
            tts_model: "tts-1".to_string(),
            tts_voice: "alloy".to_string(),
            tts_speed: 1.0,
        }
    }
}

/// On-disk configuration file (all fields optional)
#[derive(Debug, Default, serde::Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub translation: FileTranslationConfig,
    #[serde(default)]
    pub voice: FileVoiceConfig,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct FileServerConfig {
    pub port: Option<u16>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct FileTranslationConfig {
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub input_language: Option<String>,
    pub output_language: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct FileVoiceConfig {
    pub enabled: Option<bool>,
    pub stt_model: Option<String>,
    pub tts_model: Option<String>,
    pub tts_voice: Option<String>,
    pub tts_speed: Option<f64>,
}

impl FileConfig {
    /// Parse a configuration file from TOML text
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Whether an env toggle is set: "", "0", and "false" count as unset
fn env_flag(value: Option<String>) -> bool {
    match value {
        Some(v) => !matches!(v.as_str(), "" | "0" | "false"),
        None => false,
    }
}

/// Path of the config file: `PARLEY_CONFIG` env or `~/.config/parley/config.toml`
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("PARLEY_CONFIG") {
        return Some(PathBuf::from(path));
    }
    directories::BaseDirs::new().map(|dirs| dirs.config_dir().join("parley").join("config.toml"))
}

impl Config {
    /// Load configuration from environment and optional config file
    ///
    /// # Errors
    ///
    /// Returns error if `OPENAI_API_KEY` is absent or the config file is
    /// malformed
    pub fn load() -> Result<Self> {
        let fc = match config_file_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config file");
                FileConfig::parse(&std::fs::read_to_string(&path)?)?
            }
            _ => FileConfig::default(),
        };
        Self::from_parts(fc, std::env::var("OPENAI_API_KEY").ok())
    }

    /// Resolve configuration from a parsed file and the credential
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing or empty
    pub fn from_parts(fc: FileConfig, api_key: Option<String>) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.is_empty())
            .map(SecretString::from)
            .ok_or_else(|| {
                Error::Config("OPENAI_API_KEY not set; the completion service requires a credential".to_string())
            })?;

        let port = std::env::var("PARLEY_PORT")
            .or_else(|_| std::env::var("PORT"))
            .ok()
            .and_then(|s| s.parse().ok())
            .or(fc.server.port)
            .unwrap_or(8780);

        let request_timeout = std::env::var("PARLEY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .or(fc.translation.timeout_secs)
            .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

        let voice_enabled = if env_flag(std::env::var("PARLEY_DISABLE_VOICE").ok()) {
            false
        } else {
            fc.voice.enabled.unwrap_or(true)
        };

        let defaults = VoiceConfig::default();
        let voice = VoiceConfig {
            enabled: voice_enabled,
            stt_model: std::env::var("PARLEY_STT_MODEL")
                .ok()
                .or(fc.voice.stt_model)
                .unwrap_or(defaults.stt_model),
            tts_model: std::env::var("PARLEY_TTS_MODEL")
                .ok()
                .or(fc.voice.tts_model)
                .unwrap_or(defaults.tts_model),
            tts_voice: std::env::var("PARLEY_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or(defaults.tts_voice),
            tts_speed: fc.voice.tts_speed.unwrap_or(defaults.tts_speed),
        };

        Ok(Self {
            port,
            model: std::env::var("PARLEY_MODEL")
                .ok()
                .or(fc.translation.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout,
            input_language: std::env::var("PARLEY_INPUT_LANG")
                .ok()
                .or(fc.translation.input_language)
                .unwrap_or_else(|| "en".to_string()),
            output_language: std::env::var("PARLEY_OUTPUT_LANG")
                .ok()
                .or(fc.translation.output_language)
                .unwrap_or_else(|| "es".to_string()),
            voice,
            api_key,
        })
    }
}
