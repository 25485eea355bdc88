//! Parley Gateway - voice translation gateway
//!
//! This library provides the two halves of a speech → translate → speak
//! interaction:
//! - a session controller owning the interaction state machine
//! - a stateless translation gateway proxying a chat-completion service
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │                Session Controller                 │
//! │   idle → recording → translating → (speak)       │
//! └───────┬──────────────────┬───────────────┬───────┘
//!         │                  │               │
//!   ┌─────▼─────┐     ┌──────▼──────┐  ┌─────▼─────┐
//!   │    STT    │     │  Gateway    │  │    TTS    │
//!   │ (Whisper) │     │ /translate  │  │ (OpenAI)  │
//!   └───────────┘     └──────┬──────┘  └───────────┘
//!                            │
//!                  ┌─────────▼──────────┐
//!                  │ Completion service │
//!                  └────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod languages;
pub mod session;
pub mod translator;
pub mod voice;

pub use api::{ApiServer, ApiState};
pub use config::Config;
pub use error::{Error, Result};
pub use session::{Phase, SessionController, SessionError, SessionSnapshot, TRANSLATION_FAILED_TEXT};
pub use translator::{TranslationBackend, Translator, build_prompt};
pub use voice::{
    RecognitionError, SpeechRecognizer, SpeechSynthesizer, SpeechToText, TextToSpeech,
    SAMPLE_RATE, samples_to_wav,
};
