//! Shared test doubles for the session and gateway tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use parley_gateway::{
    Error, RecognitionError, SpeechRecognizer, SpeechSynthesizer, TranslationBackend,
};

/// Recognizer that replays scripted terminal outcomes
pub struct MockRecognizer {
    supported: bool,
    starts: AtomicUsize,
    started_languages: Mutex<Vec<String>>,
    outcomes: Mutex<VecDeque<Result<String, RecognitionError>>>,
}

impl MockRecognizer {
    /// Recognizer whose every stop delivers the given transcript
    pub fn delivering(transcript: &str) -> Self {
        Self::script(vec![Ok(transcript.to_string()); 8])
    }

    /// Recognizer that replays the given outcomes in order
    pub fn script(outcomes: Vec<Result<String, RecognitionError>>) -> Self {
        Self {
            supported: true,
            starts: AtomicUsize::new(0),
            started_languages: Mutex::new(Vec::new()),
            outcomes: Mutex::new(outcomes.into()),
        }
    }

    /// Recognizer reporting no speech-to-text capability
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            starts: AtomicUsize::new(0),
            started_languages: Mutex::new(Vec::new()),
            outcomes: Mutex::new(VecDeque::new()),
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Languages each capture was started with, in order
    pub fn started_languages(&self) -> Vec<String> {
        self.started_languages.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn start(&self, language: &str) -> Result<(), RecognitionError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.started_languages
            .lock()
            .unwrap()
            .push(language.to_string());
        Ok(())
    }

    async fn push_samples(&self, _samples: &[f32]) {}

    async fn stop(&self) -> Result<String, RecognitionError> {
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RecognitionError::NoSpeech))
    }
}

enum Reply {
    Text(String),
    Fail(String),
}

/// Gateway double that records every request it receives
pub struct MockGateway {
    requests: Mutex<Vec<(String, String)>>,
    reply: Reply,
}

impl MockGateway {
    pub fn returning(translation: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply: Reply::Text(translation.to_string()),
        }
    }

    /// Gateway whose completion service produces no content
    pub fn empty() -> Self {
        Self::returning("")
    }

    pub fn failing(message: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply: Reply::Fail(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationBackend for MockGateway {
    async fn translate(&self, text: &str, target_lang: &str) -> parley_gateway::Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), target_lang.to_string()));
        match &self.reply {
            Reply::Text(t) => Ok(t.clone()),
            Reply::Fail(msg) => Err(Error::Translation(msg.clone())),
        }
    }
}

/// Gateway double that parks in-flight requests until released
pub struct BlockingGateway {
    pub calls: AtomicUsize,
    pub entered: Notify,
    pub release: Notify,
}

impl BlockingGateway {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl TranslationBackend for BlockingGateway {
    async fn translate(&self, _text: &str, _target_lang: &str) -> parley_gateway::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok("done".to_string())
    }
}

/// Synthesizer double that records what it was asked to speak
pub struct MockSynthesizer {
    spoken: Mutex<Vec<(String, String)>>,
}

impl MockSynthesizer {
    pub fn new() -> Self {
        Self {
            spoken: Mutex::new(Vec::new()),
        }
    }

    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn speak(&self, text: &str, language: &str) {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), language.to_string()));
    }
}
