//! Translation via a chat-completion service
//!
//! One instruction-style prompt per request, exactly one user-role message,
//! only the first choice's content is read.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Default chat-completions endpoint
const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Anything that can translate text into a target language
///
/// Implemented by [`Translator`] against the upstream completion service and
/// by [`GatewayClient`](crate::api::translate::GatewayClient) against a remote
/// Parley gateway.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` into the language named by `target_lang`
    ///
    /// An empty result means the service produced no content; failures are
    /// returned as errors, never folded into the empty string here.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
}

/// Chat-completion request body
#[derive(serde::Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

/// A single chat message
#[derive(serde::Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completion response body (only the fields we read)
#[derive(serde::Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Build the single-turn translation prompt
///
/// `target_lang` is embedded verbatim; the caller does not validate it.
#[must_use]
pub fn build_prompt(text: &str, target_lang: &str) -> String {
    format!("Translate the following text into {target_lang}:\n\n{text}")
}

/// First choice's message content, or empty when the model returned nothing
fn extract_content(response: ChatResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default()
}

/// Translates text via an OpenAI-style chat-completion API
///
/// Process-wide, read-only after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct Translator {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    endpoint: String,
}

impl Translator {
    /// Create a new translator
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be
    /// built
    pub fn new(api_key: SecretString, model: String, timeout: Duration) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config(
                "completion-service API key required for translation".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model,
            endpoint: COMPLETIONS_URL.to_string(),
        })
    }

    /// Override the completions endpoint (OpenAI-compatible servers)
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Submit one completion request and return its first choice's content
    async fn complete(&self, prompt: String) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
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
            tracing::error!(status = %status, body = %body, "completion API error");
            return Err(Error::Translation(format!(
                "completion API error {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse completion response");
            e
        })?;

        Ok(extract_content(parsed))
    }
}

#[async_trait]
impl TranslationBackend for Translator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        tracing::debug!(target_lang, chars = text.len(), "requesting translation");
        let translation = self.complete(build_prompt(text, target_lang)).await?;
        tracing::info!(target_lang, chars = translation.len(), "translation complete");
        Ok(translation)
    }
}
