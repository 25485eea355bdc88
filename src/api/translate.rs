//! Translation gateway endpoint
//!
//! Stateless `POST /translate`: wraps the completion service behind the
//! minimal `{text, targetLang} -> {translation}` contract. No session, no
//! caching, no retry.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::translator::TranslationBackend;
use crate::{Error, Result};

/// Error code carried on gateway failures, so callers can tell a failed call
/// from a model that legitimately produced nothing
pub const UPSTREAM_FAILURE: &str = "upstream_failure";

/// Request body for `POST /translate`
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(rename = "targetLang")]
    pub target_lang: String,
}

/// Response body for `POST /translate`
///
/// `translation` is empty both when the model returned nothing (200) and on
/// failure (500, with `error` set); the status code is the discriminator.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the translation router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/translate", post(translate))
        .with_state(state)
}

/// Translate text into the requested language
///
/// `targetLang` is forwarded verbatim; no validation beyond JSON shape.
async fn translate(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<TranslateRequest>,
) -> std::result::Result<Json<TranslateResponse>, TranslateError> {
    match state
        .translator
        .translate(&request.text, &request.target_lang)
        .await
    {
        Ok(translation) => Ok(Json(TranslateResponse {
            translation,
            error: None,
        })),
        Err(e) => {
            // Logged here, never propagated to the caller
            tracing::error!(error = %e, "upstream translation failed");
            Err(TranslateError::Upstream)
        }
    }
}

/// Gateway-side translation failure
#[derive(Debug)]
pub enum TranslateError {
    Upstream,
}

impl IntoResponse for TranslateError {
    fn into_response(self) -> Response {
        match self {
            Self::Upstream => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TranslateResponse {
                    translation: String::new(),
                    error: Some(UPSTREAM_FAILURE.to_string()),
                }),
            )
                .into_response(),
        }
    }
}

/// Client for a remote Parley gateway
///
/// Lets a session controller run apart from the gateway process while still
/// satisfying the [`TranslationBackend`] contract.
pub struct GatewayClient {
    client: reqwest::Client,
    url: String,
}

impl GatewayClient {
    /// Create a client for the gateway at `base_url`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/translate", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TranslationBackend for GatewayClient {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let request = TranslateRequest {
            text: text.to_string(),
            target_lang: target_lang.to_string(),
        };

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Translation(format!("gateway error: {status}")));
        }

        let body: TranslateResponse = response.json().await?;
        Ok(body.translation)
    }
}
