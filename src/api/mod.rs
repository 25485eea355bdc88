//! HTTP API server for the Parley gateway

pub mod health;
pub mod translate;
pub mod voice;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::translator::TranslationBackend;
use crate::voice::{SpeechToText, TextToSpeech};
use crate::Result;

/// Shared state for API handlers
///
/// Built once at startup and read-only afterwards; every request sees the
/// same dependencies and no state is shared across requests beyond them.
pub struct ApiState {
    /// Upstream translation backend
    pub translator: Arc<dyn TranslationBackend>,

    /// Chat-completion model identifier, reported by `/api/status`
    pub model: String,

    /// Speech-to-text collaborator, when voice is enabled
    pub stt: Option<Arc<SpeechToText>>,

    /// Text-to-speech collaborator, when voice is enabled
    pub tts: Option<Arc<TextToSpeech>>,
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
}

impl ApiServer {
    /// Create a server for the given state and port
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16) -> Self {
        Self { state, port }
    }

    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let router = Router::new()
            .merge(translate::router(self.state.clone()))
            .nest("/api/voice", voice::router(self.state.clone()))
            .merge(health::router())
            .merge(health::status_router(self.state.clone()));

        // CORS layer for cross-origin requests from browser clients
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}
