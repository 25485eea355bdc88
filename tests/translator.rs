//! Translator integration tests against a canned completion server

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use secrecy::SecretString;

use parley_gateway::{Error, TranslationBackend, Translator};

/// Serve the router on a loopback port and return the endpoint URL
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/chat/completions")
}

fn translator(endpoint: String) -> Translator {
    Translator::new(
        SecretString::from("test-key".to_string()),
        "gpt-4o-mini".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
    .with_endpoint(endpoint)
}

#[tokio::test]
async fn sends_bearer_auth_and_single_user_message() {
    type Seen = Arc<Mutex<Option<(Option<String>, serde_json::Value)>>>;
    let seen: Seen = Arc::default();

    let recorded = seen.clone();
    let app = Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| {
            let recorded = recorded.clone();
            async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                *recorded.lock().unwrap() = Some((auth, body));
                Json(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "Hola"}}]
                }))
            }
        }),
    );

    let translation = translator(serve(app).await)
        .translate("Hello", "es")
        .await
        .unwrap();
    assert_eq!(translation, "Hola");

    let (auth, body) = seen.lock().unwrap().take().unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(
        body["messages"][0]["content"],
        "Translate the following text into es:\n\nHello"
    );
}

#[tokio::test]
async fn non_success_status_is_a_translation_error() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );

    let err = translator(serve(app).await)
        .translate("Hello", "es")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Translation(_)));
    assert!(err.to_string().contains("429"));
}

#[tokio::test]
async fn unparseable_body_is_an_http_error() {
    let app = Router::new().route("/chat/completions", post(|| async { "not json" }));

    let err = translator(serve(app).await)
        .translate("Hello", "es")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn empty_choices_resolve_to_empty_translation() {
    let app = Router::new().route(
        "/chat/completions",
        post(|| async { Json(serde_json::json!({"choices": []})) }),
    );

    let translation = translator(serve(app).await)
        .translate("Hello", "es")
        .await
        .unwrap();
    assert_eq!(translation, "");
}
