#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use relay_service::config::{GoogleConfig, ModelConfig, RelayConfig};
use relay_service::services::providers::mock::{MockBehavior, MockTextProvider};
use relay_service::{build_router, AppState};
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub fn test_config(api_base: &str) -> RelayConfig {
    RelayConfig {
        common: service_core::config::Config { port: 0 },
        models: ModelConfig {
            text_model: "gemini-2.0-flash".to_string(),
        },
        google: GoogleConfig {
            api_key: Secret::new("test-api-key".to_string()),
            api_base: api_base.to_string(),
            request_timeout_secs: 5,
        },
    }
}

/// Router backed by a scripted provider. The provider is returned so tests can
/// inspect the prompts it received.
pub fn app_with(behavior: MockBehavior) -> (Router, Arc<MockTextProvider>) {
    let provider = Arc::new(MockTextProvider::new(behavior));
    let state = AppState::new(provider.clone());
    (build_router(state), provider)
}

pub async fn post_raw(app: Router, content_type: Option<&str>, body: String) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("POST").uri("/ai-therapy/");
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }

    let response = app
        .oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
    post_raw(app, Some("application/json"), body.to_string()).await
}
