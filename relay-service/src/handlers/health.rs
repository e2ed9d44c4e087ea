use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use service_core::error::AppError;

/// Liveness probe. Reports unavailable when the provider check fails.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.relay.provider_health().await.map_err(|e| {
        tracing::error!(error = %e, "Provider health check failed");
        AppError::ServiceUnavailable
    })?;

    Ok(Json(json!({
        "status": "ok",
        "service": "relay-service",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.relay.model(),
    })))
}
