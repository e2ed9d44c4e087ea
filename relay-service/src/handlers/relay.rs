use crate::models::{ErrorDetail, RelayRequest, RelayResponse};
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

/// `POST /ai-therapy/`
///
/// Body problems (not JSON, missing `message`, wrong types, a non-JSON content
/// type) are answered with 422 before anything reaches the provider. A body sent
/// without any `Content-Type` is still read as JSON. Everything else is decided by
/// the relay.
pub async fn ai_therapy(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = match decode_body(&headers, &body) {
        Ok(request) => request,
        Err(detail) => {
            tracing::debug!(error = %detail, "Rejected request body");
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorDetail { detail }))
                .into_response();
        }
    };

    match state.relay.handle(&request).await {
        Ok(text) => Json(RelayResponse { response: text }).into_response(),
        Err(e) => e.into_response(),
    }
}

fn decode_body(headers: &HeaderMap, body: &[u8]) -> Result<RelayRequest, String> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        if !is_json_content_type(content_type.to_str().unwrap_or_default()) {
            return Err("Expected request with `Content-Type: application/json`".to_string());
        }
    }

    Json::<RelayRequest>::from_bytes(body)
        .map(|Json(request)| request)
        .map_err(|rejection| rejection.body_text())
}

/// `application/json` or any `+json` structured suffix, parameters ignored.
fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Fallback for known routes hit with an unsupported method.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorDetail {
            detail: "Method Not Allowed".to_string(),
        }),
    )
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorDetail {
            detail: "Not Found".to_string(),
        }),
    )
}
