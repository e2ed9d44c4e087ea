use crate::models::ErrorDetail;
use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Failure outcome of a relay call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The provider declined the prompt; carries its block reason.
    #[error("Blocked due to: {0}")]
    ContentBlocked(String),

    /// Anything else; carries the underlying error message verbatim.
    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::ContentBlocked(_) => StatusCode::BAD_REQUEST,
            RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProviderError> for RelayError {
    fn from(err: ProviderError) -> Self {
        RelayError::Internal(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorDetail {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_blocked_is_400_with_reason() {
        let err = RelayError::ContentBlocked("SAFETY".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Blocked due to: SAFETY");
    }

    #[test]
    fn internal_is_500_with_raw_message() {
        let err = RelayError::from(ProviderError::NetworkError("connection refused".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Network error: connection refused");
    }
}
