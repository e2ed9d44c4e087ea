//! Wire types for the relay endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /ai-therapy/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayRequest {
    pub message: String,
    /// Prior conversation supplied by the caller. Absent means empty.
    #[serde(default)]
    pub context: String,
}

/// Successful reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub response: String,
}

/// Error body shared by every non-2xx relay response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_context_defaults_to_empty() {
        let request: RelayRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(request.context, "");
    }

    #[test]
    fn missing_message_is_rejected() {
        assert!(serde_json::from_str::<RelayRequest>(r#"{"context":"x"}"#).is_err());
    }
}
