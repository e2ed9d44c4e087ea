//! Mock provider implementation for testing.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock returns from `generate`.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Generate this text.
    Reply(String),
    /// Refuse the prompt with this block reason.
    Block(String),
    /// Fail with `ProviderError::ApiError` carrying this message.
    Fail(String),
    /// Succeed without any text, as a safety-stopped candidate does.
    Empty,
}

/// Rough four-bytes-per-token estimate, saturating at `i32::MAX`.
fn estimate_tokens(text: &str) -> i32 {
    i32::try_from(text.len() / 4).unwrap_or(i32::MAX)
}

/// Mock text provider for testing. Records every prompt it receives.
pub struct MockTextProvider {
    behavior: MockBehavior,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let input_tokens = estimate_tokens(prompt);

        match &self.behavior {
            MockBehavior::Reply(text) => Ok(ProviderResponse {
                text: Some(text.clone()),
                block_reason: None,
                input_tokens,
                output_tokens: estimate_tokens(text),
                finish_reason: FinishReason::Complete,
            }),
            MockBehavior::Block(reason) => Ok(ProviderResponse {
                text: None,
                block_reason: Some(reason.clone()),
                input_tokens,
                output_tokens: 0,
                finish_reason: FinishReason::ContentFilter,
            }),
            MockBehavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
            MockBehavior::Empty => Ok(ProviderResponse {
                text: None,
                block_reason: None,
                input_tokens,
                output_tokens: 0,
                finish_reason: FinishReason::ContentFilter,
            }),
        }
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Fail(message) => Err(ProviderError::ApiError(message.clone())),
            _ => Ok(()),
        }
    }
}
