//! The message relay: fixed persona prompt in front of one provider call.

use crate::models::RelayRequest;
use crate::services::error::RelayError;
use crate::services::providers::{ProviderError, TextProvider};
use std::sync::Arc;

/// Persona and behavioural guidelines placed before every conversation.
pub const COMPANION_PROMPT: &str = "You are a compassionate and supportive AI friend. \
Your goal is to listen to the user's concerns, acknowledge their feelings, and offer helpful and encouraging words.

When responding, keep the following in mind:
- Be empathetic, understanding and concise.
- Acknowledge the user's emotions (e.g., \"It sounds like you're feeling [emotion]\").
- Offer practical advice or coping mechanisms when appropriate.
- Don't offer the same advice again if the user has already received it.
- Be concise and avoid giving medical advice. If the user requires professional medical help, advise them to seek a professional.
Now, respond to the following user input:";

/// Turn marker the model continues from.
pub const ASSISTANT_TURN: &str = "AI Therapist: ";

/// Build the full prompt sent to the provider.
pub fn compose_prompt(message: &str, context: &str) -> String {
    format!(
        "{}\n\nCurrent conversation context: {}\n\nUser: {}\n{}",
        COMPANION_PROMPT, context, message, ASSISTANT_TURN
    )
}

/// Stateless relay over a shared provider. Cheap to clone.
#[derive(Clone)]
pub struct MessageRelay {
    provider: Arc<dyn TextProvider>,
}

impl MessageRelay {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Relay one message. Returns the provider's text untouched, or one of the two
    /// failure kinds. Internal failures are logged before they are returned.
    pub async fn handle(&self, request: &RelayRequest) -> Result<String, RelayError> {
        let prompt = compose_prompt(&request.message, &request.context);

        match self.generate(&prompt).await {
            Ok(text) => Ok(text),
            Err(RelayError::ContentBlocked(reason)) => {
                tracing::warn!(
                    model = %self.provider.model(),
                    block_reason = %reason,
                    "Provider blocked the prompt"
                );
                Err(RelayError::ContentBlocked(reason))
            }
            Err(RelayError::Internal(message)) => {
                tracing::error!(
                    model = %self.provider.model(),
                    error = %message,
                    "Error during AI processing"
                );
                Err(RelayError::Internal(message))
            }
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, RelayError> {
        let response = self.provider.generate(prompt).await?;

        if let Some(reason) = response.block_reason {
            return Err(RelayError::ContentBlocked(reason));
        }

        let text = response
            .text
            .ok_or_else(|| ProviderError::EmptyResponse(response.finish_reason.to_string()))?;

        tracing::debug!(
            model = %self.provider.model(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = %response.finish_reason,
            "Generation complete"
        );

        Ok(text)
    }

    pub async fn provider_health(&self) -> Result<(), ProviderError> {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::{MockBehavior, MockTextProvider};

    fn relay_with(behavior: MockBehavior) -> (MessageRelay, Arc<MockTextProvider>) {
        let provider = Arc::new(MockTextProvider::new(behavior));
        (MessageRelay::new(provider.clone()), provider)
    }

    fn request(message: &str, context: &str) -> RelayRequest {
        RelayRequest {
            message: message.to_string(),
            context: context.to_string(),
        }
    }

    #[test]
    fn prompt_orders_preamble_context_message_turn() {
        let prompt = compose_prompt("I can't sleep", "User: hi\nAI: hello");

        let preamble = prompt.find("compassionate and supportive").unwrap();
        let context = prompt.find("User: hi\nAI: hello").unwrap();
        let message = prompt.find("User: I can't sleep").unwrap();

        assert!(preamble < context && context < message);
        assert!(prompt.ends_with("\nAI Therapist: "));
    }

    #[test]
    fn prompt_with_empty_context_keeps_section() {
        let prompt = compose_prompt("hello", "");
        assert!(prompt.contains("Current conversation context: \n\nUser: hello\n"));
    }

    #[tokio::test]
    async fn success_returns_text_verbatim() {
        let text = "  It sounds like you're feeling anxious — that's completely valid...\n";
        let (relay, _) = relay_with(MockBehavior::Reply(text.to_string()));

        let result = relay.handle(&request("I feel anxious today", "")).await;

        assert_eq!(result, Ok(text.to_string()));
    }

    #[tokio::test]
    async fn block_reason_wins_over_text() {
        let (relay, _) = relay_with(MockBehavior::Block("SAFETY".to_string()));

        let result = relay.handle(&request("something", "")).await;

        assert_eq!(result, Err(RelayError::ContentBlocked("SAFETY".to_string())));
    }

    #[tokio::test]
    async fn provider_error_becomes_internal_with_its_message() {
        let (relay, _) = relay_with(MockBehavior::Fail("quota exhausted".to_string()));

        let result = relay.handle(&request("hi", "")).await;

        assert_eq!(
            result,
            Err(RelayError::Internal(
                ProviderError::ApiError("quota exhausted".to_string()).to_string()
            ))
        );
    }

    #[tokio::test]
    async fn missing_text_becomes_internal() {
        let (relay, _) = relay_with(MockBehavior::Empty);

        let err = relay.handle(&request("hi", "")).await.unwrap_err();

        assert!(matches!(err, RelayError::Internal(ref m) if m.contains("no text")));
    }

    #[tokio::test]
    async fn empty_message_is_forwarded() {
        let (relay, provider) = relay_with(MockBehavior::Reply("ok".to_string()));

        relay.handle(&request("", "")).await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], compose_prompt("", ""));
    }
}
