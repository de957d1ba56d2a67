use async_trait::async_trait;

use redpen_core::{ChatProvider, ChatRequest, ChatResponse, ProviderError};

/// Failure modes a [`MockChatProvider`] can simulate.
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    Unauthorized,
    PaymentRequired,
    RateLimited,
    Transport,
}

/// A mock chat provider that returns canned responses or canned failures.
pub struct MockChatProvider {
    name: String,
    response: Option<String>,
    fail_with: Option<MockFailure>,
}

impl MockChatProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: None,
            fail_with: None,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn failing_with(mut self, failure: MockFailure) -> Self {
        self.fail_with = Some(failure);
        self
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        if let Some(failure) = self.fail_with {
            return Err(match failure {
                MockFailure::Unauthorized => ProviderError::Unauthorized,
                MockFailure::PaymentRequired => ProviderError::PaymentRequired,
                MockFailure::RateLimited => ProviderError::RateLimited,
                MockFailure::Transport => {
                    ProviderError::Transport("connection refused".to_string())
                }
            });
        }

        Ok(ChatResponse {
            content: self
                .response
                .clone()
                .unwrap_or_else(|| "Mock response".to_string()),
            model: request.model.clone(),
            tokens_used: 0,
            latency_ms: 0,
        })
    }
}
