use anyhow::Result;
use async_trait::async_trait;

use crate::error::ProviderError;

/// Request to a chat-completions provider.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from a chat-completions provider.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub model: String,
    pub tokens_used: u64,
    pub latency_ms: u64,
}

/// Trait for chat-completions providers used by the grading client.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name (e.g., "deepseek").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    ///
    /// Failures are classified by status so the caller can pick between
    /// surfacing a fatal error and degrading to the fallback generator.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Trait for text-recognition engines consumed by the extractor.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Engine name (e.g., "tesseract").
    fn name(&self) -> &str;

    /// Recognize text in one encoded image (PNG bytes).
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}
