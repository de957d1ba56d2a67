use std::sync::Arc;

use tracing::{info, warn};

use redpen_core::{
    ChatProvider, ChatRequest, FallbackReason, GradeOutcome, ProviderError, RedpenError,
};

use crate::fallback::mock_grading_result;
use crate::prompt::{build_grading_prompt, MAX_TOKENS, SYSTEM_PERSONA, TEMPERATURE};

/// The grading client: one essay text in, one [`GradeOutcome`] out.
///
/// Running without a provider is the designed offline mode, where every
/// essay resolves to the deterministic generator. With a provider, endpoint
/// failures either degrade to the generator or surface as user-fatal
/// errors, per status.
pub struct EssayGrader {
    provider: Option<Arc<dyn ChatProvider>>,
    model: String,
}

impl EssayGrader {
    pub fn new(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            model: model.into(),
        }
    }

    /// Grader with no credential configured.
    pub fn offline() -> Self {
        Self {
            provider: None,
            model: String::new(),
        }
    }

    pub async fn grade(&self, essay: &str) -> Result<GradeOutcome, RedpenError> {
        let Some(provider) = &self.provider else {
            info!("No API credential configured, using the offline generator");
            return Ok(GradeOutcome::Fallback {
                payload: mock_grading_result(essay),
                reason: FallbackReason::MissingApiKey,
            });
        };

        let request = ChatRequest {
            model: self.model.clone(),
            system_prompt: SYSTEM_PERSONA.to_string(),
            user_prompt: build_grading_prompt(essay),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        info!(
            provider = provider.name(),
            model = %self.model,
            essay_chars = essay.chars().count(),
            "Requesting essay grading"
        );

        match provider.complete(&request).await {
            Ok(response) => {
                info!(
                    tokens = response.tokens_used,
                    latency_ms = response.latency_ms,
                    "Grading response received"
                );
                match crate::parse::parse_grading_response(&response.content, essay) {
                    Ok(payload) => Ok(GradeOutcome::Graded(payload)),
                    Err(e) => {
                        warn!(error = %e, "Unparsable grading response, using the offline generator");
                        Ok(GradeOutcome::Fallback {
                            payload: mock_grading_result(essay),
                            reason: FallbackReason::MalformedResponse,
                        })
                    }
                }
            }
            Err(ProviderError::Unauthorized) => Err(RedpenError::InvalidApiKey),
            Err(ProviderError::RateLimited) => Err(RedpenError::RateLimited),
            Err(ProviderError::PaymentRequired) => {
                warn!("Endpoint quota exhausted, using the offline generator");
                Ok(GradeOutcome::Fallback {
                    payload: mock_grading_result(essay),
                    reason: FallbackReason::QuotaExhausted,
                })
            }
            Err(e) => {
                warn!(error = %e, "Completion call failed, using the offline generator");
                Ok(GradeOutcome::Fallback {
                    payload: mock_grading_result(essay),
                    reason: FallbackReason::Transport,
                })
            }
        }
    }
}
