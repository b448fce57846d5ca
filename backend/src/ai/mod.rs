//! Hosted-LLM plan generation behind a trait, so the domain layer and tests
//! never touch the network directly.

pub mod openai;
pub mod prompt;
pub mod response;

use async_trait::async_trait;

use crate::error::AppError;

pub use openai::OpenAiGenerator;
pub use prompt::PlanPrompt;
pub use response::AiPlanResponse;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI generation is not configured")]
    Misconfigured,

    #[error("AI request failed: {0}")]
    Request(String),

    #[error("AI returned an empty reply")]
    Empty,

    #[error("AI reply could not be parsed: {0}")]
    Malformed(String),
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

/// Produces the raw text reply for a plan prompt.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, prompt: &PlanPrompt) -> Result<String, AiError>;
}
