//! Chat-completion client for any OpenAI-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{AiError, PlanGenerator, PlanPrompt};
use crate::config::OpenAiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 2000;

pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiGenerator {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AiError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PlanGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &PlanPrompt) -> Result<String, AiError> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Request(format!("{status}: {detail}")));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AiError::Request(format!("invalid completion body: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::Empty)
    }
}
