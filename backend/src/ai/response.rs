//! Structured parsing of the model's plan reply.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AiError;

/// The JSON document the model is instructed to produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPlanResponse {
    pub title: String,
    pub description: String,
    pub goals: PlanGoals,
    pub strategies: PlanStrategies,
    /// Week-by-week (or phase-by-phase) schedule, keyed by label.
    pub timeline: BTreeMap<String, String>,
    pub activities: Vec<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanGoals {
    pub primary: String,
    #[serde(default)]
    pub secondary: Vec<String>,
    pub timeline: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStrategies {
    #[serde(default)]
    pub daily: Vec<String>,
    #[serde(default)]
    pub weekly: Vec<String>,
    #[serde(default)]
    pub monthly: Vec<String>,
}

/// Parse a model reply, tolerating a markdown code fence around the JSON but
/// nothing else. A reply that does not match the schema is an error, never a
/// synthesized plan.
pub fn parse(reply: &str) -> Result<AiPlanResponse, AiError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(AiError::Empty);
    }
    let body = strip_fence(trimmed);
    serde_json::from_str(body).map_err(|e| AiError::Malformed(e.to_string()))
}

fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the fence's language tag line, then the closing fence.
    let rest = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
