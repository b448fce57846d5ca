use chrono::{DateTime, Utc};
use shared::PlanStatus;

/// A parenting plan. Goals, strategies and timeline are structured JSON
/// blobs; AI-generated plans carry a provenance blob in `ai_prompts` and an
/// `ai-generated` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentingPlan {
    pub id: String,
    pub parent_id: String,
    pub child_id: Option<String>,
    pub family_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub goals: serde_json::Value,
    pub strategies: serde_json::Value,
    pub timeline: serde_json::Value,
    pub status: PlanStatus,
    pub progress: i32,
    pub tags: Vec<String>,
    pub ai_prompts: Option<serde_json::Value>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParentingPlan {
    /// Apply a progress update, enforcing the invariant that progress 100
    /// means COMPLETED.
    pub fn set_progress(&mut self, progress: i32) {
        self.progress = progress.clamp(0, 100);
        if self.progress >= 100 {
            self.status = PlanStatus::Completed;
            if self.completed_at.is_none() {
                self.completed_at = Some(Utc::now());
            }
        } else if self.status == PlanStatus::Draft || self.status == PlanStatus::Completed {
            self.status = PlanStatus::Active;
        }
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> shared::PlanSummary {
        shared::PlanSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            goals: self.goals.clone(),
            strategies: self.strategies.clone(),
            timeline: self.timeline.clone(),
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_plan() -> ParentingPlan {
        let now = Utc::now();
        ParentingPlan {
            id: "p1".into(),
            parent_id: "u1".into(),
            child_id: None,
            family_id: None,
            title: "Plan".into(),
            description: None,
            goals: serde_json::json!({}),
            strategies: serde_json::json!({}),
            timeline: serde_json::json!({}),
            status: PlanStatus::Draft,
            progress: 0,
            tags: vec![],
            ai_prompts: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn full_progress_completes_the_plan() {
        let mut plan = draft_plan();
        plan.set_progress(100);
        assert_eq!(plan.status, PlanStatus::Completed);
        assert!(plan.completed_at.is_some());
    }

    #[test]
    fn partial_progress_activates_a_draft() {
        let mut plan = draft_plan();
        plan.set_progress(40);
        assert_eq!(plan.status, PlanStatus::Active);
        assert_eq!(plan.progress, 40);
        assert!(plan.completed_at.is_none());
    }

    #[test]
    fn progress_is_clamped() {
        let mut plan = draft_plan();
        plan.set_progress(250);
        assert_eq!(plan.progress, 100);
        assert_eq!(plan.status, PlanStatus::Completed);
    }
}
