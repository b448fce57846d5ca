//! AI parenting-plan generation and the listing of prior generated plans.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use shared::{
    AiInsights, GeneratePlanRequest, GeneratePlanResponse, PlanListItem, PlanListResponse,
    PlanStatus,
};

use crate::ai::{prompt, response, AiError, PlanGenerator};
use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::child_service::ChildService;
use crate::domain::models::{format_age, ParentingPlan};
use crate::domain::{audit_service, RequestMeta};
use crate::error::AppError;
use crate::storage::plans;

/// Generated-plan listings are capped at the ten most recent.
const LIST_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AiPlanService {
    db: DbConnection,
    children: ChildService,
    generator: Option<Arc<dyn PlanGenerator>>,
}

impl AiPlanService {
    pub fn new(db: DbConnection, generator: Option<Arc<dyn PlanGenerator>>) -> Self {
        let children = ChildService::new(db.clone());
        Self { db, children, generator }
    }

    pub async fn generate(
        &self,
        caller: &AuthUser,
        request: GeneratePlanRequest,
        meta: &RequestMeta,
    ) -> Result<GeneratePlanResponse, AppError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }
        let child = self.children.owned_child(caller, &request.child_id).await?;
        let age_months = child.age_in_months();

        // Configuration is checked before any outbound work.
        let generator = self.generator.as_ref().ok_or(AiError::Misconfigured)?;

        let plan_prompt = prompt::parenting_plan(&child, age_months, &request);
        let reply = generator.generate(&plan_prompt).await?;
        let generated = response::parse(&reply)?;

        let now = Utc::now();
        let plan = ParentingPlan {
            id: uuid::Uuid::new_v4().to_string(),
            parent_id: child.parent_id.clone(),
            child_id: Some(child.id.clone()),
            family_id: child.family_id.clone(),
            title: generated.title.clone(),
            description: Some(generated.description.clone()),
            goals: serde_json::to_value(&generated.goals).map_err(anyhow::Error::from)?,
            strategies: serde_json::to_value(&generated.strategies).map_err(anyhow::Error::from)?,
            timeline: serde_json::to_value(&generated.timeline).map_err(anyhow::Error::from)?,
            status: PlanStatus::Draft,
            progress: 0,
            tags: vec![
                "ai-generated".to_string(),
                "personalized".to_string(),
                request.timeline.tag().to_string(),
            ],
            ai_prompts: Some(json!({
                "input": request,
                "childProfile": {
                    "name": child.name,
                    "age": age_months,
                    "interests": child.interests,
                },
                "generatedAt": now.to_rfc3339(),
            })),
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        plans::insert_plan(self.db.pool(), &plan).await?;

        let audit = audit_service::entry(
            Some(&child.parent_id),
            "AI_PLAN_GENERATE",
            "ParentingPlan",
            Some(&plan.id),
            Some(json!({
                "childId": child.id,
                "goals": request.parenting_goals,
                "aiGenerated": true,
            })),
            meta,
        );
        audit_service::record(&self.db, &audit).await?;

        tracing::info!(plan_id = %plan.id, child_id = %child.id, "AI plan generated");

        Ok(GeneratePlanResponse {
            plan: plan.summary(),
            ai_insights: AiInsights {
                activities: generated.activities,
                tips: generated.tips,
                personalized_for: child.name.clone(),
                age_appropriate: format_age(age_months),
            },
        })
    }

    /// Prior AI-generated plans for an owned child, newest first.
    pub async fn list_for_child(
        &self,
        caller: &AuthUser,
        child_id: &str,
    ) -> Result<PlanListResponse, AppError> {
        let child = self.children.owned_child(caller, child_id).await?;
        let listed = plans::list_for_parent(self.db.pool(), &child.parent_id).await?;
        let items = listed
            .into_iter()
            .filter(|p| p.child_id.as_deref() == Some(child.id.as_str()))
            .filter(|p| p.tags.iter().any(|t| t == "ai-generated"))
            .take(LIST_LIMIT)
            .map(|p| PlanListItem {
                id: p.id,
                title: p.title,
                description: p.description,
                status: p.status,
                progress: p.progress,
                created_at: p.created_at,
                child_name: Some(child.name.clone()),
                tags: p.tags,
            })
            .collect();
        Ok(PlanListResponse { plans: items })
    }
}
