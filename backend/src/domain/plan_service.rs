//! Parenting-plan listing and progress updates. Generation lives in
//! [`crate::domain::ai_plan_service`].

use shared::{PlanListItem, PlanListResponse, PlanStatus, UpdatePlanProgressRequest};

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::error::AppError;
use crate::storage::{children, plans};

#[derive(Clone)]
pub struct PlanService {
    db: DbConnection,
}

impl PlanService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// All of the caller's plans, newest first, optionally filtered by
    /// status. Child names are resolved for display.
    pub async fn list(
        &self,
        caller: &AuthUser,
        status: Option<PlanStatus>,
    ) -> Result<PlanListResponse, AppError> {
        let listed = plans::list_for_parent(self.db.pool(), &caller.id).await?;
        let mut items = Vec::with_capacity(listed.len());
        for plan in listed {
            if status.map_or(false, |want| plan.status != want) {
                continue;
            }
            let child_name = match &plan.child_id {
                Some(child_id) => children::find_by_id(self.db.pool(), child_id)
                    .await?
                    .map(|c| c.name),
                None => None,
            };
            items.push(PlanListItem {
                id: plan.id,
                title: plan.title,
                description: plan.description,
                status: plan.status,
                progress: plan.progress,
                created_at: plan.created_at,
                child_name,
                tags: plan.tags,
            });
        }
        Ok(PlanListResponse { plans: items })
    }

    /// Apply a progress update. Reaching 100 completes the plan and stamps
    /// `completed_at`.
    pub async fn update_progress(
        &self,
        caller: &AuthUser,
        plan_id: &str,
        request: UpdatePlanProgressRequest,
    ) -> Result<PlanListItem, AppError> {
        let mut plan = plans::find_by_id(self.db.pool(), plan_id)
            .await?
            .ok_or(AppError::NotFound("Plan"))?;
        if plan.parent_id != caller.id && caller.role != shared::UserRole::Admin {
            return Err(AppError::NotFound("Plan"));
        }
        if !(0..=100).contains(&request.progress) {
            return Err(AppError::invalid_field(
                "progress",
                "Progress must be between 0 and 100",
            ));
        }

        plan.set_progress(request.progress);
        plans::update_progress(self.db.pool(), &plan).await?;
        tracing::info!(plan_id = %plan.id, progress = plan.progress, status = ?plan.status, "plan progress updated");

        Ok(PlanListItem {
            id: plan.id,
            title: plan.title,
            description: plan.description,
            status: plan.status,
            progress: plan.progress,
            created_at: plan.created_at,
            child_name: None,
            tags: plan.tags,
        })
    }

}
