//! Milestone tracking for owned children.

use chrono::Utc;
use shared::{CompleteMilestoneRequest, CreateMilestoneRequest, MilestoneView};

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::child_service::ChildService;
use crate::domain::models::Milestone;
use crate::error::AppError;
use crate::storage::milestones;

#[derive(Clone)]
pub struct MilestoneService {
    db: DbConnection,
    children: ChildService,
}

impl MilestoneService {
    pub fn new(db: DbConnection) -> Self {
        let children = ChildService::new(db.clone());
        Self { db, children }
    }

    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateMilestoneRequest,
    ) -> Result<MilestoneView, AppError> {
        if request.title.trim().is_empty() {
            return Err(AppError::invalid_field("title", "Title is required"));
        }
        if request.age_range_min < 0 || request.age_range_max < request.age_range_min {
            return Err(AppError::invalid_field(
                "ageRangeMax",
                "Age range must be a non-negative, ordered pair of months",
            ));
        }
        let child = self.children.owned_child(caller, &request.child_id).await?;

        let milestone = Milestone::new(
            &child.id,
            request.title.trim(),
            request.description.trim(),
            request.category,
            request.age_range_min,
            request.age_range_max,
        );
        milestones::insert_milestone(self.db.pool(), &milestone).await?;
        Ok(milestone.view())
    }

    /// Milestones for an owned child, ordered by age-range start, optionally
    /// filtered by completion.
    pub async fn list(
        &self,
        caller: &AuthUser,
        child_id: &str,
        completed: Option<bool>,
    ) -> Result<Vec<MilestoneView>, AppError> {
        let child = self.children.owned_child(caller, child_id).await?;
        let listed = milestones::list_for_child(self.db.pool(), &child.id).await?;
        Ok(listed
            .iter()
            .filter(|m| completed.map_or(true, |want| m.is_completed == want))
            .map(Milestone::view)
            .collect())
    }

    pub async fn complete(
        &self,
        caller: &AuthUser,
        milestone_id: &str,
        request: CompleteMilestoneRequest,
    ) -> Result<MilestoneView, AppError> {
        let milestone = milestones::find_by_id(self.db.pool(), milestone_id)
            .await?
            .ok_or(AppError::NotFound("Milestone"))?;
        // Ownership check goes through the child row.
        self.children.owned_child(caller, &milestone.child_id).await?;

        milestones::mark_completed(
            self.db.pool(),
            &milestone.id,
            Utc::now(),
            request.notes.as_deref(),
        )
        .await?;

        let updated = milestones::find_by_id(self.db.pool(), &milestone.id)
            .await?
            .ok_or(AppError::NotFound("Milestone"))?;
        tracing::info!(milestone_id = %updated.id, child_id = %updated.child_id, "milestone completed");
        Ok(updated.view())
    }
}
