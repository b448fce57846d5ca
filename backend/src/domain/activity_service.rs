//! Activity catalog and per-child activity logging.

use chrono::Utc;
use shared::{
    ActivityDifficulty, ActivityType, ActivityView, CreateActivityRequest, LogActivityRequest,
    SubscriptionTier, UserRole,
};

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::child_service::ChildService;
use crate::domain::models::{Activity, ActivityLog};
use crate::error::AppError;
use crate::storage::activities;

/// Filters for the catalog listing. All optional; age scoping comes from the
/// child the caller asks about.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub activity_type: Option<ActivityType>,
    pub difficulty: Option<ActivityDifficulty>,
    pub max_duration: Option<i32>,
}

#[derive(Clone)]
pub struct ActivityService {
    db: DbConnection,
    children: ChildService,
}

impl ActivityService {
    pub fn new(db: DbConnection) -> Self {
        let children = ChildService::new(db.clone());
        Self { db, children }
    }

    /// Add a catalog entry. Admin only.
    pub async fn create(
        &self,
        caller: &AuthUser,
        request: CreateActivityRequest,
    ) -> Result<ActivityView, AppError> {
        caller.require_role(UserRole::Admin)?;
        if request.title.trim().is_empty() {
            return Err(AppError::invalid_field("title", "Title is required"));
        }
        if request.duration <= 0 {
            return Err(AppError::invalid_field("duration", "Duration must be positive minutes"));
        }

        let now = Utc::now();
        let activity = Activity {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.trim().to_string(),
            description: request.description,
            instructions: request.instructions,
            age_range_min: request.age_range_min,
            age_range_max: request.age_range_max,
            duration: request.duration,
            difficulty: request.difficulty,
            activity_type: request.activity_type,
            materials: request.materials,
            tags: request.tags,
            is_premium: request.is_premium,
            created_at: now,
            updated_at: now,
        };
        activities::insert_activity(self.db.pool(), &activity).await?;
        Ok(activity.view())
    }

    /// Age-appropriate catalog for an owned child. Premium entries appear
    /// only for premium-tier callers.
    pub async fn list_for_child(
        &self,
        caller: &AuthUser,
        child_id: &str,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityView>, AppError> {
        let child = self.children.owned_child(caller, child_id).await?;
        let include_premium = caller.subscription_tier >= SubscriptionTier::Premium;
        let listed = activities::list_catalog(
            self.db.pool(),
            Some(child.age_in_months()),
            include_premium,
        )
        .await?;

        Ok(listed
            .iter()
            .filter(|a| filter.activity_type.map_or(true, |t| a.activity_type == t))
            .filter(|a| filter.difficulty.map_or(true, |d| a.difficulty == d))
            .filter(|a| filter.max_duration.map_or(true, |max| a.duration <= max))
            .map(Activity::view)
            .collect())
    }

    /// Record an occurrence of an activity with an owned child.
    pub async fn log(
        &self,
        caller: &AuthUser,
        request: LogActivityRequest,
    ) -> Result<String, AppError> {
        let child = self.children.owned_child(caller, &request.child_id).await?;
        activities::find_by_id(self.db.pool(), &request.activity_id)
            .await?
            .ok_or(AppError::NotFound("Activity"))?;

        for (field, value) in [("enjoyment", request.enjoyment), ("difficulty", request.difficulty)]
        {
            if let Some(rating) = value {
                if !(1..=5).contains(&rating) {
                    return Err(AppError::invalid_field(field, "Rating must be between 1 and 5"));
                }
            }
        }

        let log = ActivityLog {
            id: uuid::Uuid::new_v4().to_string(),
            activity_id: request.activity_id,
            child_id: child.id.clone(),
            user_id: caller.id.clone(),
            completed_at: Utc::now(),
            duration: request.duration,
            enjoyment: request.enjoyment,
            difficulty: request.difficulty,
            notes: request.notes,
            observations: request.observations,
            skills: request.skills,
            created_at: Utc::now(),
        };
        activities::insert_log(self.db.pool(), &log).await?;
        tracing::info!(child_id = %child.id, activity_id = %log.activity_id, "activity logged");
        Ok(log.id)
    }
}
