//! Assessments for owned children and the shared content library.

use chrono::Utc;
use shared::{
    AssessmentView, ContentView, CreateAssessmentRequest, CreateContentRequest,
    SubscriptionTier, UserRole,
};

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::child_service::ChildService;
use crate::domain::models::{ChildAssessment, ContentItem};
use crate::error::AppError;
use crate::storage::{assessments, content};

#[derive(Clone)]
pub struct LibraryService {
    db: DbConnection,
    children: ChildService,
}

impl LibraryService {
    pub fn new(db: DbConnection) -> Self {
        let children = ChildService::new(db.clone());
        Self { db, children }
    }

    pub async fn create_assessment(
        &self,
        caller: &AuthUser,
        child_id: &str,
        request: CreateAssessmentRequest,
    ) -> Result<AssessmentView, AppError> {
        if request.title.trim().is_empty() {
            return Err(AppError::invalid_field("title", "Title is required"));
        }
        let child = self.children.owned_child(caller, child_id).await?;

        let assessment = ChildAssessment {
            id: uuid::Uuid::new_v4().to_string(),
            child_id: child.id,
            title: request.title.trim().to_string(),
            assessment_type: request.assessment_type,
            questions: request.questions,
            scores: request.scores,
            created_at: Utc::now(),
        };
        assessments::insert_assessment(self.db.pool(), &assessment).await?;
        Ok(assessment.view())
    }

    pub async fn list_assessments(
        &self,
        caller: &AuthUser,
        child_id: &str,
    ) -> Result<Vec<AssessmentView>, AppError> {
        let child = self.children.owned_child(caller, child_id).await?;
        let listed = assessments::list_for_child(self.db.pool(), &child.id).await?;
        Ok(listed.iter().map(ChildAssessment::view).collect())
    }

    pub async fn create_content(
        &self,
        caller: &AuthUser,
        request: CreateContentRequest,
    ) -> Result<ContentView, AppError> {
        caller.require_role(UserRole::Admin)?;
        if request.title.trim().is_empty() {
            return Err(AppError::invalid_field("title", "Title is required"));
        }

        let item = ContentItem {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.trim().to_string(),
            content_type: request.content_type,
            body: request.body,
            tags: request.tags,
            is_premium: request.is_premium,
            created_at: Utc::now(),
        };
        content::insert_item(self.db.pool(), &item).await?;
        Ok(item.view())
    }

    /// Library listing; premium items only for premium-tier callers.
    pub async fn list_content(&self, caller: &AuthUser) -> Result<Vec<ContentView>, AppError> {
        let include_premium = caller.subscription_tier >= SubscriptionTier::Premium;
        let listed = content::list_items(self.db.pool(), include_premium).await?;
        Ok(listed.iter().map(ContentItem::view).collect())
    }
}
