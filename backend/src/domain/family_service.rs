//! Joining an existing family by code, outside the onboarding flow.

use shared::FamilySummary;

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::models::FamilyMember;
use crate::error::AppError;
use crate::storage::families;

#[derive(Clone)]
pub struct FamilyService {
    db: DbConnection,
}

impl FamilyService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn join_by_code(
        &self,
        caller: &AuthUser,
        code: &str,
    ) -> Result<FamilySummary, AppError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::invalid_field("familyCode", "Family code is required"));
        }

        let family = families::find_by_code(self.db.pool(), code)
            .await?
            .ok_or(AppError::NotFound("Family"))?;

        if let Some(existing) = families::find_membership(self.db.pool(), &caller.id).await? {
            if existing.family_id == family.id {
                return Err(AppError::invalid_field(
                    "familyCode",
                    "You are already a member of this family",
                ));
            }
        }

        let member = FamilyMember::new(&family.id, &caller.id, "parent", false);
        families::insert_member(self.db.pool(), &member).await?;
        tracing::info!(family_id = %family.id, user_id = %caller.id, "joined family");

        Ok(family.summary())
    }

    pub async fn current(&self, caller: &AuthUser) -> Result<Option<FamilySummary>, AppError> {
        let Some(membership) = families::find_membership(self.db.pool(), &caller.id).await? else {
            return Ok(None);
        };
        let family = families::find_by_id(self.db.pool(), &membership.family_id)
            .await?
            .ok_or(AppError::NotFound("Family"))?;
        Ok(Some(family.summary()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionClaims;
    use crate::domain::models::{Family, User};
    use shared::{SubscriptionTier, UserRole};

    fn claims(id: &str) -> AuthUser {
        SessionClaims {
            id: id.into(),
            role: UserRole::Parent,
            subscription_tier: SubscriptionTier::Free,
            timezone: "UTC".into(),
            language: "en".into(),
            onboarding_completed: true,
            exp: i64::MAX,
        }
    }

    #[tokio::test]
    async fn join_and_current() {
        let db = DbConnection::init_test().await.unwrap();
        let user = User::new("p@t.dev", None);
        crate::storage::users::insert_user(db.pool(), &user).await.unwrap();
        let family = Family::new("The Riveras", "AB12CD".into(), serde_json::json!({}));
        families::insert_family(db.pool(), &family).await.unwrap();

        let service = FamilyService::new(db.clone());
        let caller = claims(&user.id);

        assert!(service.current(&caller).await.unwrap().is_none());

        let joined = service.join_by_code(&caller, " AB12CD ").await.unwrap();
        assert_eq!(joined.id, family.id);
        assert_eq!(service.current(&caller).await.unwrap().unwrap().id, family.id);

        // Joining the same family twice is rejected.
        let result = service.join_by_code(&caller, "AB12CD").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let db = DbConnection::init_test().await.unwrap();
        let user = User::new("p@t.dev", None);
        crate::storage::users::insert_user(db.pool(), &user).await.unwrap();
        let service = FamilyService::new(db);
        let result = service.join_by_code(&claims(&user.id), "NOSUCH").await;
        assert!(matches!(result, Err(AppError::NotFound("Family"))));
    }
}
