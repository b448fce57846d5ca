//! The one-time onboarding submission: profile update, family create-or-join,
//! first child, welcome notification, and audit row, all in one transaction.

use anyhow::Context;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use shared::{FamilySetup, Gender, OnboardingRequest, OnboardingResponse};

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::models::{Child, Family, FamilyMember, Notification};
use crate::domain::{audit_service, RequestMeta};
use crate::error::AppError;
use crate::storage::{children, families, notifications, users};

#[derive(Clone)]
pub struct OnboardingService {
    db: DbConnection,
}

impl OnboardingService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    pub async fn complete(
        &self,
        caller: &AuthUser,
        request: OnboardingRequest,
        meta: &RequestMeta,
    ) -> Result<OnboardingResponse, AppError> {
        let errors = request.validate();
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }
        let date_of_birth = NaiveDate::parse_from_str(&request.child_date_of_birth, "%Y-%m-%d")
            .map_err(|_| {
                AppError::invalid_field("childDateOfBirth", "Date of birth must be YYYY-MM-DD")
            })?;

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .context("failed to open onboarding transaction")?;

        let user = users::find_by_id(&mut *tx, &caller.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let preferences = json!({
            "shareProgress": request.privacy_settings.share_progress,
            "allowAnalytics": request.privacy_settings.allow_analytics,
            "emailNotifications": request.privacy_settings.email_notifications,
        });
        users::update_profile(
            &mut *tx,
            &user.id,
            request.name.trim(),
            request.timezone.trim(),
            &preferences,
            true,
        )
        .await?;

        let family = match request.family_setup {
            FamilySetup::Create => {
                let mut rng = StdRng::from_entropy();
                let code = families::allocate_family_code(&mut tx, &mut rng).await?;
                let name = request
                    .family_name
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}'s Family", request.name.trim()));
                let family = Family::new(
                    &name,
                    code,
                    json!({ "shareProgress": request.privacy_settings.share_progress }),
                );
                families::insert_family(&mut *tx, &family).await?;
                families::insert_member(
                    &mut *tx,
                    &FamilyMember::new(&family.id, &user.id, "parent", true),
                )
                .await?;
                family
            }
            FamilySetup::Join => {
                let code = request.family_code.as_deref().unwrap_or_default().trim();
                let family = families::find_by_code(&mut *tx, code)
                    .await?
                    .ok_or(AppError::NotFound("Family"))?;
                families::insert_member(
                    &mut *tx,
                    &FamilyMember::new(&family.id, &user.id, "parent", false),
                )
                .await?;
                family
            }
        };

        let mut child = Child::new(&user.id, request.child_name.trim(), date_of_birth);
        child.family_id = Some(family.id.clone());
        child.gender = request.child_gender.unwrap_or(Gender::PreferNotToSay);
        child.interests = request.child_interests.clone();
        children::insert_child(&mut *tx, &child).await?;

        let welcome = Notification::new(
            &user.id,
            shared::NotificationType::SystemNotification,
            "Welcome to ParentWise!",
            &format!(
                "Welcome {}! Your account is set up and ready to go. Explore activities for {} \
                 and create your first parenting plan.",
                request.name.trim(),
                child.name
            ),
            json!({ "childId": child.id, "onboarding": true }),
        );
        notifications::insert_notification(&mut *tx, &welcome).await?;

        let audit = audit_service::entry(
            Some(&user.id),
            "ONBOARDING_COMPLETE",
            "User",
            Some(&user.id),
            Some(json!({
                "familySetup": request.family_setup,
                "childName": child.name,
                "familyId": family.id,
            })),
            meta,
        );
        audit_service::record_in(&mut tx, &audit).await?;

        let user = users::find_by_id(&mut *tx, &user.id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        tx.commit()
            .await
            .context("failed to commit onboarding transaction")?;

        tracing::info!(
            user_id = %user.id,
            family_id = %family.id,
            child_id = %child.id,
            "onboarding completed"
        );

        Ok(OnboardingResponse {
            user: user.summary(),
            family: Some(family.summary()),
            child: child.summary(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionClaims;
    use crate::domain::models::User;
    use shared::PrivacySettings;

    fn claims_for(user: &User) -> AuthUser {
        SessionClaims {
            id: user.id.clone(),
            role: user.role,
            subscription_tier: user.subscription_tier,
            timezone: user.timezone.clone(),
            language: user.language.clone(),
            onboarding_completed: user.onboarding_completed,
            exp: i64::MAX,
        }
    }

    fn base_request() -> OnboardingRequest {
        OnboardingRequest {
            name: "Ana".into(),
            timezone: "Europe/Madrid".into(),
            family_setup: FamilySetup::Create,
            family_name: None,
            family_code: None,
            child_name: "Leo".into(),
            child_date_of_birth: "2022-08-01".into(),
            child_gender: Some(Gender::Male),
            child_interests: vec!["music".into()],
            privacy_settings: PrivacySettings {
                share_progress: true,
                allow_analytics: false,
                email_notifications: true,
            },
            accept_terms: true,
        }
    }

    async fn seeded(db: &DbConnection) -> User {
        let user = User::new("ana@example.com", None);
        crate::storage::users::insert_user(db.pool(), &user).await.unwrap();
        user
    }

    #[tokio::test]
    async fn create_path_materializes_everything() {
        let db = DbConnection::init_test().await.unwrap();
        let user = seeded(&db).await;
        let service = OnboardingService::new(db.clone());

        let response = service
            .complete(&claims_for(&user), base_request(), &RequestMeta::default())
            .await
            .unwrap();

        assert_eq!(response.user.name.as_deref(), Some("Ana"));
        assert!(response.user.onboarding_completed);
        let family = response.family.unwrap();
        assert_eq!(family.name, "Ana's Family");
        assert_eq!(family.family_code.len(), 6);
        assert!(family
            .family_code
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        assert_eq!(response.child.name, "Leo");

        // Exactly one owning membership, held by the submitter.
        let membership = crate::storage::families::find_membership(db.pool(), &user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.family_id, family.id);
        assert!(membership.is_owner);

        // One welcome notification and one audit row.
        let unread = crate::storage::notifications::list_for_user(db.pool(), &user.id, true)
            .await
            .unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "Welcome to ParentWise!");
        let audit = crate::storage::audit::list_recent(db.pool(), Some(&user.id), None, None, 10)
            .await
            .unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, "ONBOARDING_COMPLETE");
    }

    #[tokio::test]
    async fn join_with_unknown_code_leaves_no_partial_state() {
        let db = DbConnection::init_test().await.unwrap();
        let user = seeded(&db).await;
        let service = OnboardingService::new(db.clone());

        let mut request = base_request();
        request.family_setup = FamilySetup::Join;
        request.family_code = Some("NOSUCH".into());

        let result = service
            .complete(&claims_for(&user), request, &RequestMeta::default())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        // The profile update rolled back with the rest.
        let fetched = crate::storage::users::find_by_id(db.pool(), &user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!fetched.onboarding_completed);
        assert!(fetched.name.is_none());
        assert!(crate::storage::children::list_for_parent(db.pool(), &user.id)
            .await
            .unwrap()
            .is_empty());
        assert!(crate::storage::families::find_membership(db.pool(), &user.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn join_with_known_code_attaches_to_the_family() {
        let db = DbConnection::init_test().await.unwrap();
        let owner = User::new("owner@example.com", None);
        crate::storage::users::insert_user(db.pool(), &owner).await.unwrap();
        let family = Family::new("The Riveras", "AB12CD".into(), json!({}));
        crate::storage::families::insert_family(db.pool(), &family).await.unwrap();

        let user = seeded(&db).await;
        let service = OnboardingService::new(db.clone());
        let mut request = base_request();
        request.family_setup = FamilySetup::Join;
        request.family_code = Some("AB12CD".into());

        let response = service
            .complete(&claims_for(&user), request, &RequestMeta::default())
            .await
            .unwrap();
        assert_eq!(response.family.unwrap().id, family.id);

        let membership = crate::storage::families::find_membership(db.pool(), &user.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!membership.is_owner);
    }

    #[tokio::test]
    async fn validation_failure_writes_nothing() {
        let db = DbConnection::init_test().await.unwrap();
        let user = seeded(&db).await;
        let service = OnboardingService::new(db.clone());

        let mut request = base_request();
        request.child_name = "".into();
        request.accept_terms = false;

        let result = service
            .complete(&claims_for(&user), request, &RequestMeta::default())
            .await;
        match result {
            Err(AppError::Validation(details)) => {
                let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
                assert!(fields.contains(&"childName"));
                assert!(fields.contains(&"acceptTerms"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        assert!(crate::storage::audit::list_recent(db.pool(), None, None, None, 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn explicit_family_name_wins_over_default() {
        let db = DbConnection::init_test().await.unwrap();
        let user = seeded(&db).await;
        let service = OnboardingService::new(db.clone());

        let mut request = base_request();
        request.family_name = Some("Casa Rivera".into());
        let response = service
            .complete(&claims_for(&user), request, &RequestMeta::default())
            .await
            .unwrap();
        assert_eq!(response.family.unwrap().name, "Casa Rivera");
    }
}
