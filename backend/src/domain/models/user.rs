use chrono::{DateTime, Utc};
use shared::{SubscriptionTier, UserRole};

/// An account. Email is unique; `password_hash` is absent for users
/// provisioned through magic-link or OAuth sign-in.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub subscription_tier: SubscriptionTier,
    pub timezone: String,
    pub language: String,
    pub preferences: serde_json::Value,
    pub onboarding_completed: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Fresh parent account with default tier and locale.
    pub fn new(email: &str, name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_lowercase(),
            name,
            password_hash: None,
            role: UserRole::Parent,
            subscription_tier: SubscriptionTier::Free,
            timezone: "UTC".to_string(),
            language: "en".to_string(),
            preferences: serde_json::json!({}),
            onboarding_completed: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> shared::UserSummary {
        shared::UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            timezone: self.timezone.clone(),
            role: self.role,
            subscription_tier: self.subscription_tier,
            onboarding_completed: self.onboarding_completed,
        }
    }
}
