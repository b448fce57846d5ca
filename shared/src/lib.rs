//! Shared API types for the ParentWise backend.
//!
//! Everything that crosses the HTTP boundary lives here: the JSON envelope,
//! request/response bodies, and the domain enums whose wire spelling clients
//! depend on. Field names serialize as camelCase to match the API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role. Variant order is the authorization order:
/// `Child < Parent < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Child,
    Parent,
    Admin,
}

/// Subscription tier. Variant order is the authorization order:
/// `Free < Premium < PremiumPlus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    Free,
    Premium,
    PremiumPlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneCategory {
    Physical,
    Cognitive,
    Language,
    SocialEmotional,
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Educational,
    Physical,
    Creative,
    Social,
    Emotional,
    Cognitive,
    Routine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityDifficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    SystemNotification,
    MilestoneReminder,
    ActivitySuggestion,
    PlanUpdate,
}

/// Discriminator for the onboarding family step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilySetup {
    Create,
    Join,
}

/// Requested horizon for an AI-generated parenting plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanTimeline {
    #[serde(rename = "1_month")]
    OneMonth,
    #[serde(rename = "3_months")]
    ThreeMonths,
    #[serde(rename = "6_months")]
    SixMonths,
}

impl Default for PlanTimeline {
    fn default() -> Self {
        PlanTimeline::ThreeMonths
    }
}

impl PlanTimeline {
    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            PlanTimeline::OneMonth => "1 month",
            PlanTimeline::ThreeMonths => "3 months",
            PlanTimeline::SixMonths => "6 months",
        }
    }

    /// Wire spelling, also stored as a plan tag.
    pub fn tag(&self) -> &'static str {
        match self {
            PlanTimeline::OneMonth => "1_month",
            PlanTimeline::ThreeMonths => "3_months",
            PlanTimeline::SixMonths => "6_months",
        }
    }
}

/// Standard JSON envelope for every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySettings {
    pub share_progress: bool,
    pub allow_analytics: bool,
    pub email_notifications: bool,
}

/// Body of `POST /api/onboarding`: the one-time post-signup submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    pub name: String,
    pub timezone: String,
    pub family_setup: FamilySetup,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub family_code: Option<String>,
    pub child_name: String,
    /// ISO 8601 date (`YYYY-MM-DD`).
    pub child_date_of_birth: String,
    #[serde(default)]
    pub child_gender: Option<Gender>,
    #[serde(default)]
    pub child_interests: Vec<String>,
    pub privacy_settings: PrivacySettings,
    pub accept_terms: bool,
}

impl OnboardingRequest {
    /// Field-level validation. Returns every failing field, not just the
    /// first, so forms can render the whole error set at once.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().len() < 2 {
            errors.push(FieldError::new("name", "Name must be at least 2 characters"));
        }
        if self.timezone.trim().is_empty() {
            errors.push(FieldError::new("timezone", "Please select your timezone"));
        }
        if self.family_setup == FamilySetup::Join
            && self.family_code.as_deref().map_or(true, |c| c.trim().is_empty())
        {
            errors.push(FieldError::new(
                "familyCode",
                "A family code is required to join a family",
            ));
        }
        if self.child_name.trim().is_empty() {
            errors.push(FieldError::new("childName", "Child name is required"));
        }
        if self.child_date_of_birth.trim().is_empty() {
            errors.push(FieldError::new("childDateOfBirth", "Date of birth is required"));
        }
        if !self.accept_terms {
            errors.push(FieldError::new("acceptTerms", "You must accept the terms"));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub timezone: String,
    pub role: UserRole,
    pub subscription_tier: SubscriptionTier,
    pub onboarding_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilySummary {
    pub id: String,
    pub name: String,
    pub family_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildSummary {
    pub id: String,
    pub name: String,
    /// ISO 8601 date (`YYYY-MM-DD`).
    pub date_of_birth: String,
    pub gender: Gender,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    pub user: UserSummary,
    pub family: Option<FamilySummary>,
    pub child: ChildSummary,
}

// ---------------------------------------------------------------------------
// AI parenting plans
// ---------------------------------------------------------------------------

/// Body of `POST /api/ai/parenting-plan`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanRequest {
    pub child_id: String,
    pub parenting_goals: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
    #[serde(default)]
    pub family_context: Option<String>,
    #[serde(default)]
    pub timeline: PlanTimeline,
}

impl GeneratePlanRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.child_id.trim().is_empty() {
            errors.push(FieldError::new("childId", "Child ID is required"));
        }
        if self.parenting_goals.iter().all(|g| g.trim().is_empty()) {
            errors.push(FieldError::new(
                "parentingGoals",
                "At least one parenting goal is required",
            ));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub goals: serde_json::Value,
    pub strategies: serde_json::Value,
    pub timeline: serde_json::Value,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub activities: Vec<String>,
    pub tips: Vec<String>,
    pub personalized_for: String,
    /// Age rendered as "N years M months".
    pub age_appropriate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePlanResponse {
    pub plan: PlanSummary,
    pub ai_insights: AiInsights,
}

/// One entry in `GET /api/ai/parenting-plan?childId=`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanListItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: PlanStatus,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub child_name: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanListResponse {
    pub plans: Vec<PlanListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanProgressRequest {
    /// 0..=100; reaching 100 completes the plan.
    pub progress: i32,
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl SignUpRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if !self.email.contains('@') {
            errors.push(FieldError::new("email", "A valid email address is required"));
        }
        if self.password.len() < 8 {
            errors.push(FieldError::new(
                "password",
                "Password must be at least 8 characters",
            ));
        }
        errors
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkExchangeRequest {
    pub token: String,
}

/// An identity already verified by an external OAuth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalSignInRequest {
    pub provider: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub token: String,
    pub user: UserSummary,
}

/// Response of a magic-link request. Delivery is the caller's concern; the
/// token is returned rather than emailed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChildRequest {
    pub name: String,
    /// ISO 8601 date (`YYYY-MM-DD`).
    pub date_of_birth: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChildRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub interests: Option<Vec<String>>,
    #[serde(default)]
    pub allergies: Option<Vec<String>>,
    #[serde(default)]
    pub medications: Option<Vec<String>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildView {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub interests: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub family_id: Option<String>,
    pub age_months: i64,
}

// ---------------------------------------------------------------------------
// Milestones
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMilestoneRequest {
    pub child_id: String,
    pub title: String,
    pub description: String,
    pub category: MilestoneCategory,
    pub age_range_min: i32,
    pub age_range_max: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMilestoneRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneView {
    pub id: String,
    pub child_id: String,
    pub title: String,
    pub description: String,
    pub category: MilestoneCategory,
    pub age_range_min: i32,
    pub age_range_max: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub age_range_min: i32,
    pub age_range_max: i32,
    /// Minutes.
    pub duration: i32,
    pub difficulty: ActivityDifficulty,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub age_range_min: i32,
    pub age_range_max: i32,
    pub duration: i32,
    pub difficulty: ActivityDifficulty,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub materials: Vec<String>,
    pub tags: Vec<String>,
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogActivityRequest {
    pub activity_id: String,
    pub child_id: String,
    #[serde(default)]
    pub duration: Option<i32>,
    /// 1..=5 subjective rating.
    #[serde(default)]
    pub enjoyment: Option<i32>,
    /// 1..=5 subjective rating.
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Assessments & content library
// ---------------------------------------------------------------------------

/// Body of `POST /api/children/:id/assessments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub assessment_type: String,
    pub questions: serde_json::Value,
    #[serde(default)]
    pub scores: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentView {
    pub id: String,
    pub child_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub assessment_type: String,
    pub questions: serde_json::Value,
    pub scores: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/content` (admin only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub body: String,
    pub tags: Vec<String>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}
