//! Secondary owned rows: notifications, audit entries, assessments, and
//! library content. Simple JSON-payload records with timestamps.

use chrono::{DateTime, Utc};
use shared::NotificationType;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: &str,
        notification_type: NotificationType,
        title: &str,
        message: &str,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            notification_type,
            title: title.to_string(),
            message: message.to_string(),
            data,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn view(&self) -> shared::NotificationView {
        shared::NotificationView {
            id: self.id.clone(),
            notification_type: self.notification_type,
            title: self.title.clone(),
            message: self.message.clone(),
            data: self.data.clone(),
            is_read: self.is_read,
            created_at: self.created_at,
        }
    }
}

/// One audit-trail entry. `user_id` is absent for anonymous events.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLog {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChildAssessment {
    pub id: String,
    pub child_id: String,
    pub title: String,
    pub assessment_type: String,
    pub questions: serde_json::Value,
    pub scores: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ChildAssessment {
    pub fn view(&self) -> shared::AssessmentView {
        shared::AssessmentView {
            id: self.id.clone(),
            child_id: self.child_id.clone(),
            title: self.title.clone(),
            assessment_type: self.assessment_type.clone(),
            questions: self.questions.clone(),
            scores: self.scores.clone(),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub id: String,
    pub title: String,
    pub content_type: String,
    pub body: String,
    pub tags: Vec<String>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn view(&self) -> shared::ContentView {
        shared::ContentView {
            id: self.id.clone(),
            title: self.title.clone(),
            content_type: self.content_type.clone(),
            body: self.body.clone(),
            tags: self.tags.clone(),
            is_premium: self.is_premium,
            created_at: self.created_at,
        }
    }
}
