use chrono::{DateTime, Utc};
use shared::MilestoneCategory;

/// A developmental milestone tracked for one child. `age_range_min/max` are
/// months.
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Milestone {
    pub fn new(
        child_id: &str,
        title: &str,
        description: &str,
        category: MilestoneCategory,
        age_range_min: i32,
        age_range_max: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            child_id: child_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category,
            age_range_min,
            age_range_max,
            is_completed: false,
            completed_at: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn view(&self) -> shared::MilestoneView {
        shared::MilestoneView {
            id: self.id.clone(),
            child_id: self.child_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            age_range_min: self.age_range_min,
            age_range_max: self.age_range_max,
            is_completed: self.is_completed,
            completed_at: self.completed_at,
            notes: self.notes.clone(),
        }
    }
}
