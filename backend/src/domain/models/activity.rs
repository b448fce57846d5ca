use chrono::{DateTime, Utc};
use shared::{ActivityDifficulty, ActivityType};

/// A catalog activity, independent of any child. Age range in months,
/// duration in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub age_range_min: i32,
    pub age_range_max: i32,
    pub duration: i32,
    pub difficulty: ActivityDifficulty,
    pub activity_type: ActivityType,
    pub materials: Vec<String>,
    pub tags: Vec<String>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Activity {
    pub fn view(&self) -> shared::ActivityView {
        shared::ActivityView {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            instructions: self.instructions.clone(),
            age_range_min: self.age_range_min,
            age_range_max: self.age_range_max,
            duration: self.duration,
            difficulty: self.difficulty,
            activity_type: self.activity_type,
            materials: self.materials.clone(),
            tags: self.tags.clone(),
            is_premium: self.is_premium,
        }
    }
}

/// One occurrence of an activity performed with a child, with the parent's
/// subjective ratings (1..=5).
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityLog {
    pub id: String,
    pub activity_id: String,
    pub child_id: String,
    pub user_id: String,
    pub completed_at: DateTime<Utc>,
    pub duration: Option<i32>,
    pub enjoyment: Option<i32>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    pub observations: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}
