use chrono::{DateTime, Utc};

/// A family sharing children and plans, joined via its unique code.
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub family_code: String,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Family {
    pub fn new(name: &str, family_code: String, settings: serde_json::Value) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            family_code,
            settings,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn summary(&self) -> shared::FamilySummary {
        shared::FamilySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            family_code: self.family_code.clone(),
        }
    }
}

/// Membership row linking a user to a family. Unique per (family, user).
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyMember {
    pub id: String,
    pub family_id: String,
    pub user_id: String,
    pub role: String,
    pub is_owner: bool,
    pub joined_at: DateTime<Utc>,
}

impl FamilyMember {
    pub fn new(family_id: &str, user_id: &str, role: &str, is_owner: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            family_id: family_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            is_owner,
            joined_at: Utc::now(),
        }
    }
}
