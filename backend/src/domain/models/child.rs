use chrono::{DateTime, NaiveDate, Utc};
use shared::Gender;

/// Average Gregorian month length in days; the age approximation the plan
/// generator and activity filters rely on.
const DAYS_PER_MONTH: f64 = 30.44;

/// A child profile, owned by exactly one parent user and optionally attached
/// to a family.
#[derive(Debug, Clone, PartialEq)]
pub struct Child {
    pub id: String,
    pub parent_id: String,
    pub family_id: Option<String>,
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub interests: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    pub fn new(parent_id: &str, name: &str, date_of_birth: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            parent_id: parent_id.to_string(),
            family_id: None,
            name: name.to_string(),
            gender: Gender::PreferNotToSay,
            date_of_birth,
            interests: Vec::new(),
            allergies: Vec::new(),
            medications: Vec::new(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Age in whole months at `now`, using the fixed 30.44-day month.
    pub fn age_in_months_at(&self, now: DateTime<Utc>) -> i64 {
        age_in_months(self.date_of_birth, now)
    }

    pub fn age_in_months(&self) -> i64 {
        self.age_in_months_at(Utc::now())
    }

    pub fn summary(&self) -> shared::ChildSummary {
        shared::ChildSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.format("%Y-%m-%d").to_string(),
            gender: self.gender,
            interests: self.interests.clone(),
        }
    }

    pub fn view(&self) -> shared::ChildView {
        shared::ChildView {
            id: self.id.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.format("%Y-%m-%d").to_string(),
            gender: self.gender,
            interests: self.interests.clone(),
            allergies: self.allergies.clone(),
            medications: self.medications.clone(),
            notes: self.notes.clone(),
            family_id: self.family_id.clone(),
            age_months: self.age_in_months(),
        }
    }
}

/// Whole months between a date of birth and `now`, floor of
/// `elapsed_seconds / (30.44 days)`.
pub fn age_in_months(date_of_birth: NaiveDate, now: DateTime<Utc>) -> i64 {
    let born = date_of_birth
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc();
    let elapsed = (now - born).num_seconds() as f64;
    (elapsed / (DAYS_PER_MONTH * 86_400.0)).floor() as i64
}

/// Render an age in months as "N years M months".
pub fn format_age(age_months: i64) -> String {
    format!("{} years {} months", age_months / 12, age_months % 12)
}
