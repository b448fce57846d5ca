//! Query functions over the SQLite store, one module per entity.
//!
//! Every function is generic over a `sqlx` executor so the same query runs on
//! the pool or inside a transaction; the onboarding flow relies on this to
//! keep all of its writes in one transaction. Enum columns store the wire
//! spelling; list and blob columns store JSON text.

pub mod activities;
pub mod assessments;
pub mod audit;
pub mod children;
pub mod content;
pub mod families;
pub mod milestones;
pub mod notifications;
pub mod plans;
pub mod users;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serialize a unit enum to its wire spelling (e.g. `PREMIUM_PLUS`).
pub(crate) fn enum_to_str<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => unreachable!("enum columns serialize to JSON strings"),
    }
}

/// Parse a wire-spelled enum back out of a column.
pub(crate) fn enum_from_str<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| anyhow!("unrecognized enum value {s:?}: {e}"))
}

pub(crate) fn list_to_json(list: &[String]) -> String {
    serde_json::to_string(list).expect("string list serializes")
}

pub(crate) fn list_from_json(s: &str) -> Result<Vec<String>> {
    serde_json::from_str(s).with_context(|| format!("invalid JSON list column: {s:?}"))
}

pub(crate) fn value_from_json(s: &str) -> Result<serde_json::Value> {
    serde_json::from_str(s).with_context(|| format!("invalid JSON column: {s:?}"))
}

pub(crate) fn timestamp_to_db(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

pub(crate) fn timestamp_from_db(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("invalid timestamp column: {s:?}"))?
        .with_timezone(&Utc))
}

pub(crate) fn opt_timestamp_to_db(at: Option<DateTime<Utc>>) -> Option<String> {
    at.map(timestamp_to_db)
}

pub(crate) fn opt_timestamp_from_db(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
    s.map(|v| timestamp_from_db(&v)).transpose()
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn date_from_db(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date column: {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MilestoneCategory, SubscriptionTier};

    #[test]
    fn enum_round_trip_uses_wire_spelling() {
        assert_eq!(enum_to_str(&SubscriptionTier::PremiumPlus), "PREMIUM_PLUS");
        let parsed: MilestoneCategory = enum_from_str("SOCIAL_EMOTIONAL").unwrap();
        assert_eq!(parsed, MilestoneCategory::SocialEmotional);
        assert!(enum_from_str::<MilestoneCategory>("NOT_A_CATEGORY").is_err());
    }

    #[test]
    fn timestamp_round_trip() {
        let now = Utc::now();
        let parsed = timestamp_from_db(&timestamp_to_db(now)).unwrap();
        assert_eq!(parsed, now);
    }
}
