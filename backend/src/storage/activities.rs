//! Query functions for the activity catalog and activity logs.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{
    enum_from_str, enum_to_str, list_from_json, list_to_json, timestamp_from_db, timestamp_to_db,
};
use crate::domain::models::{Activity, ActivityLog};

pub async fn insert_activity<'e, E>(executor: E, activity: &Activity) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO activities (id, title, description, instructions, age_range_min, \
         age_range_max, duration, difficulty, activity_type, materials, tags, is_premium, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&activity.id)
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(&activity.instructions)
    .bind(activity.age_range_min)
    .bind(activity.age_range_max)
    .bind(activity.duration)
    .bind(enum_to_str(&activity.difficulty))
    .bind(enum_to_str(&activity.activity_type))
    .bind(list_to_json(&activity.materials))
    .bind(list_to_json(&activity.tags))
    .bind(activity.is_premium)
    .bind(timestamp_to_db(activity.created_at))
    .bind(timestamp_to_db(activity.updated_at))
    .execute(executor)
    .await
    .context("failed to insert activity")?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Activity>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM activities WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch activity by id")?;
    row.map(|r| map_activity(&r)).transpose()
}

/// Catalog listing filtered to activities whose age range covers
/// `age_months`, or the whole catalog when no age is given. Premium entries
/// are excluded unless `include_premium` is set.
pub async fn list_catalog<'e, E>(
    executor: E,
    age_months: Option<i64>,
    include_premium: bool,
) -> Result<Vec<Activity>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM activities \
         WHERE (? IS NULL OR (age_range_min <= ? AND age_range_max >= ?)) \
           AND (is_premium = 0 OR ?) \
         ORDER BY age_range_min ASC, title ASC",
    )
    .bind(age_months)
    .bind(age_months)
    .bind(age_months)
    .bind(include_premium)
    .fetch_all(executor)
    .await
    .context("failed to list activities")?;
    rows.iter().map(map_activity).collect()
}

pub async fn insert_log<'e, E>(executor: E, log: &ActivityLog) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO activity_logs (id, activity_id, child_id, user_id, completed_at, duration, \
         enjoyment, difficulty, notes, observations, skills, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&log.id)
    .bind(&log.activity_id)
    .bind(&log.child_id)
    .bind(&log.user_id)
    .bind(timestamp_to_db(log.completed_at))
    .bind(log.duration)
    .bind(log.enjoyment)
    .bind(log.difficulty)
    .bind(&log.notes)
    .bind(&log.observations)
    .bind(list_to_json(&log.skills))
    .bind(timestamp_to_db(log.created_at))
    .execute(executor)
    .await
    .context("failed to insert activity log")?;
    Ok(())
}

pub async fn list_logs_for_child<'e, E>(executor: E, child_id: &str) -> Result<Vec<ActivityLog>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM activity_logs WHERE child_id = ? ORDER BY completed_at DESC",
    )
    .bind(child_id)
    .fetch_all(executor)
    .await
    .context("failed to list activity logs")?;
    rows.iter().map(map_log).collect()
}

fn map_activity(row: &SqliteRow) -> Result<Activity> {
    Ok(Activity {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        instructions: row.get("instructions"),
        age_range_min: row.get("age_range_min"),
        age_range_max: row.get("age_range_max"),
        duration: row.get("duration"),
        difficulty: enum_from_str(row.get::<&str, _>("difficulty"))?,
        activity_type: enum_from_str(row.get::<&str, _>("activity_type"))?,
        materials: list_from_json(row.get::<&str, _>("materials"))?,
        tags: list_from_json(row.get::<&str, _>("tags"))?,
        is_premium: row.get("is_premium"),
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
        updated_at: timestamp_from_db(row.get::<&str, _>("updated_at"))?,
    })
}

fn map_log(row: &SqliteRow) -> Result<ActivityLog> {
    Ok(ActivityLog {
        id: row.get("id"),
        activity_id: row.get("activity_id"),
        child_id: row.get("child_id"),
        user_id: row.get("user_id"),
        completed_at: timestamp_from_db(row.get::<&str, _>("completed_at"))?,
        duration: row.get("duration"),
        enjoyment: row.get("enjoyment"),
        difficulty: row.get("difficulty"),
        notes: row.get("notes"),
        observations: row.get("observations"),
        skills: list_from_json(row.get::<&str, _>("skills"))?,
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use chrono::Utc;
    use shared::{ActivityDifficulty, ActivityType};

    fn sample_activity(title: &str, min: i32, max: i32, premium: bool) -> Activity {
        let now = Utc::now();
        Activity {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: "desc".into(),
            instructions: "do the thing".into(),
            age_range_min: min,
            age_range_max: max,
            duration: 20,
            difficulty: ActivityDifficulty::Easy,
            activity_type: ActivityType::Physical,
            materials: vec!["paper".into()],
            tags: vec!["fine-motor".into()],
            is_premium: premium,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn catalog_filters_by_age_and_premium() {
        let db = DbConnection::init_test().await.unwrap();
        insert_activity(db.pool(), &sample_activity("Stacking", 6, 18, false)).await.unwrap();
        insert_activity(db.pool(), &sample_activity("Puzzles", 24, 48, false)).await.unwrap();
        insert_activity(db.pool(), &sample_activity("Premium lab", 6, 48, true)).await.unwrap();

        let all = list_catalog(db.pool(), None, true).await.unwrap();
        assert_eq!(all.len(), 3);

        let toddler_free = list_catalog(db.pool(), Some(12), false).await.unwrap();
        assert_eq!(toddler_free.len(), 1);
        assert_eq!(toddler_free[0].title, "Stacking");

        let toddler_premium = list_catalog(db.pool(), Some(12), true).await.unwrap();
        assert_eq!(toddler_premium.len(), 2);
    }

    #[tokio::test]
    async fn activity_round_trip() {
        let db = DbConnection::init_test().await.unwrap();
        let activity = sample_activity("Obstacle course", 18, 36, false);
        insert_activity(db.pool(), &activity).await.unwrap();
        let fetched = find_by_id(db.pool(), &activity.id).await.unwrap().unwrap();
        assert_eq!(fetched, activity);
    }

    #[tokio::test]
    async fn logs_are_listed_newest_first() {
        let db = DbConnection::init_test().await.unwrap();
        let user = crate::domain::models::User::new("p@t.dev", None);
        crate::storage::users::insert_user(db.pool(), &user).await.unwrap();
        let child = crate::domain::models::Child::new(
            &user.id,
            "Ivy",
            chrono::NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        );
        crate::storage::children::insert_child(db.pool(), &child).await.unwrap();
        let activity = sample_activity("Stacking", 6, 18, false);
        insert_activity(db.pool(), &activity).await.unwrap();

        let now = Utc::now();
        for (i, offset) in [60i64, 0].iter().enumerate() {
            let log = ActivityLog {
                id: format!("log-{i}"),
                activity_id: activity.id.clone(),
                child_id: child.id.clone(),
                user_id: user.id.clone(),
                completed_at: now - chrono::Duration::minutes(*offset),
                duration: Some(15),
                enjoyment: Some(5),
                difficulty: Some(2),
                notes: None,
                observations: None,
                skills: vec!["balance".into()],
                created_at: now,
            };
            insert_log(db.pool(), &log).await.unwrap();
        }

        let logs = list_logs_for_child(db.pool(), &child.id).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, "log-1");
        assert_eq!(logs[1].id, "log-0");
    }
}
