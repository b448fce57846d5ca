//! Query functions for the `milestones` table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{
    enum_from_str, enum_to_str, opt_timestamp_from_db, opt_timestamp_to_db, timestamp_from_db,
    timestamp_to_db,
};
use crate::domain::models::Milestone;

pub async fn insert_milestone<'e, E>(executor: E, milestone: &Milestone) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO milestones (id, child_id, title, description, category, age_range_min, \
         age_range_max, is_completed, completed_at, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&milestone.id)
    .bind(&milestone.child_id)
    .bind(&milestone.title)
    .bind(&milestone.description)
    .bind(enum_to_str(&milestone.category))
    .bind(milestone.age_range_min)
    .bind(milestone.age_range_max)
    .bind(milestone.is_completed)
    .bind(opt_timestamp_to_db(milestone.completed_at))
    .bind(&milestone.notes)
    .bind(timestamp_to_db(milestone.created_at))
    .bind(timestamp_to_db(milestone.updated_at))
    .execute(executor)
    .await
    .context("failed to insert milestone")?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Milestone>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM milestones WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch milestone by id")?;
    row.map(|r| map_milestone(&r)).transpose()
}

pub async fn list_for_child<'e, E>(executor: E, child_id: &str) -> Result<Vec<Milestone>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM milestones WHERE child_id = ? ORDER BY age_range_min ASC, created_at ASC",
    )
    .bind(child_id)
    .fetch_all(executor)
    .await
    .context("failed to list milestones")?;
    rows.iter().map(map_milestone).collect()
}

pub async fn mark_completed<'e, E>(
    executor: E,
    id: &str,
    completed_at: DateTime<Utc>,
    notes: Option<&str>,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE milestones SET is_completed = 1, completed_at = ?, \
         notes = COALESCE(?, notes), updated_at = ? WHERE id = ?",
    )
    .bind(timestamp_to_db(completed_at))
    .bind(notes)
    .bind(timestamp_to_db(completed_at))
    .bind(id)
    .execute(executor)
    .await
    .context("failed to complete milestone")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("milestone {id} not found");
    }
    Ok(())
}

pub async fn delete_milestone<'e, E>(executor: E, id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM milestones WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await
        .context("failed to delete milestone")?;
    Ok(result.rows_affected() > 0)
}

fn map_milestone(row: &SqliteRow) -> Result<Milestone> {
    Ok(Milestone {
        id: row.get("id"),
        child_id: row.get("child_id"),
        title: row.get("title"),
        description: row.get("description"),
        category: enum_from_str(row.get::<&str, _>("category"))?,
        age_range_min: row.get("age_range_min"),
        age_range_max: row.get("age_range_max"),
        is_completed: row.get("is_completed"),
        completed_at: opt_timestamp_from_db(row.get("completed_at"))?,
        notes: row.get("notes"),
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
        updated_at: timestamp_from_db(row.get::<&str, _>("updated_at"))?,
    })
}
