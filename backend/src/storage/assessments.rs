//! Query functions for the `child_assessments` table.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{timestamp_from_db, timestamp_to_db, value_from_json};
use crate::domain::models::ChildAssessment;

pub async fn insert_assessment<'e, E>(executor: E, assessment: &ChildAssessment) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO child_assessments (id, child_id, title, assessment_type, questions, \
         scores, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&assessment.id)
    .bind(&assessment.child_id)
    .bind(&assessment.title)
    .bind(&assessment.assessment_type)
    .bind(assessment.questions.to_string())
    .bind(assessment.scores.to_string())
    .bind(timestamp_to_db(assessment.created_at))
    .execute(executor)
    .await
    .context("failed to insert assessment")?;
    Ok(())
}

pub async fn list_for_child<'e, E>(executor: E, child_id: &str) -> Result<Vec<ChildAssessment>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM child_assessments WHERE child_id = ? ORDER BY created_at DESC",
    )
    .bind(child_id)
    .fetch_all(executor)
    .await
    .context("failed to list assessments")?;
    rows.iter().map(map_assessment).collect()
}

fn map_assessment(row: &SqliteRow) -> Result<ChildAssessment> {
    Ok(ChildAssessment {
        id: row.get("id"),
        child_id: row.get("child_id"),
        title: row.get("title"),
        assessment_type: row.get("assessment_type"),
        questions: value_from_json(row.get::<&str, _>("questions"))?,
        scores: value_from_json(row.get::<&str, _>("scores"))?,
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
    })
}
