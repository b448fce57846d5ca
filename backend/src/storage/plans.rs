//! Query functions for the `parenting_plans` table.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{
    enum_from_str, enum_to_str, list_from_json, list_to_json, opt_timestamp_from_db,
    opt_timestamp_to_db, timestamp_from_db, timestamp_to_db, value_from_json,
};
use crate::domain::models::ParentingPlan;

pub async fn insert_plan<'e, E>(executor: E, plan: &ParentingPlan) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO parenting_plans (id, parent_id, child_id, family_id, title, description, \
         goals, strategies, timeline, status, progress, tags, ai_prompts, completed_at, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&plan.id)
    .bind(&plan.parent_id)
    .bind(&plan.child_id)
    .bind(&plan.family_id)
    .bind(&plan.title)
    .bind(&plan.description)
    .bind(plan.goals.to_string())
    .bind(plan.strategies.to_string())
    .bind(plan.timeline.to_string())
    .bind(enum_to_str(&plan.status))
    .bind(plan.progress)
    .bind(list_to_json(&plan.tags))
    .bind(plan.ai_prompts.as_ref().map(|v| v.to_string()))
    .bind(opt_timestamp_to_db(plan.completed_at))
    .bind(timestamp_to_db(plan.created_at))
    .bind(timestamp_to_db(plan.updated_at))
    .execute(executor)
    .await
    .context("failed to insert parenting plan")?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<ParentingPlan>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM parenting_plans WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch plan by id")?;
    row.map(|r| map_plan(&r)).transpose()
}

pub async fn list_for_parent<'e, E>(executor: E, parent_id: &str) -> Result<Vec<ParentingPlan>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM parenting_plans WHERE parent_id = ? ORDER BY created_at DESC",
    )
    .bind(parent_id)
    .fetch_all(executor)
    .await
    .context("failed to list plans")?;
    rows.iter().map(map_plan).collect()
}

/// Persist a progress/status update applied by `ParentingPlan::set_progress`.
pub async fn update_progress<'e, E>(executor: E, plan: &ParentingPlan) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE parenting_plans SET progress = ?, status = ?, completed_at = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(plan.progress)
    .bind(enum_to_str(&plan.status))
    .bind(opt_timestamp_to_db(plan.completed_at))
    .bind(timestamp_to_db(plan.updated_at))
    .bind(&plan.id)
    .execute(executor)
    .await
    .context("failed to update plan progress")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("plan {} not found", plan.id);
    }
    Ok(())
}

fn map_plan(row: &SqliteRow) -> Result<ParentingPlan> {
    Ok(ParentingPlan {
        id: row.get("id"),
        parent_id: row.get("parent_id"),
        child_id: row.get("child_id"),
        family_id: row.get("family_id"),
        title: row.get("title"),
        description: row.get("description"),
        goals: value_from_json(row.get::<&str, _>("goals"))?,
        strategies: value_from_json(row.get::<&str, _>("strategies"))?,
        timeline: value_from_json(row.get::<&str, _>("timeline"))?,
        status: enum_from_str(row.get::<&str, _>("status"))?,
        progress: row.get("progress"),
        tags: list_from_json(row.get::<&str, _>("tags"))?,
        ai_prompts: row
            .get::<Option<String>, _>("ai_prompts")
            .map(|s| value_from_json(&s))
            .transpose()?,
        completed_at: opt_timestamp_from_db(row.get("completed_at"))?,
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
        updated_at: timestamp_from_db(row.get::<&str, _>("updated_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::domain::models::User;
    use crate::storage::users;
    use chrono::Utc;
    use shared::PlanStatus;

    fn sample_plan(parent_id: &str) -> ParentingPlan {
        let now = Utc::now();
        ParentingPlan {
            id: uuid::Uuid::new_v4().to_string(),
            parent_id: parent_id.to_string(),
            child_id: None,
            family_id: None,
            title: "Sleep routine".into(),
            description: Some("Consistent bedtime".into()),
            goals: serde_json::json!({"primary": "Sleep through the night"}),
            strategies: serde_json::json!({"daily": ["Same bedtime"]}),
            timeline: serde_json::json!({"week1": "Baseline"}),
            status: PlanStatus::Draft,
            progress: 0,
            tags: vec!["ai-generated".into()],
            ai_prompts: Some(serde_json::json!({"model": "gpt-4"})),
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn round_trip_preserves_json_blobs() {
        let db = DbConnection::init_test().await.unwrap();
        let user = User::new("p@t.dev", None);
        users::insert_user(db.pool(), &user).await.unwrap();

        let plan = sample_plan(&user.id);
        insert_plan(db.pool(), &plan).await.unwrap();
        let fetched = find_by_id(db.pool(), &plan.id).await.unwrap().unwrap();
        assert_eq!(fetched, plan);
    }

    #[tokio::test]
    async fn progress_update_persists_completion() {
        let db = DbConnection::init_test().await.unwrap();
        let user = User::new("p@t.dev", None);
        users::insert_user(db.pool(), &user).await.unwrap();

        let mut plan = sample_plan(&user.id);
        insert_plan(db.pool(), &plan).await.unwrap();

        plan.set_progress(100);
        update_progress(db.pool(), &plan).await.unwrap();

        let fetched = find_by_id(db.pool(), &plan.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, PlanStatus::Completed);
        assert_eq!(fetched.progress, 100);
        assert!(fetched.completed_at.is_some());
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_scoped() {
        let db = DbConnection::init_test().await.unwrap();
        let user = User::new("p@t.dev", None);
        users::insert_user(db.pool(), &user).await.unwrap();
        let other = User::new("o@t.dev", None);
        users::insert_user(db.pool(), &other).await.unwrap();

        let mut old = sample_plan(&user.id);
        old.created_at = Utc::now() - chrono::Duration::hours(2);
        insert_plan(db.pool(), &old).await.unwrap();
        insert_plan(db.pool(), &sample_plan(&user.id)).await.unwrap();
        insert_plan(db.pool(), &sample_plan(&other.id)).await.unwrap();

        let mine = list_for_parent(db.pool(), &user.id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].created_at > mine[1].created_at);
    }
}
