//! Query functions for the `audit_logs` table.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{timestamp_from_db, timestamp_to_db};
use crate::domain::models::AuditLog;

pub async fn insert_entry<'e, E>(executor: E, entry: &AuditLog) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO audit_logs (id, user_id, action, resource, resource_id, old_values, \
         new_values, ip_address, user_agent, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&entry.id)
    .bind(&entry.user_id)
    .bind(&entry.action)
    .bind(&entry.resource)
    .bind(&entry.resource_id)
    .bind(entry.old_values.as_ref().map(|v| v.to_string()))
    .bind(entry.new_values.as_ref().map(|v| v.to_string()))
    .bind(&entry.ip_address)
    .bind(&entry.user_agent)
    .bind(timestamp_to_db(entry.created_at))
    .execute(executor)
    .await
    .context("failed to insert audit entry")?;
    Ok(())
}

/// Recent audit entries, newest first, optionally filtered by user,
/// resource, and action.
pub async fn list_recent<'e, E>(
    executor: E,
    user_id: Option<&str>,
    resource: Option<&str>,
    action: Option<&str>,
    limit: i64,
) -> Result<Vec<AuditLog>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM audit_logs WHERE (? IS NULL OR user_id = ?) \
         AND (? IS NULL OR resource = ?) AND (? IS NULL OR action = ?) \
         ORDER BY created_at DESC LIMIT ?",
    )
    .bind(user_id)
    .bind(user_id)
    .bind(resource)
    .bind(resource)
    .bind(action)
    .bind(action)
    .bind(limit)
    .fetch_all(executor)
    .await
    .context("failed to list audit entries")?;
    rows.iter().map(map_entry).collect()
}

fn map_entry(row: &SqliteRow) -> Result<AuditLog> {
    let parse_opt = |s: Option<String>| -> Result<Option<serde_json::Value>> {
        s.map(|v| super::value_from_json(&v)).transpose()
    };
    Ok(AuditLog {
        id: row.get("id"),
        user_id: row.get("user_id"),
        action: row.get("action"),
        resource: row.get("resource"),
        resource_id: row.get("resource_id"),
        old_values: parse_opt(row.get("old_values"))?,
        new_values: parse_opt(row.get("new_values"))?,
        ip_address: row.get("ip_address"),
        user_agent: row.get("user_agent"),
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use chrono::Utc;

    fn entry(user_id: Option<&str>, action: &str, at: chrono::DateTime<Utc>) -> AuditLog {
        AuditLog {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.map(str::to_string),
            action: action.to_string(),
            resource: "USER".to_string(),
            resource_id: None,
            old_values: None,
            new_values: Some(serde_json::json!({"email": "a@b.c"})),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: Some("test".to_string()),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn listing_filters_by_user_and_orders_newest_first() {
        let db = DbConnection::init_test().await.unwrap();
        let now = Utc::now();
        insert_entry(db.pool(), &entry(Some("u1"), "LOGIN", now - chrono::Duration::minutes(5)))
            .await
            .unwrap();
        insert_entry(db.pool(), &entry(Some("u1"), "UPDATE_PLAN", now)).await.unwrap();
        insert_entry(db.pool(), &entry(None, "REGISTER", now)).await.unwrap();

        let all = list_recent(db.pool(), None, None, None, 10).await.unwrap();
        assert_eq!(all.len(), 3);

        let mine = list_recent(db.pool(), Some("u1"), None, None, 10).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].action, "UPDATE_PLAN");
        assert_eq!(mine[1].action, "LOGIN");

        let logins = list_recent(db.pool(), None, None, Some("LOGIN"), 10)
            .await
            .unwrap();
        assert_eq!(logins.len(), 1);

        let capped = list_recent(db.pool(), None, None, None, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }
}
