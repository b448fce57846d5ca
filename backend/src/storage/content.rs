//! Query functions for the `content_library` table.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{list_from_json, list_to_json, timestamp_from_db, timestamp_to_db};
use crate::domain::models::ContentItem;

pub async fn insert_item<'e, E>(executor: E, item: &ContentItem) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO content_library (id, title, content_type, body, tags, is_premium, \
         created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&item.id)
    .bind(&item.title)
    .bind(&item.content_type)
    .bind(&item.body)
    .bind(list_to_json(&item.tags))
    .bind(item.is_premium)
    .bind(timestamp_to_db(item.created_at))
    .execute(executor)
    .await
    .context("failed to insert content item")?;
    Ok(())
}

/// Library listing; premium items are excluded unless `include_premium`.
pub async fn list_items<'e, E>(executor: E, include_premium: bool) -> Result<Vec<ContentItem>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM content_library WHERE (is_premium = 0 OR ?) ORDER BY created_at DESC",
    )
    .bind(include_premium)
    .fetch_all(executor)
    .await
    .context("failed to list content items")?;
    rows.iter().map(map_item).collect()
}

fn map_item(row: &SqliteRow) -> Result<ContentItem> {
    Ok(ContentItem {
        id: row.get("id"),
        title: row.get("title"),
        content_type: row.get("content_type"),
        body: row.get("body"),
        tags: list_from_json(row.get::<&str, _>("tags"))?,
        is_premium: row.get("is_premium"),
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use chrono::Utc;

    fn item(title: &str, premium: bool) -> ContentItem {
        ContentItem {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            content_type: "ARTICLE".into(),
            body: "Body text".into(),
            tags: vec!["sleep".into()],
            is_premium: premium,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn premium_gating() {
        let db = DbConnection::init_test().await.unwrap();
        insert_item(db.pool(), &item("Free article", false)).await.unwrap();
        insert_item(db.pool(), &item("Premium guide", true)).await.unwrap();

        let free = list_items(db.pool(), false).await.unwrap();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].title, "Free article");

        let all = list_items(db.pool(), true).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
