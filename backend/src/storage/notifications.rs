//! Query functions for the `notifications` table.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{enum_from_str, enum_to_str, timestamp_from_db, timestamp_to_db, value_from_json};
use crate::domain::models::Notification;

pub async fn insert_notification<'e, E>(executor: E, notification: &Notification) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO notifications (id, user_id, notification_type, title, message, data, \
         is_read, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&notification.id)
    .bind(&notification.user_id)
    .bind(enum_to_str(&notification.notification_type))
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(notification.data.to_string())
    .bind(notification.is_read)
    .bind(timestamp_to_db(notification.created_at))
    .execute(executor)
    .await
    .context("failed to insert notification")?;
    Ok(())
}

pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: &str,
    unread_only: bool,
) -> Result<Vec<Notification>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query(
        "SELECT * FROM notifications WHERE user_id = ? AND (is_read = 0 OR NOT ?) \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(executor)
    .await
    .context("failed to list notifications")?;
    rows.iter().map(map_notification).collect()
}

/// Mark one notification read, scoped to its owner. Returns false when no
/// matching row exists.
pub async fn mark_read<'e, E>(executor: E, id: &str, user_id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(executor)
        .await
        .context("failed to mark notification read")?;
    Ok(result.rows_affected() > 0)
}

fn map_notification(row: &SqliteRow) -> Result<Notification> {
    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        notification_type: enum_from_str(row.get::<&str, _>("notification_type"))?,
        title: row.get("title"),
        message: row.get("message"),
        data: value_from_json(row.get::<&str, _>("data"))?,
        is_read: row.get("is_read"),
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use crate::domain::models::User;
    use crate::storage::users;
    use shared::NotificationType;

    #[tokio::test]
    async fn unread_filter_and_mark_read() {
        let db = DbConnection::init_test().await.unwrap();
        let user = User::new("n@t.dev", None);
        users::insert_user(db.pool(), &user).await.unwrap();

        let welcome = Notification::new(
            &user.id,
            NotificationType::SystemNotification,
            "Welcome to ParentWise!",
            "Your family is set up.",
            serde_json::json!({"familyCode": "AB12CD"}),
        );
        insert_notification(db.pool(), &welcome).await.unwrap();

        let unread = list_for_user(db.pool(), &user.id, true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].data["familyCode"], "AB12CD");

        assert!(mark_read(db.pool(), &welcome.id, &user.id).await.unwrap());
        assert!(list_for_user(db.pool(), &user.id, true).await.unwrap().is_empty());
        assert_eq!(list_for_user(db.pool(), &user.id, false).await.unwrap().len(), 1);

        // Another user cannot touch it.
        assert!(!mark_read(db.pool(), &welcome.id, "someone-else").await.unwrap());
    }
}
