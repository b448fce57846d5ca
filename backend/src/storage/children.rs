//! Query functions for the `children` table.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{
    date_from_db, date_to_db, enum_from_str, enum_to_str, list_from_json, list_to_json,
    timestamp_from_db, timestamp_to_db,
};
use crate::domain::models::Child;

pub async fn insert_child<'e, E>(executor: E, child: &Child) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO children (id, parent_id, family_id, name, gender, date_of_birth, \
         interests, allergies, medications, notes, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&child.id)
    .bind(&child.parent_id)
    .bind(&child.family_id)
    .bind(&child.name)
    .bind(enum_to_str(&child.gender))
    .bind(date_to_db(child.date_of_birth))
    .bind(list_to_json(&child.interests))
    .bind(list_to_json(&child.allergies))
    .bind(list_to_json(&child.medications))
    .bind(&child.notes)
    .bind(timestamp_to_db(child.created_at))
    .bind(timestamp_to_db(child.updated_at))
    .execute(executor)
    .await
    .context("failed to insert child")?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Child>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM children WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch child by id")?;
    row.map(|r| map_child(&r)).transpose()
}

pub async fn list_for_parent<'e, E>(executor: E, parent_id: &str) -> Result<Vec<Child>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query("SELECT * FROM children WHERE parent_id = ? ORDER BY created_at ASC")
        .bind(parent_id)
        .fetch_all(executor)
        .await
        .context("failed to list children")?;
    rows.iter().map(map_child).collect()
}

pub async fn update_child<'e, E>(executor: E, child: &Child) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE children SET name = ?, gender = ?, date_of_birth = ?, interests = ?, \
         allergies = ?, medications = ?, notes = ?, family_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&child.name)
    .bind(enum_to_str(&child.gender))
    .bind(date_to_db(child.date_of_birth))
    .bind(list_to_json(&child.interests))
    .bind(list_to_json(&child.allergies))
    .bind(list_to_json(&child.medications))
    .bind(&child.notes)
    .bind(&child.family_id)
    .bind(timestamp_to_db(Utc::now()))
    .bind(&child.id)
    .execute(executor)
    .await
    .context("failed to update child")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("child {} not found", child.id);
    }
    Ok(())
}

pub async fn delete_child<'e, E>(executor: E, id: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM children WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await
        .context("failed to delete child")?;
    Ok(result.rows_affected() > 0)
}

fn map_child(row: &SqliteRow) -> Result<Child> {
    Ok(Child {
        id: row.get("id"),
        parent_id: row.get("parent_id"),
        family_id: row.get("family_id"),
        name: row.get("name"),
        gender: enum_from_str(row.get::<&str, _>("gender"))?,
        date_of_birth: date_from_db(row.get::<&str, _>("date_of_birth"))?,
        interests: list_from_json(row.get::<&str, _>("interests"))?,
        allergies: list_from_json(row.get::<&str, _>("allergies"))?,
        medications: list_from_json(row.get::<&str, _>("medications"))?,
        notes: row.get("notes"),
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
    use chrono::NaiveDate;
    use shared::Gender;

    async fn seeded_parent(db: &DbConnection) -> User {
        let user = User::new("parent@test.dev", Some("Parent".into()));
        users::insert_user(db.pool(), &user).await.unwrap();
        user
    }

    #[tokio::test]
    async fn child_round_trip_preserves_lists_and_date() {
        let db = DbConnection::init_test().await.unwrap();
        let parent = seeded_parent(&db).await;

        let mut child = Child::new(
            &parent.id,
            "Luna",
            NaiveDate::from_ymd_opt(2022, 3, 15).unwrap(),
        );
        child.gender = Gender::Female;
        child.interests = vec!["music".into(), "blocks".into()];
        child.allergies = vec!["peanuts".into()];
        insert_child(db.pool(), &child).await.unwrap();

        let fetched = find_by_id(db.pool(), &child.id).await.unwrap().unwrap();
        assert_eq!(fetched, child);
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_parent() {
        let db = DbConnection::init_test().await.unwrap();
        let parent = seeded_parent(&db).await;
        let other = User::new("other@test.dev", None);
        users::insert_user(db.pool(), &other).await.unwrap();

        let dob = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        insert_child(db.pool(), &Child::new(&parent.id, "A", dob)).await.unwrap();
        insert_child(db.pool(), &Child::new(&parent.id, "B", dob)).await.unwrap();
        insert_child(db.pool(), &Child::new(&other.id, "C", dob)).await.unwrap();

        let mine = list_for_parent(db.pool(), &parent.id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|c| c.parent_id == parent.id));
    }

    #[tokio::test]
    async fn update_and_delete() {
        let db = DbConnection::init_test().await.unwrap();
        let parent = seeded_parent(&db).await;
        let mut child = Child::new(
            &parent.id,
            "Max",
            NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
        );
        insert_child(db.pool(), &child).await.unwrap();

        child.notes = Some("Loves trains".into());
        update_child(db.pool(), &child).await.unwrap();
        let fetched = find_by_id(db.pool(), &child.id).await.unwrap().unwrap();
        assert_eq!(fetched.notes.as_deref(), Some("Loves trains"));

        assert!(delete_child(db.pool(), &child.id).await.unwrap());
        assert!(!delete_child(db.pool(), &child.id).await.unwrap());
        assert!(find_by_id(db.pool(), &child.id).await.unwrap().is_none());
    }
}
