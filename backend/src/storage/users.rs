//! Query functions for the `users` table.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite};

use super::{
    enum_from_str, enum_to_str, opt_timestamp_from_db, opt_timestamp_to_db, timestamp_from_db,
    timestamp_to_db, value_from_json,
};
use crate::domain::models::User;

pub async fn insert_user<'e, E>(executor: E, user: &User) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash, role, subscription_tier, timezone, \
         language, preferences, onboarding_completed, last_login_at, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(enum_to_str(&user.role))
    .bind(enum_to_str(&user.subscription_tier))
    .bind(&user.timezone)
    .bind(&user.language)
    .bind(user.preferences.to_string())
    .bind(user.onboarding_completed)
    .bind(opt_timestamp_to_db(user.last_login_at))
    .bind(timestamp_to_db(user.created_at))
    .bind(timestamp_to_db(user.updated_at))
    .execute(executor)
    .await
    .context("failed to insert user")?;

    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch user by id")?;

    row.map(|r| map_user(&r)).transpose()
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM users WHERE email = ?")
        .bind(email.to_lowercase())
        .fetch_optional(executor)
        .await
        .context("failed to fetch user by email")?;

    row.map(|r| map_user(&r)).transpose()
}

/// Onboarding profile update: name, timezone, preference blob, and the
/// onboarding-completed flag in one statement.
pub async fn update_profile<'e, E>(
    executor: E,
    id: &str,
    name: &str,
    timezone: &str,
    preferences: &serde_json::Value,
    onboarding_completed: bool,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE users SET name = ?, timezone = ?, preferences = ?, onboarding_completed = ?, \
         updated_at = ? WHERE id = ?",
    )
    .bind(name)
    .bind(timezone)
    .bind(preferences.to_string())
    .bind(onboarding_completed)
    .bind(timestamp_to_db(Utc::now()))
    .bind(id)
    .execute(executor)
    .await
    .context("failed to update user profile")?;

    if result.rows_affected() == 0 {
        anyhow::bail!("user {id} not found");
    }
    Ok(())
}

pub async fn set_last_login<'e, E>(executor: E, id: &str, at: DateTime<Utc>) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
        .bind(timestamp_to_db(at))
        .bind(timestamp_to_db(at))
        .bind(id)
        .execute(executor)
        .await
        .context("failed to record last login")?;
    Ok(())
}

fn map_user(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        name: row.get("name"),
        password_hash: row.get("password_hash"),
        role: enum_from_str(row.get::<&str, _>("role"))?,
        subscription_tier: enum_from_str(row.get::<&str, _>("subscription_tier"))?,
        timezone: row.get("timezone"),
        language: row.get("language"),
        preferences: value_from_json(row.get::<&str, _>("preferences"))?,
        onboarding_completed: row.get("onboarding_completed"),
        last_login_at: opt_timestamp_from_db(row.get("last_login_at"))?,
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
        updated_at: timestamp_from_db(row.get::<&str, _>("updated_at"))?,
    })
}
