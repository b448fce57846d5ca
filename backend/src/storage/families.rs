//! Query functions for families and family membership.

use anyhow::{Context, Result};
use rand::Rng;
use sqlx::sqlite::SqliteRow;
use sqlx::{Executor, Row, Sqlite, SqliteConnection};

use super::{timestamp_from_db, timestamp_to_db, value_from_json};
use crate::domain::models::{Family, FamilyMember};

const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LEN: usize = 6;
const MAX_CODE_ATTEMPTS: u32 = 16;

/// Draw a random 6-character uppercase alphanumeric family code.
pub fn generate_family_code<R: Rng>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_CHARS[rng.gen_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Generate a family code that is not already taken, retrying on collision.
/// Runs on a single connection so it can sit inside the onboarding
/// transaction.
pub async fn allocate_family_code<R: Rng>(
    conn: &mut SqliteConnection,
    rng: &mut R,
) -> Result<String> {
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = generate_family_code(rng);
        if !code_exists(&mut *conn, &code).await? {
            return Ok(code);
        }
    }
    anyhow::bail!("could not allocate a unique family code after {MAX_CODE_ATTEMPTS} attempts")
}

pub async fn code_exists<'e, E>(executor: E, code: &str) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT 1 FROM families WHERE family_code = ?")
        .bind(code)
        .fetch_optional(executor)
        .await
        .context("failed to check family code")?;
    Ok(row.is_some())
}

pub async fn insert_family<'e, E>(executor: E, family: &Family) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO families (id, name, description, family_code, settings, created_at, \
         updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&family.id)
    .bind(&family.name)
    .bind(&family.description)
    .bind(&family.family_code)
    .bind(family.settings.to_string())
    .bind(timestamp_to_db(family.created_at))
    .bind(timestamp_to_db(family.updated_at))
    .execute(executor)
    .await
    .context("failed to insert family")?;
    Ok(())
}

pub async fn find_by_id<'e, E>(executor: E, id: &str) -> Result<Option<Family>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM families WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
        .context("failed to fetch family by id")?;
    row.map(|r| map_family(&r)).transpose()
}

pub async fn find_by_code<'e, E>(executor: E, code: &str) -> Result<Option<Family>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM families WHERE family_code = ?")
        .bind(code)
        .fetch_optional(executor)
        .await
        .context("failed to fetch family by code")?;
    row.map(|r| map_family(&r)).transpose()
}

pub async fn insert_member<'e, E>(executor: E, member: &FamilyMember) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO family_members (id, family_id, user_id, role, is_owner, joined_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&member.id)
    .bind(&member.family_id)
    .bind(&member.user_id)
    .bind(&member.role)
    .bind(member.is_owner)
    .bind(timestamp_to_db(member.joined_at))
    .execute(executor)
    .await
    .context("failed to insert family member")?;
    Ok(())
}

/// The family a user belongs to, if any. Users hold at most one membership
/// in practice; the earliest one wins.
pub async fn find_membership<'e, E>(executor: E, user_id: &str) -> Result<Option<FamilyMember>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query(
        "SELECT * FROM family_members WHERE user_id = ? ORDER BY joined_at ASC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
    .context("failed to fetch family membership")?;
    row.map(|r| map_member(&r)).transpose()
}

fn map_family(row: &SqliteRow) -> Result<Family> {
    Ok(Family {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        family_code: row.get("family_code"),
        settings: value_from_json(row.get::<&str, _>("settings"))?,
        created_at: timestamp_from_db(row.get::<&str, _>("created_at"))?,
        updated_at: timestamp_from_db(row.get::<&str, _>("updated_at"))?,
    })
}

fn map_member(row: &SqliteRow) -> Result<FamilyMember> {
    Ok(FamilyMember {
        id: row.get("id"),
        family_id: row.get("family_id"),
        user_id: row.get("user_id"),
        role: row.get("role"),
        is_owner: row.get("is_owner"),
        joined_at: timestamp_from_db(row.get::<&str, _>("joined_at"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_codes_are_six_uppercase_alphanumerics() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = generate_family_code(&mut rng);
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| CODE_CHARS.contains(&b)));
        }
    }

    #[tokio::test]
    async fn allocation_skips_taken_codes() {
        let db = DbConnection::init_test().await.unwrap();

        // Pre-insert the first code a seeded rng would draw; allocation must
        // move on to the second.
        let mut rng = StdRng::seed_from_u64(42);
        let first = generate_family_code(&mut rng);
        let second = generate_family_code(&mut rng);
        assert_ne!(first, second);

        let family = Family::new("Taken", first.clone(), serde_json::json!({}));
        insert_family(db.pool(), &family).await.unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let allocated = allocate_family_code(&mut conn, &mut rng).await.unwrap();
        assert_eq!(allocated, second);
    }

    #[tokio::test]
    async fn family_round_trip_and_code_lookup() {
        let db = DbConnection::init_test().await.unwrap();
        let family = Family::new(
            "The Riveras",
            "AB12CD".to_string(),
            serde_json::json!({"shareProgress": true}),
        );
        insert_family(db.pool(), &family).await.unwrap();

        let fetched = find_by_code(db.pool(), "AB12CD").await.unwrap().unwrap();
        assert_eq!(fetched.id, family.id);
        assert_eq!(fetched.settings["shareProgress"], true);
        assert!(code_exists(db.pool(), "AB12CD").await.unwrap());
        assert!(!code_exists(db.pool(), "ZZZZZZ").await.unwrap());
    }

    #[tokio::test]
    async fn membership_is_unique_per_family_and_user() {
        let db = DbConnection::init_test().await.unwrap();
        let user = crate::domain::models::User::new("m@e.co", None);
        crate::storage::users::insert_user(db.pool(), &user).await.unwrap();
        let family = Family::new("F", "CODE01".to_string(), serde_json::json!({}));
        insert_family(db.pool(), &family).await.unwrap();

        let member = FamilyMember::new(&family.id, &user.id, "PARENT", true);
        insert_member(db.pool(), &member).await.unwrap();
        let dup = FamilyMember::new(&family.id, &user.id, "PARENT", false);
        assert!(insert_member(db.pool(), &dup).await.is_err());

        let found = find_membership(db.pool(), &user.id).await.unwrap().unwrap();
        assert_eq!(found.family_id, family.id);
        assert!(found.is_owner);
    }
}
