//! SQLite connection management and schema setup.

use std::sync::Arc;

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Executor, Sqlite, SqlitePool};

/// Shared handle to the SQLite pool. Cheap to clone; every service holds one.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Connect to the given database URL, creating the database file and
    /// schema if they do not exist yet.
    pub async fn new(url: &str) -> Result<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePool::connect(url).await?;
        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database with a unique name, so tests
    /// never share state.
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);
        Self::new(&url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create all tables. Timestamps and dates are stored as RFC 3339 /
    /// ISO 8601 text; list and blob columns hold JSON text.
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Executor::execute on a raw string runs every statement in the batch.
        pool.execute(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT,
                password_hash TEXT,
                role TEXT NOT NULL,
                subscription_tier TEXT NOT NULL,
                timezone TEXT NOT NULL,
                language TEXT NOT NULL,
                preferences TEXT NOT NULL,
                onboarding_completed INTEGER NOT NULL DEFAULT 0,
                last_login_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS families (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT,
                family_code TEXT NOT NULL UNIQUE,
                settings TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS family_members (
                id TEXT PRIMARY KEY,
                family_id TEXT NOT NULL REFERENCES families(id),
                user_id TEXT NOT NULL REFERENCES users(id),
                role TEXT NOT NULL,
                is_owner INTEGER NOT NULL DEFAULT 0,
                joined_at TEXT NOT NULL,
                UNIQUE (family_id, user_id)
            );

            CREATE TABLE IF NOT EXISTS children (
                id TEXT PRIMARY KEY,
                parent_id TEXT NOT NULL REFERENCES users(id),
                family_id TEXT REFERENCES families(id),
                name TEXT NOT NULL,
                gender TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                interests TEXT NOT NULL,
                allergies TEXT NOT NULL,
                medications TEXT NOT NULL,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS milestones (
                id TEXT PRIMARY KEY,
                child_id TEXT NOT NULL REFERENCES children(id),
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                age_range_min INTEGER NOT NULL,
                age_range_max INTEGER NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0,
                completed_at TEXT,
                notes TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activities (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                instructions TEXT NOT NULL,
                age_range_min INTEGER NOT NULL,
                age_range_max INTEGER NOT NULL,
                duration INTEGER NOT NULL,
                difficulty TEXT NOT NULL,
                activity_type TEXT NOT NULL,
                materials TEXT NOT NULL,
                tags TEXT NOT NULL,
                is_premium INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS activity_logs (
                id TEXT PRIMARY KEY,
                activity_id TEXT NOT NULL REFERENCES activities(id),
                child_id TEXT NOT NULL REFERENCES children(id),
                user_id TEXT NOT NULL REFERENCES users(id),
                completed_at TEXT NOT NULL,
                duration INTEGER,
                enjoyment INTEGER,
                difficulty INTEGER,
                notes TEXT,
                observations TEXT,
                skills TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS parenting_plans (
                id TEXT PRIMARY KEY,
                parent_id TEXT NOT NULL REFERENCES users(id),
                child_id TEXT REFERENCES children(id),
                family_id TEXT REFERENCES families(id),
                title TEXT NOT NULL,
                description TEXT,
                goals TEXT NOT NULL,
                strategies TEXT NOT NULL,
                timeline TEXT NOT NULL,
                status TEXT NOT NULL,
                progress INTEGER NOT NULL DEFAULT 0,
                tags TEXT NOT NULL,
                ai_prompts TEXT,
                completed_at TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                notification_type TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                data TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS audit_logs (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                action TEXT NOT NULL,
                resource TEXT NOT NULL,
                resource_id TEXT,
                old_values TEXT,
                new_values TEXT,
                ip_address TEXT,
                user_agent TEXT,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS child_assessments (
                id TEXT PRIMARY KEY,
                child_id TEXT NOT NULL REFERENCES children(id),
                title TEXT NOT NULL,
                assessment_type TEXT NOT NULL,
                questions TEXT NOT NULL,
                scores TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS content_library (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                content_type TEXT NOT NULL,
                body TEXT NOT NULL,
                tags TEXT NOT NULL,
                is_premium INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn schema_setup_is_idempotent() {
        let db = DbConnection::init_test().await.expect("init");
        DbConnection::setup_schema(db.pool()).await.expect("rerun");
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let a = DbConnection::init_test().await.unwrap();
        let b = DbConnection::init_test().await.unwrap();

        sqlx::query(
            "INSERT INTO families (id, name, family_code, settings, created_at, updated_at) \
             VALUES ('f1', 'A', 'ABC123', '{}', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(a.pool())
        .await
        .unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM families")
            .fetch_one(b.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
