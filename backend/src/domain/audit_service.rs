//! Audit trail writes and the admin-only listing.

use anyhow::Result;
use chrono::Utc;
use shared::UserRole;
use sqlx::SqliteConnection;

use crate::auth::AuthUser;
use crate::db::DbConnection;
use crate::domain::models::AuditLog;
use crate::domain::RequestMeta;
use crate::error::AppError;
use crate::storage::audit;

/// Build an audit row. Writing is left to the caller so services can place
/// the insert inside their own transactions.
pub fn entry(
    user_id: Option<&str>,
    action: &str,
    resource: &str,
    resource_id: Option<&str>,
    new_values: Option<serde_json::Value>,
    meta: &RequestMeta,
) -> AuditLog {
    AuditLog {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.map(str::to_string),
        action: action.to_string(),
        resource: resource.to_string(),
        resource_id: resource_id.map(str::to_string),
        old_values: None,
        new_values,
        ip_address: meta.ip_address.clone(),
        user_agent: meta.user_agent.clone(),
        created_at: Utc::now(),
    }
}

/// Record an audit entry on the pool, outside any transaction.
pub async fn record(db: &DbConnection, log: &AuditLog) -> Result<()> {
    audit::insert_entry(db.pool(), log).await
}

/// Record an audit entry inside an open transaction.
pub async fn record_in(conn: &mut SqliteConnection, log: &AuditLog) -> Result<()> {
    audit::insert_entry(&mut *conn, log).await
}

/// Admin listing filters. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
}

#[derive(Clone)]
pub struct AuditService {
    db: DbConnection,
}

impl AuditService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Admin-only listing, newest first.
    pub async fn list(
        &self,
        caller: &AuthUser,
        filter: &AuditFilter,
        limit: i64,
    ) -> Result<Vec<AuditLog>, AppError> {
        caller.require_role(UserRole::Admin)?;
        let limit = limit.clamp(1, 200);
        Ok(audit::list_recent(
            self.db.pool(),
            filter.user_id.as_deref(),
            filter.resource.as_deref(),
            filter.action.as_deref(),
            limit,
        )
        .await?)
    }
}
