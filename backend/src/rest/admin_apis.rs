//! Admin-only handlers.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ApiResponse;
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::domain::audit_service::AuditFilter;
use crate::domain::models::AuditLog;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub user_id: Option<String>,
    pub resource: Option<String>,
    pub action: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntryView {
    pub id: String,
    pub user_id: Option<String>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<String>,
    pub new_values: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AuditLog> for AuditEntryView {
    fn from(log: AuditLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            action: log.action,
            resource: log.resource,
            resource_id: log.resource_id,
            new_values: log.new_values,
            ip_address: log.ip_address,
            user_agent: log.user_agent,
            created_at: log.created_at,
        }
    }
}

pub async fn list_audit(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<AuditQuery>,
) -> Result<Json<ApiResponse<Vec<AuditEntryView>>>, AppError> {
    info!("GET /api/admin/audit");
    let filter = AuditFilter {
        user_id: query.user_id,
        resource: query.resource,
        action: query.action,
    };
    let listed = state.audit.list(&caller, &filter, query.limit).await?;
    Ok(Json(ApiResponse::ok(
        listed.into_iter().map(AuditEntryView::from).collect(),
    )))
}
