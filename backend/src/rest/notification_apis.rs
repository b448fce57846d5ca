//! Handlers under `/api/notifications`.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use shared::{ApiResponse, NotificationView};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    #[serde(default)]
    pub unread: bool,
}

pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<ListNotificationsQuery>,
) -> Result<Json<ApiResponse<Vec<NotificationView>>>, AppError> {
    info!("GET /api/notifications");
    let notifications = state.notifications.list(&caller, query.unread).await?;
    Ok(Json(ApiResponse::ok(notifications)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    info!("POST /api/notifications/{id}/read");
    state.notifications.mark_read(&caller, &id).await?;
    Ok(Json(ApiResponse::ok(json!({ "read": true }))))
}
