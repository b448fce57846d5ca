//! Handlers for the activity catalog and activity logging.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use shared::{
    ActivityDifficulty, ActivityType, ActivityView, ApiResponse, CreateActivityRequest,
    LogActivityRequest,
};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::domain::activity_service::ActivityFilter;
use crate::error::AppError;

pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateActivityRequest>,
) -> Result<Json<ApiResponse<ActivityView>>, AppError> {
    info!("POST /api/activities");
    let activity = state.activities.create(&caller, request).await?;
    Ok(Json(ApiResponse::ok(activity)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListActivitiesQuery {
    #[serde(rename = "type")]
    pub activity_type: Option<ActivityType>,
    pub difficulty: Option<ActivityDifficulty>,
    pub max_duration: Option<i32>,
}

pub async fn list_for_child(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(child_id): Path<String>,
    Query(query): Query<ListActivitiesQuery>,
) -> Result<Json<ApiResponse<Vec<ActivityView>>>, AppError> {
    info!("GET /api/children/{child_id}/activities");
    let filter = ActivityFilter {
        activity_type: query.activity_type,
        difficulty: query.difficulty,
        max_duration: query.max_duration,
    };
    let activities = state
        .activities
        .list_for_child(&caller, &child_id, &filter)
        .await?;
    Ok(Json(ApiResponse::ok(activities)))
}

pub async fn log(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<LogActivityRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    info!("POST /api/activities/log");
    let log_id = state.activities.log(&caller, request).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": log_id }))))
}
