//! Handlers for milestone tracking.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::{ApiResponse, CompleteMilestoneRequest, CreateMilestoneRequest, MilestoneView};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateMilestoneRequest>,
) -> Result<Json<ApiResponse<MilestoneView>>, AppError> {
    info!("POST /api/milestones");
    let milestone = state.milestones.create(&caller, request).await?;
    Ok(Json(ApiResponse::ok(milestone)))
}

#[derive(Debug, Deserialize)]
pub struct ListMilestonesQuery {
    pub completed: Option<bool>,
}

pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(child_id): Path<String>,
    Query(query): Query<ListMilestonesQuery>,
) -> Result<Json<ApiResponse<Vec<MilestoneView>>>, AppError> {
    info!("GET /api/children/{child_id}/milestones");
    let milestones = state
        .milestones
        .list(&caller, &child_id, query.completed)
        .await?;
    Ok(Json(ApiResponse::ok(milestones)))
}

pub async fn complete(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CompleteMilestoneRequest>,
) -> Result<Json<ApiResponse<MilestoneView>>, AppError> {
    info!("POST /api/milestones/{id}/complete");
    let milestone = state.milestones.complete(&caller, &id, request).await?;
    Ok(Json(ApiResponse::ok(milestone)))
}
