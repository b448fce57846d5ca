//! Handlers under `/api/plans`.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use shared::{ApiResponse, PlanListItem, PlanListResponse, PlanStatus, UpdatePlanProgressRequest};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ListPlansQuery {
    pub status: Option<PlanStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<ApiResponse<PlanListResponse>>, AppError> {
    info!("GET /api/plans");
    let plans = state.plans.list(&caller, query.status).await?;
    Ok(Json(ApiResponse::ok(plans)))
}

pub async fn update_progress(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdatePlanProgressRequest>,
) -> Result<Json<ApiResponse<PlanListItem>>, AppError> {
    info!("PUT /api/plans/{id}/progress");
    let plan = state.plans.update_progress(&caller, &id, request).await?;
    Ok(Json(ApiResponse::ok(plan)))
}
