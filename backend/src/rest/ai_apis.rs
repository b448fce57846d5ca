//! Handlers under `/api/ai/parenting-plan`.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use shared::{ApiResponse, GeneratePlanRequest, GeneratePlanResponse, PlanListResponse};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::domain::RequestMeta;
use crate::error::AppError;

pub async fn generate(
    State(state): State<AppState>,
    caller: AuthUser,
    meta: RequestMeta,
    Json(request): Json<GeneratePlanRequest>,
) -> Result<Json<ApiResponse<GeneratePlanResponse>>, AppError> {
    info!("POST /api/ai/parenting-plan");
    let response = state.ai_plans.generate(&caller, request, &meta).await?;
    Ok(Json(ApiResponse::ok_with_message(
        response,
        "AI parenting plan generated successfully",
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPlansQuery {
    pub child_id: String,
}

pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<ListPlansQuery>,
) -> Result<Json<ApiResponse<PlanListResponse>>, AppError> {
    info!("GET /api/ai/parenting-plan - childId: {}", query.child_id);
    let response = state.ai_plans.list_for_child(&caller, &query.child_id).await?;
    Ok(Json(ApiResponse::ok(response)))
}
