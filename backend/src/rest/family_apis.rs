//! Handlers under `/api/family`.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use shared::{ApiResponse, FamilySummary};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

pub async fn current(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<Option<FamilySummary>>>, AppError> {
    info!("GET /api/family");
    let family = state.families.current(&caller).await?;
    Ok(Json(ApiResponse::ok(family)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinFamilyRequest {
    pub family_code: String,
}

pub async fn join(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<JoinFamilyRequest>,
) -> Result<Json<ApiResponse<FamilySummary>>, AppError> {
    info!("POST /api/family/join");
    let family = state.families.join_by_code(&caller, &request.family_code).await?;
    Ok(Json(ApiResponse::ok(family)))
}
