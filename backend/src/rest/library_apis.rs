//! Handlers for child assessments and the content library.

use axum::extract::{Path, State};
use axum::Json;
use shared::{
    ApiResponse, AssessmentView, ContentView, CreateAssessmentRequest, CreateContentRequest,
};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

pub async fn create_assessment(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(child_id): Path<String>,
    Json(request): Json<CreateAssessmentRequest>,
) -> Result<Json<ApiResponse<AssessmentView>>, AppError> {
    info!("POST /api/children/{child_id}/assessments");
    let created = state
        .library
        .create_assessment(&caller, &child_id, request)
        .await?;
    Ok(Json(ApiResponse::ok(created)))
}

pub async fn list_assessments(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(child_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<AssessmentView>>>, AppError> {
    info!("GET /api/children/{child_id}/assessments");
    let listed = state.library.list_assessments(&caller, &child_id).await?;
    Ok(Json(ApiResponse::ok(listed)))
}

pub async fn create_content(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateContentRequest>,
) -> Result<Json<ApiResponse<ContentView>>, AppError> {
    info!("POST /api/content");
    let created = state.library.create_content(&caller, request).await?;
    Ok(Json(ApiResponse::ok(created)))
}

pub async fn list_content(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<Vec<ContentView>>>, AppError> {
    info!("GET /api/content");
    let listed = state.library.list_content(&caller).await?;
    Ok(Json(ApiResponse::ok(listed)))
}
