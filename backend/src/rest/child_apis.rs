//! Handlers under `/api/children`.

use axum::extract::{Path, State};
use axum::Json;
use shared::{ApiResponse, ChildView, CreateChildRequest, UpdateChildRequest};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::error::AppError;

pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(request): Json<CreateChildRequest>,
) -> Result<Json<ApiResponse<ChildView>>, AppError> {
    info!("POST /api/children");
    let child = state.children.create(&caller, request).await?;
    Ok(Json(ApiResponse::ok(child)))
}

pub async fn list(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<Vec<ChildView>>>, AppError> {
    info!("GET /api/children");
    let children = state.children.list(&caller).await?;
    Ok(Json(ApiResponse::ok(children)))
}

pub async fn get(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ChildView>>, AppError> {
    info!("GET /api/children/{id}");
    let child = state.children.get(&caller, &id).await?;
    Ok(Json(ApiResponse::ok(child)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<UpdateChildRequest>,
) -> Result<Json<ApiResponse<ChildView>>, AppError> {
    info!("PUT /api/children/{id}");
    let child = state.children.update(&caller, &id, request).await?;
    Ok(Json(ApiResponse::ok(child)))
}
