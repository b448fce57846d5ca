//! Handlers under `/api/auth`.

use axum::extract::State;
use axum::Json;
use shared::{
    ApiResponse, CredentialsRequest, ExternalSignInRequest, MagicLinkExchangeRequest,
    MagicLinkRequest, MagicLinkResponse, SessionResponse, SignUpRequest, UserSummary,
};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::domain::RequestMeta;
use crate::error::AppError;

pub async fn sign_up(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    info!("POST /api/auth/signup");
    let session = state.auth.sign_up(request, &meta).await?;
    Ok(Json(ApiResponse::ok_with_message(session, "Account created")))
}

pub async fn sign_in(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    info!("POST /api/auth/signin");
    let session = state.auth.sign_in_credentials(request, &meta).await?;
    Ok(Json(ApiResponse::ok(session)))
}

pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(request): Json<MagicLinkRequest>,
) -> Result<Json<ApiResponse<MagicLinkResponse>>, AppError> {
    info!("POST /api/auth/magic-link");
    let issued = state.auth.request_magic_link(request).await?;
    Ok(Json(ApiResponse::ok(issued)))
}

pub async fn exchange_magic_link(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<MagicLinkExchangeRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    info!("POST /api/auth/magic-link/exchange");
    let session = state.auth.exchange_magic_link(request, &meta).await?;
    Ok(Json(ApiResponse::ok(session)))
}

pub async fn sign_in_external(
    State(state): State<AppState>,
    meta: RequestMeta,
    Json(request): Json<ExternalSignInRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, AppError> {
    info!("POST /api/auth/external");
    let session = state.auth.sign_in_external(request, &meta).await?;
    Ok(Json(ApiResponse::ok(session)))
}

/// The signed-in user's current profile, read fresh from the store.
pub async fn me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<ApiResponse<UserSummary>>, AppError> {
    info!("GET /api/auth/me");
    let user = state.auth.current_user(&caller).await?;
    Ok(Json(ApiResponse::ok(user)))
}
