//! Handler for `POST /api/onboarding`.

use axum::extract::State;
use axum::Json;
use shared::{ApiResponse, OnboardingRequest, OnboardingResponse};
use tracing::info;

use super::AppState;
use crate::auth::AuthUser;
use crate::domain::RequestMeta;
use crate::error::AppError;

pub async fn complete(
    State(state): State<AppState>,
    caller: AuthUser,
    meta: RequestMeta,
    Json(request): Json<OnboardingRequest>,
) -> Result<Json<ApiResponse<OnboardingResponse>>, AppError> {
    info!("POST /api/onboarding");
    let response = state.onboarding.complete(&caller, request, &meta).await?;
    Ok(Json(ApiResponse::ok_with_message(
        response,
        "Onboarding completed successfully",
    )))
}
