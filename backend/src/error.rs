//! API error taxonomy and its HTTP mapping.
//!
//! Services classify failures into these variants; the REST layer turns them
//! into status codes and JSON envelopes. Unclassified errors become a generic
//! 500 with the detail only server-logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shared::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("subscription tier {0} required")]
    SubscriptionRequired(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("AI service unavailable: {0}")]
    Upstream(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        AppError::Validation(errors)
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: &str) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Validation failed", "details": details }),
            ),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" }))
            }
            AppError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "Forbidden" })),
            AppError::SubscriptionRequired(tier) => (
                StatusCode::PAYMENT_REQUIRED,
                json!({ "error": format!("Subscription tier {tier} required") }),
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found or access denied") }),
            ),
            AppError::Upstream(detail) => {
                tracing::warn!("upstream AI failure: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "AI service temporarily unavailable. Please try again later." }),
                )
            }
            AppError::Internal(err) => {
                tracing::error!("internal error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = AppError::invalid_field("name", "required");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(
            AppError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::SubscriptionRequired("PREMIUM").into_response().status(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            AppError::NotFound("Child").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Upstream("down".into()).into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
