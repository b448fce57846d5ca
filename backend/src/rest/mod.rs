//! HTTP surface: application state, router assembly, and the request
//! extractors shared by the per-area handler modules.

pub mod activity_apis;
pub mod admin_apis;
pub mod ai_apis;
pub mod auth_apis;
pub mod child_apis;
pub mod family_apis;
pub mod library_apis;
pub mod milestone_apis;
pub mod notification_apis;
pub mod onboarding_apis;
pub mod plan_apis;

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::ai::{OpenAiGenerator, PlanGenerator};
use crate::auth::SessionClaims;
use crate::config::AppConfig;
use crate::db::DbConnection;
use crate::domain::activity_service::ActivityService;
use crate::domain::ai_plan_service::AiPlanService;
use crate::domain::audit_service::AuditService;
use crate::domain::auth_service::AuthService;
use crate::domain::child_service::ChildService;
use crate::domain::family_service::FamilyService;
use crate::domain::library_service::LibraryService;
use crate::domain::milestone_service::MilestoneService;
use crate::domain::notification_service::NotificationService;
use crate::domain::onboarding_service::OnboardingService;
use crate::domain::plan_service::PlanService;
use crate::domain::RequestMeta;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub onboarding: OnboardingService,
    pub children: ChildService,
    pub milestones: MilestoneService,
    pub activities: ActivityService,
    pub plans: PlanService,
    pub ai_plans: AiPlanService,
    pub notifications: NotificationService,
    pub families: FamilyService,
    pub library: LibraryService,
    pub audit: AuditService,
}

impl AppState {
    pub fn new(
        db: DbConnection,
        config: &AppConfig,
        generator: Option<Arc<dyn PlanGenerator>>,
    ) -> Self {
        Self {
            auth: AuthService::new(db.clone(), config.auth_secret.clone()),
            onboarding: OnboardingService::new(db.clone()),
            children: ChildService::new(db.clone()),
            milestones: MilestoneService::new(db.clone()),
            activities: ActivityService::new(db.clone()),
            plans: PlanService::new(db.clone()),
            ai_plans: AiPlanService::new(db.clone(), generator),
            notifications: NotificationService::new(db.clone()),
            families: FamilyService::new(db.clone()),
            library: LibraryService::new(db.clone()),
            audit: AuditService::new(db),
        }
    }

    /// State wired from config, building the real OpenAI-backed generator
    /// when an API key is configured.
    pub fn from_config(db: DbConnection, config: &AppConfig) -> anyhow::Result<Self> {
        let generator: Option<Arc<dyn PlanGenerator>> = match &config.openai {
            Some(openai) => Some(Arc::new(
                OpenAiGenerator::new(openai.clone())
                    .map_err(|e| anyhow::anyhow!("failed to build AI client: {e}"))?,
            )),
            None => None,
        };
        Ok(Self::new(db, config, generator))
    }
}

/// Bearer-token authentication for handlers that take an [`AuthUser`].
///
/// [`AuthUser`]: crate::auth::AuthUser
#[async_trait]
impl FromRequestParts<AppState> for SessionClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = header.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
        state.auth.authenticate(token)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestMeta {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Infallible> {
        let header_str = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let ip_address = header_str("x-forwarded-for").or_else(|| header_str("x-real-ip"));
        let user_agent = header_str("user-agent");
        Ok(RequestMeta::new(ip_address, user_agent))
    }
}

/// Assemble the full router. CORS is restricted to the configured origin, or
/// disabled entirely when none is set.
pub fn router(state: AppState, cors_origin: Option<&str>) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(auth_apis::sign_up))
        .route("/auth/signin", post(auth_apis::sign_in))
        .route("/auth/magic-link", post(auth_apis::request_magic_link))
        .route("/auth/magic-link/exchange", post(auth_apis::exchange_magic_link))
        .route("/auth/external", post(auth_apis::sign_in_external))
        .route("/auth/me", get(auth_apis::me))
        .route("/onboarding", post(onboarding_apis::complete))
        .route("/ai/parenting-plan", post(ai_apis::generate).get(ai_apis::list))
        .route("/children", post(child_apis::create).get(child_apis::list))
        .route("/children/:id", get(child_apis::get).put(child_apis::update))
        .route("/children/:id/milestones", get(milestone_apis::list))
        .route("/children/:id/activities", get(activity_apis::list_for_child))
        .route(
            "/children/:id/assessments",
            post(library_apis::create_assessment).get(library_apis::list_assessments),
        )
        .route("/milestones", post(milestone_apis::create))
        .route("/milestones/:id/complete", post(milestone_apis::complete))
        .route("/activities", post(activity_apis::create))
        .route("/activities/log", post(activity_apis::log))
        .route("/plans", get(plan_apis::list))
        .route("/plans/:id/progress", put(plan_apis::update_progress))
        .route("/content", post(library_apis::create_content).get(library_apis::list_content))
        .route("/notifications", get(notification_apis::list))
        .route("/notifications/:id/read", post(notification_apis::mark_read))
        .route("/family", get(family_apis::current))
        .route("/family/join", post(family_apis::join))
        .route("/admin/audit", get(admin_apis::list_audit));

    let mut router = Router::new().nest("/api", api).with_state(state);

    if let Some(origin) = cors_origin {
        if let Ok(origin) = origin.parse::<HeaderValue>() {
            let cors = CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::PUT])
                .allow_headers(Any);
            router = router.layer(cors);
        } else {
            tracing::warn!(origin, "ignoring unparseable CORS origin");
        }
    }

    router
}
