//! Domain layer: entity models plus one service per feature area. Services
//! own validation, authorization against the caller's claims, and storage
//! access; the REST layer stays a thin translation over them.

pub mod models;

pub mod activity_service;
pub mod ai_plan_service;
pub mod audit_service;
pub mod auth_service;
pub mod child_service;
pub mod family_service;
pub mod library_service;
pub mod milestone_service;
pub mod notification_service;
pub mod onboarding_service;
pub mod plan_service;

/// Per-request metadata recorded on audit rows.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestMeta {
    pub fn new(ip_address: Option<String>, user_agent: Option<String>) -> Self {
        Self { ip_address, user_agent }
    }
}
