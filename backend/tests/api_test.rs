//! End-to-end tests over the HTTP surface: sign-up, onboarding, AI plan
//! generation, and the authorization failures between them.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use parentwise_backend::ai::{AiError, PlanGenerator, PlanPrompt};
use parentwise_backend::config::AppConfig;
use parentwise_backend::db::DbConnection;
use parentwise_backend::rest::{router, AppState};

struct ScriptedGenerator(&'static str);

#[async_trait]
impl PlanGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &PlanPrompt) -> Result<String, AiError> {
        Ok(self.0.to_string())
    }
}

const PLAN_REPLY: &str = r#"{
    "title": "Calmer Bedtimes for Leo",
    "description": "A three-month sleep plan.",
    "goals": {"primary": "Independent sleep", "secondary": [], "timeline": "3 months"},
    "strategies": {"daily": ["Fixed bedtime"], "weekly": [], "monthly": []},
    "timeline": {"week1": "Baseline"},
    "activities": ["Bedtime story"],
    "tips": ["Dim the lights"]
}"#;

async fn test_app(generator: Option<Arc<dyn PlanGenerator>>) -> axum::Router {
    let db = DbConnection::init_test().await.expect("test db");
    let config = AppConfig::for_tests();
    router(AppState::new(db, &config, generator), None)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_authed(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn sign_up(app: &axum::Router, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/api/auth/signup",
            None,
            json!({ "email": email, "password": "a strong password", "name": "Ana" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().expect("session token").to_string()
}

fn onboarding_body() -> Value {
    json!({
        "name": "Ana",
        "timezone": "Europe/Madrid",
        "familySetup": "create",
        "childName": "Leo",
        "childDateOfBirth": "2022-08-01",
        "childGender": "MALE",
        "childInterests": ["music"],
        "privacySettings": {
            "shareProgress": true,
            "allowAnalytics": false,
            "emailNotifications": true
        },
        "acceptTerms": true
    })
}

#[tokio::test]
async fn signup_onboarding_and_plan_generation_flow() {
    let app = test_app(Some(Arc::new(ScriptedGenerator(PLAN_REPLY)))).await;
    let token = sign_up(&app, "ana@example.com").await;

    let (status, body) = send(&app, post_json("/api/onboarding", Some(&token), onboarding_body())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["family"]["name"], "Ana's Family");
    let child_id = body["data"]["child"]["id"].as_str().unwrap().to_string();
    let family_code = body["data"]["family"]["familyCode"].as_str().unwrap();
    assert_eq!(family_code.len(), 6);

    let (status, body) = send(
        &app,
        post_json(
            "/api/ai/parenting-plan",
            Some(&token),
            json!({
                "childId": child_id,
                "parentingGoals": ["better sleep"],
                "timeline": "3_months"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plan"]["title"], "Calmer Bedtimes for Leo");
    assert_eq!(body["data"]["plan"]["status"], "DRAFT");
    assert_eq!(body["data"]["aiInsights"]["personalizedFor"], "Leo");

    let (status, body) = send(
        &app,
        get_authed(&format!("/api/ai/parenting-plan?childId={child_id}"), &token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["plans"].as_array().unwrap().len(), 1);

    // The onboarding welcome notification is there too.
    let (status, body) = send(&app, get_authed("/api/notifications?unread=true", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["title"], "Welcome to ParentWise!");
}

#[tokio::test]
async fn onboarding_requires_a_session() {
    let app = test_app(None).await;
    let (status, _body) = send(&app, post_json("/api/onboarding", None, onboarding_body())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _body) = send(
        &app,
        post_json("/api/onboarding", Some("pw_st_garbage.ffff"), onboarding_body()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn onboarding_validation_reports_every_field() {
    let app = test_app(None).await;
    let token = sign_up(&app, "ana@example.com").await;

    let mut body = onboarding_body();
    body["childName"] = json!("");
    body["acceptTerms"] = json!(false);
    let (status, response) = send(&app, post_json("/api/onboarding", Some(&token), body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = response["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"childName"));
    assert!(fields.contains(&"acceptTerms"));
}

#[tokio::test]
async fn plan_generation_for_foreign_child_is_404() {
    let app = test_app(Some(Arc::new(ScriptedGenerator(PLAN_REPLY)))).await;
    let owner_token = sign_up(&app, "owner@example.com").await;
    let (_, body) = send(&app, post_json("/api/onboarding", Some(&owner_token), onboarding_body())).await;
    let child_id = body["data"]["child"]["id"].as_str().unwrap().to_string();

    let intruder_token = sign_up(&app, "intruder@example.com").await;
    let (status, _) = send(
        &app,
        post_json(
            "/api/ai/parenting-plan",
            Some(&intruder_token),
            json!({ "childId": child_id, "parentingGoals": ["anything"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn plan_generation_without_api_key_is_503() {
    let app = test_app(None).await;
    let token = sign_up(&app, "ana@example.com").await;
    let (_, body) = send(&app, post_json("/api/onboarding", Some(&token), onboarding_body())).await;
    let child_id = body["data"]["child"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        post_json(
            "/api/ai/parenting-plan",
            Some(&token),
            json!({ "childId": child_id, "parentingGoals": ["better sleep"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn second_parent_joins_by_family_code() {
    let app = test_app(None).await;
    let first = sign_up(&app, "ana@example.com").await;
    let (_, body) = send(&app, post_json("/api/onboarding", Some(&first), onboarding_body())).await;
    let code = body["data"]["family"]["familyCode"].as_str().unwrap().to_string();

    let second = sign_up(&app, "sam@example.com").await;
    let mut join_body = onboarding_body();
    join_body["name"] = json!("Sam");
    join_body["familySetup"] = json!("join");
    join_body["familyCode"] = json!(code);
    join_body["childName"] = json!("Mia");
    let (status, body) = send(&app, post_json("/api/onboarding", Some(&second), join_body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["family"]["familyCode"], code);

    // Unknown code rolls the whole submission back.
    let third = sign_up(&app, "kim@example.com").await;
    let mut bad_body = onboarding_body();
    bad_body["familySetup"] = json!("join");
    bad_body["familyCode"] = json!("ZZZZZZ");
    let (status, _) = send(&app, post_json("/api/onboarding", Some(&third), bad_body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, me) = send(&app, get_authed("/api/auth/me", &third)).await;
    assert_eq!(me["data"]["onboardingCompleted"], false);
}
