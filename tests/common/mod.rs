#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use internship_portal::{
    config::{Config, LogFormat},
    models::identity::Identity,
    routes,
    services::otp_sender::OtpSender,
    utils::time::SystemClock,
    AppState, Collections,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub const DEMO_CODE: &str = "123456";

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        jwt_secret: "test_secret_key".into(),
        session_ttl_minutes: 60,
        otp_ttl_seconds: 300,
        otp_length: 6,
        otp_max_attempts: 3,
        otp_demo_code: Some(DEMO_CODE.into()),
        sweep_interval_secs: 60,
        public_rps: 1000,
        api_rps: 1000,
        reject_duplicate_applications: false,
        cors_allowed_origins: vec![],
        log_format: LogFormat::Pretty,
    }
}

pub fn setup_app_with(config: Config) -> (Router, AppState) {
    let state = AppState::new(&config).unwrap();
    (routes::router(state.clone(), &config), state)
}

/// Keeps the last code handed to it so tests can finish a login that uses
/// random codes.
#[derive(Default)]
pub struct CapturingSender {
    pub last_code: Mutex<Option<String>>,
}

#[async_trait]
impl OtpSender for CapturingSender {
    async fn send(&self, _identity: &Identity, code: &str) -> internship_portal::error::Result<()> {
        *self.last_code.lock().unwrap() = Some(code.to_string());
        Ok(())
    }
}

pub fn setup_app_with_sender(config: Config, sender: Arc<CapturingSender>) -> Router {
    let state = AppState::with_parts(
        &config,
        Collections::in_memory(),
        Arc::new(SystemClock),
        sender,
    )
    .unwrap();
    routes::router(state, &config)
}

pub fn setup_app() -> (Router, AppState) {
    setup_app_with(test_config())
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn candidate_body(national_id: &str, email: &str) -> JsonValue {
    json!({
        "name": "Arjun Kumar",
        "email": email,
        "role": "candidate",
        "national_id": national_id,
        "skills": ["React", "Node.js", "Python", "SQL"],
        "location": "Delhi",
        "phone": "+91-9876543210",
        "password": "demo123",
        "confirm_password": "demo123"
    })
}

pub fn admin_body(registration: &str, email: &str) -> JsonValue {
    json!({
        "name": "Rajesh Patel",
        "email": email,
        "role": "admin",
        "company_registration": registration,
        "company_name": "TechCorp Solutions Pvt Ltd",
        "skills": ["Technology"],
        "location": "Bangalore",
        "phone": "+91-9876543212",
        "password": "admin123",
        "confirm_password": "admin123"
    })
}

/// Registers an account and returns `(token, identity id)`.
pub async fn register(app: &Router, body: JsonValue) -> (String, String) {
    let (status, resp) = send(app, "POST", "/api/auth/register", None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", resp);
    (
        resp["token"].as_str().unwrap().to_string(),
        resp["identity"]["id"].as_str().unwrap().to_string(),
    )
}

pub async fn register_candidate(app: &Router) -> (String, String) {
    register(app, candidate_body("1234-5678-9012", "arjun@example.com")).await
}

pub async fn register_admin(app: &Router) -> (String, String) {
    register(app, admin_body("U12345AB1234PTC123456", "hr@techcorp.com")).await
}

pub fn listing_body(title: &str, sector: &str, location: &str, skills: &[&str]) -> JsonValue {
    json!({
        "title": title,
        "company": "TechCorp Solutions",
        "sector": sector,
        "location": location,
        "duration": "3 months",
        "stipend": "15000",
        "skills_required": skills,
        "description": "Join our dynamic team to work on web applications.",
        "deadline": "2024-02-15"
    })
}

pub async fn create_listing(app: &Router, admin_token: &str, body: JsonValue) -> JsonValue {
    let (status, resp) = send(app, "POST", "/api/listings", Some(admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", resp);
    resp
}
