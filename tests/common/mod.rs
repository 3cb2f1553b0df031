// Shared helpers: an in-memory app and a thin request/response wrapper

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use fitness_tracker::api::{create_routes, AppState};
use fitness_tracker::config::{AppConfig, StorageBackend};
use fitness_tracker::database::Repositories;

pub fn test_config() -> AppConfig {
    AppConfig {
        storage_backend: StorageBackend::Memory,
        jwt_secret: "test_secret_key_for_testing_only".to_string(),
        bcrypt_cost: 4,
        ..AppConfig::default()
    }
}

pub fn create_test_app() -> Router {
    create_routes(AppState::new(test_config(), Repositories::in_memory()))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse { status, body }
}

/// Register `username` and return its token
pub async fn register(app: &Router, username: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123",
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED, "register failed: {}", response.body);
    response.body["token"].as_str().unwrap().to_string()
}

pub fn sample_workout() -> Value {
    json!({
        "name": "Leg day",
        "type": "strength",
        "duration": 45,
        "date": "2024-03-10T09:00:00Z",
        "exercises": [
            {"name": "Squat", "sets": 5, "reps": 5, "weight": 100, "caloriesBurned": 120},
            {"name": "Lunge", "sets": 3, "reps": 12, "caloriesBurned": 80}
        ]
    })
}
