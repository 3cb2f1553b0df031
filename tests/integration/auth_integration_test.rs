use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{create_test_app, register, send};

#[cfg(test)]
mod auth_integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_user_registration() {
        let app = create_test_app();

        let response = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "username": "t1",
                "email": "T1@Example.com",
                "password": "secret123",
                "profile": {"firstName": "Tess", "height": 170}
            })),
        )
        .await;

        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body["success"], true);
        assert!(response.body["token"].is_string());
        assert_eq!(response.body["expiresIn"], 168 * 3600);
        assert!(response.body["user"]["id"].is_string());
        assert_eq!(response.body["user"]["email"], "t1@example.com");
        assert_eq!(response.body["user"]["profile"]["firstName"], "Tess");
        assert!(response.body["user"]["passwordHash"].is_null());
        assert!(response.body["user"]["password"].is_null());
    }

    #[tokio::test]
    async fn test_user_registration_validation() {
        let app = create_test_app();

        let invalid_email = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "t1", "email": "invalid-email", "password": "secret123"})),
        )
        .await;
        assert_eq!(invalid_email.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid_email.body["success"], false);

        let short_password = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "t1", "email": "t1@example.com", "password": "abc"})),
        )
        .await;
        assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

        let missing_username = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"email": "t1@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(missing_username.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_duplicate_registration_is_rejected() {
        let app = create_test_app();
        register(&app, "t1").await;

        let same_email = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "other", "email": "t1@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(same_email.status, StatusCode::BAD_REQUEST);
        assert_eq!(same_email.body["message"], "User with this email already exists");

        let same_username = send(
            &app,
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({"username": "t1", "email": "fresh@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(same_username.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login() {
        let app = create_test_app();
        register(&app, "t1").await;

        let ok = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "t1@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(ok.status, StatusCode::OK);
        assert_eq!(ok.body["user"]["username"], "t1");
        assert!(ok.body["token"].is_string());

        let wrong_password = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "t1@example.com", "password": "wrong-password"})),
        )
        .await;
        assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.body["message"], "Invalid credentials");

        let unknown_email = send(
            &app,
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "nobody@example.com", "password": "secret123"})),
        )
        .await;
        assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.body["message"], "Invalid credentials");
    }

    #[tokio::test]
    async fn test_current_user_requires_token() {
        let app = create_test_app();

        let missing = send(&app, Method::GET, "/api/auth/me", None, None).await;
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.body["message"], "No token, authorization denied");

        let invalid = send(&app, Method::GET, "/api/auth/me", Some("not-a-jwt"), None).await;
        assert_eq!(invalid.status, StatusCode::UNAUTHORIZED);
        assert_eq!(invalid.body["message"], "Token is not valid");
    }

    #[tokio::test]
    async fn test_current_user_and_profile_update() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let me = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(me.status, StatusCode::OK);
        assert_eq!(me.body["user"]["username"], "t1");

        let updated = send(
            &app,
            Method::PUT,
            "/api/auth/profile",
            Some(&token),
            Some(json!({"profile": {"firstName": "Ada", "weight": 61.5, "gender": "female"}})),
        )
        .await;
        assert_eq!(updated.status, StatusCode::OK);
        assert_eq!(updated.body["user"]["profile"]["firstName"], "Ada");
        assert_eq!(updated.body["user"]["profile"]["weight"], 61.5);

        let me_again = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(me_again.body["user"]["profile"]["gender"], "female");

        let invalid = send(
            &app,
            Method::PUT,
            "/api/auth/profile",
            Some(&token),
            Some(json!({"profile": {"gender": "robot"}})),
        )
        .await;
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    }
}
