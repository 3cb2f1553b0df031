//! API Error Types
//!
//! Every failure a handler can produce converges here and is rendered as
//! `{success: false, message}` with the matching status code.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Request,
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StoreError;
use crate::models::ValidationError;
use crate::services::ServiceError;

const INTERNAL_MESSAGE: &str = "Something went wrong!";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Duplicate(String),

    /// Never shown to clients outside development
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Detail of an unhandled error, carried on the response for
/// [`expose_error_details`]
#[derive(Debug, Clone)]
pub struct InternalErrorDetail(pub String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Authentication(message) => (StatusCode::UNAUTHORIZED, message.clone()),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ApiError::Duplicate(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string()),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
        }));

        match self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Unhandled error");
                let mut response = (status, body).into_response();
                response.extensions_mut().insert(InternalErrorDetail(detail));
                response
            }
            other => {
                tracing::debug!(status = %status, error = %other, "Request rejected");
                (status, body).into_response()
            }
        }
    }
}

/// Development-only layer adding the internal error detail to 500 bodies
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<InternalErrorDetail>().cloned() {
        Some(InternalErrorDetail(detail)) => (
            response.status(),
            Json(json!({
                "success": false,
                "message": INTERNAL_MESSAGE,
                "error": detail,
            })),
        )
            .into_response(),
        None => response,
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.0)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => ApiError::Duplicate(format!("A record with this {} already exists", field)),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(err) => err.into(),
            ServiceError::NotFound(message) => ApiError::NotFound(message.to_string()),
            ServiceError::Store(err) => err.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_authentication_failure() {
            return ApiError::Authentication(err.to_string());
        }

        match err {
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::EmailAlreadyExists | AuthError::UsernameTaken => ApiError::Duplicate(err.to_string()),
            AuthError::Validation(err) => err.into(),
            AuthError::Password(err) if err.is_policy_violation() => ApiError::Validation(err.to_string()),
            AuthError::Store(err) => err.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
