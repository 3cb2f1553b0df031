use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use axum_extra::extract::WithRejection;

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::auth::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest, UpdateProfileRequest, UserSession};

/// Routes reachable without a token
pub fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes for the signed-in user; the caller layers the auth guard on top
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/profile", put(update_profile))
}

#[tracing::instrument(skip(state, request))]
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<Json<AuthResponse>> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state.auth_service.profile(session.user_id).await?;
    Ok(Json(ProfileResponse { success: true, user }))
}

#[tracing::instrument(skip(state, session, request), fields(user_id = %session.user_id))]
async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state.auth_service.update_profile(session.user_id, request.profile).await?;
    Ok(Json(ProfileResponse { success: true, user }))
}
