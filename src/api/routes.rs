use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::auth::{account_routes, public_auth_routes};
use super::error::{expose_error_details, ApiError};
use super::health::health_check;
use super::health_metrics::health_metric_routes;
use super::nutrition::nutrition_routes;
use super::state::AppState;
use super::workouts::workout_routes;
use crate::auth::{cors_layer, jwt_auth_middleware, security_headers_layer};
use crate::relay::relay_handler;

pub fn create_routes(state: AppState) -> Router {
    let auth_guard = from_fn_with_state(state.auth_service.clone(), jwt_auth_middleware);

    let auth = public_auth_routes().merge(account_routes().route_layer(auth_guard.clone()));

    let records = Router::new()
        .nest("/workouts", workout_routes())
        .nest("/nutrition", nutrition_routes())
        .nest("/health-metrics", health_metric_routes())
        .route_layer(auth_guard);

    let api = Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(relay_handler))
        .nest("/auth", auth)
        .merge(records);

    let mut router = Router::new().nest("/api", api).fallback(route_not_found);

    if state.config.is_development() {
        router = router.layer(from_fn(expose_error_details));
    }

    router
        .layer(security_headers_layer())
        .layer(cors_layer(&state.config.client_url))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .with_state(state)
}

/// Path only: the relay accepts its token in the query string
fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
