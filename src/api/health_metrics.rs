use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde::Deserialize;

use super::error::{ApiError, ApiResult};
use super::params::{date_range, limit, parse_id};
use super::response::{ApiResponse, Created};
use super::state::AppState;
use crate::auth::UserSession;
use crate::database::EntryFilter;
use crate::models::{HealthMetric, HealthMetricPayload, HealthTrends};
use crate::services::stats_service::{DEFAULT_TREND_DAYS, MAX_TREND_DAYS};

const NOT_FOUND: &str = "Health metric not found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetricListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendsQuery {
    pub days: Option<i64>,
}

pub fn health_metric_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_metrics).post(create_metric))
        .route("/stats/trends", get(health_trends))
        .route("/:id", get(get_metric).put(update_metric).delete(delete_metric))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn list_metrics(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<HealthMetricListQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<HealthMetric>>>> {
    let filter = EntryFilter {
        range: date_range(query.start_date.as_deref(), query.end_date.as_deref())?,
        category: None,
        limit: limit(query.limit)?,
    };
    let metrics = state.health_metrics.list(session.user_id, &filter).await?;
    Ok(Json(ApiResponse::list(metrics)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn get_metric(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<HealthMetric>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let metric = state.health_metrics.get(session.user_id, id).await?;
    Ok(Json(ApiResponse::data(metric)))
}

#[tracing::instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
async fn create_metric(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(payload), _): WithRejection<Json<HealthMetricPayload>, ApiError>,
) -> ApiResult<Created<HealthMetric>> {
    let metric = state.health_metrics.create(session.user_id, payload).await?;
    Ok(Created(ApiResponse::with_message("Health metric created successfully", metric)))
}

#[tracing::instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
async fn update_metric(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<HealthMetricPayload>, ApiError>,
) -> ApiResult<Json<ApiResponse<HealthMetric>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let metric = state.health_metrics.update(session.user_id, id, payload).await?;
    Ok(Json(ApiResponse::with_message("Health metric updated successfully", metric)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn delete_metric(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.health_metrics.delete(session.user_id, id).await?;
    Ok(Json(ApiResponse::message("Health metric deleted successfully")))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn health_trends(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<TrendsQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<HealthTrends>>> {
    let days = query.days.unwrap_or(DEFAULT_TREND_DAYS);
    if !(1..=MAX_TREND_DAYS).contains(&days) {
        return Err(ApiError::Validation(format!("days must be between 1 and {}", MAX_TREND_DAYS)));
    }

    let trends = state.stats.health_trends(session.user_id, days, Utc::now()).await?;
    Ok(Json(ApiResponse::data(trends)))
}
