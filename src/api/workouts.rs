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
use crate::models::{Workout, WorkoutPayload, WorkoutStats, WorkoutType};

const NOT_FOUND: &str = "Workout not found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutListQuery {
    #[serde(rename = "type")]
    pub workout_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

impl WorkoutListQuery {
    fn into_filter(self) -> Result<EntryFilter<WorkoutType>, ApiError> {
        let category = match self.workout_type.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                WorkoutType::from_str(raw)
                    .ok_or_else(|| ApiError::Validation(format!("Invalid workout type: {}", raw)))?,
            ),
            None => None,
        };

        Ok(EntryFilter {
            range: date_range(self.start_date.as_deref(), self.end_date.as_deref())?,
            category,
            limit: limit(self.limit)?,
        })
    }
}

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/stats/summary", get(workout_stats))
        .route("/:id", get(get_workout).put(update_workout).delete(delete_workout))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn list_workouts(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<WorkoutListQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<Workout>>>> {
    let filter = query.into_filter()?;
    let workouts = state.workouts.list(session.user_id, &filter).await?;
    Ok(Json(ApiResponse::list(workouts)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn get_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Workout>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let workout = state.workouts.get(session.user_id, id).await?;
    Ok(Json(ApiResponse::data(workout)))
}

#[tracing::instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
async fn create_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(payload), _): WithRejection<Json<WorkoutPayload>, ApiError>,
) -> ApiResult<Created<Workout>> {
    let workout = state.workouts.create(session.user_id, payload).await?;
    Ok(Created(ApiResponse::with_message("Workout created successfully", workout)))
}

#[tracing::instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
async fn update_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<WorkoutPayload>, ApiError>,
) -> ApiResult<Json<ApiResponse<Workout>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let workout = state.workouts.update(session.user_id, id, payload).await?;
    Ok(Json(ApiResponse::with_message("Workout updated successfully", workout)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn delete_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.workouts.delete(session.user_id, id).await?;
    Ok(Json(ApiResponse::message("Workout deleted successfully")))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn workout_stats(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> ApiResult<Json<ApiResponse<WorkoutStats>>> {
    let stats = state.stats.workout_stats(session.user_id, Utc::now()).await?;
    Ok(Json(ApiResponse::data(stats)))
}
