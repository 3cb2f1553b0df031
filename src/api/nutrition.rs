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
use super::params::{date_range, limit, parse_id, single_day};
use super::response::{ApiResponse, Created};
use super::state::AppState;
use crate::auth::UserSession;
use crate::database::EntryFilter;
use crate::models::{MealType, NutritionEntry, NutritionPayload, NutritionStats};

const NOT_FOUND: &str = "Nutrition entry not found";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionListQuery {
    /// A single calendar day; takes precedence over `startDate`/`endDate`
    pub date: Option<String>,
    pub meal_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<i64>,
}

impl NutritionListQuery {
    fn into_filter(self) -> Result<EntryFilter<MealType>, ApiError> {
        let range = match self.date.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(day) => single_day(day)?,
            None => date_range(self.start_date.as_deref(), self.end_date.as_deref())?,
        };

        let category = match self.meal_type.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                MealType::from_str(raw)
                    .ok_or_else(|| ApiError::Validation(format!("Invalid meal type: {}", raw)))?,
            ),
            None => None,
        };

        Ok(EntryFilter {
            range,
            category,
            limit: limit(self.limit)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_entries).post(create_entry))
        .route("/stats/summary", get(nutrition_stats))
        .route("/:id", get(get_entry).put(update_entry).delete(delete_entry))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn list_entries(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<NutritionListQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<Vec<NutritionEntry>>>> {
    let filter = query.into_filter()?;
    let entries = state.nutrition.list(session.user_id, &filter).await?;
    Ok(Json(ApiResponse::list(entries)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn get_entry(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<NutritionEntry>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let entry = state.nutrition.get(session.user_id, id).await?;
    Ok(Json(ApiResponse::data(entry)))
}

#[tracing::instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
async fn create_entry(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Json(payload), _): WithRejection<Json<NutritionPayload>, ApiError>,
) -> ApiResult<Created<NutritionEntry>> {
    let entry = state.nutrition.create(session.user_id, payload).await?;
    Ok(Created(ApiResponse::with_message("Nutrition entry created successfully", entry)))
}

#[tracing::instrument(skip(state, session, payload), fields(user_id = %session.user_id))]
async fn update_entry(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<NutritionPayload>, ApiError>,
) -> ApiResult<Json<ApiResponse<NutritionEntry>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    let entry = state.nutrition.update(session.user_id, id, payload).await?;
    Ok(Json(ApiResponse::with_message("Nutrition entry updated successfully", entry)))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn delete_entry(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<()>>> {
    let id = parse_id(&id, NOT_FOUND)?;
    state.nutrition.delete(session.user_id, id).await?;
    Ok(Json(ApiResponse::message("Nutrition entry deleted successfully")))
}

#[tracing::instrument(skip(state, session), fields(user_id = %session.user_id))]
async fn nutrition_stats(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    WithRejection(Query(query), _): WithRejection<Query<NutritionStatsQuery>, ApiError>,
) -> ApiResult<Json<ApiResponse<NutritionStats>>> {
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let stats = state.stats.nutrition_stats(session.user_id, range, Utc::now()).await?;
    Ok(Json(ApiResponse::data(stats)))
}
