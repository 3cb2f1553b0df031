use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use super::state::AppState;

/// `GET /api/health`
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Fitness Tracker API is running!",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "database": state.config.storage_backend.as_str(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
