// REST surface: handlers, extractors and response shapes

pub mod auth;
pub mod error;
pub mod health;
pub mod health_metrics;
pub mod nutrition;
pub mod params;
pub mod response;
pub mod routes;
pub mod state;
pub mod workouts;

pub use error::{ApiError, ApiResult};
pub use routes::create_routes;
pub use state::AppState;
