// Business logic services

pub mod health_metric_service;
pub mod metrics_calculator;
pub mod nutrition_service;
pub mod stats_service;
pub mod workout_service;

pub use health_metric_service::HealthMetricService;
pub use nutrition_service::NutritionService;
pub use stats_service::StatsService;
pub use workout_service::WorkoutService;

use thiserror::Error;

use crate::database::StoreError;
use crate::models::ValidationError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing, or owned by another user
    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
