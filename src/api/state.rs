use std::sync::Arc;

use chrono::Duration;

use crate::auth::{AuthService, JwtService, PasswordPolicy};
use crate::config::AppConfig;
use crate::database::Repositories;
use crate::relay::{HubConfig, RelayHub};
use crate::services::{HealthMetricService, NutritionService, StatsService, WorkoutService};

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub workouts: WorkoutService,
    pub nutrition: NutritionService,
    pub health_metrics: HealthMetricService,
    pub stats: StatsService,
    pub relay: Arc<RelayHub>,
}

impl AppState {
    pub fn new(config: AppConfig, repositories: Repositories) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, Duration::hours(config.jwt_expires_in_hours));
        let auth_service = AuthService::new(
            repositories.users.clone(),
            jwt_service,
            PasswordPolicy::with_cost(config.bcrypt_cost),
        );

        Self {
            auth_service,
            workouts: WorkoutService::new(repositories.workouts.clone()),
            nutrition: NutritionService::new(repositories.nutrition.clone()),
            health_metrics: HealthMetricService::new(repositories.health_metrics.clone()),
            stats: StatsService::new(
                repositories.workouts,
                repositories.nutrition,
                repositories.health_metrics,
            ),
            relay: Arc::new(RelayHub::new(HubConfig::default())),
            config: Arc::new(config),
        }
    }
}
