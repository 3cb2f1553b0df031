use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::metrics_calculator::compute_bmi;
use super::{ServiceError, ServiceResult};
use crate::database::{EntryFilter, EntryRepository};
use crate::models::{HealthMetric, HealthMetricPayload, Validate};

const NOT_FOUND: &str = "Health metric not found";

#[derive(Clone)]
pub struct HealthMetricService {
    repo: Arc<dyn EntryRepository<HealthMetric>>,
}

impl HealthMetricService {
    pub fn new(repo: Arc<dyn EntryRepository<HealthMetric>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid, filter: &EntryFilter<()>) -> ServiceResult<Vec<HealthMetric>> {
        Ok(self.repo.list(owner, filter).await?)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> ServiceResult<HealthMetric> {
        self.repo.find(owner, id).await?.ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, owner: Uuid, payload: HealthMetricPayload) -> ServiceResult<HealthMetric> {
        payload.validate()?;

        let now = Utc::now();
        let metric = build_metric(Uuid::new_v4(), owner, payload, now, now, now);

        let stored = self.repo.insert(&metric).await?;
        info!(metric_id = %stored.id, user_id = %owner, "Health metric recorded");
        Ok(stored)
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, payload: HealthMetricPayload) -> ServiceResult<HealthMetric> {
        payload.validate()?;
        let existing = self.get(owner, id).await?;

        let metric = build_metric(
            existing.id,
            existing.user_id,
            payload,
            existing.date,
            existing.created_at,
            Utc::now(),
        );

        self.repo.replace(&metric).await?.ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        if self.repo.delete(owner, id).await? {
            info!(metric_id = %id, user_id = %owner, "Health metric deleted");
            Ok(())
        } else {
            Err(ServiceError::NotFound(NOT_FOUND))
        }
    }
}

fn build_metric(
    id: Uuid,
    owner: Uuid,
    payload: HealthMetricPayload,
    default_date: chrono::DateTime<Utc>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> HealthMetric {
    HealthMetric {
        id,
        user_id: owner,
        weight: payload.weight,
        height: payload.height,
        bmi: compute_bmi(payload.weight, payload.height),
        heart_rate: payload.heart_rate,
        blood_pressure: payload.blood_pressure.filter(|pressure| !pressure.is_empty()),
        sleep_duration: payload.sleep_duration,
        steps: payload.steps,
        water_intake: payload.water_intake,
        date: payload.date.unwrap_or(default_date),
        created_at,
        updated_at,
    }
}
