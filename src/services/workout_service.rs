use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::metrics_calculator::compute_workout_calories;
use super::{ServiceError, ServiceResult};
use crate::database::{EntryFilter, EntryRepository};
use crate::models::{Validate, Workout, WorkoutPayload, WorkoutType};

const NOT_FOUND: &str = "Workout not found";

#[derive(Clone)]
pub struct WorkoutService {
    repo: Arc<dyn EntryRepository<Workout>>,
}

impl WorkoutService {
    pub fn new(repo: Arc<dyn EntryRepository<Workout>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid, filter: &EntryFilter<WorkoutType>) -> ServiceResult<Vec<Workout>> {
        Ok(self.repo.list(owner, filter).await?)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> ServiceResult<Workout> {
        self.repo.find(owner, id).await?.ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, owner: Uuid, payload: WorkoutPayload) -> ServiceResult<Workout> {
        payload.validate()?;

        let now = Utc::now();
        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: owner,
            name: payload.name.trim().to_string(),
            workout_type: payload.workout_type,
            calories_burned: compute_workout_calories(&payload.exercises),
            exercises: payload.exercises,
            duration: payload.duration,
            date: payload.date.unwrap_or(now),
            notes: payload.notes,
            completed: payload.completed,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repo.insert(&workout).await?;
        info!(workout_id = %stored.id, user_id = %owner, "Workout created");
        Ok(stored)
    }

    /// Replace every client-supplied field; a payload without a date keeps the stored one
    pub async fn update(&self, owner: Uuid, id: Uuid, payload: WorkoutPayload) -> ServiceResult<Workout> {
        payload.validate()?;
        let existing = self.get(owner, id).await?;

        let workout = Workout {
            id: existing.id,
            user_id: existing.user_id,
            name: payload.name.trim().to_string(),
            workout_type: payload.workout_type,
            calories_burned: compute_workout_calories(&payload.exercises),
            exercises: payload.exercises,
            duration: payload.duration,
            date: payload.date.unwrap_or(existing.date),
            notes: payload.notes,
            completed: payload.completed,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.repo.replace(&workout).await?.ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        if self.repo.delete(owner, id).await? {
            info!(workout_id = %id, user_id = %owner, "Workout deleted");
            Ok(())
        } else {
            Err(ServiceError::NotFound(NOT_FOUND))
        }
    }
}
