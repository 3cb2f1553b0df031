use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::metrics_calculator::compute_nutrition_totals;
use super::{ServiceError, ServiceResult};
use crate::database::{EntryFilter, EntryRepository};
use crate::models::{MealType, NutritionEntry, NutritionPayload, Validate};

const NOT_FOUND: &str = "Nutrition entry not found";

#[derive(Clone)]
pub struct NutritionService {
    repo: Arc<dyn EntryRepository<NutritionEntry>>,
}

impl NutritionService {
    pub fn new(repo: Arc<dyn EntryRepository<NutritionEntry>>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, owner: Uuid, filter: &EntryFilter<MealType>) -> ServiceResult<Vec<NutritionEntry>> {
        Ok(self.repo.list(owner, filter).await?)
    }

    pub async fn get(&self, owner: Uuid, id: Uuid) -> ServiceResult<NutritionEntry> {
        self.repo.find(owner, id).await?.ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, owner: Uuid, payload: NutritionPayload) -> ServiceResult<NutritionEntry> {
        payload.validate()?;

        let now = Utc::now();
        let totals = compute_nutrition_totals(&payload.food_items);
        let entry = NutritionEntry {
            id: Uuid::new_v4(),
            user_id: owner,
            meal_type: payload.meal_type,
            food_items: payload.food_items,
            total_calories: totals.calories,
            total_protein: totals.protein,
            total_carbs: totals.carbs,
            total_fat: totals.fat,
            date: payload.date.unwrap_or(now),
            notes: payload.notes,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repo.insert(&entry).await?;
        info!(entry_id = %stored.id, user_id = %owner, meal_type = stored.meal_type.as_str(), "Nutrition entry created");
        Ok(stored)
    }

    pub async fn update(&self, owner: Uuid, id: Uuid, payload: NutritionPayload) -> ServiceResult<NutritionEntry> {
        payload.validate()?;
        let existing = self.get(owner, id).await?;

        let totals = compute_nutrition_totals(&payload.food_items);
        let entry = NutritionEntry {
            id: existing.id,
            user_id: existing.user_id,
            meal_type: payload.meal_type,
            food_items: payload.food_items,
            total_calories: totals.calories,
            total_protein: totals.protein,
            total_carbs: totals.carbs,
            total_fat: totals.fat,
            date: payload.date.unwrap_or(existing.date),
            notes: payload.notes,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.repo.replace(&entry).await?.ok_or(ServiceError::NotFound(NOT_FOUND))
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> ServiceResult<()> {
        if self.repo.delete(owner, id).await? {
            info!(entry_id = %id, user_id = %owner, "Nutrition entry deleted");
            Ok(())
        } else {
            Err(ServiceError::NotFound(NOT_FOUND))
        }
    }
}
