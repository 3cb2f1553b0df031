use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date;
use super::validation::{non_negative, require_text, Validate, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A food line item; macro values are per unit of `quantity`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub quantity: f64,
    pub unit: String,
}

impl Validate for FoodItem {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "Please provide food name")?;
        non_negative(self.calories, "calories")?;
        non_negative(self.protein, "protein")?;
        non_negative(self.carbs, "carbs")?;
        non_negative(self.fat, "fat")?;
        non_negative(self.quantity, "quantity")?;
        require_text(&self.unit, "Please provide a unit for each food item")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl std::ops::Add for MacroTotals {
    type Output = MacroTotals;

    fn add(self, other: MacroTotals) -> MacroTotals {
        MacroTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_type: MealType,
    pub food_items: Vec<FoodItem>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NutritionEntry {
    pub fn totals(&self) -> MacroTotals {
        MacroTotals {
            calories: self.total_calories,
            protein: self.total_protein,
            carbs: self.total_carbs,
            fat: self.total_fat,
        }
    }
}

/// Body of `POST /nutrition` and `PUT /nutrition/:id`; totals are derived
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPayload {
    pub meal_type: MealType,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
    #[serde(default, deserialize_with = "date::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Validate for NutritionPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        for item in &self.food_items {
            item.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub total_entries: i64,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub avg_calories: f64,
}

/// Totals for one calendar day (`YYYY-MM-DD`, UTC)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyNutrition {
    pub day: String,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStats {
    pub summary: NutritionSummary,
    pub daily_stats: Vec<DailyNutrition>,
}
