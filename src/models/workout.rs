use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date;
use super::validation::{at_least, non_negative, require_text, Validate, ValidationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Cardio,
    Strength,
    Flexibility,
    Hiit,
    Sports,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutType::Cardio => "cardio",
            WorkoutType::Strength => "strength",
            WorkoutType::Flexibility => "flexibility",
            WorkoutType::Hiit => "hiit",
            WorkoutType::Sports => "sports",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cardio" => Some(WorkoutType::Cardio),
            "strength" => Some(WorkoutType::Strength),
            "flexibility" => Some(WorkoutType::Flexibility),
            "hiit" => Some(WorkoutType::Hiit),
            "sports" => Some(WorkoutType::Sports),
            _ => None,
        }
    }
}

/// A single exercise line item, embedded in its workout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub name: String,
    pub sets: i32,
    pub reps: i32,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub calories_burned: f64,
}

impl Validate for Exercise {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "Please provide exercise name")?;
        at_least(self.sets, 1, "sets")?;
        at_least(self.reps, 1, "reps")?;
        non_negative(self.weight, "weight")?;
        non_negative(self.duration, "duration")?;
        non_negative(self.calories_burned, "caloriesBurned")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub exercises: Vec<Exercise>,
    /// Minutes
    pub duration: f64,
    pub calories_burned: f64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /workouts` and `PUT /workouts/:id`.
///
/// `caloriesBurned` is derived from the exercises and ignored if sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    pub duration: f64,
    #[serde(default, deserialize_with = "date::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Validate for WorkoutPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "Please provide workout name")?;
        non_negative(self.duration, "duration")?;
        for exercise in &self.exercises {
            exercise.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub total_workouts: i64,
    pub total_calories_burned: f64,
    pub total_duration: f64,
    pub avg_duration: f64,
}

/// Workouts grouped by weekday, numbered 1 (Sunday) to 7 (Saturday)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayStats {
    pub day_of_week: u32,
    pub workout_count: i64,
    pub calories_burned: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub summary: WorkoutSummary,
    pub weekly_stats: Vec<WeekdayStats>,
}
