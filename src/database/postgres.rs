//! PostgreSQL repositories.
//!
//! Embedded line items (exercises, food items) live in JSONB columns. Type
//! enums are stored as their lowercase names in TEXT columns. Each list query
//! takes every optional filter as a nullable parameter, so one statement
//! covers all filter combinations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{EntryFilter, EntryRepository, StoreError, UserRepository};
use crate::models::{
    BloodPressure, CreateUser, Exercise, FoodItem, HealthMetric, MealType, NutritionEntry, User,
    UserProfile, Workout, WorkoutType,
};

/// Translate unique-constraint violations into `StoreError::Duplicate`
fn map_unique_violation(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(name) if name.contains("email") => "email",
                Some(name) if name.contains("username") => "username",
                _ => "record",
            };
            return StoreError::Duplicate(field.to_string());
        }
    }
    StoreError::Database(err)
}

// Users

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     date_of_birth, gender, height, weight, created_at, updated_at";

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    date_of_birth: Option<NaiveDate>,
    gender: Option<String>,
    height: Option<f64>,
    weight: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            profile: UserProfile {
                first_name: row.first_name,
                last_name: row.last_name,
                date_of_birth: row.date_of_birth,
                gender: row.gender,
                height: row.height,
                weight: row.weight,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: CreateUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (id, username, email, password_hash, first_name, last_name, \
             date_of_birth, gender, height, weight, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11) \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.profile.first_name)
            .bind(&user.profile.last_name)
            .bind(user.profile.date_of_birth)
            .bind(&user.profile.gender)
            .bind(user.profile.height)
            .bind(user.profile.weight)
            .bind(Utc::now())
            .fetch_one(&self.db)
            .await
            .map_err(map_unique_violation)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(User::from))
    }

    async fn update_profile(&self, id: Uuid, profile: &UserProfile) -> Result<Option<User>, StoreError> {
        let query = format!(
            "UPDATE users SET first_name = $2, last_name = $3, date_of_birth = $4, gender = $5, \
             height = $6, weight = $7, updated_at = $8 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(profile.date_of_birth)
            .bind(&profile.gender)
            .bind(profile.height)
            .bind(profile.weight)
            .bind(Utc::now())
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(User::from))
    }
}

// Workouts

const WORKOUT_COLUMNS: &str = "id, user_id, name, workout_type, exercises, duration, \
     calories_burned, date, notes, completed, created_at, updated_at";

#[derive(FromRow)]
struct WorkoutRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    workout_type: String,
    exercises: Json<Vec<Exercise>>,
    duration: f64,
    calories_burned: f64,
    date: DateTime<Utc>,
    notes: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WorkoutRow> for Workout {
    type Error = StoreError;

    fn try_from(row: WorkoutRow) -> Result<Self, Self::Error> {
        let workout_type = WorkoutType::from_str(&row.workout_type)
            .ok_or_else(|| StoreError::Decode(format!("unknown workout type '{}'", row.workout_type)))?;

        Ok(Workout {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            workout_type,
            exercises: row.exercises.0,
            duration: row.duration,
            calories_burned: row.calories_burned,
            date: row.date,
            notes: row.notes,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgWorkoutRepository {
    db: PgPool,
}

impl PgWorkoutRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryRepository<Workout> for PgWorkoutRepository {
    async fn list(&self, owner: Uuid, filter: &EntryFilter<WorkoutType>) -> Result<Vec<Workout>, StoreError> {
        let query = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts \
             WHERE user_id = $1 \
               AND ($2::timestamptz IS NULL OR date >= $2) \
               AND ($3::timestamptz IS NULL OR date <= $3) \
               AND ($4::text IS NULL OR workout_type = $4) \
             ORDER BY date DESC \
             LIMIT $5"
        );

        let rows = sqlx::query_as::<_, WorkoutRow>(&query)
            .bind(owner)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.category.map(|kind| kind.as_str()))
            .bind(filter.limit)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(Workout::try_from).collect()
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<Workout>, StoreError> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, WorkoutRow>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;

        row.map(Workout::try_from).transpose()
    }

    async fn insert(&self, workout: &Workout) -> Result<Workout, StoreError> {
        let query = format!(
            "INSERT INTO workouts (id, user_id, name, workout_type, exercises, duration, \
             calories_burned, date, notes, completed, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {WORKOUT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, WorkoutRow>(&query)
            .bind(workout.id)
            .bind(workout.user_id)
            .bind(&workout.name)
            .bind(workout.workout_type.as_str())
            .bind(Json(&workout.exercises))
            .bind(workout.duration)
            .bind(workout.calories_burned)
            .bind(workout.date)
            .bind(&workout.notes)
            .bind(workout.completed)
            .bind(workout.created_at)
            .bind(workout.updated_at)
            .fetch_one(&self.db)
            .await
            .map_err(map_unique_violation)?;

        Workout::try_from(row)
    }

    async fn replace(&self, workout: &Workout) -> Result<Option<Workout>, StoreError> {
        let query = format!(
            "UPDATE workouts SET name = $3, workout_type = $4, exercises = $5, duration = $6, \
             calories_burned = $7, date = $8, notes = $9, completed = $10, updated_at = $11 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {WORKOUT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, WorkoutRow>(&query)
            .bind(workout.id)
            .bind(workout.user_id)
            .bind(&workout.name)
            .bind(workout.workout_type.as_str())
            .bind(Json(&workout.exercises))
            .bind(workout.duration)
            .bind(workout.calories_burned)
            .bind(workout.date)
            .bind(&workout.notes)
            .bind(workout.completed)
            .bind(workout.updated_at)
            .fetch_optional(&self.db)
            .await?;

        row.map(Workout::try_from).transpose()
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Nutrition

const NUTRITION_COLUMNS: &str = "id, user_id, meal_type, food_items, total_calories, \
     total_protein, total_carbs, total_fat, date, notes, created_at, updated_at";

#[derive(FromRow)]
struct NutritionRow {
    id: Uuid,
    user_id: Uuid,
    meal_type: String,
    food_items: Json<Vec<FoodItem>>,
    total_calories: f64,
    total_protein: f64,
    total_carbs: f64,
    total_fat: f64,
    date: DateTime<Utc>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<NutritionRow> for NutritionEntry {
    type Error = StoreError;

    fn try_from(row: NutritionRow) -> Result<Self, Self::Error> {
        let meal_type = MealType::from_str(&row.meal_type)
            .ok_or_else(|| StoreError::Decode(format!("unknown meal type '{}'", row.meal_type)))?;

        Ok(NutritionEntry {
            id: row.id,
            user_id: row.user_id,
            meal_type,
            food_items: row.food_items.0,
            total_calories: row.total_calories,
            total_protein: row.total_protein,
            total_carbs: row.total_carbs,
            total_fat: row.total_fat,
            date: row.date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgNutritionRepository {
    db: PgPool,
}

impl PgNutritionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryRepository<NutritionEntry> for PgNutritionRepository {
    async fn list(
        &self,
        owner: Uuid,
        filter: &EntryFilter<MealType>,
    ) -> Result<Vec<NutritionEntry>, StoreError> {
        let query = format!(
            "SELECT {NUTRITION_COLUMNS} FROM nutrition_entries \
             WHERE user_id = $1 \
               AND ($2::timestamptz IS NULL OR date >= $2) \
               AND ($3::timestamptz IS NULL OR date <= $3) \
               AND ($4::text IS NULL OR meal_type = $4) \
             ORDER BY date DESC \
             LIMIT $5"
        );

        let rows = sqlx::query_as::<_, NutritionRow>(&query)
            .bind(owner)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.category.map(|meal| meal.as_str()))
            .bind(filter.limit)
            .fetch_all(&self.db)
            .await?;

        rows.into_iter().map(NutritionEntry::try_from).collect()
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<NutritionEntry>, StoreError> {
        let query =
            format!("SELECT {NUTRITION_COLUMNS} FROM nutrition_entries WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, NutritionRow>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;

        row.map(NutritionEntry::try_from).transpose()
    }

    async fn insert(&self, entry: &NutritionEntry) -> Result<NutritionEntry, StoreError> {
        let query = format!(
            "INSERT INTO nutrition_entries (id, user_id, meal_type, food_items, total_calories, \
             total_protein, total_carbs, total_fat, date, notes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {NUTRITION_COLUMNS}"
        );

        let row = sqlx::query_as::<_, NutritionRow>(&query)
            .bind(entry.id)
            .bind(entry.user_id)
            .bind(entry.meal_type.as_str())
            .bind(Json(&entry.food_items))
            .bind(entry.total_calories)
            .bind(entry.total_protein)
            .bind(entry.total_carbs)
            .bind(entry.total_fat)
            .bind(entry.date)
            .bind(&entry.notes)
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .fetch_one(&self.db)
            .await
            .map_err(map_unique_violation)?;

        NutritionEntry::try_from(row)
    }

    async fn replace(&self, entry: &NutritionEntry) -> Result<Option<NutritionEntry>, StoreError> {
        let query = format!(
            "UPDATE nutrition_entries SET meal_type = $3, food_items = $4, total_calories = $5, \
             total_protein = $6, total_carbs = $7, total_fat = $8, date = $9, notes = $10, \
             updated_at = $11 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {NUTRITION_COLUMNS}"
        );

        let row = sqlx::query_as::<_, NutritionRow>(&query)
            .bind(entry.id)
            .bind(entry.user_id)
            .bind(entry.meal_type.as_str())
            .bind(Json(&entry.food_items))
            .bind(entry.total_calories)
            .bind(entry.total_protein)
            .bind(entry.total_carbs)
            .bind(entry.total_fat)
            .bind(entry.date)
            .bind(&entry.notes)
            .bind(entry.updated_at)
            .fetch_optional(&self.db)
            .await?;

        row.map(NutritionEntry::try_from).transpose()
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM nutrition_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Health metrics

const HEALTH_METRIC_COLUMNS: &str = "id, user_id, weight, height, bmi, heart_rate, \
     blood_pressure_systolic, blood_pressure_diastolic, sleep_duration, steps, water_intake, \
     date, created_at, updated_at";

#[derive(FromRow)]
struct HealthMetricRow {
    id: Uuid,
    user_id: Uuid,
    weight: Option<f64>,
    height: Option<f64>,
    bmi: Option<f64>,
    heart_rate: Option<f64>,
    blood_pressure_systolic: Option<f64>,
    blood_pressure_diastolic: Option<f64>,
    sleep_duration: Option<f64>,
    steps: Option<i64>,
    water_intake: Option<f64>,
    date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<HealthMetricRow> for HealthMetric {
    fn from(row: HealthMetricRow) -> Self {
        let blood_pressure = BloodPressure {
            systolic: row.blood_pressure_systolic,
            diastolic: row.blood_pressure_diastolic,
        };

        HealthMetric {
            id: row.id,
            user_id: row.user_id,
            weight: row.weight,
            height: row.height,
            bmi: row.bmi,
            heart_rate: row.heart_rate,
            blood_pressure: (!blood_pressure.is_empty()).then_some(blood_pressure),
            sleep_duration: row.sleep_duration,
            steps: row.steps,
            water_intake: row.water_intake,
            date: row.date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgHealthMetricRepository {
    db: PgPool,
}

impl PgHealthMetricRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EntryRepository<HealthMetric> for PgHealthMetricRepository {
    async fn list(&self, owner: Uuid, filter: &EntryFilter<()>) -> Result<Vec<HealthMetric>, StoreError> {
        let query = format!(
            "SELECT {HEALTH_METRIC_COLUMNS} FROM health_metrics \
             WHERE user_id = $1 \
               AND ($2::timestamptz IS NULL OR date >= $2) \
               AND ($3::timestamptz IS NULL OR date <= $3) \
             ORDER BY date DESC \
             LIMIT $4"
        );

        let rows = sqlx::query_as::<_, HealthMetricRow>(&query)
            .bind(owner)
            .bind(filter.range.start)
            .bind(filter.range.end)
            .bind(filter.limit)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(HealthMetric::from).collect())
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<HealthMetric>, StoreError> {
        let query =
            format!("SELECT {HEALTH_METRIC_COLUMNS} FROM health_metrics WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, HealthMetricRow>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(HealthMetric::from))
    }

    async fn insert(&self, metric: &HealthMetric) -> Result<HealthMetric, StoreError> {
        let query = format!(
            "INSERT INTO health_metrics (id, user_id, weight, height, bmi, heart_rate, \
             blood_pressure_systolic, blood_pressure_diastolic, sleep_duration, steps, \
             water_intake, date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {HEALTH_METRIC_COLUMNS}"
        );
        let pressure = metric.blood_pressure.unwrap_or_default();

        let row = sqlx::query_as::<_, HealthMetricRow>(&query)
            .bind(metric.id)
            .bind(metric.user_id)
            .bind(metric.weight)
            .bind(metric.height)
            .bind(metric.bmi)
            .bind(metric.heart_rate)
            .bind(pressure.systolic)
            .bind(pressure.diastolic)
            .bind(metric.sleep_duration)
            .bind(metric.steps)
            .bind(metric.water_intake)
            .bind(metric.date)
            .bind(metric.created_at)
            .bind(metric.updated_at)
            .fetch_one(&self.db)
            .await
            .map_err(map_unique_violation)?;

        Ok(row.into())
    }

    async fn replace(&self, metric: &HealthMetric) -> Result<Option<HealthMetric>, StoreError> {
        let query = format!(
            "UPDATE health_metrics SET weight = $3, height = $4, bmi = $5, heart_rate = $6, \
             blood_pressure_systolic = $7, blood_pressure_diastolic = $8, sleep_duration = $9, \
             steps = $10, water_intake = $11, date = $12, updated_at = $13 \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {HEALTH_METRIC_COLUMNS}"
        );
        let pressure = metric.blood_pressure.unwrap_or_default();

        let row = sqlx::query_as::<_, HealthMetricRow>(&query)
            .bind(metric.id)
            .bind(metric.user_id)
            .bind(metric.weight)
            .bind(metric.height)
            .bind(metric.bmi)
            .bind(metric.heart_rate)
            .bind(pressure.systolic)
            .bind(pressure.diastolic)
            .bind(metric.sleep_duration)
            .bind(metric.steps)
            .bind(metric.water_intake)
            .bind(metric.date)
            .bind(metric.updated_at)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(HealthMetric::from))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM health_metrics WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
