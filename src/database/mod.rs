//! Persistence seam.
//!
//! Services talk to storage only through the repository traits below. Two
//! backends implement them: PostgreSQL for deployments and an in-memory map
//! for local runs and the HTTP test suite.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CreateUser, HealthMetric, MealType, NutritionEntry, User, UserProfile, Workout, WorkoutType,
};

#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint was violated; carries the conflicting field name
    #[error("Duplicate value for {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored record could not be decoded: {0}")]
    Decode(String),
}

/// Inclusive time window; either bound may be open
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn since(start: DateTime<Utc>) -> Self {
        Self { start: Some(start), end: None }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }
}

/// Owner-scoped list query. Results are always ordered newest first.
#[derive(Debug, Clone)]
pub struct EntryFilter<C> {
    pub range: DateRange,
    pub category: Option<C>,
    pub limit: Option<i64>,
}

impl<C> Default for EntryFilter<C> {
    fn default() -> Self {
        Self { range: DateRange::default(), category: None, limit: None }
    }
}

impl<C> EntryFilter<C> {
    pub fn in_range(range: DateRange) -> Self {
        Self { range, ..Self::default() }
    }
}

/// A dated record owned by exactly one user
pub trait Entry: Clone + Send + Sync + 'static {
    type Category: Copy + PartialEq + Send + Sync + 'static;

    fn id(&self) -> Uuid;
    fn owner(&self) -> Uuid;
    fn date(&self) -> DateTime<Utc>;
    fn category(&self) -> Option<Self::Category>;
}

impl Entry for Workout {
    type Category = WorkoutType;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.user_id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> Option<WorkoutType> {
        Some(self.workout_type)
    }
}

impl Entry for NutritionEntry {
    type Category = MealType;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.user_id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> Option<MealType> {
        Some(self.meal_type)
    }
}

impl Entry for HealthMetric {
    type Category = ();

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner(&self) -> Uuid {
        self.user_id
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn category(&self) -> Option<()> {
        None
    }
}

#[async_trait]
pub trait EntryRepository<E: Entry>: Send + Sync {
    async fn list(&self, owner: Uuid, filter: &EntryFilter<E::Category>) -> Result<Vec<E>, StoreError>;

    async fn find(&self, owner: Uuid, id: Uuid) -> Result<Option<E>, StoreError>;

    async fn insert(&self, entry: &E) -> Result<E, StoreError>;

    /// Overwrite the record with `entry.id()` if it belongs to `entry.owner()`.
    /// Returns `None` when no such owned record exists.
    async fn replace(&self, entry: &E) -> Result<Option<E>, StoreError>;

    async fn delete(&self, owner: Uuid, id: Uuid) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: CreateUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn update_profile(&self, id: Uuid, profile: &UserProfile) -> Result<Option<User>, StoreError>;
}

/// Every repository the application needs, behind trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub workouts: Arc<dyn EntryRepository<Workout>>,
    pub nutrition: Arc<dyn EntryRepository<NutritionEntry>>,
    pub health_metrics: Arc<dyn EntryRepository<HealthMetric>>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(postgres::PgUserRepository::new(pool.clone())),
            workouts: Arc::new(postgres::PgWorkoutRepository::new(pool.clone())),
            nutrition: Arc::new(postgres::PgNutritionRepository::new(pool.clone())),
            health_metrics: Arc::new(postgres::PgHealthMetricRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryUserRepository::default()),
            workouts: Arc::new(memory::MemoryRepository::<Workout>::default()),
            nutrition: Arc::new(memory::MemoryRepository::<NutritionEntry>::default()),
            health_metrics: Arc::new(memory::MemoryRepository::<HealthMetric>::default()),
        }
    }
}
