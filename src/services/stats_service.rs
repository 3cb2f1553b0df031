//! Summary statistics and trend series.
//!
//! The service fetches owner-scoped rows through the repositories and hands
//! them to the pure aggregation functions below, which take the reference
//! time explicitly. Empty inputs produce zero totals and zero averages.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Utc};
use uuid::Uuid;

use super::ServiceResult;
use crate::database::{DateRange, EntryFilter, EntryRepository};
use crate::models::{
    DailyNutrition, ValidationError, HealthMetric, HealthTrends, MacroTotals, NutritionEntry, NutritionStats,
    NutritionSummary, TrendPoint, WeekdayStats, Workout, WorkoutStats, WorkoutSummary,
};

/// Trailing window used by the weekly and daily breakdowns
const BREAKDOWN_DAYS: i64 = 7;

pub const DEFAULT_TREND_DAYS: i64 = 30;

/// Widest trend window a caller may ask for
pub const MAX_TREND_DAYS: i64 = 36_500;

#[derive(Clone)]
pub struct StatsService {
    workouts: Arc<dyn EntryRepository<Workout>>,
    nutrition: Arc<dyn EntryRepository<NutritionEntry>>,
    health_metrics: Arc<dyn EntryRepository<HealthMetric>>,
}

impl StatsService {
    pub fn new(
        workouts: Arc<dyn EntryRepository<Workout>>,
        nutrition: Arc<dyn EntryRepository<NutritionEntry>>,
        health_metrics: Arc<dyn EntryRepository<HealthMetric>>,
    ) -> Self {
        Self { workouts, nutrition, health_metrics }
    }

    pub async fn workout_stats(&self, owner: Uuid, now: DateTime<Utc>) -> ServiceResult<WorkoutStats> {
        let all = self.workouts.list(owner, &EntryFilter::default()).await?;
        let since = now - Duration::days(BREAKDOWN_DAYS);

        Ok(WorkoutStats {
            summary: workout_summary(&all),
            weekly_stats: weekly_breakdown(&all, since),
        })
    }

    /// Summary over `range`; the daily breakdown always covers the trailing week
    pub async fn nutrition_stats(
        &self,
        owner: Uuid,
        range: DateRange,
        now: DateTime<Utc>,
    ) -> ServiceResult<NutritionStats> {
        let in_range = self.nutrition.list(owner, &EntryFilter::in_range(range)).await?;
        let recent = self
            .nutrition
            .list(owner, &EntryFilter::in_range(DateRange::since(now - Duration::days(BREAKDOWN_DAYS))))
            .await?;

        Ok(NutritionStats {
            summary: nutrition_summary(&in_range),
            daily_stats: daily_breakdown(&recent),
        })
    }

    pub async fn health_trends(&self, owner: Uuid, days: i64, now: DateTime<Utc>) -> ServiceResult<HealthTrends> {
        let start = Some(days)
            .filter(|days| (1..=MAX_TREND_DAYS).contains(days))
            .and_then(Duration::try_days)
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| {
                ValidationError::new(format!("days must be between 1 and {}", MAX_TREND_DAYS))
            })?;
        let window = DateRange::since(start);
        let in_window = self.health_metrics.list(owner, &EntryFilter::in_range(window)).await?;

        let latest_filter = EntryFilter { limit: Some(1), ..EntryFilter::default() };
        let latest = self.health_metrics.list(owner, &latest_filter).await?.into_iter().next();

        Ok(health_trends(&in_window, latest))
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

pub fn workout_summary(workouts: &[Workout]) -> WorkoutSummary {
    let total_duration: f64 = workouts.iter().map(|w| w.duration).sum();

    WorkoutSummary {
        total_workouts: workouts.len() as i64,
        total_calories_burned: workouts.iter().map(|w| w.calories_burned).sum(),
        total_duration,
        avg_duration: average(total_duration, workouts.len()),
    }
}

/// Workouts dated at or after `since`, grouped by weekday (1 = Sunday)
pub fn weekly_breakdown(workouts: &[Workout], since: DateTime<Utc>) -> Vec<WeekdayStats> {
    let mut by_day: BTreeMap<u32, (i64, f64)> = BTreeMap::new();

    for workout in workouts.iter().filter(|w| w.date >= since) {
        let slot = by_day.entry(workout.date.weekday().number_from_sunday()).or_default();
        slot.0 += 1;
        slot.1 += workout.calories_burned;
    }

    by_day
        .into_iter()
        .map(|(day_of_week, (workout_count, calories_burned))| WeekdayStats {
            day_of_week,
            workout_count,
            calories_burned,
        })
        .collect()
}

pub fn nutrition_summary(entries: &[NutritionEntry]) -> NutritionSummary {
    let totals = entries
        .iter()
        .fold(MacroTotals::default(), |acc, entry| acc + entry.totals());

    NutritionSummary {
        total_entries: entries.len() as i64,
        total_calories: totals.calories,
        total_protein: totals.protein,
        total_carbs: totals.carbs,
        total_fat: totals.fat,
        avg_calories: average(totals.calories, entries.len()),
    }
}

/// Totals per UTC calendar day, oldest day first
pub fn daily_breakdown(entries: &[NutritionEntry]) -> Vec<DailyNutrition> {
    let mut by_day: BTreeMap<String, MacroTotals> = BTreeMap::new();

    for entry in entries {
        let day = entry.date.format("%Y-%m-%d").to_string();
        let slot = by_day.entry(day).or_default();
        *slot = *slot + entry.totals();
    }

    by_day
        .into_iter()
        .map(|(day, totals)| DailyNutrition {
            day,
            total_calories: totals.calories,
            total_protein: totals.protein,
            total_carbs: totals.carbs,
            total_fat: totals.fat,
        })
        .collect()
}

/// Per-field series in ascending date order. Records lacking a field are
/// skipped for that series only.
pub fn health_trends(in_window: &[HealthMetric], latest: Option<HealthMetric>) -> HealthTrends {
    let mut ordered: Vec<&HealthMetric> = in_window.iter().collect();
    ordered.sort_by_key(|metric| metric.date);

    let series = |field: fn(&HealthMetric) -> Option<f64>| -> Vec<TrendPoint> {
        ordered
            .iter()
            .filter_map(|metric| field(metric).map(|value| TrendPoint { date: metric.date, value }))
            .collect()
    };

    HealthTrends {
        weight_trends: series(|m| m.weight),
        bmi_trends: series(|m| m.bmi),
        sleep_trends: series(|m| m.sleep_duration),
        latest_metric: latest,
    }
}
