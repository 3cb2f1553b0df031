use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use fitness_tracker::database::{DateRange, Repositories};
use fitness_tracker::models::{FoodItem, HealthMetricPayload, MealType, NutritionPayload, WorkoutPayload, WorkoutType};
use fitness_tracker::services::{HealthMetricService, NutritionService, StatsService, WorkoutService};

#[cfg(test)]
mod stats_service_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixture {
        workouts: WorkoutService,
        nutrition: NutritionService,
        health_metrics: HealthMetricService,
        stats: StatsService,
    }

    fn fixture() -> Fixture {
        let repos = Repositories::in_memory();
        Fixture {
            workouts: WorkoutService::new(repos.workouts.clone()),
            nutrition: NutritionService::new(repos.nutrition.clone()),
            health_metrics: HealthMetricService::new(repos.health_metrics.clone()),
            stats: StatsService::new(repos.workouts, repos.nutrition, repos.health_metrics),
        }
    }

    fn workout(duration: f64, days_ago: i64) -> WorkoutPayload {
        WorkoutPayload {
            name: "Session".to_string(),
            workout_type: WorkoutType::Cardio,
            exercises: vec![],
            duration,
            date: Some(Utc::now() - Duration::days(days_ago)),
            notes: None,
            completed: true,
        }
    }

    fn meal(calories: f64, when: chrono::DateTime<Utc>) -> NutritionPayload {
        NutritionPayload {
            meal_type: MealType::Lunch,
            food_items: vec![FoodItem {
                name: "Soup".to_string(),
                calories,
                protein: 10.0,
                carbs: 20.0,
                fat: 5.0,
                quantity: 1.0,
                unit: "bowl".to_string(),
            }],
            date: Some(when),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_workout_stats_cover_all_time_but_week_breakdown_is_recent() {
        let f = fixture();
        let user = Uuid::new_v4();

        f.workouts.create(user, workout(30.0, 1)).await.unwrap();
        f.workouts.create(user, workout(60.0, 30)).await.unwrap();
        f.workouts.create(Uuid::new_v4(), workout(90.0, 1)).await.unwrap();

        let stats = f.stats.workout_stats(user, Utc::now()).await.unwrap();

        assert_eq!(stats.summary.total_workouts, 2);
        assert_eq!(stats.summary.total_duration, 90.0);
        assert_eq!(stats.summary.avg_duration, 45.0);
        let recent: i64 = stats.weekly_stats.iter().map(|day| day.workout_count).sum();
        assert_eq!(recent, 1);
    }

    #[tokio::test]
    async fn test_empty_stats_average_to_zero() {
        let f = fixture();
        let user = Uuid::new_v4();

        let workouts = f.stats.workout_stats(user, Utc::now()).await.unwrap();
        assert_eq!(workouts.summary.total_workouts, 0);
        assert_eq!(workouts.summary.avg_duration, 0.0);

        let nutrition = f.stats.nutrition_stats(user, DateRange::default(), Utc::now()).await.unwrap();
        assert_eq!(nutrition.summary.avg_calories, 0.0);
        assert!(nutrition.daily_stats.is_empty());
    }

    #[tokio::test]
    async fn test_nutrition_stats_respect_range() {
        let f = fixture();
        let user = Uuid::new_v4();
        let march = |day| Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();

        f.nutrition.create(user, meal(400.0, march(1))).await.unwrap();
        f.nutrition.create(user, meal(600.0, march(2))).await.unwrap();
        f.nutrition.create(user, meal(900.0, Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap())).await.unwrap();

        let range = DateRange::new(Some(march(1) - Duration::hours(12)), Some(march(3)));
        let stats = f.stats.nutrition_stats(user, range, march(3)).await.unwrap();

        assert_eq!(stats.summary.total_entries, 2);
        assert_eq!(stats.summary.total_calories, 1000.0);
        assert_eq!(stats.summary.avg_calories, 500.0);
        assert_eq!(stats.daily_stats.len(), 2);
    }

    #[tokio::test]
    async fn test_health_trends_window_and_latest() {
        let f = fixture();
        let user = Uuid::new_v4();
        let now = Utc::now();

        let reading = |weight: f64, days_ago: i64| HealthMetricPayload {
            weight: Some(weight),
            height: Some(180.0),
            date: Some(now - Duration::days(days_ago)),
            ..HealthMetricPayload::default()
        };

        f.health_metrics.create(user, reading(82.0, 40)).await.unwrap();
        f.health_metrics.create(user, reading(80.0, 10)).await.unwrap();
        f.health_metrics.create(user, reading(79.0, 2)).await.unwrap();

        let trends = f.stats.health_trends(user, 30, now).await.unwrap();

        let weights: Vec<f64> = trends.weight_trends.iter().map(|point| point.value).collect();
        assert_eq!(weights, vec![80.0, 79.0]);
        assert_eq!(trends.bmi_trends.len(), 2);
        assert!(trends.sleep_trends.is_empty());
        assert_eq!(trends.latest_metric.unwrap().weight, Some(79.0));
    }
}
