use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use crate::common::{create_test_app, register, sample_workout, send};

#[cfg(test)]
mod records_integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn id_of(body: &Value) -> String {
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_workout_lifecycle() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let created = send(&app, Method::POST, "/api/workouts", Some(&token), Some(sample_workout())).await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["message"], "Workout created successfully");
        assert_eq!(created.body["data"]["caloriesBurned"], 200.0);
        assert_eq!(created.body["data"]["type"], "strength");
        let id = id_of(&created.body);

        let mut changed = sample_workout();
        changed["name"] = json!("Heavy leg day");
        changed["exercises"] = json!([{"name": "Squat", "sets": 5, "reps": 3, "caloriesBurned": 150}]);
        let updated = send(&app, Method::PUT, &format!("/api/workouts/{}", id), Some(&token), Some(changed)).await;
        assert_eq!(updated.status, StatusCode::OK);
        assert_eq!(updated.body["message"], "Workout updated successfully");

        let fetched = send(&app, Method::GET, &format!("/api/workouts/{}", id), Some(&token), None).await;
        assert_eq!(fetched.status, StatusCode::OK);
        assert_eq!(fetched.body["data"]["name"], "Heavy leg day");
        assert_eq!(fetched.body["data"]["caloriesBurned"], 150.0);

        let deleted = send(&app, Method::DELETE, &format!("/api/workouts/{}", id), Some(&token), None).await;
        assert_eq!(deleted.status, StatusCode::OK);
        assert_eq!(deleted.body["message"], "Workout deleted successfully");

        let gone = send(&app, Method::GET, &format!("/api/workouts/{}", id), Some(&token), None).await;
        assert_eq!(gone.status, StatusCode::NOT_FOUND);
        assert_eq!(gone.body["message"], "Workout not found");
    }

    #[tokio::test]
    async fn test_workout_validation() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let mut nameless = sample_workout();
        nameless["name"] = json!("");
        let response = send(&app, Method::POST, "/api/workouts", Some(&token), Some(nameless)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["success"], false);

        let mut bad_type = sample_workout();
        bad_type["type"] = json!("juggling");
        let response = send(&app, Method::POST, "/api/workouts", Some(&token), Some(bad_type)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_records_are_private_to_their_owner() {
        let app = create_test_app();
        let owner = register(&app, "owner").await;
        let intruder = register(&app, "intruder").await;

        let created = send(&app, Method::POST, "/api/workouts", Some(&owner), Some(sample_workout())).await;
        let id = id_of(&created.body);
        let uri = format!("/api/workouts/{}", id);

        let read = send(&app, Method::GET, &uri, Some(&intruder), None).await;
        assert_eq!(read.status, StatusCode::NOT_FOUND);

        let update = send(&app, Method::PUT, &uri, Some(&intruder), Some(sample_workout())).await;
        assert_eq!(update.status, StatusCode::NOT_FOUND);

        let delete = send(&app, Method::DELETE, &uri, Some(&intruder), None).await;
        assert_eq!(delete.status, StatusCode::NOT_FOUND);

        let listing = send(&app, Method::GET, "/api/workouts", Some(&intruder), None).await;
        assert_eq!(listing.body["count"], 0);

        let still_there = send(&app, Method::GET, &uri, Some(&owner), None).await;
        assert_eq!(still_there.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let response = send(&app, Method::GET, "/api/workouts/not-a-uuid", Some(&token), None).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.body["message"], "Workout not found");
    }

    #[tokio::test]
    async fn test_workout_list_filters() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let mut run = sample_workout();
        run["name"] = json!("Morning run");
        run["type"] = json!("cardio");
        run["date"] = json!("2024-03-12T07:00:00Z");
        send(&app, Method::POST, "/api/workouts", Some(&token), Some(run)).await;
        send(&app, Method::POST, "/api/workouts", Some(&token), Some(sample_workout())).await;

        let all = send(&app, Method::GET, "/api/workouts", Some(&token), None).await;
        assert_eq!(all.body["count"], 2);
        assert_eq!(all.body["data"][0]["name"], "Morning run");

        let cardio = send(&app, Method::GET, "/api/workouts?type=cardio", Some(&token), None).await;
        assert_eq!(cardio.body["count"], 1);
        assert_eq!(cardio.body["data"][0]["type"], "cardio");

        let ranged = send(
            &app,
            Method::GET,
            "/api/workouts?startDate=2024-03-10&endDate=2024-03-10",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(ranged.body["count"], 1);
        assert_eq!(ranged.body["data"][0]["name"], "Leg day");

        let limited = send(&app, Method::GET, "/api/workouts?limit=1", Some(&token), None).await;
        assert_eq!(limited.body["count"], 1);

        let bad_date = send(&app, Method::GET, "/api/workouts?startDate=yesterday", Some(&token), None).await;
        assert_eq!(bad_date.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_workout_stats() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let mut recent = sample_workout();
        recent.as_object_mut().unwrap().remove("date");
        send(&app, Method::POST, "/api/workouts", Some(&token), Some(recent)).await;
        send(&app, Method::POST, "/api/workouts", Some(&token), Some(sample_workout())).await;

        let stats = send(&app, Method::GET, "/api/workouts/stats/summary", Some(&token), None).await;
        assert_eq!(stats.status, StatusCode::OK);
        assert_eq!(stats.body["data"]["summary"]["totalWorkouts"], 2);
        assert_eq!(stats.body["data"]["summary"]["totalCaloriesBurned"], 400.0);
        assert_eq!(stats.body["data"]["summary"]["avgDuration"], 45.0);
    }

    #[tokio::test]
    async fn test_nutrition_totals_and_filters() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let created = send(
            &app,
            Method::POST,
            "/api/nutrition",
            Some(&token),
            Some(json!({
                "mealType": "breakfast",
                "date": "2024-03-10T08:00:00Z",
                "foodItems": [
                    {"name": "Oats", "calories": 150, "protein": 5, "carbs": 27, "fat": 3, "quantity": 2, "unit": "cup"},
                    {"name": "Banana", "calories": 105, "protein": 1, "carbs": 27, "fat": 0, "quantity": 1, "unit": "piece"}
                ]
            })),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["message"], "Nutrition entry created successfully");
        assert_eq!(created.body["data"]["totalCalories"], 405.0);
        assert_eq!(created.body["data"]["totalProtein"], 11.0);

        send(
            &app,
            Method::POST,
            "/api/nutrition",
            Some(&token),
            Some(json!({"mealType": "dinner", "date": "2024-03-11T19:00:00Z", "foodItems": []})),
        )
        .await;

        let one_day = send(&app, Method::GET, "/api/nutrition?date=2024-03-10", Some(&token), None).await;
        assert_eq!(one_day.body["count"], 1);
        assert_eq!(one_day.body["data"][0]["mealType"], "breakfast");

        let dinners = send(&app, Method::GET, "/api/nutrition?mealType=dinner", Some(&token), None).await;
        assert_eq!(dinners.body["count"], 1);

        let bad_meal = send(&app, Method::GET, "/api/nutrition?mealType=brunch", Some(&token), None).await;
        assert_eq!(bad_meal.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nutrition_stats_summary() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        send(
            &app,
            Method::POST,
            "/api/nutrition",
            Some(&token),
            Some(json!({
                "mealType": "lunch",
                "foodItems": [{"name": "Rice", "calories": 200, "protein": 4, "carbs": 45, "fat": 1, "quantity": 1, "unit": "bowl"}]
            })),
        )
        .await;

        let stats = send(&app, Method::GET, "/api/nutrition/stats/summary", Some(&token), None).await;
        assert_eq!(stats.status, StatusCode::OK);
        assert_eq!(stats.body["data"]["summary"]["totalEntries"], 1);
        assert_eq!(stats.body["data"]["summary"]["totalCalories"], 200.0);
        assert_eq!(stats.body["data"]["dailyStats"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_health_metric_bmi_and_trends() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let created = send(
            &app,
            Method::POST,
            "/api/health-metrics",
            Some(&token),
            Some(json!({"weight": 70, "height": 175, "sleepDuration": 7.5, "bloodPressure": {"systolic": 120, "diastolic": 80}})),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["data"]["bmi"], 22.86);
        assert_eq!(created.body["data"]["bloodPressure"]["systolic"], 120.0);
        let id = id_of(&created.body);

        let without_height = send(
            &app,
            Method::PUT,
            &format!("/api/health-metrics/{}", id),
            Some(&token),
            Some(json!({"weight": 72})),
        )
        .await;
        assert_eq!(without_height.status, StatusCode::OK);
        assert!(without_height.body["data"]["bmi"].is_null());

        let trends = send(&app, Method::GET, "/api/health-metrics/stats/trends?days=7", Some(&token), None).await;
        assert_eq!(trends.status, StatusCode::OK);
        assert_eq!(trends.body["data"]["weightTrends"].as_array().unwrap().len(), 1);
        assert_eq!(trends.body["data"]["latestMetric"]["weight"], 72.0);

        let bad_days = send(&app, Method::GET, "/api/health-metrics/stats/trends?days=0", Some(&token), None).await;
        assert_eq!(bad_days.status, StatusCode::BAD_REQUEST);

        let invalid_sleep = send(
            &app,
            Method::POST,
            "/api/health-metrics",
            Some(&token),
            Some(json!({"sleepDuration": 30})),
        )
        .await;
        assert_eq!(invalid_sleep.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_out_of_range_query_values_are_rejected() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        for uri in [
            "/api/health-metrics/stats/trends?days=0",
            "/api/health-metrics/stats/trends?days=-5",
            "/api/health-metrics/stats/trends?days=36501",
            "/api/health-metrics/stats/trends?days=200000000",
            "/api/health-metrics/stats/trends?days=100000000000000",
            "/api/nutrition?date=%2B262142-12-31",
            "/api/nutrition?startDate=%2B262142-12-31",
            "/api/workouts?endDate=%2B262142-12-31",
            "/api/health-metrics?startDate=%2B262142-12-31",
            "/api/nutrition/stats/summary?endDate=%2B262142-12-31",
        ] {
            let response = send(&app, Method::GET, uri, Some(&token), None).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(response.body["success"], false, "{}", uri);
        }

        let widest = send(&app, Method::GET, "/api/health-metrics/stats/trends?days=36500", Some(&token), None).await;
        assert_eq!(widest.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_blood_pressure_is_stored_as_absent() {
        let app = create_test_app();
        let token = register(&app, "t1").await;

        let created = send(
            &app,
            Method::POST,
            "/api/health-metrics",
            Some(&token),
            Some(json!({"weight": 70, "bloodPressure": {}})),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body["message"], "Health metric created successfully");
        assert!(created.body["data"]["bloodPressure"].is_null());

        let fetched = send(
            &app,
            Method::GET,
            &format!("/api/health-metrics/{}", id_of(&created.body)),
            Some(&token),
            None,
        )
        .await;
        assert!(fetched.body["data"]["bloodPressure"].is_null());
    }
}
