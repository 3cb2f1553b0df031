use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::date;
use super::validation::{in_range, optional_non_negative, Validate, ValidationError};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressure {
    pub systolic: Option<f64>,
    pub diastolic: Option<f64>,
}

impl BloodPressure {
    pub fn is_empty(&self) -> bool {
        self.systolic.is_none() && self.diastolic.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetric {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Kilograms
    pub weight: Option<f64>,
    /// Centimetres
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub heart_rate: Option<f64>,
    pub blood_pressure: Option<BloodPressure>,
    /// Hours
    pub sleep_duration: Option<f64>,
    pub steps: Option<i64>,
    pub water_intake: Option<f64>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /health-metrics` and `PUT /health-metrics/:id`; BMI is derived
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetricPayload {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub heart_rate: Option<f64>,
    pub blood_pressure: Option<BloodPressure>,
    pub sleep_duration: Option<f64>,
    pub steps: Option<i64>,
    pub water_intake: Option<f64>,
    #[serde(default, deserialize_with = "date::deserialize_optional")]
    pub date: Option<DateTime<Utc>>,
}

impl Validate for HealthMetricPayload {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_non_negative(self.weight, "weight")?;
        optional_non_negative(self.height, "height")?;
        optional_non_negative(self.heart_rate, "heartRate")?;
        if let Some(pressure) = &self.blood_pressure {
            optional_non_negative(pressure.systolic, "bloodPressure.systolic")?;
            optional_non_negative(pressure.diastolic, "bloodPressure.diastolic")?;
        }
        if let Some(sleep) = self.sleep_duration {
            in_range(sleep, 0.0, 24.0, "sleepDuration")?;
        }
        if let Some(steps) = self.steps {
            if steps < 0 {
                return Err(ValidationError::new("steps must be a non-negative number"));
            }
        }
        optional_non_negative(self.water_intake, "waterIntake")?;
        Ok(())
    }
}

/// One point of a trend series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthTrends {
    pub weight_trends: Vec<TrendPoint>,
    pub bmi_trends: Vec<TrendPoint>,
    pub sleep_trends: Vec<TrendPoint>,
    pub latest_metric: Option<HealthMetric>,
}
