use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{optional_non_negative, Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    /// Centimetres
    pub height: Option<f64>,
    /// Kilograms
    pub weight: Option<f64>,
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<(), ValidationError> {
        optional_non_negative(self.height, "profile.height")?;
        optional_non_negative(self.weight, "profile.weight")?;
        if let Some(gender) = &self.gender {
            if !matches!(gender.as_str(), "male" | "female" | "other" | "") {
                return Err(ValidationError::new(
                    "profile.gender must be one of: male, female, other",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: UserProfile,
}
