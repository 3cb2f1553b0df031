use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// A client-correctable problem with a submitted payload
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Payloads that must be checked before anything is persisted
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

fn username_regex() -> &'static Regex {
    static USERNAME: OnceLock<Regex> = OnceLock::new();
    USERNAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("username pattern is valid"))
}

/// Email validation
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::new("Please provide an email"));
    }

    if email.len() > 255 {
        return Err(ValidationError::new("Email cannot be longer than 255 characters"));
    }

    if !email_regex().is_match(email.trim()) {
        return Err(ValidationError::new("Please provide a valid email"));
    }

    Ok(())
}

/// Username validation
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::new("Please provide a username"));
    }

    if username.chars().count() > 30 {
        return Err(ValidationError::new("Username cannot be longer than 30 characters"));
    }

    if !username_regex().is_match(username) {
        return Err(ValidationError::new(
            "Username may only contain letters, numbers, '.', '_' and '-'",
        ));
    }

    Ok(())
}

/// Rejects blank strings
pub fn require_text(value: &str, message: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(message));
    }
    Ok(())
}

pub fn non_negative(value: f64, field_name: &str) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(format!(
            "{} must be a non-negative number",
            field_name
        )));
    }
    Ok(())
}

pub fn optional_non_negative(value: Option<f64>, field_name: &str) -> Result<(), ValidationError> {
    match value {
        Some(value) => non_negative(value, field_name),
        None => Ok(()),
    }
}

pub fn in_range(value: f64, min: f64, max: f64, field_name: &str) -> Result<(), ValidationError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ValidationError::new(format!(
            "{} must be between {} and {}",
            field_name, min, max
        )));
    }
    Ok(())
}

pub fn at_least(value: i32, min: i32, field_name: &str) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::new(format!(
            "{} must be at least {}",
            field_name, min
        )));
    }
    Ok(())
}
