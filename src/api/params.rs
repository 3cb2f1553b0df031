//! Query-string and path parameter parsing shared by the entry handlers

use chrono::{DateTime, Datelike, Duration, Utc};
use uuid::Uuid;

use super::error::ApiError;
use crate::database::DateRange;
use crate::models::date::{parse_flexible_date, parse_range_end, start_of_day};

/// Parse an id path segment. A malformed id cannot name an owned record,
/// so it gets the same 404 as a missing one.
pub fn parse_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(not_found.to_string()))
}

/// Calendar years accepted in query dates
const SUPPORTED_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

fn within_supported_years(at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    SUPPORTED_YEARS.contains(&at.year()).then_some(at)
}

fn parse_bound(
    raw: Option<&str>,
    field: &str,
    parse: fn(&str) -> Option<DateTime<Utc>>,
) -> Result<Option<DateTime<Utc>>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse(value)
            .and_then(within_supported_years)
            .map(Some)
            .ok_or_else(|| ApiError::Validation(format!("Invalid {}: {}", field, value))),
    }
}

/// `startDate`/`endDate` pair; a plain end date includes that whole day
pub fn date_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, ApiError> {
    Ok(DateRange::new(
        parse_bound(start, "startDate", parse_flexible_date)?,
        parse_bound(end, "endDate", parse_range_end)?,
    ))
}

/// The UTC calendar day containing `raw`
pub fn single_day(raw: &str) -> Result<DateRange, ApiError> {
    let invalid = || ApiError::Validation(format!("Invalid date: {}", raw));

    let day = parse_flexible_date(raw)
        .and_then(within_supported_years)
        .ok_or_else(invalid)?
        .date_naive();
    let next = day.succ_opt().ok_or_else(invalid)?;

    Ok(DateRange::new(
        Some(start_of_day(day)),
        Some(start_of_day(next) - Duration::milliseconds(1)),
    ))
}

pub fn limit(raw: Option<i64>) -> Result<Option<i64>, ApiError> {
    match raw {
        Some(limit) if limit < 1 => Err(ApiError::Validation("limit must be a positive integer".to_string())),
        other => Ok(other),
    }
}
