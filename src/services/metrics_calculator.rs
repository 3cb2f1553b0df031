//! Derived-field computation.
//!
//! Pure functions called by the entry services on every create and update,
//! before anything is persisted. A stored record's derived fields therefore
//! always match its line items.

use crate::models::{Exercise, FoodItem, MacroTotals};

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Body-mass index from weight (kg) and height (cm).
///
/// Absent unless both are present and the height is positive.
pub fn compute_bmi(weight: Option<f64>, height: Option<f64>) -> Option<f64> {
    match (weight, height) {
        (Some(weight), Some(height)) if height > 0.0 => {
            let height_in_meters = height / 100.0;
            Some(round2(weight / (height_in_meters * height_in_meters)))
        }
        _ => None,
    }
}

/// Sum of each per-unit macro value scaled by the item's quantity
pub fn compute_nutrition_totals(items: &[FoodItem]) -> MacroTotals {
    items.iter().fold(MacroTotals::default(), |totals, item| MacroTotals {
        calories: totals.calories + item.calories * item.quantity,
        protein: totals.protein + item.protein * item.quantity,
        carbs: totals.carbs + item.carbs * item.quantity,
        fat: totals.fat + item.fat * item.quantity,
    })
}

pub fn compute_workout_calories(exercises: &[Exercise]) -> f64 {
    exercises.iter().map(|exercise| exercise.calories_burned).sum()
}
