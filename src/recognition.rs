// ABOUTME: Meal recognition output consumed as logged meals
// ABOUTME: RecognizedMeal validation and conversion into LoggedMeal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Meal recognition
//!
//! The recognition service turning a photo or description into nutrients is
//! opaque here. Only its numeric output is consumed.

use chrono::{DateTime, Utc};
use nutriwindow_core::errors::{AppError, AppResult};
use nutriwindow_core::models::{LoggedMeal, MacroTargets};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Nutrients estimated for one meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedMeal {
    /// Meal description
    pub name: String,
    /// Estimated calories
    pub calories: f64,
    /// Estimated macros
    pub macros: MacroTargets,
    /// Estimated micronutrients keyed by nutrient name
    #[serde(default)]
    pub micronutrients: BTreeMap<String, f64>,
    /// Health score on 0-100, when the service rates the meal
    #[serde(default)]
    pub health_score: Option<f64>,
    /// Recognition confidence, 0-1
    pub confidence: f64,
}

impl RecognizedMeal {
    /// Whether the service is at least `threshold` confident
    #[must_use]
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }

    /// Log this meal at `timestamp`
    ///
    /// # Errors
    ///
    /// Returns an error if confidence is outside 0-1 or a nutrient value is invalid
    pub fn into_logged_meal(self, timestamp: DateTime<Utc>) -> AppResult<LoggedMeal> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(AppError::out_of_range(format!(
                "confidence must be between 0 and 1, got {}",
                self.confidence
            )));
        }
        if let Some((nutrient, amount)) = self
            .micronutrients
            .iter()
            .find(|(_, amount)| !amount.is_finite() || **amount < 0.0)
        {
            return Err(AppError::out_of_range(format!(
                "micronutrient {nutrient} must be a non-negative number, got {amount}"
            )));
        }

        let mut meal = LoggedMeal::new(self.name, timestamp, self.calories, self.macros)?;
        meal.micronutrients = self.micronutrients;
        match self.health_score {
            Some(score) => meal.with_health_score(score),
            None => Ok(meal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn recognized() -> RecognizedMeal {
        RecognizedMeal {
            name: "Salmon bowl".into(),
            calories: 620.0,
            macros: MacroTargets::new(42.0, 58.0, 22.0),
            micronutrients: BTreeMap::from([("omega_3_g".to_owned(), 2.1)]),
            health_score: Some(84.0),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_converts_into_logged_meal() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 12, 30, 0).unwrap();
        let meal = recognized().into_logged_meal(at).unwrap();
        assert_eq!(meal.timestamp, at);
        assert_eq!(meal.health_score, Some(84.0));
        assert_eq!(meal.micronutrients.get("omega_3_g"), Some(&2.1));
    }

    #[test]
    fn test_rejects_bad_values() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 12, 30, 0).unwrap();
        let mut unsure = recognized();
        unsure.confidence = 1.4;
        assert!(unsure.into_logged_meal(at).is_err());

        let mut negative = recognized();
        negative.micronutrients.insert("sodium_mg".into(), -3.0);
        assert!(negative.into_logged_meal(at).is_err());

        let mut unhealthy = recognized();
        unhealthy.health_score = Some(140.0);
        assert!(unhealthy.into_logged_meal(at).is_err());
    }

    #[test]
    fn test_confidence_threshold() {
        assert!(recognized().is_confident(0.75));
        assert!(!recognized().is_confident(0.95));
    }
}
