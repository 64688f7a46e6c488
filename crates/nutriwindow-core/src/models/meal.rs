// ABOUTME: Logged consumption event model and window ownership resolution
// ABOUTME: LoggedMeal plus helpers for summing consumption and grouping meals by window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::macros::MacroTargets;
use super::window::Window;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A consumption event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMeal {
    /// Unique identifier
    pub id: Uuid,
    /// Meal description
    #[serde(default)]
    pub name: String,
    /// When the meal was eaten
    pub timestamp: DateTime<Utc>,
    /// Calories consumed
    pub calories: f64,
    /// Macros consumed
    pub macros: MacroTargets,
    /// Meal health score on a 0-100 scale, if the recognizer produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
    /// Micronutrient amounts keyed by nutrient name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub micronutrients: BTreeMap<String, f64>,
}

impl LoggedMeal {
    /// Create a meal with a fresh identifier
    ///
    /// # Errors
    ///
    /// Returns an error if calories or macros are negative or non-finite
    pub fn new(
        name: impl Into<String>,
        timestamp: DateTime<Utc>,
        calories: f64,
        macros: MacroTargets,
    ) -> AppResult<Self> {
        let meal = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            timestamp,
            calories,
            macros,
            health_score: None,
            micronutrients: BTreeMap::new(),
        };
        meal.validate()?;
        Ok(meal)
    }

    /// Attach a 0-100 health score
    ///
    /// # Errors
    ///
    /// Returns an error if the score is outside 0-100
    pub fn with_health_score(mut self, score: f64) -> AppResult<Self> {
        self.health_score = Some(score);
        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error if a quantity is negative or the health score is outside 0-100
    pub fn validate(&self) -> AppResult<()> {
        let quantities = [
            ("calories", self.calories),
            ("protein", self.macros.protein),
            ("carbs", self.macros.carbs),
            ("fat", self.macros.fat),
        ];
        for (field, value) in quantities {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::out_of_range(format!(
                    "{field} must be a non-negative number, got {value}"
                ))
                .with_resource_id(self.id.to_string()));
            }
        }
        if let Some(score) = self.health_score {
            if !(0.0..=100.0).contains(&score) {
                return Err(AppError::out_of_range(format!(
                    "health_score must be between 0 and 100, got {score}"
                ))
                .with_resource_id(self.id.to_string()));
            }
        }
        Ok(())
    }

    /// The first window whose `[start, end]` interval contains the timestamp
    #[must_use]
    pub fn owning_window<'a>(&self, windows: &'a [Window]) -> Option<&'a Window> {
        windows.iter().find(|window| window.contains(self.timestamp))
    }

    /// Day the meal counts toward
    ///
    /// A meal inside a window belongs to that window's day, so a meal after
    /// midnight in a window that started the evening before stays with the
    /// earlier day. Otherwise the meal's own calendar date applies.
    #[must_use]
    pub fn day_date(&self, windows: &[Window]) -> NaiveDate {
        self.owning_window(windows)
            .map_or_else(|| self.timestamp.date_naive(), |window| window.day_date)
    }
}

/// Summed calories and macros over a set of meals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumedTotals {
    /// Calories consumed
    pub calories: f64,
    /// Macros consumed
    pub macros: MacroTargets,
}

impl ConsumedTotals {
    /// Sum every meal, owned by a window or not
    #[must_use]
    pub fn from_meals<'a>(meals: impl IntoIterator<Item = &'a LoggedMeal>) -> Self {
        meals.into_iter().fold(Self::default(), |mut totals, meal| {
            totals.calories += meal.calories;
            totals.macros += meal.macros;
            totals
        })
    }
}

/// Meals owned by `window`, resolved by interval containment against all `windows`
///
/// Ownership goes to the first containing window so that a meal on a shared
/// boundary is never counted twice.
#[must_use]
pub fn meals_for_window<'a>(
    window: &Window,
    windows: &[Window],
    meals: &'a [LoggedMeal],
) -> Vec<&'a LoggedMeal> {
    meals
        .iter()
        .filter(|meal| {
            meal.owning_window(windows)
                .is_some_and(|owner| owner.id == window.id)
        })
        .collect()
}

/// The most recently logged meal
#[must_use]
pub fn latest_meal(meals: &[LoggedMeal]) -> Option<&LoggedMeal> {
    meals.iter().max_by_key(|meal| meal.timestamp)
}
