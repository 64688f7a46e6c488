// ABOUTME: JSON day snapshots holding a profile, windows, and meals for one day
// ABOUTME: Loads and saves snapshot files and seeds an in-memory store from them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::store::InMemoryStore;
use chrono::NaiveDate;
use nutriwindow_core::errors::{AppError, AppResult};
use nutriwindow_core::models::{LoggedMeal, UserProfile, Window};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to redistribute or score one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySnapshot {
    /// Calendar day
    pub day: NaiveDate,
    /// Daily budget and goal
    pub profile: UserProfile,
    /// Windows of the day
    pub windows: Vec<Window>,
    /// Meals logged so far
    #[serde(default)]
    pub meals: Vec<LoggedMeal>,
}

impl DaySnapshot {
    /// Parse and validate a snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any record fails validation
    pub fn from_json(json: &str) -> AppResult<Self> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serialize as pretty JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a snapshot file
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or doesn't hold a valid snapshot
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::storage(format!("Failed to read snapshot {}", path.display())).with_source(e)
        })?;
        Self::from_json(&json).map_err(|e| e.with_resource_id(path.display().to_string()))
    }

    /// Write the snapshot to a file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| {
            AppError::storage(format!("Failed to write snapshot {}", path.display())).with_source(e)
        })
    }

    /// Check every window and meal belongs to `day` and passes its own validation
    ///
    /// # Errors
    ///
    /// Returns the first invalid record
    pub fn validate(&self) -> AppResult<()> {
        self.profile.validate()?;
        for window in &self.windows {
            window.validate()?;
            if window.day_date != self.day {
                return Err(AppError::invalid_input(format!(
                    "Window '{}' belongs to {}, not {}",
                    window.name, window.day_date, self.day
                ))
                .with_resource_id(window.id.to_string()));
            }
        }
        for meal in &self.meals {
            meal.validate()?;
            let meal_day = meal.day_date(&self.windows);
            if meal_day != self.day {
                return Err(AppError::invalid_input(format!(
                    "Meal '{}' belongs to {meal_day}, not {}",
                    meal.name, self.day
                ))
                .with_resource_id(meal.id.to_string()));
            }
        }
        Ok(())
    }

    /// Seed an in-memory store with this day
    #[must_use]
    pub fn to_store(&self) -> InMemoryStore {
        let store = InMemoryStore::with_profile(self.profile.clone());
        for window in &self.windows {
            store.insert_window(window.clone());
        }
        for meal in &self.meals {
            store.log_meal(meal.clone());
        }
        store
    }

    /// Replace the windows, keeping profile and meals
    #[must_use]
    pub fn with_windows(mut self, windows: Vec<Window>) -> Self {
        self.windows = windows;
        self
    }
}
