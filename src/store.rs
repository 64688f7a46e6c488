// ABOUTME: Persistence collaborator contract for windows, meals, and the user profile
// ABOUTME: NutritionStore trait plus a DashMap-backed in-memory implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Nutrition store
//!
//! The window engine never opens a connection itself. It reads
//! already-materialized collections through [`NutritionStore`] and writes
//! redistributed windows back one at a time. Concurrent writers to the same
//! window are last-writer-wins.

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use nutriwindow_core::errors::{AppError, AppResult};
use nutriwindow_core::models::{LoggedMeal, UserProfile, Window};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Query and persistence service for one user's nutrition data
#[async_trait]
pub trait NutritionStore: Send + Sync {
    /// Windows of `day`, ordered by start
    async fn get_windows(&self, day: NaiveDate) -> AppResult<Vec<Window>>;

    /// Meals counting toward `day`, ordered by timestamp
    ///
    /// Includes meals after midnight that fall inside one of the day's windows.
    async fn get_meals(&self, day: NaiveDate) -> AppResult<Vec<LoggedMeal>>;

    /// The user's profile
    async fn get_profile(&self) -> AppResult<UserProfile>;

    /// Insert or replace a window
    async fn save_window(&self, window: &Window) -> AppResult<()>;
}

/// In-memory store for tests, the CLI, and single-process use
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    windows: Arc<DashMap<Uuid, Window>>,
    meals: Arc<DashMap<Uuid, LoggedMeal>>,
    profile: Arc<RwLock<Option<UserProfile>>>,
}

impl InMemoryStore {
    /// Empty store without a profile
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store holding `profile`
    #[must_use]
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Arc::new(RwLock::new(Some(profile))),
            ..Self::default()
        }
    }

    /// Replace the profile
    pub async fn set_profile(&self, profile: UserProfile) {
        *self.profile.write().await = Some(profile);
    }

    /// Insert or replace a window
    pub fn insert_window(&self, window: Window) {
        self.windows.insert(window.id, window);
    }

    /// Record a meal
    pub fn log_meal(&self, meal: LoggedMeal) {
        self.meals.insert(meal.id, meal);
    }

    /// Number of stored windows across all days
    #[must_use]
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// A stored window by id
    #[must_use]
    pub fn window(&self, id: Uuid) -> Option<Window> {
        self.windows.get(&id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl NutritionStore for InMemoryStore {
    async fn get_windows(&self, day: NaiveDate) -> AppResult<Vec<Window>> {
        let mut windows: Vec<Window> = self
            .windows
            .iter()
            .filter(|entry| entry.day_date == day)
            .map(|entry| entry.value().clone())
            .collect();
        windows.sort_by_key(|window| window.start);
        Ok(windows)
    }

    async fn get_meals(&self, day: NaiveDate) -> AppResult<Vec<LoggedMeal>> {
        let mut windows: Vec<Window> = self
            .windows
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        windows.sort_by_key(|window| window.start);

        let mut meals: Vec<LoggedMeal> = self
            .meals
            .iter()
            .filter(|entry| entry.day_date(&windows) == day)
            .map(|entry| entry.value().clone())
            .collect();
        meals.sort_by_key(|meal| meal.timestamp);
        Ok(meals)
    }

    async fn get_profile(&self) -> AppResult<UserProfile> {
        self.profile
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::not_found("User profile"))
    }

    async fn save_window(&self, window: &Window) -> AppResult<()> {
        window.validate()?;
        self.windows.insert(window.id, window.clone());
        Ok(())
    }
}
