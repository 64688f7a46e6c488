// ABOUTME: Day orchestration over the nutrition store, dispatcher, and score engine
// ABOUTME: Fetches a day, redistributes, writes back changed windows, and scores the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Day service
//!
//! Every call recomputes from the store's current snapshot of the day.
//! Only windows the pass actually redistributed are written back.

use crate::store::NutritionStore;
use chrono::{DateTime, NaiveDate, Utc};
use nutriwindow_core::errors::AppResult;
use nutriwindow_core::models::Window;
use nutriwindow_intelligence::config::WindowEngineConfig;
use nutriwindow_intelligence::dispatcher::{AdvancedEngine, DeviationDispatcher, DispatchRoute};
use nutriwindow_intelligence::scoring::{DayScoreReport, ScoreEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Result of rebalancing one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceOutcome {
    /// Day that was rebalanced
    pub day: NaiveDate,
    /// Route the dispatcher took
    pub route: DispatchRoute,
    /// Every window of the day after write-back
    pub windows: Vec<Window>,
    /// Number of windows written back
    pub updated: usize,
}

/// Orchestrates redistribution and scoring for a day
#[derive(Clone)]
pub struct DayService {
    store: Arc<dyn NutritionStore>,
    dispatcher: DeviationDispatcher,
    scorer: ScoreEngine,
}

impl DayService {
    /// Service using the globally loaded configuration
    #[must_use]
    pub fn new(store: Arc<dyn NutritionStore>) -> Self {
        Self::with_config(store, WindowEngineConfig::global())
    }

    /// Service using an explicit configuration
    #[must_use]
    pub fn with_config(store: Arc<dyn NutritionStore>, config: &WindowEngineConfig) -> Self {
        Self {
            store,
            dispatcher: DeviationDispatcher::with_config(config),
            scorer: ScoreEngine::with_config(config),
        }
    }

    /// Route redistribution through an advanced engine first
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn AdvancedEngine>) -> Self {
        self.dispatcher = self.dispatcher.with_engine(engine);
        self
    }

    /// Redistribute `day` as of `now` and persist the windows that changed
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to load the day or save a window
    pub async fn rebalance_day(
        &self,
        day: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<RebalanceOutcome> {
        let windows = self.store.get_windows(day).await?;
        let meals = self.store.get_meals(day).await?;
        let profile = self.store.get_profile().await?;

        let dispatch = self.dispatcher.dispatch(&windows, &meals, &profile, now).await;

        let mut updated = 0;
        let mut result = Vec::with_capacity(dispatch.windows.len());
        for redistributed in dispatch.windows {
            let changed = redistributed.redistributed;
            let window = redistributed.into_window();
            if changed {
                self.store.save_window(&window).await?;
                updated += 1;
            }
            result.push(window);
        }

        info!(
            %day,
            route = %dispatch.route,
            windows = result.len(),
            meals = meals.len(),
            updated,
            "Rebalanced day"
        );

        Ok(RebalanceOutcome {
            day,
            route: dispatch.route,
            windows: result,
            updated,
        })
    }

    /// Score `day` as of `now` using the stored (possibly redistributed) windows
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to load the day
    pub async fn score_day(&self, day: NaiveDate, now: DateTime<Utc>) -> AppResult<DayScoreReport> {
        let windows = self.store.get_windows(day).await?;
        let meals = self.store.get_meals(day).await?;

        let report = self.scorer.report_day(&windows, &meals, now);
        info!(
            %day,
            internal = report.score.internal,
            band = %report.band,
            fallback = report.used_fallback,
            "Scored day"
        );
        Ok(report)
    }
}
