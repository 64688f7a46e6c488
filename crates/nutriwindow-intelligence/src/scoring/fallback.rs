// ABOUTME: Score fallback deriving the four sub-factors from raw day counts
// ABOUTME: Used whenever no detailed breakdown is stored or computable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Score Fallback
//!
//! Produces a breakdown from counts so the UI never shows a missing value:
//!
//! - adherence = completed windows / total windows * 10
//! - quality = average meal health score (0-100) / 10
//! - timing = on-time windows / total windows * 10, on time meaning lapsed
//!   with at least one meal
//! - consistency = a fixed 6.5; no variance is computed on this path

use super::compose_breakdown;
use super::insight::{insight_for, InsightScope};
use super::model::ScoreModel;
use crate::config::ScoringConfig;
use chrono::{DateTime, Utc};
use nutriwindow_core::constants::scoring::DISPLAY_MAX;
use nutriwindow_core::models::{LoggedMeal, Score, ScoreBreakdown, Window};
use serde::{Deserialize, Serialize};

/// Raw counts the fallback works from
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FallbackInputs {
    /// Windows in the day
    pub total_windows: usize,
    /// Windows owning at least one meal
    pub completed_windows: usize,
    /// Lapsed windows owning at least one meal
    pub on_time_windows: usize,
    /// Average 0-100 health score over meals that carry one
    pub average_health_score: Option<f64>,
}

impl FallbackInputs {
    /// Count a day's windows and meals as of `now`
    #[must_use]
    pub fn from_day(windows: &[Window], meals: &[LoggedMeal], now: DateTime<Utc>) -> Self {
        let completed: Vec<&Window> = windows
            .iter()
            .filter(|window| {
                meals.iter().any(|meal| {
                    meal.owning_window(windows)
                        .is_some_and(|owner| owner.id == window.id)
                })
            })
            .collect();

        Self {
            total_windows: windows.len(),
            completed_windows: completed.len(),
            on_time_windows: completed.iter().filter(|window| window.is_past(now)).count(),
            average_health_score: average_health_score(meals),
        }
    }
}

/// Mean health score over meals that carry one
#[must_use]
pub fn average_health_score<'a>(
    meals: impl IntoIterator<Item = &'a LoggedMeal>,
) -> Option<f64> {
    let scores: Vec<f64> = meals
        .into_iter()
        .filter_map(|meal| meal.health_score)
        .collect();
    if scores.is_empty() {
        return None;
    }
    let count = scores.len() as f64;
    Some(scores.iter().sum::<f64>() / count)
}

fn ratio_out_of_ten(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * DISPLAY_MAX).min(DISPLAY_MAX)
}

/// Count-based sub-factor derivation
#[derive(Debug, Clone, Default)]
pub struct ScoreFallback {
    config: ScoringConfig,
}

impl ScoreFallback {
    /// Fallback with default weights
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback with custom weights and consistency default
    #[must_use]
    pub const fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Completed windows out of all windows, on 0-10
    #[must_use]
    pub fn adherence(inputs: &FallbackInputs) -> f64 {
        ratio_out_of_ten(inputs.completed_windows, inputs.total_windows)
    }

    /// Average health score on 0-10; 0 when no meal was scored
    #[must_use]
    pub fn quality(inputs: &FallbackInputs) -> f64 {
        inputs
            .average_health_score
            .map_or(0.0, |average| (average / 10.0).clamp(0.0, DISPLAY_MAX))
    }

    /// On-time windows out of all windows, on 0-10
    #[must_use]
    pub fn timing(inputs: &FallbackInputs) -> f64 {
        ratio_out_of_ten(inputs.on_time_windows, inputs.total_windows)
    }

    /// Fixed consistency default
    #[must_use]
    pub const fn consistency(&self) -> f64 {
        self.config.consistency_fallback
    }

    /// Full breakdown with the weighted overall
    #[must_use]
    pub fn breakdown(&self, inputs: &FallbackInputs) -> ScoreBreakdown {
        compose_breakdown(
            &self.config,
            Self::adherence(inputs),
            Self::quality(inputs),
            Self::timing(inputs),
            self.consistency(),
        )
    }

    /// Day score built entirely from counts
    #[must_use]
    pub fn score(&self, inputs: &FallbackInputs) -> Score {
        let breakdown = self.breakdown(inputs);
        let weakest = ScoreModel::weakest_factor(&breakdown);
        Score::from_internal(super::internal_from_overall(breakdown.overall))
            .with_breakdown(breakdown)
            .with_insight(insight_for(weakest, InsightScope::Day))
    }

    /// A score's own breakdown, or the fallback one when it has none
    #[must_use]
    pub fn resolve(&self, score: &Score, inputs: &FallbackInputs) -> ScoreBreakdown {
        score
            .breakdown
            .unwrap_or_else(|| self.breakdown(inputs))
    }
}
