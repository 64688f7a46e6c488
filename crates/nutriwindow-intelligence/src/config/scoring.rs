// ABOUTME: Scoring configuration for factor weights and fallback defaults
// ABOUTME: Weights combine the four sub-factors into the overall display score
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::error::ConfigError;
use nutriwindow_core::constants::scoring;
use nutriwindow_core::models::ScoreFactor;
use serde::{Deserialize, Serialize};

/// Scoring weights and defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Adherence weight
    pub adherence_weight: f64,
    /// Quality weight
    pub quality_weight: f64,
    /// Timing weight
    pub timing_weight: f64,
    /// Consistency weight
    pub consistency_weight: f64,
    /// Consistency sub-score used by the fallback path.
    /// Pending product confirmation; replace once a variance-based value is agreed.
    pub consistency_fallback: f64,
    /// Quality sub-score when no meal carries a health score
    pub unscored_quality: f64,
    /// Window consistency sub-score when the window plans no protein, carbs, or fat
    pub unplanned_macro_balance: f64,
    /// Timing credit for a meal inside the flexibility buffer but outside the window
    pub buffered_meal_timing_credit: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            adherence_weight: scoring::ADHERENCE_WEIGHT,
            quality_weight: scoring::QUALITY_WEIGHT,
            timing_weight: scoring::TIMING_WEIGHT,
            consistency_weight: scoring::CONSISTENCY_WEIGHT,
            consistency_fallback: scoring::CONSISTENCY_FALLBACK,
            unscored_quality: scoring::NEUTRAL_SUB_SCORE,
            unplanned_macro_balance: scoring::UNPLANNED_MACRO_BALANCE,
            buffered_meal_timing_credit: scoring::BUFFERED_MEAL_TIMING_CREDIT,
        }
    }
}

impl ScoringConfig {
    /// Weight for one factor
    #[must_use]
    pub const fn weight(&self, factor: ScoreFactor) -> f64 {
        match factor {
            ScoreFactor::Adherence => self.adherence_weight,
            ScoreFactor::Quality => self.quality_weight,
            ScoreFactor::Timing => self.timing_weight,
            ScoreFactor::Consistency => self.consistency_weight,
        }
    }

    /// Validate weights and defaults
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if weights don't sum to 1.0 or a default leaves the 0-10 scale
    pub fn validate(&self) -> Result<(), ConfigError> {
        if ScoreFactor::ALL.iter().any(|factor| self.weight(*factor) < 0.0) {
            return Err(ConfigError::ValueOutOfRange(
                "factor weights must be non-negative",
            ));
        }
        let weight_sum: f64 = ScoreFactor::ALL.iter().map(|factor| self.weight(*factor)).sum();
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(ConfigError::InvalidWeights("Factor weights must sum to 1.0"));
        }
        let scale = 0.0..=scoring::DISPLAY_MAX;
        let defaults = [
            self.consistency_fallback,
            self.unscored_quality,
            self.unplanned_macro_balance,
        ];
        if defaults.iter().any(|value| !scale.contains(value)) {
            return Err(ConfigError::ValueOutOfRange(
                "fallback sub-scores must be between 0 and 10",
            ));
        }
        if !(0.0..=1.0).contains(&self.buffered_meal_timing_credit) {
            return Err(ConfigError::ValueOutOfRange(
                "buffered_meal_timing_credit must be between 0.0 and 1.0",
            ));
        }
        Ok(())
    }
}
