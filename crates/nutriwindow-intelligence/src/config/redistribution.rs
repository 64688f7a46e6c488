// ABOUTME: Redistribution and macro balancing configuration
// ABOUTME: Goal clamps, on-track band, balancing tolerance, and purpose floors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Redistribution Configuration
//!
//! Defaults reproduce the baseline policy: a +/-20% on-track band, a 200 kcal
//! window floor, protein protection on weight loss and muscle gain, and a
//! 50 kcal balancing tolerance with purpose-specific macro floors.

use super::error::ConfigError;
use nutriwindow_core::constants::{balancing, redistribution};
use nutriwindow_core::models::WindowPurpose;
use serde::{Deserialize, Serialize};

/// Goal clamps and reason thresholds for the baseline redistributor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedistributionConfig {
    /// Remaining-vs-planned deviation (percent) still treated as on track
    pub on_track_band_percent: f64,
    /// Weight loss: minimum calories per upcoming window
    pub weight_loss_min_calories: f64,
    /// Weight loss: fraction of planned protein preserved
    pub weight_loss_protein_ratio: f64,
    /// Muscle gain: maximum calories as a multiple of the planned target
    pub muscle_gain_max_calorie_ratio: f64,
    /// Other goals: minimum calories per upcoming window
    pub default_min_calories: f64,
    /// Other goals: maximum calories as a multiple of the planned target
    pub default_max_calorie_ratio: f64,
}

impl Default for RedistributionConfig {
    fn default() -> Self {
        Self {
            on_track_band_percent: redistribution::ON_TRACK_BAND_PERCENT,
            weight_loss_min_calories: redistribution::WEIGHT_LOSS_MIN_CALORIES,
            weight_loss_protein_ratio: redistribution::WEIGHT_LOSS_PROTEIN_RATIO,
            muscle_gain_max_calorie_ratio: redistribution::MUSCLE_GAIN_MAX_CALORIE_RATIO,
            default_min_calories: redistribution::DEFAULT_MIN_CALORIES,
            default_max_calorie_ratio: redistribution::DEFAULT_MAX_CALORIE_RATIO,
        }
    }
}

impl RedistributionConfig {
    /// Validate clamps and thresholds
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a value is negative or a cap ratio is below 1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.on_track_band_percent <= 0.0 || self.on_track_band_percent > 100.0 {
            return Err(ConfigError::ValueOutOfRange(
                "on_track_band_percent must be in (0, 100]",
            ));
        }
        if self.weight_loss_min_calories < 0.0 || self.default_min_calories < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "window calorie floors must be non-negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.weight_loss_protein_ratio) {
            return Err(ConfigError::ValueOutOfRange(
                "weight_loss_protein_ratio must be between 0.0 and 1.0",
            ));
        }
        if self.muscle_gain_max_calorie_ratio < 1.0 || self.default_max_calorie_ratio < 1.0 {
            return Err(ConfigError::InvalidRange(
                "calorie cap ratios must be at least 1.0",
            ));
        }
        Ok(())
    }
}

/// Tolerance and purpose floors for macro balancing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroBalanceConfig {
    /// Absolute tolerance between derived and target calories (kcal)
    pub tolerance_kcal: f64,
    /// Pre-workout carbohydrate floor (g)
    pub pre_workout_min_carbs_g: f64,
    /// Post-workout protein floor (g)
    pub post_workout_min_protein_g: f64,
    /// Focus-boost fat floor (g)
    pub focus_boost_min_fat_g: f64,
}

impl Default for MacroBalanceConfig {
    fn default() -> Self {
        Self {
            tolerance_kcal: balancing::CALORIE_TOLERANCE_KCAL,
            pre_workout_min_carbs_g: balancing::PRE_WORKOUT_MIN_CARBS_G,
            post_workout_min_protein_g: balancing::POST_WORKOUT_MIN_PROTEIN_G,
            focus_boost_min_fat_g: balancing::FOCUS_BOOST_MIN_FAT_G,
        }
    }
}

/// Which macro a purpose floor protects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlooredMacro {
    /// Protein grams
    Protein,
    /// Carbohydrate grams
    Carbs,
    /// Fat grams
    Fat,
}

impl MacroBalanceConfig {
    /// The floor a purpose imposes, if any
    #[must_use]
    pub const fn floor_for(&self, purpose: WindowPurpose) -> Option<(FlooredMacro, f64)> {
        match purpose {
            WindowPurpose::PreWorkout => Some((FlooredMacro::Carbs, self.pre_workout_min_carbs_g)),
            WindowPurpose::PostWorkout => {
                Some((FlooredMacro::Protein, self.post_workout_min_protein_g))
            }
            WindowPurpose::FocusBoost => Some((FlooredMacro::Fat, self.focus_boost_min_fat_g)),
            WindowPurpose::SustainedEnergy
            | WindowPurpose::Recovery
            | WindowPurpose::MetabolicBoost
            | WindowPurpose::SleepOptimization => None,
        }
    }

    /// Validate tolerance and floors
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any value is negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tolerance_kcal < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "balancing tolerance must be non-negative",
            ));
        }
        if self.pre_workout_min_carbs_g < 0.0
            || self.post_workout_min_protein_g < 0.0
            || self.focus_boost_min_fat_g < 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "purpose macro floors must be non-negative",
            ));
        }
        Ok(())
    }
}
