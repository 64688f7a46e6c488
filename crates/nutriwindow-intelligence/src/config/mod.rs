// ABOUTME: Window engine configuration for redistribution, balancing, dispatch, and scoring
// ABOUTME: Aggregates domain configs and provides unified validation, env overrides, and loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Window Engine Configuration
//!
//! # Module Structure
//!
//! - `redistribution` - Goal clamps, on-track band, and macro balancing floors
//! - `scoring` - Factor weights and fallback sub-scores
//! - `error` - Validation and parse errors
//!
//! Every default reproduces the baseline policy constants in
//! `nutriwindow_core::constants`. Overrides are read from `NUTRIWINDOW_*`
//! environment variables.

pub mod error;
pub mod redistribution;
pub mod scoring;

pub use error::ConfigError;
pub use redistribution::{FlooredMacro, MacroBalanceConfig, RedistributionConfig};
pub use scoring::ScoringConfig;

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::warn;

/// Global configuration singleton
static WINDOW_ENGINE_CONFIG: OnceLock<WindowEngineConfig> = OnceLock::new();

/// Routing policy for the optional advanced engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Deviation (percent) the advanced engine should treat as significant.
    /// Passed through untouched; `None` lets the engine use its own policy.
    pub advanced_trigger_threshold_percent: Option<f64>,
}

impl DispatcherConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.advanced_trigger_threshold_percent {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ConfigError::ValueOutOfRange(
                    "advanced_trigger_threshold_percent must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

/// Main window engine configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowEngineConfig {
    /// Baseline redistribution clamps and thresholds
    pub redistribution: RedistributionConfig,
    /// Macro balancing tolerance and purpose floors
    pub macro_balance: MacroBalanceConfig,
    /// Score weights and fallback values
    pub scoring: ScoringConfig,
    /// Advanced engine routing
    pub dispatcher: DispatcherConfig,
}

impl WindowEngineConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        WINDOW_ENGINE_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load window engine config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.redistribution.validate()?;
        self.macro_balance.validate()?;
        self.scoring.validate()?;
        self.dispatcher.validate()
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Same as `apply_env_var` for settings that are off unless provided
    fn apply_optional_env_var<T: FromStr>(
        env_var_name: &str,
        target: &mut Option<T>,
    ) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            let parsed = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
            *target = Some(parsed);
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Redistribution overrides
        Self::apply_env_var(
            "NUTRIWINDOW_ON_TRACK_BAND_PERCENT",
            &mut self.redistribution.on_track_band_percent,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_WEIGHT_LOSS_MIN_CALORIES",
            &mut self.redistribution.weight_loss_min_calories,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_WEIGHT_LOSS_PROTEIN_RATIO",
            &mut self.redistribution.weight_loss_protein_ratio,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_MUSCLE_GAIN_MAX_CALORIE_RATIO",
            &mut self.redistribution.muscle_gain_max_calorie_ratio,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_DEFAULT_MIN_CALORIES",
            &mut self.redistribution.default_min_calories,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_DEFAULT_MAX_CALORIE_RATIO",
            &mut self.redistribution.default_max_calorie_ratio,
        )?;

        // Macro balancing overrides
        Self::apply_env_var(
            "NUTRIWINDOW_BALANCE_TOLERANCE_KCAL",
            &mut self.macro_balance.tolerance_kcal,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_PRE_WORKOUT_MIN_CARBS_G",
            &mut self.macro_balance.pre_workout_min_carbs_g,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_POST_WORKOUT_MIN_PROTEIN_G",
            &mut self.macro_balance.post_workout_min_protein_g,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_FOCUS_BOOST_MIN_FAT_G",
            &mut self.macro_balance.focus_boost_min_fat_g,
        )?;

        // Scoring overrides
        Self::apply_env_var(
            "NUTRIWINDOW_SCORE_ADHERENCE_WEIGHT",
            &mut self.scoring.adherence_weight,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_SCORE_QUALITY_WEIGHT",
            &mut self.scoring.quality_weight,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_SCORE_TIMING_WEIGHT",
            &mut self.scoring.timing_weight,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_SCORE_CONSISTENCY_WEIGHT",
            &mut self.scoring.consistency_weight,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_SCORE_CONSISTENCY_FALLBACK",
            &mut self.scoring.consistency_fallback,
        )?;
        Self::apply_env_var(
            "NUTRIWINDOW_SCORE_UNPLANNED_MACRO_BALANCE",
            &mut self.scoring.unplanned_macro_balance,
        )?;

        // Dispatcher overrides
        Self::apply_optional_env_var(
            "NUTRIWINDOW_ADVANCED_TRIGGER_THRESHOLD_PERCENT",
            &mut self.dispatcher.advanced_trigger_threshold_percent,
        )?;

        Ok(self)
    }
}
