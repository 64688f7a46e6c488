// ABOUTME: User nutrition profile with daily budget and primary goal
// ABOUTME: UserProfile and NutritionGoal drive redistribution clamping policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::macros::MacroTargets;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Primary nutrition goal
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NutritionGoal {
    /// Caloric deficit while protecting protein
    WeightLoss,
    /// Caloric surplus while protecting protein
    MuscleGain,
    /// Training performance (workout-adjacent windows protected)
    PerformanceFocus,
    /// Caloric balance
    #[default]
    Maintenance,
    /// Steadier energy through the day
    ImprovedEnergy,
    /// Sleep quality
    BetterSleep,
    /// General wellbeing
    OverallWellbeing,
}

impl NutritionGoal {
    /// Parse goal from string
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "weight_loss" | "lose_weight" => Self::WeightLoss,
            "muscle_gain" | "build_muscle" => Self::MuscleGain,
            "performance_focus" | "performance" => Self::PerformanceFocus,
            "improved_energy" | "energy" => Self::ImprovedEnergy,
            "better_sleep" | "sleep" => Self::BetterSleep,
            "overall_wellbeing" | "wellbeing" => Self::OverallWellbeing,
            _ => Self::Maintenance,
        }
    }
}

/// Daily budget and goal for one person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Daily calorie target (kcal)
    pub daily_calorie_target: f64,
    /// Daily macro targets (grams)
    pub daily_macros: MacroTargets,
    /// Primary goal
    #[serde(default)]
    pub goal: NutritionGoal,
}

impl UserProfile {
    /// Create a profile
    ///
    /// # Errors
    ///
    /// Returns an error if a daily target is negative or non-finite
    pub fn new(
        daily_calorie_target: f64,
        daily_macros: MacroTargets,
        goal: NutritionGoal,
    ) -> AppResult<Self> {
        let profile = Self {
            daily_calorie_target,
            daily_macros,
            goal,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns an error if a daily target is negative or non-finite
    pub fn validate(&self) -> AppResult<()> {
        let targets = [
            ("daily_calorie_target", self.daily_calorie_target),
            ("daily_macros.protein", self.daily_macros.protein),
            ("daily_macros.carbs", self.daily_macros.carbs),
            ("daily_macros.fat", self.daily_macros.fat),
        ];
        for (field, value) in targets {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::out_of_range(format!(
                    "{field} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}
