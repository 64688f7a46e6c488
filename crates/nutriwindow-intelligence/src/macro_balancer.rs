// ABOUTME: Macro balancer rescaling a macro split to match a calorie target
// ABOUTME: Honors a 50 kcal tolerance band and purpose-specific macro floors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Macro Balancer
//!
//! Given a calorie target and a macro split, produces a split whose derived
//! calories (`protein*4 + carbs*4 + fat*9`) land within the tolerance of the
//! target. Splits already inside the tolerance band are returned unchanged.
//! Otherwise every macro is scaled by `target / current` and the window
//! purpose's floor is applied as a final clamp-up.
//!
//! Floors are not re-balanced against calories. A floored split may drift
//! past the tolerance by at most the floor's top-up (e.g. a pre-workout
//! window raised from 20 g to 30 g carbs drifts by 40 kcal more).

use crate::config::{FlooredMacro, MacroBalanceConfig};
use nutriwindow_core::models::{MacroTargets, WindowPurpose};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Result of one balancing call with what was done to reach it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancedMacros {
    /// Final macro split
    pub macros: MacroTargets,
    /// Whether the split was rescaled
    pub rescaled: bool,
    /// Macro raised to its purpose floor after scaling, if any
    pub floor_applied: Option<FlooredMacro>,
}

/// Rescales macro splits to calorie targets
#[derive(Debug, Clone, Default)]
pub struct MacroBalancer {
    config: MacroBalanceConfig,
}

impl MacroBalancer {
    /// Balancer with default tolerance and floors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balancer with custom tolerance and floors
    #[must_use]
    pub const fn with_config(config: MacroBalanceConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &MacroBalanceConfig {
        &self.config
    }

    /// Balance `macros` against `target_calories` for a window of `purpose`
    #[must_use]
    pub fn balance(
        &self,
        target_calories: f64,
        macros: MacroTargets,
        purpose: WindowPurpose,
    ) -> MacroTargets {
        self.balance_detailed(target_calories, macros, purpose).macros
    }

    /// Same as [`MacroBalancer::balance`], reporting whether scaling and floors kicked in
    #[must_use]
    pub fn balance_detailed(
        &self,
        target_calories: f64,
        macros: MacroTargets,
        purpose: WindowPurpose,
    ) -> BalancedMacros {
        let unchanged = BalancedMacros {
            macros,
            rescaled: false,
            floor_applied: None,
        };

        let current = macros.calories();
        if (current - target_calories).abs() <= self.config.tolerance_kcal {
            return unchanged;
        }
        // All-zero split: nothing to scale, caller treats the window as degenerate
        if current.abs() < f64::EPSILON {
            debug!(target_calories, "Zero-calorie macro split left unbalanced");
            return unchanged;
        }

        let scale = target_calories / current;
        let mut balanced = macros.scaled(scale);
        let floor_applied = self.apply_purpose_floor(&mut balanced, purpose);

        debug!(
            target_calories,
            current_calories = current,
            scale,
            purpose = %purpose,
            floored = floor_applied.is_some(),
            "Rescaled macro split"
        );

        BalancedMacros {
            macros: balanced,
            rescaled: true,
            floor_applied,
        }
    }

    /// Raise the purpose's protected macro to its floor; never lowers a value
    fn apply_purpose_floor(
        &self,
        macros: &mut MacroTargets,
        purpose: WindowPurpose,
    ) -> Option<FlooredMacro> {
        let (protected, floor) = self.config.floor_for(purpose)?;
        let slot = match protected {
            FlooredMacro::Protein => &mut macros.protein,
            FlooredMacro::Carbs => &mut macros.carbs,
            FlooredMacro::Fat => &mut macros.fat,
        };
        if *slot < floor {
            *slot = floor;
            Some(protected)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_within_tolerance_is_unchanged() {
        let balancer = MacroBalancer::new();
        // 45*4 + 55*4 + 17.5*9 = 557.5, within 50 of 550
        let macros = MacroTargets::new(45.0, 55.0, 17.5);
        let result = balancer.balance_detailed(550.0, macros, WindowPurpose::SustainedEnergy);
        assert_eq!(result.macros, macros);
        assert!(!result.rescaled);
    }

    #[test]
    fn test_tolerance_edge_is_inclusive() {
        let balancer = MacroBalancer::new();
        // 400 kcal, exactly 50 below 450
        let macros = MacroTargets::new(25.0, 75.0, 0.0);
        assert_eq!(
            balancer.balance(450.0, macros, WindowPurpose::Recovery),
            macros
        );
    }

    #[test]
    fn test_rescales_outside_tolerance() {
        let balancer = MacroBalancer::new();
        let macros = MacroTargets::new(40.0, 80.0, 20.0); // 660 kcal
        let result = balancer.balance_detailed(330.0, macros, WindowPurpose::SustainedEnergy);
        assert!(result.rescaled);
        assert_close(result.macros.protein, 20.0);
        assert_close(result.macros.carbs, 40.0);
        assert_close(result.macros.fat, 10.0);
        assert_close(result.macros.calories(), 330.0);
    }

    #[test]
    fn test_pre_workout_carb_floor_after_scaling() {
        let balancer = MacroBalancer::new();
        let macros = MacroTargets::new(20.0, 40.0, 10.0); // 330 kcal
        let result = balancer.balance_detailed(165.0, macros, WindowPurpose::PreWorkout);
        assert_eq!(result.floor_applied, Some(FlooredMacro::Carbs));
        assert_close(result.macros.carbs, 30.0);
        assert_close(result.macros.protein, 10.0);
        // Floor top-up of 10 g carbs drifts 40 kcal past the target
        assert_close(result.macros.calories(), 205.0);
    }

    #[test]
    fn test_post_workout_and_focus_floors() {
        let balancer = MacroBalancer::new();
        let macros = MacroTargets::new(20.0, 40.0, 10.0);

        let post = balancer.balance(165.0, macros, WindowPurpose::PostWorkout);
        assert_close(post.protein, 30.0);

        let focus = balancer.balance(165.0, macros, WindowPurpose::FocusBoost);
        assert_close(focus.fat, 10.0);
        assert_close(focus.protein, 10.0);
    }

    #[test]
    fn test_floor_never_clamps_down() {
        let balancer = MacroBalancer::new();
        let macros = MacroTargets::new(40.0, 100.0, 20.0); // 740 kcal
        let result = balancer.balance_detailed(1480.0, macros, WindowPurpose::PreWorkout);
        assert!(result.floor_applied.is_none());
        assert_close(result.macros.carbs, 200.0);
    }

    #[test]
    fn test_zero_macros_do_not_divide() {
        let balancer = MacroBalancer::new();
        let result =
            balancer.balance_detailed(500.0, MacroTargets::zero(), WindowPurpose::PreWorkout);
        assert!(result.macros.is_zero());
        assert!(!result.rescaled);
    }

    #[test]
    fn test_custom_tolerance() {
        let balancer = MacroBalancer::with_config(MacroBalanceConfig {
            tolerance_kcal: 5.0,
            ..MacroBalanceConfig::default()
        });
        let macros = MacroTargets::new(45.0, 55.0, 17.5); // 557.5 kcal
        let result = balancer.balance(550.0, macros, WindowPurpose::Recovery);
        assert_close(result.calories(), 550.0);
    }
}
