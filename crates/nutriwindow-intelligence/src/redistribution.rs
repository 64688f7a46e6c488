// ABOUTME: Baseline redistribution of the remaining daily budget across upcoming windows
// ABOUTME: Proportional allocation with goal-specific clamps and per-window macro balancing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Baseline Redistributor
//!
//! Re-spreads what is left of the daily budget over windows that have not
//! lapsed yet. Each upcoming window receives a share of the remaining
//! calories and macros proportional to its planned calories, then the
//! profile goal's clamps are applied and the result is balanced by
//! [`MacroBalancer`]. Lapsed windows pass through unchanged.
//!
//! The pass is a pure function of its inputs: `now` is always supplied by
//! the caller and nothing is persisted.

use crate::config::{RedistributionConfig, WindowEngineConfig};
use crate::macro_balancer::MacroBalancer;
use chrono::{DateTime, Utc};
use nutriwindow_core::models::{
    ConsumedTotals, LoggedMeal, MacroTargets, NutritionGoal, RedistributedWindow,
    RedistributionReason, UserProfile, Window, WindowPurpose,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What is left of the daily budget; any field may be negative on an over-budget day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemainingBudget {
    /// Remaining calories
    pub calories: f64,
    /// Remaining macros
    pub macros: MacroTargets,
}

impl RemainingBudget {
    /// Daily targets minus everything consumed so far
    #[must_use]
    pub fn from_profile(profile: &UserProfile, consumed: &ConsumedTotals) -> Self {
        Self {
            calories: profile.daily_calorie_target - consumed.calories,
            macros: profile.daily_macros - consumed.macros,
        }
    }
}

/// A calorie and macro pair for one window, before balancing
#[derive(Debug, Clone, Copy, PartialEq)]
struct Allocation {
    calories: f64,
    macros: MacroTargets,
}

/// Deterministic, explainable redistribution heuristic
#[derive(Debug, Clone, Default)]
pub struct BaselineRedistributor {
    config: RedistributionConfig,
    balancer: MacroBalancer,
}

impl BaselineRedistributor {
    /// Redistributor with default policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Redistributor using the redistribution and balancing sections of `config`
    #[must_use]
    pub fn with_config(config: &WindowEngineConfig) -> Self {
        Self {
            config: config.redistribution.clone(),
            balancer: MacroBalancer::with_config(config.macro_balance.clone()),
        }
    }

    /// Re-spread the remaining budget over every window that has not lapsed at `now`
    ///
    /// Returns one entry per input window, in input order.
    #[must_use]
    pub fn redistribute(
        &self,
        windows: &[Window],
        meals: &[LoggedMeal],
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Vec<RedistributedWindow> {
        let consumed = ConsumedTotals::from_meals(meals);
        let remaining = RemainingBudget::from_profile(profile, &consumed);

        let total_upcoming_calories: f64 = windows
            .iter()
            .filter(|window| !window.is_past(now))
            .map(|window| window.target_calories)
            .sum();
        let upcoming_count = windows.iter().filter(|window| !window.is_past(now)).count();

        if upcoming_count == 0 {
            debug!("No upcoming windows, nothing to redistribute");
            return Self::pass_through_all(windows);
        }
        if total_upcoming_calories.abs() < f64::EPSILON {
            debug!(
                upcoming_count,
                "Upcoming windows plan zero calories, redistribution skipped"
            );
            return Self::pass_through_all(windows);
        }

        let reason = self.shared_reason(remaining.calories, total_upcoming_calories);
        info!(
            remaining_calories = remaining.calories,
            total_upcoming_calories,
            upcoming_count,
            goal = ?profile.goal,
            reason = reason.map_or("on_track", |r| r.code()),
            "Redistributing remaining budget"
        );

        windows
            .iter()
            .map(|window| {
                if window.is_past(now) {
                    RedistributedWindow::pass_through(window.clone())
                } else {
                    let share = window.target_calories / total_upcoming_calories;
                    let raw = Allocation {
                        calories: remaining.calories * share,
                        macros: remaining.macros.scaled(share),
                    };
                    let clamped = self.clamp_for_goal(profile.goal, window, raw);
                    let allocation = Self::sanitize(window, clamped);
                    let macros = self.balancer.balance(
                        allocation.calories,
                        allocation.macros,
                        window.purpose,
                    );
                    RedistributedWindow::adjusted(
                        window.clone(),
                        allocation.calories,
                        macros,
                        reason,
                    )
                }
            })
            .collect()
    }

    /// Reason shared by every upcoming window in one pass
    ///
    /// Compares remaining calories against the planned upcoming total. Inside
    /// the on-track band no reason is attached.
    #[must_use]
    pub fn shared_reason(
        &self,
        remaining_calories: f64,
        total_upcoming_calories: f64,
    ) -> Option<RedistributionReason> {
        if total_upcoming_calories.abs() < f64::EPSILON {
            return None;
        }
        let percent_diff =
            (remaining_calories - total_upcoming_calories) * 100.0 / total_upcoming_calories;
        let band = self.config.on_track_band_percent;
        if percent_diff < -band {
            Some(RedistributionReason::Overconsumption {
                percent_over: percent_diff.abs(),
            })
        } else if percent_diff > band {
            Some(RedistributionReason::Underconsumption {
                percent_under: percent_diff,
            })
        } else {
            None
        }
    }

    fn pass_through_all(windows: &[Window]) -> Vec<RedistributedWindow> {
        windows
            .iter()
            .cloned()
            .map(RedistributedWindow::pass_through)
            .collect()
    }

    /// Goal policy: only calories and protein are clamped directly, except
    /// performance focus which protects workout-adjacent macros
    fn clamp_for_goal(&self, goal: NutritionGoal, window: &Window, raw: Allocation) -> Allocation {
        let planned = window.target_macros;
        let mut clamped = raw;

        match goal {
            NutritionGoal::WeightLoss => {
                clamped.calories = clamped.calories.max(self.config.weight_loss_min_calories);
                clamped.macros.protein = clamped
                    .macros
                    .protein
                    .max(planned.protein * self.config.weight_loss_protein_ratio);
            }
            NutritionGoal::MuscleGain => {
                clamped.calories = clamped
                    .calories
                    .min(window.target_calories * self.config.muscle_gain_max_calorie_ratio);
                clamped.macros.protein = clamped.macros.protein.max(planned.protein);
            }
            NutritionGoal::PerformanceFocus => match window.purpose {
                WindowPurpose::PreWorkout => {
                    clamped.macros.carbs = clamped.macros.carbs.max(planned.carbs);
                }
                WindowPurpose::PostWorkout => {
                    clamped.macros.protein = clamped.macros.protein.max(planned.protein);
                }
                WindowPurpose::SustainedEnergy
                | WindowPurpose::Recovery
                | WindowPurpose::MetabolicBoost
                | WindowPurpose::SleepOptimization
                | WindowPurpose::FocusBoost => {}
            },
            NutritionGoal::Maintenance
            | NutritionGoal::ImprovedEnergy
            | NutritionGoal::BetterSleep
            | NutritionGoal::OverallWellbeing => {
                let cap = window.target_calories * self.config.default_max_calorie_ratio;
                // Floor wins when a tiny window's cap falls below it
                clamped.calories = clamped
                    .calories
                    .min(cap)
                    .max(self.config.default_min_calories);
            }
        }

        if clamped != raw {
            debug!(
                window = %window.name,
                goal = ?goal,
                raw_calories = raw.calories,
                clamped_calories = clamped.calories,
                "Applied goal clamp"
            );
        }
        clamped
    }

    /// Make an allocation usable as a window budget
    ///
    /// Negative grams are floored at zero. If that leaves no macros while
    /// calories remain, the window's planned macro ratio is scaled to those
    /// calories so the balancer has something to work with.
    fn sanitize(window: &Window, allocation: Allocation) -> Allocation {
        let calories = allocation.calories.max(0.0);
        let mut macros = allocation.macros.non_negative();

        let planned_calories = window.target_macros.calories();
        if macros.is_zero() && calories > 0.0 && planned_calories > 0.0 {
            macros = window.target_macros.scaled(calories / planned_calories);
            debug!(
                window = %window.name,
                calories,
                "Re-seeded exhausted macros from planned ratio"
            );
        }

        Allocation { calories, macros }
    }
}
