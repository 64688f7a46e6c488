// ABOUTME: Domain models for meal windows, consumption, profiles, redistribution, and scores
// ABOUTME: Re-exports every model type so callers import from one place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Core data models

/// Macronutrient gram triple
pub mod macros;
/// Logged consumption events
pub mod meal;
/// Daily budget and goal
pub mod profile;
/// Redistribution vocabulary and results
pub mod redistribution;
/// Window and day scores
pub mod score;
/// Time-boxed meal windows
pub mod window;

pub use macros::MacroTargets;
pub use meal::{latest_meal, meals_for_window, ConsumedTotals, LoggedMeal};
pub use profile::{NutritionGoal, UserProfile};
pub use redistribution::{
    RedistributedWindow, RedistributionReason, RedistributionTrigger, TriggerType,
};
pub use score::{Score, ScoreBreakdown, ScoreFactor};
pub use window::{Flexibility, Window, WindowPurpose};
