// ABOUTME: Insight sentences phrased from the weakest scoring factor
// ABOUTME: Separate wording for day-level and window-level scores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriwindow_core::models::ScoreFactor;

/// Granularity an insight describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightScope {
    /// Whole day
    Day,
    /// Single window
    Window,
}

/// Sentence nudging the user on `factor`
#[must_use]
pub const fn insight_for(factor: ScoreFactor, scope: InsightScope) -> &'static str {
    match (scope, factor) {
        (InsightScope::Day, ScoreFactor::Adherence) => {
            "Calories drifted furthest from plan today. Aim closer to each window's target."
        }
        (InsightScope::Day, ScoreFactor::Quality) => {
            "Meal quality held today back. Lean on whole foods for the next meals."
        }
        (InsightScope::Day, ScoreFactor::Timing) => {
            "Some windows passed without a meal. Try to eat within each planned window."
        }
        (InsightScope::Day, ScoreFactor::Consistency) => {
            "Intake was uneven across windows. Spread calories more evenly through the day."
        }
        (InsightScope::Window, ScoreFactor::Adherence) => {
            "Calories in this window were well off target."
        }
        (InsightScope::Window, ScoreFactor::Quality) => {
            "Meal quality in this window could be better."
        }
        (InsightScope::Window, ScoreFactor::Timing) => {
            "Meals landed outside this window's planned time."
        }
        (InsightScope::Window, ScoreFactor::Consistency) => {
            "The macro split drifted from this window's plan."
        }
    }
}

/// Sentence for a window that lapsed without a meal
pub const MISSED_WINDOW_INSIGHT: &str = "Missed window. No meal was logged before it closed.";
