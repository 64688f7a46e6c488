// ABOUTME: Scoring module turning windows and meals into explainable 0-10 scores
// ABOUTME: Display model, count-based fallback, detailed engine, insights, and day reports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Scoring
//!
//! Scores live on two scales: an internal 0-100 integer and a 0-10 display
//! value. A detailed breakdown carries four sub-factors (adherence, quality,
//! timing, consistency), each already on 0-10, combined by configurable
//! weights. When no breakdown can be computed the count-based
//! [`ScoreFallback`] fills in.

pub mod engine;
pub mod fallback;
pub mod insight;
pub mod model;
pub mod report;

pub use engine::ScoreEngine;
pub use fallback::{average_health_score, FallbackInputs, ScoreFallback};
pub use insight::{insight_for, InsightScope, MISSED_WINDOW_INSIGHT};
pub use model::{ChipPolarity, FactorChip, ScoreBand, ScoreModel};
pub use report::{DayScoreReport, WindowScore};

use crate::config::ScoringConfig;
use nutriwindow_core::constants::scoring::{DISPLAY_MAX, INTERNAL_MAX};
use nutriwindow_core::models::ScoreBreakdown;

/// Clamp sub-scores to 0-10 and attach the weighted overall
pub(crate) fn compose_breakdown(
    config: &ScoringConfig,
    adherence: f64,
    quality: f64,
    timing: f64,
    consistency: f64,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown {
        adherence: adherence.clamp(0.0, DISPLAY_MAX),
        quality: quality.clamp(0.0, DISPLAY_MAX),
        timing: timing.clamp(0.0, DISPLAY_MAX),
        consistency: consistency.clamp(0.0, DISPLAY_MAX),
        overall: 0.0,
    };
    breakdown.overall = breakdown
        .factors()
        .iter()
        .map(|(factor, value)| config.weight(*factor) * value)
        .sum::<f64>()
        .clamp(0.0, DISPLAY_MAX);
    breakdown
}

/// Internal 0-100 score for a 0-10 overall
pub(crate) fn internal_from_overall(overall: f64) -> u8 {
    (overall * 10.0).round().clamp(0.0, f64::from(INTERNAL_MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_weights_and_clamps() {
        let breakdown = compose_breakdown(&ScoringConfig::default(), 12.0, 8.0, -1.0, 6.0);
        assert!((breakdown.adherence - 10.0).abs() < f64::EPSILON);
        assert!(breakdown.timing.abs() < f64::EPSILON);
        // 0.35*10 + 0.30*8 + 0.20*0 + 0.15*6
        assert!((breakdown.overall - 6.8).abs() < 1e-9);
    }

    #[test]
    fn test_internal_rounding() {
        assert_eq!(internal_from_overall(6.76), 68);
        assert_eq!(internal_from_overall(6.74), 67);
        assert_eq!(internal_from_overall(10.0), 100);
        assert_eq!(internal_from_overall(-3.0), 0);
    }
}
