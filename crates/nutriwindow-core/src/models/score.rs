// ABOUTME: Window- and day-level score model with optional four-factor breakdown
// ABOUTME: Score, ScoreBreakdown, and ScoreFactor definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::scoring::INTERNAL_MAX;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four named sub-factors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    /// Windows completed
    Adherence,
    /// Meal health
    Quality,
    /// Windows completed before they lapsed
    Timing,
    /// Evenness of calories across windows
    Consistency,
}

impl ScoreFactor {
    /// Every factor in tie-break order
    pub const ALL: [Self; 4] = [
        Self::Adherence,
        Self::Quality,
        Self::Timing,
        Self::Consistency,
    ];

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Adherence => "Adherence",
            Self::Quality => "Quality",
            Self::Timing => "Timing",
            Self::Consistency => "Consistency",
        }
    }
}

impl fmt::Display for ScoreFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Four sub-scores, each on a 0-10 scale, plus the overall display value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Adherence sub-score (0-10)
    pub adherence: f64,
    /// Quality sub-score (0-10)
    pub quality: f64,
    /// Timing sub-score (0-10)
    pub timing: f64,
    /// Consistency sub-score (0-10)
    pub consistency: f64,
    /// Overall display score (0-10)
    pub overall: f64,
}

impl ScoreBreakdown {
    /// Sub-score for one factor
    #[must_use]
    pub const fn get(&self, factor: ScoreFactor) -> f64 {
        match factor {
            ScoreFactor::Adherence => self.adherence,
            ScoreFactor::Quality => self.quality,
            ScoreFactor::Timing => self.timing,
            ScoreFactor::Consistency => self.consistency,
        }
    }

    /// Factor and sub-score pairs in tie-break order
    #[must_use]
    pub fn factors(&self) -> [(ScoreFactor, f64); 4] {
        ScoreFactor::ALL.map(|factor| (factor, self.get(factor)))
    }
}

/// A window- or day-level score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Internal score (0-100)
    pub internal: u8,
    /// Detailed breakdown, when one was computed or stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<ScoreBreakdown>,
    /// Free-text insight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

impl Score {
    /// A score with no breakdown; values above 100 are capped
    #[must_use]
    pub fn from_internal(internal: u8) -> Self {
        Self {
            internal: internal.min(INTERNAL_MAX),
            breakdown: None,
            insight: None,
        }
    }

    /// Attach a breakdown
    #[must_use]
    pub fn with_breakdown(mut self, breakdown: ScoreBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }

    /// Attach an insight sentence
    #[must_use]
    pub fn with_insight(mut self, insight: impl Into<String>) -> Self {
        self.insight = Some(insight.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_is_capped() {
        assert_eq!(Score::from_internal(140).internal, 100);
        assert_eq!(Score::from_internal(73).internal, 73);
    }

    #[test]
    fn test_breakdown_lookup_order() {
        let breakdown = ScoreBreakdown {
            adherence: 8.0,
            quality: 6.0,
            timing: 4.0,
            consistency: 7.0,
            overall: 6.5,
        };
        let factors = breakdown.factors();
        assert_eq!(factors[0], (ScoreFactor::Adherence, 8.0));
        assert_eq!(factors[3], (ScoreFactor::Consistency, 7.0));
        assert!((breakdown.get(ScoreFactor::Timing) - 4.0).abs() < f64::EPSILON);
    }
}
