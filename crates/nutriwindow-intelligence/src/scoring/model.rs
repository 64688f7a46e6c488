// ABOUTME: Score display model mapping internal scores and sub-factors onto the 0-10 scale
// ABOUTME: Display score, factor contributions, five-bucket banding, and factor chips
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use nutriwindow_core::constants::scoring::{
    CONTRIBUTION_DIVISOR, DISPLAY_MAX, EXCELLENT_MIN, GOOD_MIN, INTERNAL_MAX, NEUTRAL_SUB_SCORE,
    OKAY_MIN, POOR_MIN,
};
use nutriwindow_core::models::{Score, ScoreBreakdown, ScoreFactor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity band on the 0-10 display scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// `[8.5, 10]`
    Excellent,
    /// `[7, 8.5)`
    Good,
    /// `[5, 7)`
    Okay,
    /// `[3, 5)`
    Poor,
    /// `[0, 3)`
    NeedsWork,
}

impl ScoreBand {
    /// Band for a display score
    #[must_use]
    pub fn from_display(display: f64) -> Self {
        if display >= EXCELLENT_MIN {
            Self::Excellent
        } else if display >= GOOD_MIN {
            Self::Good
        } else if display >= OKAY_MIN {
            Self::Okay
        } else if display >= POOR_MIN {
            Self::Poor
        } else {
            Self::NeedsWork
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Okay => "Okay",
            Self::Poor => "Poor",
            Self::NeedsWork => "Needs work",
        }
    }

    /// Fixed color used for score text and progress fill
    #[must_use]
    pub const fn color_hex(&self) -> &'static str {
        match self {
            Self::Excellent => "#22C55E",
            Self::Good => "#84CC16",
            Self::Okay => "#EAB308",
            Self::Poor => "#F97316",
            Self::NeedsWork => "#EF4444",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction a factor moved the score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChipPolarity {
    /// Pulled the score up
    Positive,
    /// Pulled the score down
    Negative,
    /// Exactly average
    Neutral,
}

/// One sub-factor rendered as a signed contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorChip {
    /// Which factor
    pub factor: ScoreFactor,
    /// Raw 0-10 sub-score
    pub sub_score: f64,
    /// Signed contribution, -2.5 to +2.5
    pub contribution: f64,
    /// Sign of the contribution
    pub polarity: ChipPolarity,
}

/// Maps internal scores and sub-scores onto user-facing values
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreModel;

impl ScoreModel {
    /// Internal 0-100 score as a 0-10 display score
    #[must_use]
    pub fn display_score(internal: u8) -> f64 {
        f64::from(internal.min(INTERNAL_MAX)) / 10.0
    }

    /// Display value of a score: the breakdown's overall when present, else internal / 10
    #[must_use]
    pub fn display_value(score: &Score) -> f64 {
        score.breakdown.map_or_else(
            || Self::display_score(score.internal),
            |breakdown| breakdown.overall.clamp(0.0, DISPLAY_MAX),
        )
    }

    /// Signed contribution of a 0-10 sub-score; 5.0 contributes exactly zero
    #[must_use]
    pub fn factor_contribution(sub_score: f64) -> f64 {
        (sub_score.clamp(0.0, DISPLAY_MAX) - NEUTRAL_SUB_SCORE) / CONTRIBUTION_DIVISOR
    }

    /// Band of a display score
    #[must_use]
    pub fn band(display: f64) -> ScoreBand {
        ScoreBand::from_display(display)
    }

    /// Chip for one factor
    #[must_use]
    pub fn chip(factor: ScoreFactor, sub_score: f64) -> FactorChip {
        let contribution = Self::factor_contribution(sub_score);
        let polarity = if contribution > 0.0 {
            ChipPolarity::Positive
        } else if contribution < 0.0 {
            ChipPolarity::Negative
        } else {
            ChipPolarity::Neutral
        };
        FactorChip {
            factor,
            sub_score,
            contribution,
            polarity,
        }
    }

    /// Chips for every factor of a breakdown, in listed order
    #[must_use]
    pub fn chips(breakdown: &ScoreBreakdown) -> Vec<FactorChip> {
        breakdown
            .factors()
            .into_iter()
            .map(|(factor, sub_score)| Self::chip(factor, sub_score))
            .collect()
    }

    /// Lowest sub-score, ties broken by listed order
    #[must_use]
    pub fn weakest_factor(breakdown: &ScoreBreakdown) -> ScoreFactor {
        breakdown
            .factors()
            .into_iter()
            .fold(None, |weakest: Option<(ScoreFactor, f64)>, (factor, value)| {
                match weakest {
                    Some((_, lowest)) if lowest <= value => weakest,
                    _ => Some((factor, value)),
                }
            })
            .map_or(ScoreFactor::Adherence, |(factor, _)| factor)
    }
}
