// ABOUTME: Day score report grouping the day score, window scores, and factor chips
// ABOUTME: Presentation-ready values: display score, band, and signed contributions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::model::{ChipPolarity, FactorChip, ScoreBand, ScoreModel};
use nutriwindow_core::models::{Score, ScoreBreakdown, ScoreFactor, Window};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Score of one window in a day report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowScore {
    /// Window identifier
    pub window_id: Uuid,
    /// Window name
    pub name: String,
    /// Score, absent for open windows without meals
    pub score: Option<Score>,
    /// Display value of `score`
    pub display_score: Option<f64>,
    /// Band of `display_score`
    pub band: Option<ScoreBand>,
}

impl WindowScore {
    /// Wrap a window's score with its display values
    #[must_use]
    pub fn new(window: &Window, score: Option<Score>) -> Self {
        let display_score = score.as_ref().map(ScoreModel::display_value);
        Self {
            window_id: window.id,
            name: window.name.clone(),
            band: display_score.map(ScoreModel::band),
            display_score,
            score,
        }
    }
}

/// Everything needed to render a day's score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScoreReport {
    /// Day score as computed
    pub score: Score,
    /// 0-10 display value
    pub display_score: f64,
    /// Band of the display value
    pub band: ScoreBand,
    /// Breakdown shown to the user, computed or fallback
    pub breakdown: ScoreBreakdown,
    /// Whether `breakdown` came from the count-based fallback
    pub used_fallback: bool,
    /// Lowest sub-factor
    pub weakest_factor: ScoreFactor,
    /// Factors that pulled the score up
    pub positive_chips: Vec<FactorChip>,
    /// Factors that pulled the score down
    pub negative_chips: Vec<FactorChip>,
    /// Per-window scores in window order
    pub windows: Vec<WindowScore>,
}

impl DayScoreReport {
    /// Assemble a report; chips are derived from `breakdown`
    #[must_use]
    pub fn new(
        score: Score,
        breakdown: ScoreBreakdown,
        used_fallback: bool,
        windows: Vec<WindowScore>,
    ) -> Self {
        let display_score = ScoreModel::display_value(&score);
        let (positive_chips, rest): (Vec<_>, Vec<_>) = ScoreModel::chips(&breakdown)
            .into_iter()
            .partition(|chip| chip.polarity == ChipPolarity::Positive);
        let negative_chips = rest
            .into_iter()
            .filter(|chip| chip.polarity == ChipPolarity::Negative)
            .collect();

        Self {
            band: ScoreModel::band(display_score),
            weakest_factor: ScoreModel::weakest_factor(&breakdown),
            display_score,
            breakdown,
            used_fallback,
            positive_chips,
            negative_chips,
            windows,
            score,
        }
    }
}
