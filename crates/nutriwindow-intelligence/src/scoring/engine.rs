// ABOUTME: Detailed score computation for days and individual windows
// ABOUTME: Derives the four-factor breakdown from effective budgets and logged meals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Score Engine
//!
//! Day scores look at "due" windows: lapsed windows plus any window already
//! holding a meal. Window scores look at meals attributed to the window,
//! where a meal outside every window is attributed to the first window whose
//! flexibility buffer reaches it. All comparisons use effective budgets, so
//! redistributed windows are scored against their adjusted targets.

use super::fallback::{average_health_score, FallbackInputs, ScoreFallback};
use super::insight::{insight_for, InsightScope, MISSED_WINDOW_INSIGHT};
use super::model::ScoreModel;
use super::report::{DayScoreReport, WindowScore};
use super::{compose_breakdown, internal_from_overall};
use crate::config::{ScoringConfig, WindowEngineConfig};
use chrono::{DateTime, Utc};
use nutriwindow_core::constants::scoring::DISPLAY_MAX;
use nutriwindow_core::models::{
    meals_for_window, ConsumedTotals, LoggedMeal, MacroTargets, Score, ScoreBreakdown, Window,
};
use tracing::debug;

/// Meals attributed to one window
#[derive(Debug, Default)]
struct Attribution<'a> {
    inside: Vec<&'a LoggedMeal>,
    buffered: Vec<&'a LoggedMeal>,
}

impl<'a> Attribution<'a> {
    fn resolve(window: &Window, windows: &[Window], meals: &'a [LoggedMeal]) -> Self {
        let inside = meals_for_window(window, windows, meals);
        let buffered = meals
            .iter()
            .filter(|meal| meal.owning_window(windows).is_none())
            .filter(|meal| {
                windows
                    .iter()
                    .find(|candidate| candidate.contains_with_buffer(meal.timestamp))
                    .is_some_and(|owner| owner.id == window.id)
            })
            .collect();
        Self { inside, buffered }
    }

    fn len(&self) -> usize {
        self.inside.len() + self.buffered.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn all(&self) -> impl Iterator<Item = &'a LoggedMeal> + '_ {
        self.inside.iter().chain(self.buffered.iter()).copied()
    }
}

/// `1 - min(1, |consumed - planned| / planned)`; a zero plan is met only by eating nothing
fn accuracy(consumed: f64, planned: f64) -> f64 {
    if planned <= f64::EPSILON {
        return if consumed <= f64::EPSILON { 1.0 } else { 0.0 };
    }
    1.0 - ((consumed - planned).abs() / planned).min(1.0)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Computes detailed breakdowns, falling back to counts when none is possible
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
    fallback: ScoreFallback,
}

impl ScoreEngine {
    /// Engine with default weights
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine using the scoring section of `config`
    #[must_use]
    pub fn with_config(config: &WindowEngineConfig) -> Self {
        Self {
            config: config.scoring.clone(),
            fallback: ScoreFallback::with_config(config.scoring.clone()),
        }
    }

    /// The count-based fallback this engine uses
    #[must_use]
    pub const fn fallback(&self) -> &ScoreFallback {
        &self.fallback
    }

    /// Detailed day breakdown, or `None` when no window is due yet
    #[must_use]
    pub fn day_breakdown(
        &self,
        windows: &[Window],
        meals: &[LoggedMeal],
        now: DateTime<Utc>,
    ) -> Option<ScoreBreakdown> {
        let due: Vec<(&Window, f64, bool)> = windows
            .iter()
            .filter_map(|window| {
                let owned = meals_for_window(window, windows, meals);
                let has_meal = !owned.is_empty();
                (window.is_past(now) || has_meal).then(|| {
                    let consumed = ConsumedTotals::from_meals(owned).calories;
                    (window, consumed, has_meal)
                })
            })
            .collect();
        if due.is_empty() {
            return None;
        }

        let accuracies: Vec<f64> = due
            .iter()
            .map(|(window, consumed, _)| accuracy(*consumed, window.effective_calories()))
            .collect();
        let adherence = mean(&accuracies).unwrap_or(0.0) * DISPLAY_MAX;

        let with_meal = due.iter().filter(|(_, _, has_meal)| *has_meal).count();
        let timing = with_meal as f64 / due.len() as f64 * DISPLAY_MAX;

        let ratios: Vec<f64> = due
            .iter()
            .filter(|(window, _, _)| window.effective_calories() > f64::EPSILON)
            .map(|(window, consumed, _)| consumed / window.effective_calories())
            .collect();

        Some(compose_breakdown(
            &self.config,
            adherence,
            self.quality(meals),
            timing,
            Self::evenness(&ratios),
        ))
    }

    /// Day score: detailed when a window is due, count-based otherwise
    #[must_use]
    pub fn score_day(&self, windows: &[Window], meals: &[LoggedMeal], now: DateTime<Utc>) -> Score {
        match self.day_breakdown(windows, meals, now) {
            Some(breakdown) => Self::finish(breakdown, InsightScope::Day),
            None => {
                debug!(windows = windows.len(), "No due windows, using fallback day score");
                self.fallback
                    .score(&FallbackInputs::from_day(windows, meals, now))
            }
        }
    }

    /// Detailed breakdown for one window, or `None` when no meal is attributed to it
    #[must_use]
    pub fn window_breakdown(
        &self,
        window: &Window,
        windows: &[Window],
        meals: &[LoggedMeal],
    ) -> Option<ScoreBreakdown> {
        let attribution = Attribution::resolve(window, windows, meals);
        if attribution.is_empty() {
            return None;
        }

        let consumed = ConsumedTotals::from_meals(attribution.all());
        let adherence = accuracy(consumed.calories, window.effective_calories()) * DISPLAY_MAX;
        let timing = self
            .config
            .buffered_meal_timing_credit
            .mul_add(attribution.buffered.len() as f64, attribution.inside.len() as f64)
            / attribution.len() as f64
            * DISPLAY_MAX;
        let consistency = self.macro_balance(consumed.macros, window.effective_macros());

        Some(compose_breakdown(
            &self.config,
            adherence,
            self.quality(attribution.all()),
            timing,
            consistency,
        ))
    }

    /// Window score; lapsed windows without meals score 0, open ones without meals have none
    #[must_use]
    pub fn score_window(
        &self,
        window: &Window,
        windows: &[Window],
        meals: &[LoggedMeal],
        now: DateTime<Utc>,
    ) -> Option<Score> {
        match self.window_breakdown(window, windows, meals) {
            Some(breakdown) => Some(Self::finish(breakdown, InsightScope::Window)),
            None if window.is_past(now) => {
                Some(Score::from_internal(0).with_insight(MISSED_WINDOW_INSIGHT))
            }
            None => None,
        }
    }

    /// Day score, per-window scores, chips, and band in one report
    #[must_use]
    pub fn report_day(
        &self,
        windows: &[Window],
        meals: &[LoggedMeal],
        now: DateTime<Utc>,
    ) -> DayScoreReport {
        let inputs = FallbackInputs::from_day(windows, meals, now);
        let detailed = self.day_breakdown(windows, meals, now);
        let used_fallback = detailed.is_none();
        let day_score = detailed.map_or_else(
            || self.fallback.score(&inputs),
            |breakdown| Self::finish(breakdown, InsightScope::Day),
        );
        let breakdown = self.fallback.resolve(&day_score, &inputs);

        let window_scores = windows
            .iter()
            .map(|window| WindowScore::new(window, self.score_window(window, windows, meals, now)))
            .collect();

        DayScoreReport::new(day_score, breakdown, used_fallback, window_scores)
    }

    /// Mean health score on 0-10, or the neutral value when no meal is scored
    fn quality<'a>(&self, meals: impl IntoIterator<Item = &'a LoggedMeal>) -> f64 {
        average_health_score(meals).map_or(self.config.unscored_quality, |average| average / 10.0)
    }

    /// `10 * (1 - coefficient of variation)` of consumed/planned ratios
    ///
    /// Nothing eaten anywhere scores 0; a single ratio is perfectly even.
    fn evenness(ratios: &[f64]) -> f64 {
        let Some(average) = mean(ratios) else {
            return 0.0;
        };
        if average <= f64::EPSILON {
            return 0.0;
        }
        let variance = ratios
            .iter()
            .map(|ratio| (ratio - average).powi(2))
            .sum::<f64>()
            / ratios.len() as f64;
        let coefficient = variance.sqrt() / average;
        (DISPLAY_MAX * (1.0 - coefficient)).clamp(0.0, DISPLAY_MAX)
    }

    /// `10 * (1 - mean relative deviation)` over macros with a non-zero plan
    ///
    /// A window planning none of them scores the configured unplanned value.
    fn macro_balance(&self, consumed: MacroTargets, planned: MacroTargets) -> f64 {
        let deviations: Vec<f64> = [
            (consumed.protein, planned.protein),
            (consumed.carbs, planned.carbs),
            (consumed.fat, planned.fat),
        ]
        .into_iter()
        .filter(|(_, plan)| *plan > f64::EPSILON)
        .map(|(eaten, plan)| ((eaten - plan).abs() / plan).min(1.0))
        .collect();
        mean(&deviations).map_or(self.config.unplanned_macro_balance, |deviation| {
            DISPLAY_MAX * (1.0 - deviation)
        })
    }

    fn finish(breakdown: ScoreBreakdown, scope: InsightScope) -> Score {
        let weakest = ScoreModel::weakest_factor(&breakdown);
        Score::from_internal(internal_from_overall(breakdown.overall))
            .with_breakdown(breakdown)
            .with_insight(insight_for(weakest, scope))
    }
}
