// ABOUTME: Deviation dispatcher choosing between the advanced engine and the baseline redistributor
// ABOUTME: Defines the AdvancedEngine try-or-decline contract and uniform reason mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Deviation Dispatcher
//!
//! For the most recently logged meal, asks the optional [`AdvancedEngine`]
//! to handle the deviation. The engine either returns a full redistribution
//! or declines; absence, decline, and failure all fall through to the
//! [`BaselineRedistributor`]. Engine trigger types are translated into the
//! same [`RedistributionReason`] vocabulary the baseline uses.
//!
//! The dispatcher owns no allocation math.

use crate::config::{DispatcherConfig, WindowEngineConfig};
use crate::redistribution::{BaselineRedistributor, RemainingBudget};
use chrono::{DateTime, Utc};
use nutriwindow_core::errors::AppResult;
use nutriwindow_core::models::{
    latest_meal, ConsumedTotals, LoggedMeal, MacroTargets, RedistributedWindow,
    RedistributionReason, RedistributionTrigger, UserProfile, Window,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Everything the advanced engine may use to evaluate one deviation
#[derive(Debug, Clone)]
pub struct EngineRequest<'a> {
    /// Most recently logged meal
    pub meal: &'a LoggedMeal,
    /// Window owning that meal
    pub window: &'a Window,
    /// All windows of the day
    pub windows: &'a [Window],
    /// All meals of the day
    pub meals: &'a [LoggedMeal],
    /// Profile with daily targets and goal
    pub profile: &'a UserProfile,
    /// Remaining daily budget after every logged meal
    pub remaining: RemainingBudget,
    /// Configured significance threshold, if any; the engine decides what it means
    pub threshold_percent: Option<f64>,
    /// Evaluation instant
    pub now: DateTime<Utc>,
}

impl EngineRequest<'_> {
    /// Signed deviation of the meal against its window's effective calories
    ///
    /// Positive means over plan, negative under. Zero-calorie windows yield 0.
    #[must_use]
    pub fn deviation(&self) -> f64 {
        calculate_deviation(self.meal, self.window)
    }
}

/// One window's values as produced by the advanced engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineWindowAdjustment {
    /// Window the values belong to
    pub window_id: Uuid,
    /// New macros
    pub adjusted_macros: MacroTargets,
    /// New calories; derived from the macros when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_calories: Option<f64>,
}

/// An accepted trigger and the engine's redistribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutcome {
    /// Per-window adjustments; windows not listed pass through
    pub adjusted_windows: Vec<EngineWindowAdjustment>,
    /// The trigger the engine accepted
    pub trigger: RedistributionTrigger,
}

/// Optional collaborator able to override the baseline redistribution
#[async_trait::async_trait]
pub trait AdvancedEngine: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &str;

    /// Evaluate the deviation and either redistribute (`Some`) or decline (`None`)
    ///
    /// # Errors
    ///
    /// Implementations may fail; the dispatcher treats any error as a decline
    async fn try_redistribute(
        &self,
        request: &EngineRequest<'_>,
    ) -> AppResult<Option<EngineOutcome>>;
}

/// Which path produced a dispatch result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum DispatchRoute {
    /// The advanced engine accepted the trigger
    Advanced {
        /// Engine name
        engine: String,
    },
    /// The baseline redistributor ran
    Baseline,
}

impl fmt::Display for DispatchRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advanced { engine } => write!(f, "advanced ({engine})"),
            Self::Baseline => f.write_str("baseline"),
        }
    }
}

/// Redistributed windows plus the route taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    /// Route that produced `windows`
    pub route: DispatchRoute,
    /// One entry per input window, in input order
    pub windows: Vec<RedistributedWindow>,
}

/// Routes a redistribution pass through the advanced engine or the baseline
#[derive(Clone, Default)]
pub struct DeviationDispatcher {
    engine: Option<Arc<dyn AdvancedEngine>>,
    baseline: BaselineRedistributor,
    config: DispatcherConfig,
}

impl fmt::Debug for DeviationDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviationDispatcher")
            .field("engine", &self.engine.as_ref().map(|engine| engine.name()))
            .field("baseline", &self.baseline)
            .field("config", &self.config)
            .finish()
    }
}

impl DeviationDispatcher {
    /// Baseline-only dispatcher with default policy
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher configured from `config`, without an advanced engine
    #[must_use]
    pub fn with_config(config: &WindowEngineConfig) -> Self {
        Self {
            engine: None,
            baseline: BaselineRedistributor::with_config(config),
            config: config.dispatcher.clone(),
        }
    }

    /// Attach an advanced engine
    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn AdvancedEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Whether an advanced engine is attached
    #[must_use]
    pub const fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Redistribute the day, returning only the windows
    pub async fn apply(
        &self,
        windows: &[Window],
        meals: &[LoggedMeal],
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Vec<RedistributedWindow> {
        self.dispatch(windows, meals, profile, now).await.windows
    }

    /// Redistribute the day and report which route ran
    pub async fn dispatch(
        &self,
        windows: &[Window],
        meals: &[LoggedMeal],
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> DispatchResult {
        if let Some(result) = self.try_advanced(windows, meals, profile, now).await {
            return result;
        }
        DispatchResult {
            route: DispatchRoute::Baseline,
            windows: self.baseline.redistribute(windows, meals, profile, now),
        }
    }

    async fn try_advanced(
        &self,
        windows: &[Window],
        meals: &[LoggedMeal],
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Option<DispatchResult> {
        let engine = self.engine.as_ref()?;
        let Some(meal) = latest_meal(meals) else {
            debug!("No logged meals, advanced engine not consulted");
            return None;
        };
        let Some(window) = meal.owning_window(windows) else {
            debug!(
                meal_id = %meal.id,
                "Latest meal outside every window, advanced engine not consulted"
            );
            return None;
        };

        let consumed = ConsumedTotals::from_meals(meals);
        let request = EngineRequest {
            meal,
            window,
            windows,
            meals,
            profile,
            remaining: RemainingBudget::from_profile(profile, &consumed),
            threshold_percent: self.config.advanced_trigger_threshold_percent,
            now,
        };

        match engine.try_redistribute(&request).await {
            Ok(Some(outcome)) => {
                let reason = RedistributionReason::from(outcome.trigger.trigger_type);
                info!(
                    engine = engine.name(),
                    window = %window.name,
                    reason = reason.code(),
                    adjusted = outcome.adjusted_windows.len(),
                    "Advanced engine accepted trigger"
                );
                Some(DispatchResult {
                    route: DispatchRoute::Advanced {
                        engine: engine.name().to_owned(),
                    },
                    windows: merge_engine_outcome(windows, outcome),
                })
            }
            Ok(None) => {
                debug!(engine = engine.name(), "Advanced engine declined trigger");
                None
            }
            Err(e) => {
                warn!(
                    engine = engine.name(),
                    error = %e,
                    "Advanced engine failed, falling back to baseline"
                );
                None
            }
        }
    }
}

/// Signed deviation ratio of a meal against a window's effective calories
///
/// Positive means over plan, negative under. Zero-calorie windows yield 0.
#[must_use]
pub fn calculate_deviation(meal: &LoggedMeal, window: &Window) -> f64 {
    let planned = window.effective_calories();
    if planned.abs() < f64::EPSILON {
        return 0.0;
    }
    (meal.calories - planned) / planned
}

/// Apply an engine outcome to every window, translating its trigger into a reason
fn merge_engine_outcome(windows: &[Window], outcome: EngineOutcome) -> Vec<RedistributedWindow> {
    let reason = RedistributionReason::from(outcome.trigger.trigger_type);
    let mut adjustments: HashMap<Uuid, EngineWindowAdjustment> = outcome
        .adjusted_windows
        .into_iter()
        .map(|adjustment| (adjustment.window_id, adjustment))
        .collect();

    let merged = windows
        .iter()
        .map(|window| match adjustments.remove(&window.id) {
            Some(adjustment) => {
                let calories = adjustment
                    .adjusted_calories
                    .unwrap_or_else(|| adjustment.adjusted_macros.calories());
                RedistributedWindow::adjusted(
                    window.clone(),
                    calories,
                    adjustment.adjusted_macros,
                    Some(reason),
                )
            }
            None => RedistributedWindow::pass_through(window.clone()),
        })
        .collect();

    for unknown in adjustments.keys() {
        debug!(window_id = %unknown, "Advanced engine adjusted an unknown window, ignored");
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nutriwindow_core::errors::AppError;
    use nutriwindow_core::models::{NutritionGoal, TriggerType, WindowPurpose};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
    }

    fn day() -> Vec<Window> {
        vec![
            Window::new(
                "Breakfast",
                at(7, 0),
                at(9, 0),
                WindowPurpose::SustainedEnergy,
                500.0,
                MacroTargets::new(30.0, 60.0, 15.0),
            )
            .unwrap(),
            Window::new(
                "Dinner",
                at(18, 0),
                at(20, 0),
                WindowPurpose::Recovery,
                700.0,
                MacroTargets::new(50.0, 70.0, 25.0),
            )
            .unwrap(),
        ]
    }

    fn logged(
        name: &str,
        timestamp: DateTime<Utc>,
        calories: f64,
        macros: MacroTargets,
    ) -> Vec<LoggedMeal> {
        vec![LoggedMeal::new(name, timestamp, calories, macros).unwrap()]
    }

    fn profile() -> UserProfile {
        UserProfile::new(
            1800.0,
            MacroTargets::new(120.0, 180.0, 60.0),
            NutritionGoal::Maintenance,
        )
        .unwrap()
    }

    struct CountingEngine {
        calls: AtomicUsize,
        accept: bool,
    }

    #[async_trait::async_trait]
    impl AdvancedEngine for CountingEngine {
        fn name(&self) -> &str {
            "counting"
        }

        async fn try_redistribute(
            &self,
            request: &EngineRequest<'_>,
        ) -> AppResult<Option<EngineOutcome>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.accept {
                return Ok(None);
            }
            let upcoming = request.windows.iter().find(|w| !w.is_past(request.now));
            Ok(Some(EngineOutcome {
                adjusted_windows: upcoming
                    .map(|w| EngineWindowAdjustment {
                        window_id: w.id,
                        adjusted_macros: MacroTargets::new(40.0, 50.0, 20.0),
                        adjusted_calories: None,
                    })
                    .into_iter()
                    .collect(),
                trigger: RedistributionTrigger {
                    window_id: request.window.id,
                    trigger_type: TriggerType::OverConsumption { percent_over: 40.0 },
                    deviation: request.deviation(),
                    consumed_calories: request.meal.calories,
                    consumed_macros: request.meal.macros,
                    evaluated_at: request.now,
                },
            }))
        }
    }

    struct FailingEngine;

    #[async_trait::async_trait]
    impl AdvancedEngine for FailingEngine {
        fn name(&self) -> &str {
            "failing"
        }

        async fn try_redistribute(
            &self,
            _request: &EngineRequest<'_>,
        ) -> AppResult<Option<EngineOutcome>> {
            Err(AppError::external_service("engine", "timed out"))
        }
    }

    #[test]
    fn test_deviation_sign() {
        let windows = day();
        let over = LoggedMeal::new("big", at(8, 0), 700.0, MacroTargets::zero()).unwrap();
        let under = LoggedMeal::new("small", at(8, 0), 250.0, MacroTargets::zero()).unwrap();
        assert!((calculate_deviation(&over, &windows[0]) - 0.4).abs() < 1e-9);
        assert!((calculate_deviation(&under, &windows[0]) + 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_route_serialization() {
        let json = serde_json::to_value(DispatchRoute::Advanced {
            engine: "trigger-engine".into(),
        })
        .unwrap();
        assert_eq!(json["route"], "advanced");
        assert_eq!(json["engine"], "trigger-engine");
        assert_eq!(DispatchRoute::Baseline.to_string(), "baseline");
    }

    #[tokio::test]
    async fn test_accepting_engine_overrides_baseline() {
        let engine = Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
            accept: true,
        });
        let dispatcher = DeviationDispatcher::new().with_engine(engine.clone());
        let windows = day();
        let meals = logged("big", at(8, 30), 700.0, MacroTargets::new(40.0, 80.0, 25.0));

        let result = dispatcher.dispatch(&windows, &meals, &profile(), at(10, 0)).await;

        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            result.route,
            DispatchRoute::Advanced {
                engine: "counting".into()
            }
        );
        assert!(!result.windows[0].redistributed);
        let dinner = &result.windows[1];
        assert!(dinner.redistributed);
        assert!((dinner.adjusted_calories - 540.0).abs() < 1e-9);
        assert_eq!(
            dinner.reason,
            Some(RedistributionReason::Overconsumption { percent_over: 40.0 })
        );
    }

    #[tokio::test]
    async fn test_declining_engine_falls_through() {
        let engine = Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
            accept: false,
        });
        let dispatcher = DeviationDispatcher::new().with_engine(engine.clone());
        let meals = logged("toast", at(8, 0), 400.0, MacroTargets::new(20.0, 50.0, 10.0));

        let result = dispatcher.dispatch(&day(), &meals, &profile(), at(10, 0)).await;

        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(result.route, DispatchRoute::Baseline);
        assert!(result.windows[1].redistributed);
    }

    #[tokio::test]
    async fn test_engine_failure_is_a_decline() {
        let dispatcher = DeviationDispatcher::new().with_engine(Arc::new(FailingEngine));
        let meals = logged("toast", at(8, 0), 400.0, MacroTargets::new(20.0, 50.0, 10.0));
        let result = dispatcher.dispatch(&day(), &meals, &profile(), at(10, 0)).await;
        assert_eq!(result.route, DispatchRoute::Baseline);
    }

    #[tokio::test]
    async fn test_unowned_meal_skips_engine() {
        let engine = Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
            accept: true,
        });
        let dispatcher = DeviationDispatcher::new().with_engine(engine.clone());
        let meals = logged("snack", at(10, 30), 200.0, MacroTargets::new(5.0, 30.0, 7.0));

        let result = dispatcher.dispatch(&day(), &meals, &profile(), at(11, 0)).await;

        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.route, DispatchRoute::Baseline);
    }

    #[tokio::test]
    async fn test_no_engine_matches_baseline() {
        let windows = day();
        let meals = logged("toast", at(8, 0), 400.0, MacroTargets::new(20.0, 50.0, 10.0));
        let dispatched = DeviationDispatcher::new()
            .apply(&windows, &meals, &profile(), at(10, 0))
            .await;
        let baseline =
            BaselineRedistributor::new().redistribute(&windows, &meals, &profile(), at(10, 0));
        assert_eq!(dispatched, baseline);
    }
}
