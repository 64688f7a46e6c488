// ABOUTME: Integration tests for the day service over the in-memory store
// ABOUTME: Rebalance write-back, idempotence, engine routing, scoring, and store errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use common::{assert_close, at, meal, scored_meal, standard_profile, standard_windows, test_day};
use nutriwindow::{DayService, InMemoryStore, NutritionStore};
use nutriwindow_core::errors::{AppResult, ErrorCode};
use nutriwindow_core::models::{
    MacroTargets, NutritionGoal, RedistributionTrigger, TriggerType, Window, WindowPurpose,
};
use chrono::{TimeZone, Utc};
use nutriwindow_intelligence::config::WindowEngineConfig;
use nutriwindow_intelligence::dispatcher::{
    AdvancedEngine, DispatchRoute, EngineOutcome, EngineRequest, EngineWindowAdjustment,
};
use std::sync::Arc;

mod common;

fn seeded_store(goal: NutritionGoal) -> (InMemoryStore, Vec<Window>) {
    let store = InMemoryStore::with_profile(standard_profile(goal));
    let windows = standard_windows();
    for window in &windows {
        store.insert_window(window.clone());
    }
    (store, windows)
}

fn service(store: &InMemoryStore) -> DayService {
    DayService::with_config(Arc::new(store.clone()), &WindowEngineConfig::default())
}

/// Engine that halves every upcoming window
struct HalvingEngine;

#[async_trait::async_trait]
impl AdvancedEngine for HalvingEngine {
    fn name(&self) -> &str {
        "halving"
    }

    async fn try_redistribute(
        &self,
        request: &EngineRequest<'_>,
    ) -> AppResult<Option<EngineOutcome>> {
        let adjusted_windows = request
            .windows
            .iter()
            .filter(|window| !window.is_past(request.now))
            .map(|window| EngineWindowAdjustment {
                window_id: window.id,
                adjusted_macros: window.target_macros.scaled(0.5),
                adjusted_calories: Some(window.target_calories / 2.0),
            })
            .collect();
        Ok(Some(EngineOutcome {
            adjusted_windows,
            trigger: RedistributionTrigger {
                window_id: request.window.id,
                trigger_type: TriggerType::OverConsumption { percent_over: 80.0 },
                deviation: request.deviation(),
                consumed_calories: request.meal.calories,
                consumed_macros: request.meal.macros,
                evaluated_at: request.now,
            },
        }))
    }
}

// ============================================================================
// REBALANCE
// ============================================================================

#[tokio::test]
async fn test_rebalance_writes_back_only_upcoming_windows() {
    common::init_test_logging();
    let (store, windows) = seeded_store(NutritionGoal::Maintenance);
    store.log_meal(meal(8, 0, 650.0, MacroTargets::new(45.0, 70.0, 20.0)));

    let outcome = service(&store)
        .rebalance_day(test_day(), at(10, 0))
        .await
        .unwrap();

    assert_eq!(outcome.day, test_day());
    assert_eq!(outcome.route, DispatchRoute::Baseline);
    assert_eq!(outcome.updated, 3);
    assert_eq!(outcome.windows.len(), 4);

    let breakfast = store.window(windows[0].id).unwrap();
    assert_eq!(breakfast, windows[0]);
    assert!(!breakfast.is_redistributed());

    let lunch = store.window(windows[1].id).unwrap();
    assert!(lunch.is_redistributed());
    assert_close(lunch.effective_calories(), 540.0, 1e-9);
    assert!(lunch.redistribution_reason.is_none());
    // Planned targets are never rewritten
    assert_close(lunch.target_calories, 600.0, 0.0);
}

#[tokio::test]
async fn test_rebalancing_twice_is_stable() {
    let (store, _) = seeded_store(NutritionGoal::WeightLoss);
    store.log_meal(meal(8, 0, 900.0, MacroTargets::new(60.0, 100.0, 30.0)));
    let service = service(&store);

    let first = service.rebalance_day(test_day(), at(10, 0)).await.unwrap();
    let second = service.rebalance_day(test_day(), at(10, 0)).await.unwrap();

    assert_eq!(first.windows, second.windows);
    assert_eq!(store.window_count(), 4);
}

#[tokio::test]
async fn test_late_evening_rebalance_changes_nothing() {
    let (store, windows) = seeded_store(NutritionGoal::Maintenance);
    store.log_meal(meal(19, 0, 700.0, MacroTargets::new(55.0, 40.0, 28.0)));

    let outcome = service(&store)
        .rebalance_day(test_day(), at(22, 0))
        .await
        .unwrap();

    assert_eq!(outcome.updated, 0);
    for window in &windows {
        assert_eq!(store.window(window.id).as_ref(), Some(window));
    }
}

#[tokio::test]
async fn test_accepting_engine_values_are_persisted() {
    let (store, windows) = seeded_store(NutritionGoal::Maintenance);
    store.log_meal(meal(8, 30, 900.0, MacroTargets::new(50.0, 110.0, 30.0)));

    let outcome = service(&store)
        .with_engine(Arc::new(HalvingEngine))
        .rebalance_day(test_day(), at(10, 0))
        .await
        .unwrap();

    assert_eq!(
        outcome.route,
        DispatchRoute::Advanced {
            engine: "halving".into()
        }
    );
    let dinner = store.window(windows[3].id).unwrap();
    assert_close(dinner.effective_calories(), 300.0, 0.0);
    assert_eq!(dinner.effective_macros(), windows[3].target_macros.scaled(0.5));
    assert_eq!(
        dinner.redistribution_reason.map(|reason| reason.code()),
        Some("overconsumption")
    );
}

#[tokio::test]
async fn test_other_days_are_left_alone() {
    let (store, _) = seeded_store(NutritionGoal::Maintenance);
    let tomorrow = Window::new(
        "Breakfast",
        at(8, 0) + chrono::Duration::days(1),
        at(9, 0) + chrono::Duration::days(1),
        WindowPurpose::SustainedEnergy,
        500.0,
        MacroTargets::new(35.0, 55.0, 15.0),
    )
    .unwrap();
    store.insert_window(tomorrow.clone());

    let outcome = service(&store)
        .rebalance_day(test_day(), at(10, 0))
        .await
        .unwrap();

    assert_eq!(outcome.windows.len(), 4);
    assert_eq!(store.window(tomorrow.id), Some(tomorrow));
}

#[tokio::test]
async fn test_concurrent_rebalances_settle() {
    let (store, _) = seeded_store(NutritionGoal::Maintenance);
    store.log_meal(meal(8, 0, 500.0, MacroTargets::new(35.0, 55.0, 15.0)));
    let service = service(&store);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.rebalance_day(test_day(), at(10, 0)).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().updated, 3);
    }

    let stored = store.get_windows(test_day()).await.unwrap();
    assert_eq!(stored.len(), 4);
    assert!(stored[1..].iter().all(Window::is_redistributed));
}

#[tokio::test]
async fn test_missing_profile_is_not_found() {
    let store = InMemoryStore::new();
    for window in standard_windows() {
        store.insert_window(window);
    }

    let error = service(&store)
        .rebalance_day(test_day(), at(10, 0))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);

    // Scoring does not need the profile
    assert!(service(&store).score_day(test_day(), at(10, 0)).await.is_ok());
}

// ============================================================================
// SCORE
// ============================================================================

#[tokio::test]
async fn test_score_after_rebalance_uses_stored_windows() {
    let (store, _) = seeded_store(NutritionGoal::Maintenance);
    store.log_meal(scored_meal(
        8,
        0,
        500.0,
        MacroTargets::new(35.0, 55.0, 15.0),
        85.0,
    ));
    let service = service(&store);

    service.rebalance_day(test_day(), at(10, 0)).await.unwrap();
    store.log_meal(scored_meal(
        12,
        45,
        500.0,
        MacroTargets::new(45.0, 50.0, 17.0),
        75.0,
    ));

    let report = service.score_day(test_day(), at(15, 0)).await.unwrap();

    assert!(!report.used_fallback);
    // Lunch was rebalanced to exactly its 600 kcal plan; 500 eaten
    let adherence = (10.0 + 10.0 * (1.0 - 100.0 / 600.0)) / 2.0;
    assert_close(report.breakdown.adherence, adherence, 1e-9);
    assert_close(report.breakdown.quality, 8.0, 1e-9);
    assert_close(report.breakdown.timing, 10.0, 1e-9);
    assert_eq!(report.windows.len(), 4);
}

#[tokio::test]
async fn test_meal_after_midnight_scores_its_late_window() {
    let store = InMemoryStore::with_profile(standard_profile(NutritionGoal::Maintenance));
    let late = Window::new(
        "Late shift",
        at(22, 0),
        Utc.with_ymd_and_hms(2025, 3, 15, 1, 0, 0).unwrap(),
        WindowPurpose::Recovery,
        600.0,
        MacroTargets::new(45.0, 60.0, 20.0),
    )
    .unwrap();
    store.insert_window(late.clone());
    let mut after_midnight =
        scored_meal(0, 30, 600.0, MacroTargets::new(45.0, 60.0, 20.0), 80.0);
    after_midnight.timestamp = Utc.with_ymd_and_hms(2025, 3, 15, 0, 30, 0).unwrap();
    store.log_meal(after_midnight.clone());

    let meals = store.get_meals(test_day()).await.unwrap();
    assert_eq!(meals, vec![after_midnight]);

    let now = Utc.with_ymd_and_hms(2025, 3, 15, 2, 0, 0).unwrap();
    let report = service(&store).score_day(test_day(), now).await.unwrap();

    assert_eq!(report.windows.len(), 1);
    assert_eq!(report.windows[0].window_id, late.id);
    let window_score = report.windows[0].score.as_ref().unwrap();
    assert!(window_score.internal > 50, "{window_score:?}");
    assert_close(report.breakdown.adherence, 10.0, 1e-9);
    assert_close(report.breakdown.timing, 10.0, 1e-9);
}
