// ABOUTME: Integration tests for JSON day snapshots
// ABOUTME: File round trips, validation failures, and seeding the in-memory store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use common::{at, meal, standard_profile, standard_windows, test_day};
use nutriwindow::{DayService, DaySnapshot, NutritionStore};
use nutriwindow_core::errors::ErrorCode;
use chrono::{Duration, TimeZone, Utc};
use nutriwindow_core::models::{
    Flexibility, LoggedMeal, MacroTargets, NutritionGoal, Window, WindowPurpose,
};
use nutriwindow_intelligence::config::WindowEngineConfig;
use std::sync::Arc;
use tempfile::TempDir;

mod common;

fn snapshot() -> DaySnapshot {
    DaySnapshot {
        day: test_day(),
        profile: standard_profile(NutritionGoal::PerformanceFocus),
        windows: standard_windows(),
        meals: vec![meal(8, 0, 520.0, MacroTargets::new(36.0, 58.0, 15.0))],
    }
}

// ============================================================================
// FILES
// ============================================================================

#[test]
fn test_save_then_load_returns_same_day() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("day.json");

    let original = snapshot();
    original.save(&path).unwrap();
    let loaded = DaySnapshot::load(&path).unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn test_missing_file_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let error = DaySnapshot::load(dir.path().join("missing.json")).unwrap_err();
    assert_eq!(error.code, ErrorCode::StorageError);
}

#[test]
fn test_malformed_file_names_the_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ \"day\": ").unwrap();

    let error = DaySnapshot::load(&path).unwrap_err();
    assert_eq!(error.code, ErrorCode::SerializationError);
    assert_eq!(
        error.context.resource_id.as_deref(),
        Some(path.display().to_string().as_str())
    );
}

// ============================================================================
// PARSING AND VALIDATION
// ============================================================================

#[test]
fn test_minimal_json_fills_defaults() {
    let json = r#"{
        "day": "2025-03-14",
        "profile": {
            "daily_calorie_target": 1800,
            "daily_macros": { "protein": 120, "carbs": 180, "fat": 60 }
        },
        "windows": [{
            "id": "6f1c2d9e-4b7a-4c1e-9a3f-2d8e5b6c7a10",
            "name": "Lunch",
            "start": "2025-03-14T12:00:00Z",
            "end": "2025-03-14T13:30:00Z",
            "purpose": "focus_boost",
            "target_calories": 600,
            "target_macros": { "protein": 40, "carbs": 65, "fat": 20 },
            "day_date": "2025-03-14"
        }]
    }"#;

    let snapshot = DaySnapshot::from_json(json).unwrap();
    assert_eq!(snapshot.profile.goal, NutritionGoal::Maintenance);
    assert!(snapshot.meals.is_empty());
    let lunch = &snapshot.windows[0];
    assert_eq!(lunch.purpose, WindowPurpose::FocusBoost);
    assert_eq!(lunch.flexibility, Flexibility::Moderate);
    assert!(!lunch.is_fasted);
    assert!(!lunch.is_redistributed());
}

#[test]
fn test_window_from_another_day_is_rejected() {
    let mut day = snapshot();
    day.windows[2].day_date = test_day().succ_opt().unwrap();

    let error = DaySnapshot::from_json(&day.to_json().unwrap()).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(
        error.context.resource_id,
        Some(day.windows[2].id.to_string())
    );
}

#[test]
fn test_meal_from_another_day_is_rejected() {
    let mut day = snapshot();
    day.meals[0].timestamp += Duration::days(1);

    let error = day.validate().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.context.resource_id, Some(day.meals[0].id.to_string()));
}

#[test]
fn test_meal_after_midnight_in_late_window_is_accepted() {
    let mut day = snapshot();
    let late = Window::new(
        "Late snack",
        at(22, 0),
        Utc.with_ymd_and_hms(2025, 3, 15, 1, 0, 0).unwrap(),
        WindowPurpose::Recovery,
        250.0,
        MacroTargets::new(20.0, 25.0, 8.0),
    )
    .unwrap();
    day.windows.push(late);
    day.meals.push(
        LoggedMeal::new(
            "Yogurt",
            Utc.with_ymd_and_hms(2025, 3, 15, 0, 30, 0).unwrap(),
            240.0,
            MacroTargets::new(18.0, 26.0, 7.0),
        )
        .unwrap(),
    );

    assert!(day.validate().is_ok());
}

#[test]
fn test_negative_meal_is_rejected() {
    let mut day = snapshot();
    day.meals[0].calories = -40.0;
    let error = day.validate().unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
}

#[test]
fn test_with_windows_replaces_only_windows() {
    let original = snapshot();
    let trimmed = original.clone().with_windows(original.windows[..2].to_vec());
    assert_eq!(trimmed.windows.len(), 2);
    assert_eq!(trimmed.meals, original.meals);
    assert_eq!(trimmed.profile, original.profile);
}

// ============================================================================
// STORE SEEDING
// ============================================================================

#[tokio::test]
async fn test_seeded_store_serves_the_snapshot() {
    let original = snapshot();
    let store = original.to_store();

    assert_eq!(store.get_windows(test_day()).await.unwrap(), original.windows);
    assert_eq!(store.get_meals(test_day()).await.unwrap(), original.meals);
    assert_eq!(store.get_profile().await.unwrap(), original.profile);

    let service =
        DayService::with_config(Arc::new(store.clone()), &WindowEngineConfig::default());
    let outcome = service.rebalance_day(test_day(), at(10, 0)).await.unwrap();
    assert_eq!(outcome.updated, 3);

    let refreshed = original.with_windows(store.get_windows(test_day()).await.unwrap());
    assert!(refreshed.validate().is_ok());
    assert!(refreshed.windows[3].is_redistributed());
}
