// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging plus a standard day of windows, meals, and profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `nutriwindow`

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use nutriwindow_core::models::{
    LoggedMeal, MacroTargets, NutritionGoal, UserProfile, Window, WindowPurpose,
};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// The test day
pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

/// An instant on the test day
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, hour, minute, 0).unwrap()
}

/// 2000 kcal / 150 g protein / 200 g carbs / 60 g fat
pub fn standard_profile(goal: NutritionGoal) -> UserProfile {
    UserProfile::new(2000.0, MacroTargets::new(150.0, 200.0, 60.0), goal).unwrap()
}

/// A window on the test day
pub fn window(
    name: &str,
    start: (u32, u32),
    end: (u32, u32),
    purpose: WindowPurpose,
    calories: f64,
    macros: MacroTargets,
) -> Window {
    Window::new(
        name,
        at(start.0, start.1),
        at(end.0, end.1),
        purpose,
        calories,
        macros,
    )
    .unwrap()
}

/// Four windows planning exactly 2000 kcal
///
/// Breakfast 07-09 (500), Lunch 12-14 (600), Pre-workout 16-17 (300),
/// Dinner 18:30-20:30 post-workout (600).
pub fn standard_windows() -> Vec<Window> {
    vec![
        window(
            "Breakfast",
            (7, 0),
            (9, 0),
            WindowPurpose::SustainedEnergy,
            500.0,
            MacroTargets::new(35.0, 55.0, 15.0),
        ),
        window(
            "Lunch",
            (12, 0),
            (14, 0),
            WindowPurpose::FocusBoost,
            600.0,
            MacroTargets::new(45.0, 60.0, 20.0),
        ),
        window(
            "Pre-workout",
            (16, 0),
            (17, 0),
            WindowPurpose::PreWorkout,
            300.0,
            MacroTargets::new(15.0, 50.0, 4.0),
        ),
        window(
            "Dinner",
            (18, 30),
            (20, 30),
            WindowPurpose::PostWorkout,
            600.0,
            MacroTargets::new(55.0, 35.0, 26.0),
        ),
    ]
}

/// A meal on the test day without a health score
pub fn meal(hour: u32, minute: u32, calories: f64, macros: MacroTargets) -> LoggedMeal {
    LoggedMeal::new("meal", at(hour, minute), calories, macros).unwrap()
}

/// A meal on the test day with a 0-100 health score
pub fn scored_meal(
    hour: u32,
    minute: u32,
    calories: f64,
    macros: MacroTargets,
    health_score: f64,
) -> LoggedMeal {
    meal(hour, minute, calories, macros)
        .with_health_score(health_score)
        .unwrap()
}

/// Float comparison with a readable failure message
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} (+/- {tolerance}), got {actual}"
    );
}
