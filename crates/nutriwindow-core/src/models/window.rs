// ABOUTME: Time-boxed meal window model with planned and redistributed targets
// ABOUTME: Window, WindowPurpose, and Flexibility definitions plus effective-value accessors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::macros::MacroTargets;
use super::redistribution::RedistributionReason;
use crate::constants::flexibility::{
    FLEXIBLE_BUFFER_MINUTES, MODERATE_BUFFER_MINUTES, STRICT_BUFFER_MINUTES,
};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Semantic purpose of a window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WindowPurpose {
    /// Fuel ahead of training
    PreWorkout,
    /// Recovery meal after training
    PostWorkout,
    /// Steady energy through the day
    SustainedEnergy,
    /// General recovery on rest days
    Recovery,
    /// Metabolism-supporting meal
    MetabolicBoost,
    /// Light evening meal supporting sleep
    SleepOptimization,
    /// Cognitive focus meal
    FocusBoost,
}

impl WindowPurpose {
    /// Parse purpose from string, tolerant of separators and case
    #[must_use]
    pub fn from_str_lossy(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "pre_workout" | "preworkout" => Some(Self::PreWorkout),
            "post_workout" | "postworkout" => Some(Self::PostWorkout),
            "sustained_energy" => Some(Self::SustainedEnergy),
            "recovery" => Some(Self::Recovery),
            "metabolic_boost" => Some(Self::MetabolicBoost),
            "sleep_optimization" => Some(Self::SleepOptimization),
            "focus_boost" => Some(Self::FocusBoost),
            _ => None,
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PreWorkout => "Pre-workout",
            Self::PostWorkout => "Post-workout",
            Self::SustainedEnergy => "Sustained energy",
            Self::Recovery => "Recovery",
            Self::MetabolicBoost => "Metabolic boost",
            Self::SleepOptimization => "Sleep optimization",
            Self::FocusBoost => "Focus boost",
        }
    }
}

impl fmt::Display for WindowPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How tightly a window's time bounds are enforced
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Flexibility {
    /// 15 minute buffer
    Strict,
    /// 30 minute buffer
    #[default]
    Moderate,
    /// 60 minute buffer
    Flexible,
}

impl Flexibility {
    /// Time buffer tolerated either side of the window
    #[must_use]
    pub fn buffer(&self) -> Duration {
        Duration::minutes(match self {
            Self::Strict => STRICT_BUFFER_MINUTES,
            Self::Moderate => MODERATE_BUFFER_MINUTES,
            Self::Flexible => FLEXIBLE_BUFFER_MINUTES,
        })
    }
}

/// A time-boxed slice of the day carrying a calorie/macro target
///
/// `adjusted_*` and `redistribution_reason` are the only fields mutated after
/// creation, and only by redistribution. Consumers read
/// [`Window::effective_calories`] and [`Window::effective_macros`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Unique identifier
    pub id: Uuid,
    /// Display name (e.g. "Breakfast")
    pub name: String,
    /// Window start instant
    pub start: DateTime<Utc>,
    /// Window end instant, strictly after `start`
    pub end: DateTime<Utc>,
    /// Semantic purpose
    pub purpose: WindowPurpose,
    /// Time-bound tolerance class
    #[serde(default)]
    pub flexibility: Flexibility,
    /// Planned calories
    pub target_calories: f64,
    /// Planned macros
    pub target_macros: MacroTargets,
    /// Redistributed calories, if redistribution has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_calories: Option<f64>,
    /// Redistributed macros, if redistribution has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_macros: Option<MacroTargets>,
    /// Why the window was last redistributed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redistribution_reason: Option<RedistributionReason>,
    /// Calendar day the window belongs to
    pub day_date: NaiveDate,
    /// Whether the window is a fasting window
    #[serde(default)]
    pub is_fasted: bool,
}

impl Window {
    /// Create a window with a fresh identifier and no redistribution applied
    ///
    /// # Errors
    ///
    /// Returns an error if `end <= start` or a target is negative or non-finite
    pub fn new(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        purpose: WindowPurpose,
        target_calories: f64,
        target_macros: MacroTargets,
    ) -> AppResult<Self> {
        let window = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end,
            purpose,
            flexibility: Flexibility::default(),
            target_calories,
            target_macros,
            adjusted_calories: None,
            adjusted_macros: None,
            redistribution_reason: None,
            day_date: start.date_naive(),
            is_fasted: false,
        };
        window.validate()?;
        Ok(window)
    }

    /// Set the flexibility class
    #[must_use]
    pub fn with_flexibility(mut self, flexibility: Flexibility) -> Self {
        self.flexibility = flexibility;
        self
    }

    /// Mark the window as fasted
    #[must_use]
    pub fn fasted(mut self) -> Self {
        self.is_fasted = true;
        self
    }

    /// Check the structural invariants
    ///
    /// # Errors
    ///
    /// Returns an error if `end <= start` or a target is negative or non-finite
    pub fn validate(&self) -> AppResult<()> {
        if self.end <= self.start {
            return Err(AppError::invalid_input("Window end must be after its start")
                .with_resource_id(self.id.to_string()));
        }
        let targets = [
            ("target_calories", self.target_calories),
            ("target_macros.protein", self.target_macros.protein),
            ("target_macros.carbs", self.target_macros.carbs),
            ("target_macros.fat", self.target_macros.fat),
        ];
        for (field, value) in targets {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::out_of_range(format!(
                    "{field} must be a non-negative number, got {value}"
                ))
                .with_resource_id(self.id.to_string()));
            }
        }
        Ok(())
    }

    /// Adjusted calories if redistribution has run, else the planned target
    #[must_use]
    pub fn effective_calories(&self) -> f64 {
        self.adjusted_calories.unwrap_or(self.target_calories)
    }

    /// Adjusted macros if redistribution has run, else the planned target
    #[must_use]
    pub fn effective_macros(&self) -> MacroTargets {
        self.adjusted_macros.unwrap_or(self.target_macros)
    }

    /// Whether redistribution output is attached
    #[must_use]
    pub const fn is_redistributed(&self) -> bool {
        self.adjusted_calories.is_some() || self.adjusted_macros.is_some()
    }

    /// Whether `at` falls inside the closed interval `[start, end]`
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Whether `at` falls inside the interval widened by the flexibility buffer
    #[must_use]
    pub fn contains_with_buffer(&self, at: DateTime<Utc>) -> bool {
        let buffer = self.flexibility.buffer();
        self.start - buffer <= at && at <= self.end + buffer
    }

    /// The window has lapsed (`now > end`)
    #[must_use]
    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        now > self.end
    }

    /// `now` is inside the window
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.contains(now)
    }

    /// The window has not started yet
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        now < self.start
    }

    /// Length of the window
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Attach redistribution output
    pub fn apply_redistribution(
        &mut self,
        calories: f64,
        macros: MacroTargets,
        reason: Option<RedistributionReason>,
    ) {
        self.adjusted_calories = Some(calories);
        self.adjusted_macros = Some(macros);
        self.redistribution_reason = reason;
    }

    /// Drop redistribution output so effective values fall back to targets
    pub fn clear_redistribution(&mut self) {
        self.adjusted_calories = None;
        self.adjusted_macros = None;
        self.redistribution_reason = None;
    }
}
