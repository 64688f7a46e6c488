// ABOUTME: Redistribution vocabulary shared by the baseline and advanced engines
// ABOUTME: RedistributionReason, TriggerType, RedistributionTrigger, and RedistributedWindow
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::macros::MacroTargets;
use super::window::Window;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User-facing reason a window's budget changed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RedistributionReason {
    /// Consumption ran ahead of plan
    Overconsumption {
        /// Percent over plan
        percent_over: f64,
    },
    /// Consumption ran behind plan
    Underconsumption {
        /// Percent under plan
        percent_under: f64,
    },
    /// A window lapsed without a meal
    MissedWindow,
    /// A meal was eaten before its window
    EarlyConsumption,
    /// A meal was eaten after its window
    LateConsumption,
}

impl RedistributionReason {
    /// Stable tag for display and persistence
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Overconsumption { .. } => "overconsumption",
            Self::Underconsumption { .. } => "underconsumption",
            Self::MissedWindow => "missed_window",
            Self::EarlyConsumption => "early_consumption",
            Self::LateConsumption => "late_consumption",
        }
    }
}

impl fmt::Display for RedistributionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overconsumption { percent_over } => {
                write!(f, "Adjusted after eating {percent_over:.0}% over plan")
            }
            Self::Underconsumption { percent_under } => {
                write!(f, "Adjusted after eating {percent_under:.0}% under plan")
            }
            Self::MissedWindow => f.write_str("Adjusted after a missed window"),
            Self::EarlyConsumption => f.write_str("Adjusted after an early meal"),
            Self::LateConsumption => f.write_str("Adjusted after a late meal"),
        }
    }
}

/// Raw trigger classification produced by an allocation engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerType {
    /// Ate more than planned
    OverConsumption {
        /// Percent over plan
        percent_over: f64,
    },
    /// Ate less than planned
    UnderConsumption {
        /// Percent under plan
        percent_under: f64,
    },
    /// Window lapsed without a meal
    MissedWindow,
    /// Meal before the window opened
    EarlyConsumption,
    /// Meal after the window closed
    LateConsumption,
}

impl From<TriggerType> for RedistributionReason {
    fn from(trigger: TriggerType) -> Self {
        match trigger {
            TriggerType::OverConsumption { percent_over } => Self::Overconsumption { percent_over },
            TriggerType::UnderConsumption { percent_under } => {
                Self::Underconsumption { percent_under }
            }
            TriggerType::MissedWindow => Self::MissedWindow,
            TriggerType::EarlyConsumption => Self::EarlyConsumption,
            TriggerType::LateConsumption => Self::LateConsumption,
        }
    }
}

/// A transient decision event, produced per evaluation and never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedistributionTrigger {
    /// Window that provoked the evaluation
    pub window_id: Uuid,
    /// Classification of the deviation
    pub trigger_type: TriggerType,
    /// Signed deviation ratio (positive = over, negative = under)
    pub deviation: f64,
    /// Calories consumed in the triggering window
    pub consumed_calories: f64,
    /// Macros consumed in the triggering window
    pub consumed_macros: MacroTargets,
    /// When the evaluation happened
    pub evaluated_at: DateTime<Utc>,
}

/// One window's redistribution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedistributedWindow {
    /// The window as it was before this pass
    pub window: Window,
    /// New effective calories
    pub adjusted_calories: f64,
    /// New effective macros
    pub adjusted_macros: MacroTargets,
    /// Why the window changed, if it did
    pub reason: Option<RedistributionReason>,
    /// Whether this pass produced new values for the window
    pub redistributed: bool,
}

impl RedistributedWindow {
    /// A window left untouched by this pass
    ///
    /// Adjusted values report the window's current effective budget, so a
    /// lapsed window keeps whatever an earlier pass gave it.
    #[must_use]
    pub fn pass_through(window: Window) -> Self {
        Self {
            adjusted_calories: window.effective_calories(),
            adjusted_macros: window.effective_macros(),
            reason: None,
            redistributed: false,
            window,
        }
    }

    /// A window that received new values this pass
    #[must_use]
    pub fn adjusted(
        window: Window,
        adjusted_calories: f64,
        adjusted_macros: MacroTargets,
        reason: Option<RedistributionReason>,
    ) -> Self {
        Self {
            window,
            adjusted_calories,
            adjusted_macros,
            reason,
            redistributed: true,
        }
    }

    /// The window with this result written into its adjusted fields
    ///
    /// Pass-through results return the window unchanged.
    #[must_use]
    pub fn into_window(self) -> Window {
        let mut window = self.window;
        if self.redistributed {
            window.apply_redistribution(self.adjusted_calories, self.adjusted_macros, self.reason);
        }
        window
    }
}
