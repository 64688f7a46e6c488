// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Energy densities, balancing tolerances, goal clamps, and score banding thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Numeric policy shared by the allocation and scoring algorithms. Values
//! here are the defaults; the intelligence crate's configuration layer can
//! override most of them.

/// Energy density of macronutrients (Atwater factors)
pub mod energy {
    /// Protein energy density (kcal/g)
    pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
    /// Carbohydrate energy density (kcal/g)
    pub const KCAL_PER_G_CARBS: f64 = 4.0;
    /// Fat energy density (kcal/g)
    pub const KCAL_PER_G_FAT: f64 = 9.0;
}

/// Macro balancing defaults
pub mod balancing {
    /// Absolute calorie tolerance between derived macro calories and a target (kcal)
    pub const CALORIE_TOLERANCE_KCAL: f64 = 50.0;
    /// Minimum carbohydrates for a pre-workout window (g)
    pub const PRE_WORKOUT_MIN_CARBS_G: f64 = 30.0;
    /// Minimum protein for a post-workout window (g)
    pub const POST_WORKOUT_MIN_PROTEIN_G: f64 = 30.0;
    /// Minimum fat for a focus-boost window (g)
    pub const FOCUS_BOOST_MIN_FAT_G: f64 = 10.0;
}

/// Redistribution defaults
pub mod redistribution {
    /// Percent deviation of remaining budget vs. upcoming plan still considered on track
    pub const ON_TRACK_BAND_PERCENT: f64 = 20.0;
    /// Calorie floor per upcoming window on a weight-loss goal (kcal)
    pub const WEIGHT_LOSS_MIN_CALORIES: f64 = 200.0;
    /// Fraction of planned protein preserved on a weight-loss goal
    pub const WEIGHT_LOSS_PROTEIN_RATIO: f64 = 0.8;
    /// Maximum growth of a window's calories on a muscle-gain goal
    pub const MUSCLE_GAIN_MAX_CALORIE_RATIO: f64 = 1.5;
    /// Calorie floor per upcoming window for all other goals (kcal)
    pub const DEFAULT_MIN_CALORIES: f64 = 200.0;
    /// Maximum growth of a window's calories for all other goals
    pub const DEFAULT_MAX_CALORIE_RATIO: f64 = 1.3;
}

/// Flexibility time buffers (minutes)
pub mod flexibility {
    /// Strict windows tolerate 15 minutes either side
    pub const STRICT_BUFFER_MINUTES: i64 = 15;
    /// Moderate windows tolerate 30 minutes either side
    pub const MODERATE_BUFFER_MINUTES: i64 = 30;
    /// Flexible windows tolerate an hour either side
    pub const FLEXIBLE_BUFFER_MINUTES: i64 = 60;
}

/// Score scales and bands
pub mod scoring {
    /// Upper bound of the internal score scale
    pub const INTERNAL_MAX: u8 = 100;
    /// Upper bound of the display and sub-factor scale
    pub const DISPLAY_MAX: f64 = 10.0;
    /// Sub-score that contributes nothing to the overall score
    pub const NEUTRAL_SUB_SCORE: f64 = 5.0;
    /// Divisor mapping a 0-10 sub-score deviation onto a +/-2.5 contribution
    pub const CONTRIBUTION_DIVISOR: f64 = 2.0;
    /// Lower bound of the excellent band
    pub const EXCELLENT_MIN: f64 = 8.5;
    /// Lower bound of the good band
    pub const GOOD_MIN: f64 = 7.0;
    /// Lower bound of the okay band
    pub const OKAY_MIN: f64 = 5.0;
    /// Lower bound of the poor band
    pub const POOR_MIN: f64 = 3.0;
    /// Consistency sub-score used when no variance is available
    pub const CONSISTENCY_FALLBACK: f64 = 6.5;
    /// Window consistency when the window plans none of the three macros
    pub const UNPLANNED_MACRO_BALANCE: f64 = 5.0;
    /// Adherence factor weight
    pub const ADHERENCE_WEIGHT: f64 = 0.35;
    /// Quality factor weight
    pub const QUALITY_WEIGHT: f64 = 0.30;
    /// Timing factor weight
    pub const TIMING_WEIGHT: f64 = 0.20;
    /// Consistency factor weight
    pub const CONSISTENCY_WEIGHT: f64 = 0.15;
    /// Timing credit for a meal eaten inside the flexibility buffer but outside the window
    pub const BUFFERED_MEAL_TIMING_CREDIT: f64 = 0.5;
}

/// Service identity used by logging
pub mod service_names {
    /// Service name reported in structured logs
    pub const NUTRIWINDOW: &str = "nutriwindow";
}
