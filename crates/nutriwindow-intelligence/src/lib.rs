// ABOUTME: Window engine algorithms for budget redistribution and scoring
// ABOUTME: Macro balancing, baseline redistribution, engine dispatch, and score computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutriwindow Intelligence
//!
//! The numeric policy of the window engine:
//!
//! - [`macro_balancer`] keeps a macro split's calories within tolerance of a target
//! - [`redistribution`] re-spreads the remaining daily budget over upcoming windows
//! - [`dispatcher`] routes a pass through an optional advanced engine or the baseline
//! - [`scoring`] turns windows and meals into explainable 0-10 scores
//! - [`config`] holds every tunable with validation and env overrides
//!
//! Every algorithm takes `now` explicitly and returns new values without
//! touching its inputs.

pub mod config;
pub mod dispatcher;
pub mod macro_balancer;
pub mod redistribution;
pub mod scoring;

pub use config::{ConfigError, WindowEngineConfig};
pub use dispatcher::{
    calculate_deviation, AdvancedEngine, DeviationDispatcher, DispatchResult, DispatchRoute,
    EngineOutcome, EngineRequest, EngineWindowAdjustment,
};
pub use macro_balancer::{BalancedMacros, MacroBalancer};
pub use redistribution::{BaselineRedistributor, RemainingBudget};
pub use scoring::{
    ChipPolarity, DayScoreReport, FactorChip, FallbackInputs, ScoreBand, ScoreEngine,
    ScoreFallback, ScoreModel, WindowScore,
};
