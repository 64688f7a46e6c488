// ABOUTME: Core types and constants for the nutriwindow meal-window engine
// ABOUTME: Foundation crate with error handling, domain models, and numeric constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutriwindow Core
//!
//! Foundation crate providing shared types and constants for allocating a
//! daily calorie/macro budget across time-boxed meal windows. This crate is
//! designed to change infrequently so that the algorithm and service crates
//! rebuild independently.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Energy densities, tolerances, goal clamps, and score bands
//! - **models**: Windows, meals, profiles, redistribution results, and scores

/// Unified error handling system with standard error codes
pub mod errors;

/// Numeric policy constants organized by domain
pub mod constants;

/// Core data models (Window, LoggedMeal, UserProfile, Score, etc.)
pub mod models;

pub use errors::{AppError, AppResult, ErrorCode};
