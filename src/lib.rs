// ABOUTME: Main library entry point for the nutriwindow meal-window engine
// ABOUTME: Wires the store, day service, snapshots, and logging around the window algorithms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Nutriwindow
//!
//! Allocates a daily calorie/macro budget across time-boxed meal windows,
//! keeps the allocation consistent as real consumption drifts from plan, and
//! scores each window and day on an explainable 0-10 scale.
//!
//! ## Architecture
//!
//! - **`nutriwindow_core`**: errors, constants, and data models
//! - **`nutriwindow_intelligence`**: macro balancing, redistribution, dispatch, scoring
//! - **store**: persistence collaborator trait and in-memory implementation
//! - **service**: day orchestration (fetch, redistribute, write back, score)
//! - **snapshot**: JSON day files used by the CLI
//! - **recognition**: meal-recognition output converted into logged meals
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use chrono::Utc;
//! use nutriwindow::{DayService, DaySnapshot};
//! use nutriwindow_core::errors::AppResult;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let snapshot = DaySnapshot::load("day.json")?;
//!     let service = DayService::new(Arc::new(snapshot.to_store()));
//!
//!     let outcome = service.rebalance_day(snapshot.day, Utc::now()).await?;
//!     println!("Updated {} windows via {}", outcome.updated, outcome.route);
//!     Ok(())
//! }
//! ```

/// Structured logging setup
pub mod logging;

/// Meal-recognition output handling
pub mod recognition;

/// Day orchestration
pub mod service;

/// JSON day snapshots
pub mod snapshot;

/// Persistence collaborator
pub mod store;

pub use recognition::RecognizedMeal;
pub use service::{DayService, RebalanceOutcome};
pub use snapshot::DaySnapshot;
pub use store::{InMemoryStore, NutritionStore};
