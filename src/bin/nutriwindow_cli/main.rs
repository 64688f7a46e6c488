// ABOUTME: Nutriwindow CLI - rebalances and scores a day stored as a JSON snapshot
// ABOUTME: Prints redistributed windows or the day score report as JSON on stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Redistribute the remaining budget as of a given instant
//! nutriwindow-cli rebalance --snapshot day.json --now 2025-03-14T10:00:00Z
//!
//! # Redistribute and write the adjusted windows back into the snapshot
//! nutriwindow-cli rebalance --snapshot day.json --write
//!
//! # Score the day as of now
//! nutriwindow-cli score --snapshot day.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use nutriwindow::logging::LoggingConfig;
use nutriwindow::{DayService, DaySnapshot};
use nutriwindow_intelligence::config::WindowEngineConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "nutriwindow-cli",
    about = "Meal window redistribution and scoring",
    long_about = "Rebalance a day's meal windows after logged meals and score adherence, \
                  reading a JSON day snapshot."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Day snapshot file (profile, windows, meals)
    #[arg(long, global = true, default_value = "day.json")]
    snapshot: PathBuf,

    /// Evaluation instant in RFC 3339 (defaults to the current time)
    #[arg(long, global = true)]
    now: Option<DateTime<Utc>>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Redistribute the remaining budget over upcoming windows
    Rebalance {
        /// Write the adjusted windows back into the snapshot file
        #[arg(long)]
        write: bool,
    },

    /// Score the day and every window
    Score,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    let config = WindowEngineConfig::load().context("Invalid window engine configuration")?;
    let snapshot = DaySnapshot::load(&cli.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", cli.snapshot.display()))?;
    let now = cli.now.unwrap_or_else(Utc::now);
    let service = DayService::with_config(Arc::new(snapshot.to_store()), &config);

    info!(day = %snapshot.day, %now, "Evaluating snapshot");

    let output = match cli.command {
        Command::Rebalance { write } => {
            let outcome = service.rebalance_day(snapshot.day, now).await?;
            if write {
                snapshot
                    .clone()
                    .with_windows(outcome.windows.clone())
                    .save(&cli.snapshot)?;
                info!(path = %cli.snapshot.display(), "Snapshot updated");
            }
            serde_json::to_string_pretty(&outcome)?
        }
        Command::Score => {
            let report = service.score_day(snapshot.day, now).await?;
            serde_json::to_string_pretty(&report)?
        }
    };

    println!("{output}");
    Ok(())
}
