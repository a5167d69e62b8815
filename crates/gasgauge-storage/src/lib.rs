// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metrics persistence for the gasgauge capacity tracker.
//!
//! Session summaries and threshold snapshots are kept in a single JSON file
//! with bounded, first-in-first-out rolling windows, together with rolling
//! threshold averages and operation totals summed across sessions.

pub mod metrics;
pub mod models;

pub use metrics::{MetricsStore, SaveOutcome};
pub use models::*;
