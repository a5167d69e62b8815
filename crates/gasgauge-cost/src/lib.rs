// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage estimation and threshold adaptation for the gasgauge capacity tracker.
//!
//! This crate provides:
//! - **Cost model**: prices an operation in usage percentage points
//! - **Usage ledger**: running usage estimate with edge-triggered threshold crossings
//! - **Threshold tracker**: damped adaptation of thresholds from observed boundaries
//! - **Status classifier**: NORMAL / CAUTION / WARNING / CRITICAL
//! - **Pre-task assessment**, checkpoints and hop preparation

pub mod assessment;
pub mod checkpoint;
pub mod cost;
pub mod hop;
pub mod ledger;
pub mod status;
pub mod threshold;

pub use assessment::{Assessment, Decision, DecisionOption, Strength};
pub use checkpoint::{Checkpoint, CheckpointResult};
pub use cost::{CostModel, CostQuote};
pub use hop::{HopSummary, HopUrgency};
pub use ledger::{
    CrossingLevel, Estimate, Registration, StatusSnapshot, ThresholdCrossing, UsageLedger,
};
pub use status::classify;
pub use threshold::ThresholdTracker;
