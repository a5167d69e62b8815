// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hop preparation: what to carry into the next session and how soon to go.

use std::collections::BTreeMap;

use gasgauge_core::{OperationKind, OperationTotals, Status};
use serde::Serialize;
use strum::Display;

/// Usage at or above which a hop should happen immediately.
pub const HOP_IMMEDIATELY_AT: f64 = 85.0;

/// Usage at or above which a hop is recommended.
pub const HOP_RECOMMENDED_AT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HopUrgency {
    Optional,
    Recommended,
    Immediately,
}

impl HopUrgency {
    pub fn for_usage(usage: f64) -> Self {
        if usage >= HOP_IMMEDIATELY_AT {
            HopUrgency::Immediately
        } else if usage >= HOP_RECOMMENDED_AT {
            HopUrgency::Recommended
        } else {
            HopUrgency::Optional
        }
    }
}

/// Snapshot handed to whoever writes the continuity notes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopSummary {
    pub session_id: String,
    pub usage: f64,
    pub status: Status,
    pub duration_mins: f64,
    pub operations: BTreeMap<OperationKind, OperationTotals>,
    pub urgency: HopUrgency,
}
