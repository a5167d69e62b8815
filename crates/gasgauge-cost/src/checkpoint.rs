// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named workflow gates that require a minimum of remaining capacity.

use gasgauge_core::GaugeError;
use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// A point in a working session where remaining capacity is checked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    ContextLoaded,
    PlanningComplete,
    ImplementationStart,
    ContinuityGeneration,
    WrapUp,
}

impl Checkpoint {
    /// Parse a checkpoint name, listing the valid names on failure.
    pub fn parse(name: &str) -> Result<Self, GaugeError> {
        name.trim()
            .parse()
            .map_err(|_| GaugeError::UnknownCheckpoint {
                name: name.to_string(),
                valid: Self::valid_names(),
            })
    }

    pub fn valid_names() -> String {
        Self::iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Remaining capacity (percentage points) needed to pass.
    pub fn min_remaining(&self) -> f64 {
        match self {
            Checkpoint::ContextLoaded => 75.0,
            Checkpoint::PlanningComplete => 60.0,
            Checkpoint::ImplementationStart => 50.0,
            Checkpoint::ContinuityGeneration => 30.0,
            Checkpoint::WrapUp => 20.0,
        }
    }
}

/// Outcome of a checkpoint check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckpointResult {
    pub checkpoint: Checkpoint,
    pub passed: bool,
    pub remaining: f64,
    pub required: f64,
    /// `remaining - required`; negative when the gate is missed.
    pub margin: f64,
}

impl CheckpointResult {
    pub(crate) fn evaluate(checkpoint: Checkpoint, usage: f64) -> Self {
        let remaining = 100.0 - usage;
        let required = checkpoint.min_remaining();
        Self {
            checkpoint,
            passed: remaining >= required,
            remaining,
            required,
            margin: remaining - required,
        }
    }
}
