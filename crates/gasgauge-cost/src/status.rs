// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status classification of a usage value against the current thresholds.

use gasgauge_core::{Status, ThresholdPair};

/// Fraction of the warning threshold at which `Caution` begins.
pub const CAUTION_RATIO: f64 = 0.8;

/// Classify `usage` against `thresholds`, most severe first.
///
/// Boundaries are inclusive: usage equal to a threshold is already at that level.
pub fn classify(usage: f64, thresholds: &ThresholdPair) -> Status {
    if usage >= thresholds.hard_stop {
        Status::Critical
    } else if usage >= thresholds.warning {
        Status::Warning
    } else if usage >= thresholds.warning * CAUTION_RATIO {
        Status::Caution
    } else {
        Status::Normal
    }
}
