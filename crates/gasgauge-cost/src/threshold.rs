// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adaptive warning / hard-stop thresholds.
//!
//! Each observed real-world boundary pulls the matching threshold toward the
//! usage at which it was seen: `round(observed × 0.7 + current × 0.3, 1)`.
//! The ordering `warning < hard_stop` is not enforced after an update; an
//! inverted pair is logged and left as computed.

use chrono::{DateTime, Utc};
use gasgauge_core::{GaugeError, ObservationKind, ObservedEvent, ThresholdPair, round1};
use tracing::{info, warn};

/// Weight given to a new observation; the prior keeps `1 - OBSERVATION_WEIGHT`.
pub const OBSERVATION_WEIGHT: f64 = 0.7;

/// Lowest value a threshold can adapt to.
pub const MIN_THRESHOLD: f64 = 0.1;

/// Highest value a threshold can adapt to.
pub const MAX_THRESHOLD: f64 = 99.9;

/// Holds the live thresholds and folds observations into them.
#[derive(Debug, Clone)]
pub struct ThresholdTracker {
    thresholds: ThresholdPair,
    warning_observed_at: Option<DateTime<Utc>>,
    hard_stop_observed_at: Option<DateTime<Utc>>,
}

impl Default for ThresholdTracker {
    fn default() -> Self {
        Self::new(ThresholdPair::default())
    }
}

impl ThresholdTracker {
    pub fn new(thresholds: ThresholdPair) -> Self {
        Self {
            thresholds,
            warning_observed_at: None,
            hard_stop_observed_at: None,
        }
    }

    /// Current thresholds.
    pub fn thresholds(&self) -> ThresholdPair {
        self.thresholds
    }

    pub fn warning_observed_at(&self) -> Option<DateTime<Utc>> {
        self.warning_observed_at
    }

    pub fn hard_stop_observed_at(&self) -> Option<DateTime<Utc>> {
        self.hard_stop_observed_at
    }

    /// Record that the platform's warning was seen at `usage` and move the
    /// warning threshold toward it.
    pub fn observe_warning(&mut self, usage: f64) -> Result<ObservedEvent, GaugeError> {
        self.observe(ObservationKind::WarningObserved, usage)
    }

    /// Record that the platform's hard stop was hit at `usage` and move the
    /// hard-stop threshold toward it.
    pub fn observe_hard_stop(&mut self, usage: f64) -> Result<ObservedEvent, GaugeError> {
        self.observe(ObservationKind::HardStopObserved, usage)
    }

    /// Fold optional end-of-session observations in, warning first.
    pub fn adapt(
        &mut self,
        warning_at: Option<f64>,
        hard_stop_at: Option<f64>,
    ) -> Result<Vec<ObservedEvent>, GaugeError> {
        let mut events = Vec::new();
        if let Some(usage) = warning_at {
            events.push(self.observe_warning(usage)?);
        }
        if let Some(usage) = hard_stop_at {
            events.push(self.observe_hard_stop(usage)?);
        }
        Ok(events)
    }

    fn observe(&mut self, kind: ObservationKind, usage: f64) -> Result<ObservedEvent, GaugeError> {
        if !usage.is_finite() || usage < 0.0 {
            return Err(GaugeError::InvalidParameterShape {
                kind: kind.to_string(),
                message: format!("observed usage must be a finite, non-negative number, got {usage}"),
            });
        }

        let now = Utc::now();
        let (slot, observed_at) = match kind {
            ObservationKind::WarningObserved => {
                (&mut self.thresholds.warning, &mut self.warning_observed_at)
            }
            ObservationKind::HardStopObserved => {
                (&mut self.thresholds.hard_stop, &mut self.hard_stop_observed_at)
            }
        };
        let previous = *slot;
        let updated = adapted(usage, previous);
        *slot = updated;
        *observed_at = Some(now);

        info!(
            observation = %kind,
            usage,
            previous,
            updated,
            "threshold adapted"
        );
        if !self.thresholds.is_ordered() {
            warn!(
                warning = self.thresholds.warning,
                hard_stop = self.thresholds.hard_stop,
                "adapted thresholds are inverted: warning is not below hard stop"
            );
        }

        Ok(ObservedEvent {
            kind,
            usage_at_observation: usage,
            timestamp: now,
            updated_threshold: updated,
        })
    }
}

/// The damped update rule, bounded to `[MIN_THRESHOLD, MAX_THRESHOLD]`.
pub fn adapted(observed: f64, current: f64) -> f64 {
    round1(observed * OBSERVATION_WEIGHT + current * (1.0 - OBSERVATION_WEIGHT))
        .clamp(MIN_THRESHOLD, MAX_THRESHOLD)
}
