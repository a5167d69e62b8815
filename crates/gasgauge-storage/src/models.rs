// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted metrics document.
//!
//! `SessionRecord` and the threshold / totals types are defined in
//! `gasgauge-core` and re-exported here for convenience.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use gasgauge_core::{OperationKind, OperationTotals, SessionRecord, ThresholdPair};

/// Contents of the metrics file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsFile {
    /// Most recent sessions, oldest first.
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    /// Thresholds in effect at the end of recent sessions, oldest first.
    #[serde(default)]
    pub thresholds: Vec<ThresholdPair>,
    /// Operation totals summed over every saved session.
    #[serde(default)]
    pub operations: BTreeMap<OperationKind, OperationTotals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_warning: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_hard_stop: Option<f64>,
}

impl MetricsFile {
    /// Fold a finished session in, evicting the oldest entries past the caps.
    pub fn append(&mut self, record: &SessionRecord, max_sessions: usize, max_thresholds: usize) {
        for (kind, totals) in &record.operations {
            self.operations.entry(*kind).or_default().merge(totals);
        }

        self.sessions.push(record.clone());
        evict_oldest(&mut self.sessions, max_sessions);

        self.thresholds.push(record.thresholds);
        evict_oldest(&mut self.thresholds, max_thresholds);

        self.recompute_averages();
    }

    /// Recompute the rolling averages over the retained threshold history.
    pub fn recompute_averages(&mut self) {
        if self.thresholds.is_empty() {
            self.avg_warning = None;
            self.avg_hard_stop = None;
            return;
        }
        let n = self.thresholds.len() as f64;
        self.avg_warning = Some(self.thresholds.iter().map(|t| t.warning).sum::<f64>() / n);
        self.avg_hard_stop = Some(self.thresholds.iter().map(|t| t.hard_stop).sum::<f64>() / n);
    }
}

fn evict_oldest<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}
