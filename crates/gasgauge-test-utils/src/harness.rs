// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end session testing.
//!
//! `TestHarness` assembles a ledger and a metrics store backed by a temp
//! directory. Sessions can be ended (saved) and restarted from the learned
//! thresholds, the way the command shell does it.

use std::path::Path;

use chrono::Utc;
use gasgauge_config::model::{CostTableConfig, GaugeConfig, MetricsConfig};
use gasgauge_core::{GaugeError, OperationKind, OperationParams, ThresholdPair};
use gasgauge_cost::{Registration, UsageLedger};
use gasgauge_storage::{MetricsStore, SaveOutcome};
use tracing::debug;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    thresholds: Option<ThresholdPair>,
    costs: Option<CostTableConfig>,
    silent: bool,
    max_sessions: Option<usize>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            thresholds: None,
            costs: None,
            silent: true,
            max_sessions: None,
        }
    }

    /// Start from custom thresholds instead of 60 / 90.
    pub fn with_thresholds(mut self, warning: f64, hard_stop: f64) -> Self {
        self.thresholds = Some(ThresholdPair::new(warning, hard_stop));
        self
    }

    pub fn with_costs(mut self, costs: CostTableConfig) -> Self {
        self.costs = Some(costs);
        self
    }

    /// Log threshold crossings at warn level.
    pub fn verbose(mut self) -> Self {
        self.silent = false;
        self
    }

    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = Some(max_sessions);
        self
    }

    /// Build the harness, creating the temp directory for the metrics file.
    pub fn build(self) -> Result<TestHarness, GaugeError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| GaugeError::PersistenceWrite {
            path: "<tempdir>".to_string(),
            source: e.into(),
        })?;
        let metrics_file = temp_dir.path().join("capacity_metrics.json");

        let mut config = GaugeConfig::default();
        config.gauge.silent = self.silent;
        config.metrics = MetricsConfig {
            file: metrics_file.display().to_string(),
            max_sessions: self.max_sessions.unwrap_or(config.metrics.max_sessions),
            ..MetricsConfig::default()
        };
        if let Some(pair) = self.thresholds {
            config.thresholds.warning = pair.warning;
            config.thresholds.hard_stop = pair.hard_stop;
        }
        if let Some(costs) = self.costs {
            config.costs = costs;
        }

        let ledger = UsageLedger::new(&config);
        let store = MetricsStore::new(&config.metrics);
        debug!(path = %metrics_file.display(), "test harness ready");

        Ok(TestHarness {
            config,
            ledger,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete gauge stack for integration tests.
pub struct TestHarness {
    pub config: GaugeConfig,
    pub ledger: UsageLedger,
    pub store: MetricsStore,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with default configuration.
    pub fn new() -> Result<Self, GaugeError> {
        Self::builder().build()
    }

    pub fn metrics_path(&self) -> &Path {
        self.store.path()
    }

    /// Register an operation from loose shell-style arguments.
    pub fn register(
        &mut self,
        kind: &str,
        complexity: Option<&str>,
        size: Option<&str>,
    ) -> Result<Registration, GaugeError> {
        let kind = OperationKind::parse(kind)?;
        let params = OperationParams::from_args(kind, complexity, size)?;
        self.ledger.record(kind, &params)
    }

    /// Save the current session to the metrics file.
    pub fn end_session(&self) -> Result<SaveOutcome, GaugeError> {
        self.store.save(&self.ledger.session_record(Utc::now()))
    }

    /// Replace the ledger with a fresh session, starting from learned
    /// thresholds when the metrics file has usable ones.
    pub fn start_new_session(&mut self) {
        let ledger = UsageLedger::new(&self.config);
        self.ledger = match self.store.recommended_thresholds() {
            Some(learned) => ledger.with_thresholds(learned),
            None => ledger,
        };
    }
}
