// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Usage ledger for one working session.
//!
//! Every registered operation is priced by the [`CostModel`] and added to the
//! running usage estimate and the per-kind totals. Crossing the warning or
//! hard-stop threshold is reported once, on the call that crosses it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use gasgauge_config::model::GaugeConfig;
use gasgauge_core::{
    GaugeError, ObservedEvent, OperationKind, OperationParams, OperationTotals, SessionRecord,
    Status, ThresholdPair, round1,
};
use serde::Serialize;
use strum::Display;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assessment::{self, Assessment};
use crate::checkpoint::{Checkpoint, CheckpointResult};
use crate::cost::CostModel;
use crate::hop::{HopSummary, HopUrgency};
use crate::status::classify;
use crate::threshold::ThresholdTracker;

/// Which threshold a registration pushed usage across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingLevel {
    #[strum(to_string = "warning")]
    Warning,
    #[strum(to_string = "hard stop")]
    HardStop,
}

/// Notification for an upward threshold crossing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdCrossing {
    pub level: CrossingLevel,
    pub threshold: f64,
    pub usage_before: f64,
    pub usage_after: f64,
    pub status: Status,
    pub at: DateTime<Utc>,
}

impl fmt::Display for ThresholdCrossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "usage {:.1}% crossed the {} threshold ({:.1}%): {}",
            self.usage_after,
            self.level,
            self.threshold,
            self.status.recommendation()
        )
    }
}

/// Result of a registration: what it cost and whether it crossed a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Registration {
    pub kind: OperationKind,
    pub cost: f64,
    pub usage: f64,
    pub crossing: Option<ThresholdCrossing>,
}

/// Dry-run projection of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub kind: OperationKind,
    pub cost: f64,
    pub current_usage: f64,
    pub post_usage: f64,
    /// `100 - post_usage`; negative once usage passes 100.
    pub remaining: f64,
    pub status: Status,
    pub recommendation: &'static str,
}

/// Point-in-time view of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub usage: f64,
    pub remaining: f64,
    pub status: Status,
    pub operation_count: u64,
    pub elapsed_minutes: f64,
    pub thresholds: ThresholdPair,
    pub guidance: &'static [&'static str],
}

/// Running usage estimate for one session.
#[derive(Debug, Clone)]
pub struct UsageLedger {
    session_id: String,
    model: CostModel,
    tracker: ThresholdTracker,
    usage: f64,
    operations: BTreeMap<OperationKind, OperationTotals>,
    session_start: DateTime<Utc>,
    last_check: DateTime<Utc>,
    warning_crossed_at: Option<DateTime<Utc>>,
    hard_stop_crossed_at: Option<DateTime<Utc>>,
    silent: bool,
}

impl UsageLedger {
    /// Create a fresh ledger from the cost table, thresholds and verbosity in `config`.
    pub fn new(config: &GaugeConfig) -> Self {
        let now = Utc::now();
        let session_id = new_session_id(now);
        info!(session_id = %session_id, "usage ledger started");
        Self {
            session_id,
            model: CostModel::new(&config.costs),
            tracker: ThresholdTracker::new(config.thresholds.pair()),
            usage: 0.0,
            operations: BTreeMap::new(),
            session_start: now,
            last_check: now,
            warning_crossed_at: None,
            hard_stop_crossed_at: None,
            silent: config.gauge.silent,
        }
    }

    /// Start from previously learned thresholds instead of the configured ones.
    pub fn with_thresholds(mut self, thresholds: ThresholdPair) -> Self {
        self.tracker = ThresholdTracker::new(thresholds);
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn usage(&self) -> f64 {
        self.usage
    }

    pub fn thresholds(&self) -> ThresholdPair {
        self.tracker.thresholds()
    }

    pub fn operations(&self) -> &BTreeMap<OperationKind, OperationTotals> {
        &self.operations
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.model
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    pub fn last_check(&self) -> DateTime<Utc> {
        self.last_check
    }

    pub fn warning_crossed_at(&self) -> Option<DateTime<Utc>> {
        self.warning_crossed_at
    }

    pub fn hard_stop_crossed_at(&self) -> Option<DateTime<Utc>> {
        self.hard_stop_crossed_at
    }

    /// Register an operation, returning a crossing notification if this call
    /// pushed usage across a threshold.
    pub fn register(
        &mut self,
        kind: OperationKind,
        params: &OperationParams,
    ) -> Result<Option<ThresholdCrossing>, GaugeError> {
        self.record(kind, params).map(|r| r.crossing)
    }

    /// Register an operation and report its cost alongside any crossing.
    ///
    /// Nothing is changed when pricing fails.
    pub fn record(
        &mut self,
        kind: OperationKind,
        params: &OperationParams,
    ) -> Result<Registration, GaugeError> {
        let quote = self.model.quote(kind, params)?;

        let now = Utc::now();
        let before = self.usage;
        let after = before + quote.cost;
        self.usage = after;
        let totals = self.operations.entry(kind).or_default();
        totals.count += 1;
        totals.total_cost += quote.cost;
        totals.units += quote.units.unwrap_or(0.0);
        self.last_check = now;

        debug!(
            kind = %kind,
            cost = quote.cost,
            usage = after,
            "operation registered"
        );

        let crossing = self.detect_crossing(before, after, now);
        if let Some(crossing) = &crossing {
            match crossing.level {
                CrossingLevel::Warning => self.warning_crossed_at = Some(now),
                CrossingLevel::HardStop => {
                    self.hard_stop_crossed_at = Some(now);
                    if self.warning_crossed_at.is_none() {
                        self.warning_crossed_at = Some(now);
                    }
                }
            }
            if self.silent {
                debug!(level = %crossing.level, usage = after, "threshold crossed");
            } else {
                warn!(
                    level = %crossing.level,
                    threshold = crossing.threshold,
                    usage = after,
                    "threshold crossed"
                );
            }
        }

        Ok(Registration {
            kind,
            cost: quote.cost,
            usage: after,
            crossing,
        })
    }

    /// The most severe threshold in `[before, after)` crossed upward, if any.
    fn detect_crossing(
        &self,
        before: f64,
        after: f64,
        at: DateTime<Utc>,
    ) -> Option<ThresholdCrossing> {
        let thresholds = self.tracker.thresholds();
        let crossed = |threshold: f64| before < threshold && after >= threshold;
        let (level, threshold) = if crossed(thresholds.hard_stop) {
            (CrossingLevel::HardStop, thresholds.hard_stop)
        } else if crossed(thresholds.warning) {
            (CrossingLevel::Warning, thresholds.warning)
        } else {
            return None;
        };
        Some(ThresholdCrossing {
            level,
            threshold,
            usage_before: before,
            usage_after: after,
            status: classify(after, &thresholds),
            at,
        })
    }

    /// Project the effect of an operation without changing the ledger.
    pub fn estimate(
        &self,
        kind: OperationKind,
        params: &OperationParams,
    ) -> Result<Estimate, GaugeError> {
        let cost = self.model.cost(kind, params)?;
        let post_usage = self.usage + cost;
        let status = classify(post_usage, &self.tracker.thresholds());
        Ok(Estimate {
            kind,
            cost,
            current_usage: self.usage,
            post_usage,
            remaining: 100.0 - post_usage,
            status,
            recommendation: status.recommendation(),
        })
    }

    pub fn check_status(&self) -> StatusSnapshot {
        let status = classify(self.usage, &self.tracker.thresholds());
        StatusSnapshot {
            usage: self.usage,
            remaining: 100.0 - self.usage,
            status,
            operation_count: self.operations.values().map(|t| t.count).sum(),
            elapsed_minutes: self.elapsed_minutes(Utc::now()),
            thresholds: self.tracker.thresholds(),
            guidance: status.guidance(),
        }
    }

    /// Decide whether a named task fits in the remaining capacity.
    pub fn pre_task_assessment(
        &self,
        task: &str,
        kind: OperationKind,
        params: &OperationParams,
    ) -> Result<Assessment, GaugeError> {
        let current = self.check_status();
        let estimate = self.estimate(kind, params)?;
        let parameters = params.describe();
        let options = assessment::decide(
            estimate.post_usage,
            &self.tracker.thresholds(),
            &parameters,
        );
        Ok(Assessment {
            task: task.to_string(),
            kind,
            parameters,
            current_usage: current.usage,
            current_status: current.status,
            remaining_after: estimate.remaining,
            estimate,
            options,
        })
    }

    /// Fold a platform warning seen now into the warning threshold.
    pub fn observe_warning(&mut self) -> Result<ObservedEvent, GaugeError> {
        self.tracker.observe_warning(self.usage)
    }

    /// Fold a platform hard stop seen now into the hard-stop threshold.
    pub fn observe_hard_stop(&mut self) -> Result<ObservedEvent, GaugeError> {
        self.tracker.observe_hard_stop(self.usage)
    }

    /// Direct access to the threshold tracker, e.g. for end-of-session adaptation.
    pub fn tracker_mut(&mut self) -> &mut ThresholdTracker {
        &mut self.tracker
    }

    pub fn check_checkpoint(&self, checkpoint: Checkpoint) -> CheckpointResult {
        let result = CheckpointResult::evaluate(checkpoint, self.usage);
        debug!(
            checkpoint = %checkpoint,
            passed = result.passed,
            margin = result.margin,
            "checkpoint evaluated"
        );
        result
    }

    pub fn prepare_hop(&self) -> HopSummary {
        let now = Utc::now();
        HopSummary {
            session_id: self.session_id.clone(),
            usage: round1(self.usage),
            status: classify(self.usage, &self.tracker.thresholds()),
            duration_mins: round1(self.elapsed_minutes(now)),
            operations: self.operations.clone(),
            urgency: HopUrgency::for_usage(self.usage),
        }
    }

    /// Snapshot the session for the metrics file.
    pub fn session_record(&self, end: DateTime<Utc>) -> SessionRecord {
        SessionRecord {
            date: end.format("%Y-%m-%d").to_string(),
            session_id: self.session_id.clone(),
            start: self.session_start,
            end,
            duration_mins: round1(self.elapsed_minutes(end)),
            operations: self.operations.clone(),
            usage: round1(self.usage),
            thresholds: self.tracker.thresholds(),
            warning_observed: self.tracker.warning_observed_at().is_some(),
            warning_time: self.tracker.warning_observed_at(),
            hard_stop_observed: self.tracker.hard_stop_observed_at().is_some(),
            hard_stop_time: self.tracker.hard_stop_observed_at(),
        }
    }

    fn elapsed_minutes(&self, now: DateTime<Utc>) -> f64 {
        let millis = (now - self.session_start).num_milliseconds().max(0);
        millis as f64 / 60_000.0
    }
}

fn new_session_id(start: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
    format!("session-{}-{suffix}", start.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasgauge_core::{Complexity, SizeClass};
    use proptest::prelude::*;
    use tracing_test::traced_test;

    fn ledger() -> UsageLedger {
        UsageLedger::new(&GaugeConfig::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn big_code_generation_crosses_warning_from_zero() {
        let mut ledger = ledger();
        let params = OperationParams::code(Complexity::High, SizeClass::Large);
        let crossing = ledger
            .register(OperationKind::CodeGeneration, &params)
            .unwrap()
            .expect("crossing from 0 to 60 should notify");

        assert_eq!(crossing.level, CrossingLevel::Warning);
        assert_eq!(crossing.usage_before, 0.0);
        let status = ledger.check_status();
        assert!(approx(status.usage, 60.0));
        assert_eq!(status.status, Status::Warning);
        assert_eq!(status.operation_count, 1);
        assert!(ledger.warning_crossed_at().is_some());
    }

    #[test]
    fn estimate_on_fresh_ledger() {
        let ledger = ledger();
        let estimate = ledger
            .estimate(OperationKind::Discussion, &OperationParams::discussion(500))
            .unwrap();
        assert!(approx(estimate.cost, 6.0));
        assert!(approx(estimate.post_usage, 6.0));
        assert!(approx(estimate.remaining, 94.0));
        assert_eq!(estimate.status, Status::Normal);
        assert_eq!(estimate.recommendation, "proceed");
    }

    #[test]
    fn crossing_fires_once_per_upward_edge() {
        let mut ledger = ledger();
        // 2.0 + 0.05 × 1120 = 58.0
        assert!(ledger
            .register(OperationKind::ContextLoad, &OperationParams::context_load(1120.0))
            .unwrap()
            .is_none());
        assert!(approx(ledger.usage(), 58.0));

        // +3.0 → 61.0
        let first = ledger
            .register(OperationKind::Discussion, &OperationParams::discussion(200))
            .unwrap();
        assert_eq!(first.map(|c| c.level), Some(CrossingLevel::Warning));

        let second = ledger
            .register(OperationKind::Discussion, &OperationParams::discussion(200))
            .unwrap();
        assert!(second.is_none());
        assert!(ledger.usage() >= 60.0);
    }

    #[test]
    fn crossing_both_thresholds_reports_hard_stop_only_once() {
        let mut ledger = ledger();
        // 2.0 + 0.05 × 1900 = 97.0
        let crossing = ledger
            .register(OperationKind::ContextLoad, &OperationParams::context_load(1900.0))
            .unwrap()
            .unwrap();
        assert_eq!(crossing.level, CrossingLevel::HardStop);
        assert_eq!(crossing.status, Status::Critical);
        assert!(ledger.warning_crossed_at().is_some());
        assert!(ledger.hard_stop_crossed_at().is_some());

        let again = ledger
            .register(OperationKind::Search, &OperationParams::search(1))
            .unwrap();
        assert!(again.is_none());
    }

    #[test]
    fn failed_register_leaves_ledger_untouched() {
        let mut ledger = ledger();
        ledger
            .register(OperationKind::Planning, &OperationParams::planning(Complexity::Low))
            .unwrap();
        let before = ledger.check_status();

        let err = ledger
            .register(OperationKind::CodeGeneration, &OperationParams::search(3))
            .unwrap_err();
        assert!(matches!(err, GaugeError::InvalidParameterShape { .. }));

        let negative = OperationParams::context_load(-5.0);
        assert!(ledger.register(OperationKind::ContextLoad, &negative).is_err());

        let after = ledger.check_status();
        assert_eq!(before.usage, after.usage);
        assert_eq!(before.operation_count, after.operation_count);
        assert_eq!(ledger.operations().len(), 1);
    }

    #[test]
    fn estimate_does_not_mutate() {
        let mut ledger = ledger();
        ledger
            .register(OperationKind::Search, &OperationParams::search(4))
            .unwrap();
        let before = ledger.check_status();
        for _ in 0..5 {
            ledger
                .estimate(
                    OperationKind::ArtifactCreation,
                    &OperationParams::artifact(Complexity::High, SizeClass::Large),
                )
                .unwrap();
        }
        let after = ledger.check_status();
        assert_eq!(before.usage, after.usage);
        assert_eq!(before.status, after.status);
        assert_eq!(before.operation_count, after.operation_count);
    }

    #[test]
    fn linear_units_are_tracked_apart_from_counts() {
        let mut ledger = ledger();
        ledger
            .register(OperationKind::ContextLoad, &OperationParams::context_load(40.0))
            .unwrap();
        ledger
            .register(OperationKind::ContextLoad, &OperationParams::context_load(60.0))
            .unwrap();
        let totals = ledger.operations()[&OperationKind::ContextLoad];
        assert_eq!(totals.count, 2);
        assert!(approx(totals.units, 100.0));
        assert!(approx(totals.total_cost, 9.0));
    }

    #[test]
    fn observation_uses_current_usage() {
        let mut ledger = ledger();
        // 3.0 × 4.0 × 5.0 + 2.0 + 0.05 × 360 = 80.0
        ledger
            .register(
                OperationKind::CodeGeneration,
                &OperationParams::code(Complexity::High, SizeClass::Large),
            )
            .unwrap();
        ledger
            .register(OperationKind::ContextLoad, &OperationParams::context_load(360.0))
            .unwrap();
        let event = ledger.observe_warning().unwrap();
        assert_eq!(event.updated_threshold, 74.0);
        assert_eq!(ledger.thresholds().warning, 74.0);

        let record = ledger.session_record(Utc::now());
        assert!(record.warning_observed);
        assert!(record.warning_time.is_some());
        assert!(!record.hard_stop_observed);
        assert_eq!(record.usage, 80.0);
    }

    #[test]
    fn with_thresholds_overrides_config() {
        let ledger = ledger().with_thresholds(ThresholdPair::new(40.0, 70.0));
        let estimate = ledger
            .estimate(OperationKind::Discussion, &OperationParams::discussion(3500))
            .unwrap();
        // 1.0 + 35.0 = 36.0 ≥ 0.8 × 40
        assert_eq!(estimate.status, Status::Caution);
    }

    #[test]
    fn checkpoint_uses_remaining_capacity() {
        let mut ledger = ledger();
        ledger
            .register(OperationKind::Discussion, &OperationParams::discussion(2900))
            .unwrap();
        // usage 30, remaining 70
        assert!(!ledger.check_checkpoint(Checkpoint::ContextLoaded).passed);
        let result = ledger.check_checkpoint(Checkpoint::PlanningComplete);
        assert!(result.passed);
        assert!(approx(result.margin, 10.0));
    }

    #[test]
    fn hop_summary_reflects_usage() {
        let mut ledger = ledger();
        ledger
            .register(
                OperationKind::CodeGeneration,
                &OperationParams::code(Complexity::High, SizeClass::Large),
            )
            .unwrap();
        ledger
            .register(
                OperationKind::ArtifactCreation,
                &OperationParams::artifact(Complexity::Medium, SizeClass::Small),
            )
            .unwrap();
        let hop = ledger.prepare_hop();
        assert_eq!(hop.usage, 70.0);
        assert_eq!(hop.urgency, HopUrgency::Recommended);
        assert_eq!(hop.session_id, ledger.session_id());
        assert_eq!(hop.operations.len(), 2);
    }

    #[test]
    fn pre_task_assessment_combines_status_and_estimate() {
        let mut ledger = ledger();
        ledger
            .register(OperationKind::Discussion, &OperationParams::discussion(4400))
            .unwrap();
        // usage 45; medium code adds 15 → 60
        let assessment = ledger
            .pre_task_assessment(
                "refactor parser",
                OperationKind::CodeGeneration,
                &OperationParams::code(Complexity::Medium, SizeClass::Medium),
            )
            .unwrap();
        assert_eq!(assessment.task, "refactor parser");
        assert_eq!(assessment.current_status, Status::Normal);
        assert!(approx(assessment.estimate.post_usage, 60.0));
        assert_eq!(
            assessment.options[0].decision,
            assessment::Decision::ProceedAndHop
        );
        assert!(approx(ledger.usage(), 45.0));
    }

    #[test]
    fn session_record_snapshots_totals() {
        let mut ledger = ledger();
        ledger
            .register(OperationKind::Search, &OperationParams::search(5))
            .unwrap();
        let end = ledger.session_start() + chrono::Duration::minutes(42);
        let record = ledger.session_record(end);
        assert_eq!(record.duration_mins, 42.0);
        assert_eq!(record.usage, 6.5);
        assert_eq!(record.operations[&OperationKind::Search].count, 1);
        assert_eq!(record.thresholds, ThresholdPair::default());
        assert!(record.session_id.starts_with("session-"));
        assert_eq!(record.date, end.format("%Y-%m-%d").to_string());
    }

    #[test]
    fn session_ids_are_unique() {
        assert_ne!(ledger().session_id(), ledger().session_id());
    }

    #[test]
    #[traced_test]
    fn crossing_is_logged_at_warn_when_not_silent() {
        let mut config = GaugeConfig::default();
        config.gauge.silent = false;
        let mut ledger = UsageLedger::new(&config);
        ledger
            .register(
                OperationKind::CodeGeneration,
                &OperationParams::code(Complexity::High, SizeClass::Large),
            )
            .unwrap();
        assert!(logs_contain("threshold crossed"));
        assert!(logs_contain("WARN"));
    }

    fn any_params() -> impl Strategy<Value = OperationParams> {
        prop_oneof![
            (0.0f64..500.0).prop_map(OperationParams::context_load),
            (0u32..2_000).prop_map(OperationParams::discussion),
            (0u32..20).prop_map(OperationParams::search),
            Just(OperationParams::code(Complexity::Low, SizeClass::Small)),
            Just(OperationParams::artifact(Complexity::Medium, SizeClass::Large)),
            Just(OperationParams::planning(Complexity::High)),
        ]
    }

    proptest! {
        #[test]
        fn register_is_additive(ops in proptest::collection::vec(any_params(), 0..40)) {
            let mut ledger = ledger();
            let model = CostModel::default();
            let mut expected = 0.0;
            for params in &ops {
                expected += model.cost(params.kind(), params).unwrap();
                ledger.register(params.kind(), params).unwrap();
            }
            prop_assert!((ledger.usage() - expected).abs() < 1e-6);

            let summed: f64 = ledger.operations().values().map(|t| t.total_cost).sum();
            prop_assert!((ledger.usage() - summed).abs() < 1e-6);

            for (kind, totals) in ledger.operations() {
                let n = ops.iter().filter(|p| p.kind() == *kind).count() as u64;
                prop_assert_eq!(totals.count, n);
            }
        }
    }
}
