// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end session tests: register, observe, save, and restart from
//! learned thresholds.
//!
//! Each test creates an isolated TestHarness with its own temp metrics file.

use gasgauge_config::model::CostTableConfig;
use gasgauge_core::{GaugeError, OperationKind, OperationParams, Status, ThresholdPair};
use gasgauge_cost::{Checkpoint, CrossingLevel, Decision, HopUrgency};
use gasgauge_test_utils::TestHarness;

// ---- Session flow ----

#[test]
fn typical_session_reaches_warning_once() {
    let mut harness = TestHarness::new().unwrap();

    let load = harness.register("context", None, Some("large")).unwrap();
    assert_eq!(load.cost, 12.0);
    assert!(load.crossing.is_none());

    let plan = harness.register("plan", Some("high"), None).unwrap();
    assert!(plan.crossing.is_none());

    // 18.0 + 3 × 4 × 2.5 = 48.0
    let code = harness.register("code", Some("high"), Some("medium")).unwrap();
    assert!(code.crossing.is_none());
    assert_eq!(harness.ledger.check_status().status, Status::Caution);

    // +6.0 → 54, +6.5 → 60.5
    harness.register("discuss", None, Some("500")).unwrap();
    let search = harness.register("search", Some("5"), None).unwrap();
    let crossing = search.crossing.expect("60.5 crosses 60");
    assert_eq!(crossing.level, CrossingLevel::Warning);

    let again = harness.register("discussion", Some("low"), Some("small")).unwrap();
    assert!(again.crossing.is_none());

    let snapshot = harness.ledger.check_status();
    assert_eq!(snapshot.status, Status::Warning);
    assert_eq!(snapshot.operation_count, 6);
    assert!(!harness
        .ledger
        .check_checkpoint(Checkpoint::ImplementationStart)
        .passed);
    assert!(harness.ledger.check_checkpoint(Checkpoint::WrapUp).passed);
}

#[test]
fn unknown_kind_is_rejected_without_side_effects() {
    let mut harness = TestHarness::new().unwrap();
    harness.register("search", None, None).unwrap();

    let err = harness.register("teleport", None, None).unwrap_err();
    assert!(matches!(err, GaugeError::InvalidOperationKind { .. }));
    assert_eq!(harness.ledger.check_status().operation_count, 1);
}

#[test]
fn assessment_near_hard_stop_recommends_hop() {
    let mut harness = TestHarness::new().unwrap();
    harness.register("code", Some("high"), Some("large")).unwrap();
    harness.register("artifact", Some("high"), Some("small")).unwrap();

    // 60 + 17.5 = 77.5; another large artifact would pass 90
    let kind = OperationKind::ArtifactCreation;
    let params = OperationParams::from_args(kind, Some("medium"), Some("large"))
        .unwrap();
    let assessment = harness
        .ledger
        .pre_task_assessment("write design doc", kind, &params)
        .unwrap();
    assert_eq!(assessment.options[0].decision, Decision::HopSession);
    assert_eq!(assessment.estimate.status, Status::Critical);

    let hop = harness.ledger.prepare_hop();
    assert_eq!(hop.urgency, HopUrgency::Recommended);
}

// ---- Persistence and learning ----

#[test]
fn learned_thresholds_carry_into_next_session() {
    let mut harness = TestHarness::new().unwrap();

    // usage 80 when the platform warning shows up
    harness.register("code", Some("high"), Some("large")).unwrap();
    harness.register("discussion", None, Some("1900")).unwrap();
    let event = harness.ledger.observe_warning().unwrap();
    assert_eq!(event.updated_threshold, 74.0);

    let outcome = harness.end_session().unwrap();
    assert_eq!(outcome.sessions_retained, 1);
    assert_eq!(outcome.avg_warning, Some(74.0));

    harness.start_new_session();
    assert_eq!(harness.ledger.usage(), 0.0);
    assert_eq!(harness.ledger.thresholds(), ThresholdPair::new(74.0, 90.0));

    let metrics = harness.store.load().unwrap().unwrap();
    assert!(metrics.sessions[0].warning_observed);
    assert_eq!(metrics.sessions[0].usage, 80.0);
    assert_eq!(metrics.operations[&OperationKind::Discussion].units, 1900.0);
}

#[test]
fn session_history_is_capped() {
    let mut harness = TestHarness::builder()
        .with_max_sessions(3)
        .build()
        .unwrap();

    let mut ids = Vec::new();
    for _ in 0..5 {
        harness.register("search", None, None).unwrap();
        ids.push(harness.ledger.session_id().to_string());
        harness.end_session().unwrap();
        harness.start_new_session();
    }

    let metrics = harness.store.load().unwrap().unwrap();
    let kept: Vec<_> = metrics.sessions.iter().map(|s| s.session_id.clone()).collect();
    assert_eq!(kept, ids[2..].to_vec());
    assert_eq!(metrics.operations[&OperationKind::Search].count, 5);
    assert_eq!(metrics.thresholds.len(), 5);
}

#[test]
fn custom_thresholds_change_classification() {
    let mut harness = TestHarness::builder()
        .with_thresholds(30.0, 50.0)
        .build()
        .unwrap();

    let reg = harness.register("code", Some("medium"), Some("medium")).unwrap();
    assert!(reg.crossing.is_none());
    // 15 + 15 = 30
    let reg = harness.register("code", Some("medium"), Some("medium")).unwrap();
    assert_eq!(reg.crossing.map(|c| c.level), Some(CrossingLevel::Warning));

    let outcome = harness.end_session().unwrap();
    assert_eq!(outcome.avg_warning, Some(30.0));
    assert_eq!(outcome.avg_hard_stop, Some(50.0));
    assert!(harness.metrics_path().exists());
}

#[test]
fn end_of_session_adaptation_is_persisted() {
    let mut harness = TestHarness::new().unwrap();
    harness.register("search", None, None).unwrap();

    let events = harness
        .ledger
        .tracker_mut()
        .adapt(Some(80.5), Some(86.5))
        .unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(harness.ledger.thresholds(), ThresholdPair::new(74.3, 87.5));

    let outcome = harness.end_session().unwrap();
    assert_eq!(outcome.avg_warning, Some(74.3));
    assert_eq!(outcome.avg_hard_stop, Some(87.5));
    let metrics = harness.store.load().unwrap().unwrap();
    assert!(metrics.sessions[0].warning_observed);
    assert!(metrics.sessions[0].hard_stop_observed);
}

// ---- Custom configuration ----

#[test]
fn custom_cost_table_drives_registration() {
    let mut costs = CostTableConfig::default();
    costs.search.base = 10.0;
    costs.search.per_unit = 1.0;
    let mut harness = TestHarness::builder()
        .with_costs(costs)
        .verbose()
        .build()
        .unwrap();
    assert!(!harness.config.gauge.silent);

    let quote = harness
        .ledger
        .cost_model()
        .quote(OperationKind::Search, &OperationParams::search(5))
        .unwrap();
    assert_eq!(quote.cost, 15.0);
    assert_eq!(quote.units, Some(5.0));

    let started = harness.ledger.last_check();
    for _ in 0..3 {
        let reg = harness.register("search", Some("5"), None).unwrap();
        assert_eq!(reg.cost, 15.0);
        assert!(reg.crossing.is_none());
    }
    assert!(harness.ledger.last_check() >= started);

    // 45 + 15 = 60
    let reg = harness.register("search", Some("5"), None).unwrap();
    let crossing = reg.crossing.expect("60 reaches the warning threshold");
    assert_eq!(crossing.level, CrossingLevel::Warning);
    assert_eq!(harness.ledger.operations()[&OperationKind::Search].units, 20.0);
}
