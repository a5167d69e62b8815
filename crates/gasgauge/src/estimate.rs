// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `gasgauge estimate` and `gasgauge assess` command implementations.
//!
//! One-shot dry runs against a fresh session that starts from the learned
//! thresholds. Nothing is registered or saved.

use gasgauge_config::model::GaugeConfig;
use gasgauge_core::{GaugeError, OperationKind, OperationParams};
use gasgauge_cost::UsageLedger;
use gasgauge_storage::MetricsStore;
use serde::Serialize;

use crate::status;

/// Build a ledger the way a new shell session would.
fn ledger_for(config: &GaugeConfig) -> UsageLedger {
    let ledger = UsageLedger::new(config);
    match MetricsStore::new(&config.metrics).recommended_thresholds() {
        Some(learned) => ledger.with_thresholds(learned),
        None => ledger,
    }
}

fn resolve(
    kind: &str,
    complexity: Option<&str>,
    size: Option<&str>,
) -> Result<(OperationKind, OperationParams), GaugeError> {
    let kind = OperationKind::parse(kind)?;
    let params = OperationParams::from_args(kind, complexity, size)?;
    Ok((kind, params))
}

fn print_json(value: &impl Serialize) -> Result<(), GaugeError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| GaugeError::Internal(format!("failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Run `gasgauge estimate`.
pub fn run_estimate(
    config: &GaugeConfig,
    kind: &str,
    complexity: Option<&str>,
    size: Option<&str>,
    json: bool,
    use_color: bool,
) -> Result<(), GaugeError> {
    let (kind, params) = resolve(kind, complexity, size)?;
    let estimate = ledger_for(config).estimate(kind, &params)?;
    if json {
        print_json(&estimate)
    } else {
        println!("{}", status::estimate_report(&estimate, use_color));
        Ok(())
    }
}

/// Run `gasgauge assess`.
pub fn run_assess(
    config: &GaugeConfig,
    task: &str,
    kind: &str,
    complexity: Option<&str>,
    size: Option<&str>,
    json: bool,
    use_color: bool,
) -> Result<(), GaugeError> {
    let (kind, params) = resolve(kind, complexity, size)?;
    let ledger = ledger_for(config);
    let assessment = ledger.pre_task_assessment(task, kind, &params)?;
    if json {
        print_json(&assessment)
    } else {
        println!(
            "{}",
            status::assessment_report(&assessment, &ledger.thresholds(), use_color)
        );
        Ok(())
    }
}
