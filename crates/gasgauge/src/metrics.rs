// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `gasgauge metrics` command implementation.

use gasgauge_config::model::GaugeConfig;
use gasgauge_core::GaugeError;
use gasgauge_storage::{MetricsFile, MetricsStore};

/// Run `gasgauge metrics`: print the persisted history and averages.
pub fn run_metrics(config: &GaugeConfig, json: bool) -> Result<(), GaugeError> {
    let store = MetricsStore::new(&config.metrics);
    let metrics = store.load()?;

    if json {
        let body = serde_json::to_string_pretty(&metrics.unwrap_or_default())
            .map_err(|e| GaugeError::Internal(format!("failed to serialize metrics: {e}")))?;
        println!("{body}");
        return Ok(());
    }

    match metrics {
        Some(metrics) => println!("{}", metrics_report(&metrics)),
        None => println!("no metrics recorded yet ({})", store.path().display()),
    }
    Ok(())
}

pub fn metrics_report(metrics: &MetricsFile) -> String {
    let mut lines = vec![format!("Sessions ({} kept):", metrics.sessions.len())];
    for session in &metrics.sessions {
        let mut flags = Vec::new();
        if session.warning_observed {
            flags.push("warning seen");
        }
        if session.hard_stop_observed {
            flags.push("hard stop seen");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", flags.join(", "))
        };
        lines.push(format!(
            "  {} {}  {:>5.1}%  {:>6.1} min  thresholds {:.1}/{:.1}{flags}",
            session.date,
            session.session_id,
            session.usage,
            session.duration_mins,
            session.thresholds.warning,
            session.thresholds.hard_stop
        ));
    }

    if let (Some(warning), Some(hard_stop)) = (metrics.avg_warning, metrics.avg_hard_stop) {
        lines.push(format!(
            "Average thresholds over {} snapshots: warning {warning:.1}%, hard stop {hard_stop:.1}%",
            metrics.thresholds.len()
        ));
    }

    if !metrics.operations.is_empty() {
        lines.push("Operations (all sessions):".to_string());
        for (kind, totals) in &metrics.operations {
            lines.push(format!(
                "  {:<18} {:>5} ops  {:>8.1}%",
                kind.label(),
                totals.count,
                totals.total_cost
            ));
        }
    }
    lines.join("\n")
}
