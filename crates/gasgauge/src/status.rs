// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text reports: the ASCII gauge, status, estimates and assessments.
//!
//! Every renderer returns a `String` so the shell, the one-shot subcommands
//! and the tests share the same output. Colors are applied only when
//! `use_color` is set.

use colored::Colorize;
use gasgauge_core::{Status, ThresholdPair};
use gasgauge_cost::{
    Assessment, CheckpointResult, Estimate, HopSummary, HopUrgency, StatusSnapshot,
    ThresholdCrossing,
};

/// Number of cells in the ASCII gauge.
pub const GAUGE_WIDTH: usize = 20;

/// `[=====     W      H ] 27.5% - NORMAL`
pub fn render_gauge(usage: f64, thresholds: &ThresholdPair, status: Status) -> String {
    let cell = |value: f64| (value / 100.0 * GAUGE_WIDTH as f64).floor().max(0.0) as usize;
    let filled = cell(usage);
    let warning_at = cell(thresholds.warning);
    let hard_stop_at = cell(thresholds.hard_stop);

    let cells: String = (0..GAUGE_WIDTH)
        .map(|i| {
            if i < filled {
                '='
            } else if i == warning_at {
                'W'
            } else if i == hard_stop_at {
                'H'
            } else {
                ' '
            }
        })
        .collect();
    format!("[{cells}] {usage:.1}% - {status}")
}

fn paint(text: &str, status: Status, use_color: bool) -> String {
    if !use_color {
        return text.to_string();
    }
    match status {
        Status::Normal => text.green().to_string(),
        Status::Caution => text.yellow().to_string(),
        Status::Warning => text.bright_red().to_string(),
        Status::Critical => text.red().bold().to_string(),
    }
}

pub fn status_report(snapshot: &StatusSnapshot, use_color: bool) -> String {
    let gauge = render_gauge(snapshot.usage, &snapshot.thresholds, snapshot.status);
    let mut lines = vec![
        paint(&gauge, snapshot.status, use_color),
        format!(
            "  usage {:.1}%, remaining {:.1}%, {} operations in {:.0} min",
            snapshot.usage, snapshot.remaining, snapshot.operation_count, snapshot.elapsed_minutes
        ),
        format!(
            "  thresholds: warning {:.1}%, hard stop {:.1}%",
            snapshot.thresholds.warning, snapshot.thresholds.hard_stop
        ),
    ];
    lines.extend(snapshot.guidance.iter().map(|g| format!("  - {g}")));
    lines.join("\n")
}

pub fn estimate_report(estimate: &Estimate, use_color: bool) -> String {
    let headline = format!(
        "{}: cost {:.1}%, {:.1}% -> {:.1}% ({})",
        estimate.kind.label(),
        estimate.cost,
        estimate.current_usage,
        estimate.post_usage,
        estimate.status
    );
    format!(
        "{}\n  remaining after: {:.1}%\n  recommendation: {}",
        paint(&headline, estimate.status, use_color),
        estimate.remaining,
        estimate.recommendation
    )
}

pub fn assessment_report(
    assessment: &Assessment,
    thresholds: &ThresholdPair,
    use_color: bool,
) -> String {
    let estimate = &assessment.estimate;
    let mut lines = vec![
        format!(
            "Task: {} ({}, {})",
            assessment.task,
            assessment.kind.label(),
            assessment.parameters
        ),
        format!(
            "  now:   {}",
            render_gauge(assessment.current_usage, thresholds, assessment.current_status)
        ),
        format!(
            "  after: {}",
            paint(
                &render_gauge(estimate.post_usage, thresholds, estimate.status),
                estimate.status,
                use_color
            )
        ),
        format!(
            "  cost {:.1}%, remaining after {:.1}%",
            estimate.cost, assessment.remaining_after
        ),
        "Options:".to_string(),
    ];
    for (i, option) in assessment.options.iter().enumerate() {
        lines.push(format!(
            "  {}. {} [{}]: {}",
            i + 1,
            option.decision,
            option.strength,
            option.description
        ));
        lines.push(format!("     {}", option.impact));
    }
    lines.join("\n")
}

pub fn crossing_report(crossing: &ThresholdCrossing, use_color: bool) -> String {
    paint(&format!("! {crossing}"), crossing.status, use_color)
}

pub fn checkpoint_report(result: &CheckpointResult, use_color: bool) -> String {
    let (mark, status) = if result.passed {
        ("[OK]", Status::Normal)
    } else {
        ("[FAIL]", Status::Critical)
    };
    format!(
        "{} {}: remaining {:.1}%, required {:.1}%, margin {:+.1}%",
        paint(mark, status, use_color),
        result.checkpoint,
        result.remaining,
        result.required,
        result.margin
    )
}

pub fn hop_report(hop: &HopSummary, use_color: bool) -> String {
    let urgency_status = match hop.urgency {
        HopUrgency::Immediately => Status::Critical,
        HopUrgency::Recommended => Status::Warning,
        HopUrgency::Optional => Status::Normal,
    };
    let mut lines = vec![
        format!("Hop preparation for {}", hop.session_id),
        format!(
            "  usage {:.1}% ({}), {:.1} min",
            hop.usage, hop.status, hop.duration_mins
        ),
        format!(
            "  urgency: {}",
            paint(&hop.urgency.to_string(), urgency_status, use_color)
        ),
    ];
    for (kind, totals) in &hop.operations {
        lines.push(format!(
            "  {:<18} {:>3} ops  {:>6.1}%",
            kind.label(),
            totals.count,
            totals.total_cost
        ));
    }
    lines.join("\n")
}
