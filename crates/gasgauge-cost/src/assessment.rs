// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-task "can I afford this?" decisions.
//!
//! A fixed decision table keyed on projected usage. Options are listed in
//! order of preference.

use gasgauge_core::{OperationKind, Status, ThresholdPair};
use serde::Serialize;
use strum::Display;

use crate::ledger::Estimate;
use crate::status::CAUTION_RATIO;

/// A course of action offered before starting a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    #[strum(to_string = "Hop Session")]
    HopSession,
    #[strum(to_string = "Break Into Chunks")]
    BreakIntoChunks,
    #[strum(to_string = "Proceed & Hop")]
    ProceedAndHop,
    #[strum(to_string = "Proceed With Caution")]
    ProceedWithCaution,
    #[strum(to_string = "Optimize First")]
    OptimizeFirst,
    #[strum(to_string = "Proceed As Planned")]
    ProceedAsPlanned,
}

/// How strongly an option is recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Standard,
    Alternative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionOption {
    pub decision: Decision,
    pub strength: Strength,
    pub description: String,
    pub impact: &'static str,
}

impl DecisionOption {
    fn new(
        decision: Decision,
        strength: Strength,
        description: impl Into<String>,
        impact: &'static str,
    ) -> Self {
        Self {
            decision,
            strength,
            description: description.into(),
            impact,
        }
    }
}

/// Full pre-task assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub task: String,
    pub kind: OperationKind,
    pub parameters: String,
    pub current_usage: f64,
    pub current_status: Status,
    pub estimate: Estimate,
    pub remaining_after: f64,
    pub options: Vec<DecisionOption>,
}

/// Options for a task projected to end at `post_usage`.
///
/// Hard-stop and warning rows fire at or above the threshold, the caution
/// row strictly above `0.8 × warning`.
pub fn decide(post_usage: f64, thresholds: &ThresholdPair, parameters: &str) -> Vec<DecisionOption> {
    let chunks = || {
        DecisionOption::new(
            Decision::BreakIntoChunks,
            Strength::Alternative,
            format!("Split the task ({parameters}) into smaller chunks"),
            "Allows partial progress, but increases overhead",
        )
    };

    if post_usage >= thresholds.hard_stop {
        vec![
            DecisionOption::new(
                Decision::HopSession,
                Strength::Strong,
                "Start a new session before attempting this task",
                "Preserves continuity, avoids data loss",
            ),
            chunks(),
        ]
    } else if post_usage >= thresholds.warning {
        vec![
            DecisionOption::new(
                Decision::ProceedAndHop,
                Strength::Strong,
                "Complete the task, then hop to a new session",
                "Maximizes the current session, but risks interruption",
            ),
            chunks(),
        ]
    } else if post_usage > thresholds.warning * CAUTION_RATIO {
        vec![
            DecisionOption::new(
                Decision::ProceedWithCaution,
                Strength::Standard,
                "Complete the task, but prepare for a hop afterwards",
                "Balanced approach with moderate risk",
            ),
            DecisionOption::new(
                Decision::OptimizeFirst,
                Strength::Alternative,
                "Reduce scope or complexity before proceeding",
                "Slower but safer",
            ),
        ]
    } else {
        vec![DecisionOption::new(
            Decision::ProceedAsPlanned,
            Strength::Standard,
            "Sufficient capacity for this task and more",
            "No special measures needed",
        )]
    }
}
