// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the cost engine, the metrics store and the CLI.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::GaugeError;

/// The kinds of interaction the gauge knows how to price.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Loading project files or documents into the conversation.
    #[strum(to_string = "context_load", serialize = "context")]
    #[serde(alias = "context", alias = "context_loading")]
    ContextLoad,
    /// Writing code.
    #[strum(to_string = "code_generation", serialize = "code")]
    #[serde(alias = "code")]
    CodeGeneration,
    /// A plain discussion exchange.
    #[strum(to_string = "discussion", serialize = "discuss")]
    #[serde(alias = "discuss", alias = "discussion_exchange")]
    Discussion,
    /// A search returning some number of results.
    #[strum(to_string = "search", serialize = "search_operation")]
    #[serde(alias = "search_operation")]
    Search,
    /// Producing a standalone artifact (document, diagram, component).
    #[strum(to_string = "artifact_creation", serialize = "artifact")]
    #[serde(alias = "artifact")]
    ArtifactCreation,
    /// Planning work.
    #[strum(to_string = "planning", serialize = "plan")]
    #[serde(alias = "plan")]
    Planning,
}

impl OperationKind {
    /// Parse a kind name, accepting canonical names and short aliases.
    ///
    /// Unknown names fail with `InvalidOperationKind` listing the valid set.
    pub fn parse(name: &str) -> Result<Self, GaugeError> {
        OperationKind::from_str(name.trim()).map_err(|_| GaugeError::InvalidOperationKind {
            given: name.to_string(),
            valid: Self::valid_names(),
        })
    }

    /// Comma-separated canonical names of every kind.
    pub fn valid_names() -> String {
        OperationKind::iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::ContextLoad => "Context Loading",
            OperationKind::CodeGeneration => "Code Generation",
            OperationKind::Discussion => "Discussion",
            OperationKind::Search => "Search",
            OperationKind::ArtifactCreation => "Artifact Creation",
            OperationKind::Planning => "Planning",
        }
    }
}

/// Complexity of a generation or planning task.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    /// Parse a complexity, silently falling back to `Medium` for anything unrecognized.
    pub fn from_loose(value: &str) -> Self {
        Complexity::from_str(value.trim()).unwrap_or_default()
    }
}

/// Categorical size of a task.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeClass {
    /// Parse a size, silently falling back to `Medium` for anything unrecognized.
    pub fn from_loose(value: &str) -> Self {
        SizeClass::from_str(value.trim()).unwrap_or_default()
    }
}

/// Input to a linear cost term: either a size category or an exact quantity.
///
/// For context loads the quantity is kilobytes, for discussions words, for
/// searches the number of results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Magnitude {
    Exact(f64),
    Category(SizeClass),
}

impl Default for Magnitude {
    fn default() -> Self {
        Magnitude::Category(SizeClass::Medium)
    }
}

impl Magnitude {
    /// Numeric text becomes `Exact`; anything else a category (falling back to `Medium`).
    pub fn from_loose(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.parse::<f64>() {
            Ok(n) => Magnitude::Exact(n),
            Err(_) => Magnitude::Category(SizeClass::from_loose(trimmed)),
        }
    }

    fn is_numeric(value: &str) -> bool {
        value.trim().parse::<f64>().is_ok()
    }

    fn check(&self, kind: OperationKind, what: &str) -> Result<(), GaugeError> {
        if let Magnitude::Exact(n) = self {
            if !n.is_finite() || *n < 0.0 {
                return Err(GaugeError::InvalidParameterShape {
                    kind: kind.to_string(),
                    message: format!("{what} must be a finite, non-negative number, got {n}"),
                });
            }
        }
        Ok(())
    }
}

/// Per-kind parameters for an operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationParams {
    ContextLoad { size_kb: Magnitude },
    CodeGeneration { complexity: Complexity, size: SizeClass },
    ArtifactCreation { complexity: Complexity, size: SizeClass },
    Discussion { words: Magnitude },
    Search { results: Magnitude },
    Planning { complexity: Complexity },
}

impl OperationParams {
    pub fn context_load(size_kb: f64) -> Self {
        OperationParams::ContextLoad {
            size_kb: Magnitude::Exact(size_kb),
        }
    }

    pub fn code(complexity: Complexity, size: SizeClass) -> Self {
        OperationParams::CodeGeneration { complexity, size }
    }

    pub fn artifact(complexity: Complexity, size: SizeClass) -> Self {
        OperationParams::ArtifactCreation { complexity, size }
    }

    pub fn discussion(words: u32) -> Self {
        OperationParams::Discussion {
            words: Magnitude::Exact(f64::from(words)),
        }
    }

    pub fn search(results: u32) -> Self {
        OperationParams::Search {
            results: Magnitude::Exact(f64::from(results)),
        }
    }

    pub fn planning(complexity: Complexity) -> Self {
        OperationParams::Planning { complexity }
    }

    /// The operation kind these parameters belong to.
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationParams::ContextLoad { .. } => OperationKind::ContextLoad,
            OperationParams::CodeGeneration { .. } => OperationKind::CodeGeneration,
            OperationParams::ArtifactCreation { .. } => OperationKind::ArtifactCreation,
            OperationParams::Discussion { .. } => OperationKind::Discussion,
            OperationParams::Search { .. } => OperationKind::Search,
            OperationParams::Planning { .. } => OperationKind::Planning,
        }
    }

    /// Check that these parameters are usable for `kind`.
    ///
    /// Fails with `InvalidParameterShape` when the parameters belong to a
    /// different kind or carry a negative / non-finite quantity.
    pub fn validate_for(&self, kind: OperationKind) -> Result<(), GaugeError> {
        if self.kind() != kind {
            return Err(GaugeError::InvalidParameterShape {
                kind: kind.to_string(),
                message: format!("received parameters for {}", self.kind()),
            });
        }
        match self {
            OperationParams::ContextLoad { size_kb } => size_kb.check(kind, "size in KB"),
            OperationParams::Discussion { words } => words.check(kind, "word count"),
            OperationParams::Search { results } => results.check(kind, "result count"),
            _ => Ok(()),
        }
    }

    /// Build parameters from loose textual arguments, as typed into the command shell.
    ///
    /// Complexity and size fall back to `Medium` when missing or unrecognized.
    /// For searches a numeric result count is accepted in either slot.
    pub fn from_args(
        kind: OperationKind,
        complexity: Option<&str>,
        size: Option<&str>,
    ) -> Result<Self, GaugeError> {
        let complexity_value = complexity.map(Complexity::from_loose).unwrap_or_default();
        let size_class = size.map(SizeClass::from_loose).unwrap_or_default();
        let magnitude = size.map(Magnitude::from_loose).unwrap_or_default();

        let params = match kind {
            OperationKind::ContextLoad => OperationParams::ContextLoad { size_kb: magnitude },
            OperationKind::CodeGeneration => OperationParams::code(complexity_value, size_class),
            OperationKind::ArtifactCreation => {
                OperationParams::artifact(complexity_value, size_class)
            }
            OperationKind::Discussion => OperationParams::Discussion { words: magnitude },
            OperationKind::Search => {
                let results = match (complexity, size) {
                    (_, Some(s)) if Magnitude::is_numeric(s) => Magnitude::from_loose(s),
                    (Some(c), _) if Magnitude::is_numeric(c) => Magnitude::from_loose(c),
                    (_, Some(s)) => Magnitude::from_loose(s),
                    (Some(c), None) => Magnitude::Category(match Complexity::from_loose(c) {
                        Complexity::Low => SizeClass::Small,
                        Complexity::Medium => SizeClass::Medium,
                        Complexity::High => SizeClass::Large,
                    }),
                    (None, None) => Magnitude::default(),
                };
                OperationParams::Search { results }
            }
            OperationKind::Planning => OperationParams::planning(complexity_value),
        };
        params.validate_for(kind)?;
        Ok(params)
    }

    /// Short description of the parameters for reports.
    pub fn describe(&self) -> String {
        fn magnitude(m: &Magnitude, unit: &str) -> String {
            match m {
                Magnitude::Exact(n) => format!("{n}{unit}"),
                Magnitude::Category(c) => format!("{c} size"),
            }
        }
        match self {
            OperationParams::ContextLoad { size_kb } => magnitude(size_kb, "KB"),
            OperationParams::CodeGeneration { complexity, size }
            | OperationParams::ArtifactCreation { complexity, size } => {
                format!("{complexity} complexity, {size} size")
            }
            OperationParams::Discussion { words } => magnitude(words, " words"),
            OperationParams::Search { results } => magnitude(results, " results"),
            OperationParams::Planning { complexity } => format!("{complexity} complexity"),
        }
    }
}

/// Capacity status, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Normal,
    Caution,
    Warning,
    Critical,
}

impl Status {
    /// The one-line recommendation attached to an estimate.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Status::Critical => "start new session first",
            Status::Warning => "complete then hop",
            Status::Caution => "monitor capacity",
            Status::Normal => "proceed",
        }
    }

    /// Longer guidance shown alongside a status check.
    pub fn guidance(&self) -> &'static [&'static str] {
        match self {
            Status::Critical => &[
                "Emergency continuity generation required",
                "Hop immediately to avoid data loss",
                "Split any remaining work into a new session",
            ],
            Status::Warning => &[
                "Prepare to wrap up current work",
                "Generate continuity documentation",
                "Plan for session hop",
            ],
            Status::Caution => &[
                "Approaching warning threshold",
                "Complete current high-priority tasks",
                "Avoid starting new complex operations",
            ],
            Status::Normal => &[
                "Sufficient capacity for planned operations",
                "Continue with current work plan",
            ],
        }
    }
}

/// Warning and hard-stop thresholds, in usage percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub hard_stop: f64,
}

impl ThresholdPair {
    pub const DEFAULT_WARNING: f64 = 60.0;
    pub const DEFAULT_HARD_STOP: f64 = 90.0;

    pub fn new(warning: f64, hard_stop: f64) -> Self {
        Self { warning, hard_stop }
    }

    /// Whether `warning < hard_stop`. Adaptation does not enforce this.
    pub fn is_ordered(&self) -> bool {
        self.warning < self.hard_stop
    }
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WARNING, Self::DEFAULT_HARD_STOP)
    }
}

/// Running totals for one operation kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationTotals {
    /// Number of registered operations.
    pub count: u64,
    /// Sum of their costs in percentage points.
    pub total_cost: f64,
    /// Sum of linear-term inputs (KB, words or results); zero for scaled kinds.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub units: f64,
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl OperationTotals {
    /// Fold another set of totals into this one (counts and costs are summed).
    pub fn merge(&mut self, other: &OperationTotals) {
        self.count += other.count;
        self.total_cost += other.total_cost;
        self.units += other.units;
    }
}

/// Which real-world boundary the caller saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    #[strum(to_string = "warning observed")]
    WarningObserved,
    #[strum(to_string = "hard stop observed")]
    HardStopObserved,
}

/// A platform-side boundary observed by the caller, already folded into the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedEvent {
    pub kind: ObservationKind,
    pub usage_at_observation: f64,
    pub timestamp: DateTime<Utc>,
    /// Threshold value after the update.
    pub updated_threshold: f64,
}

/// Summary of one finished session, as persisted in the metrics file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Calendar date of the session end (`YYYY-MM-DD`).
    pub date: String,
    pub session_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_mins: f64,
    pub operations: BTreeMap<OperationKind, OperationTotals>,
    /// Final usage estimate, rounded to one decimal.
    pub usage: f64,
    pub thresholds: ThresholdPair,
    pub warning_observed: bool,
    pub warning_time: Option<DateTime<Utc>>,
    pub hard_stop_observed: bool,
    pub hard_stop_time: Option<DateTime<Utc>>,
}

/// Round to one decimal place.
///
/// Rounds the exact binary value, so `74.35` (stored as `74.3499...`) gives
/// `74.3`.
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
