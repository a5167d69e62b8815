// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the gasgauge capacity tracker.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use gasgauge_core::ThresholdPair;
use serde::{Deserialize, Serialize};

/// Top-level gasgauge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the canonical values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeConfig {
    /// Output and logging behavior.
    #[serde(default)]
    pub gauge: GaugeSection,

    /// Starting warning / hard-stop thresholds for a new session.
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Metrics file location and rolling-window sizes.
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Cost table used to price operations.
    #[serde(default)]
    pub costs: CostTableConfig,
}

/// General gauge behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GaugeSection {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Keep threshold crossings out of the warn-level log; they are still returned.
    #[serde(default = "default_silent")]
    pub silent: bool,
}

impl Default for GaugeSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            silent: default_silent(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_silent() -> bool {
    true
}

/// Initial thresholds, in usage percentage points.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Usage at which the platform's "long conversation" warning is expected.
    #[serde(default = "default_warning")]
    pub warning: f64,

    /// Usage at which the session is expected to be cut off.
    #[serde(default = "default_hard_stop")]
    pub hard_stop: f64,
}

impl ThresholdConfig {
    pub fn pair(&self) -> ThresholdPair {
        ThresholdPair::new(self.warning, self.hard_stop)
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            warning: default_warning(),
            hard_stop: default_hard_stop(),
        }
    }
}

fn default_warning() -> f64 {
    ThresholdPair::DEFAULT_WARNING
}

fn default_hard_stop() -> f64 {
    ThresholdPair::DEFAULT_HARD_STOP
}

/// Persisted metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Path to the JSON metrics file.
    #[serde(default = "default_metrics_file")]
    pub file: String,

    /// Number of most recent session records kept.
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Number of most recent threshold snapshots kept for the rolling averages.
    #[serde(default = "default_max_threshold_history")]
    pub max_threshold_history: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            file: default_metrics_file(),
            max_sessions: default_max_sessions(),
            max_threshold_history: default_max_threshold_history(),
        }
    }
}

fn default_metrics_file() -> String {
    dirs::data_dir()
        .map(|p| p.join("gasgauge").join("capacity_metrics.json"))
        .unwrap_or_else(|| std::path::PathBuf::from("capacity_metrics.json"))
        .to_string_lossy()
        .to_string()
}

fn default_max_sessions() -> usize {
    10
}

fn default_max_threshold_history() -> usize {
    20
}

/// Multipliers keyed by complexity.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexityFactors {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

/// Values keyed by size category: multipliers for scaled costs, unit counts for linear ones.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SizeTable {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

/// `base + per_unit × units`, where a categorical size maps to `units` through `size_units`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LinearCostConfig {
    pub base: f64,
    pub per_unit: f64,
    pub size_units: SizeTable,
}

/// `base × complexity factor × size factor`; a missing size table means a factor of 1.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScaledCostConfig {
    pub base: f64,
    pub complexity: ComplexityFactors,
    #[serde(default)]
    pub size: Option<SizeTable>,
}

/// The cost table, one entry per operation kind.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CostTableConfig {
    #[serde(default = "default_context_load")]
    pub context_load: LinearCostConfig,

    #[serde(default = "default_code_generation")]
    pub code_generation: ScaledCostConfig,

    #[serde(default = "default_artifact_creation")]
    pub artifact_creation: ScaledCostConfig,

    #[serde(default = "default_discussion")]
    pub discussion: LinearCostConfig,

    #[serde(default = "default_search")]
    pub search: LinearCostConfig,

    #[serde(default = "default_planning")]
    pub planning: ScaledCostConfig,
}

impl Default for CostTableConfig {
    fn default() -> Self {
        Self {
            context_load: default_context_load(),
            code_generation: default_code_generation(),
            artifact_creation: default_artifact_creation(),
            discussion: default_discussion(),
            search: default_search(),
            planning: default_planning(),
        }
    }
}

fn default_context_load() -> LinearCostConfig {
    LinearCostConfig {
        base: 2.0,
        per_unit: 0.05,
        size_units: SizeTable {
            small: 10.0,
            medium: 50.0,
            large: 200.0,
        },
    }
}

fn default_code_generation() -> ScaledCostConfig {
    ScaledCostConfig {
        base: 3.0,
        complexity: ComplexityFactors {
            low: 1.0,
            medium: 2.0,
            high: 4.0,
        },
        size: Some(SizeTable {
            small: 1.0,
            medium: 2.5,
            large: 5.0,
        }),
    }
}

fn default_artifact_creation() -> ScaledCostConfig {
    ScaledCostConfig {
        base: 5.0,
        complexity: ComplexityFactors {
            low: 1.0,
            medium: 2.0,
            high: 3.5,
        },
        size: Some(SizeTable {
            small: 1.0,
            medium: 2.0,
            large: 4.0,
        }),
    }
}

fn default_discussion() -> LinearCostConfig {
    LinearCostConfig {
        base: 1.0,
        per_unit: 0.01,
        size_units: SizeTable {
            small: 50.0,
            medium: 200.0,
            large: 500.0,
        },
    }
}

fn default_search() -> LinearCostConfig {
    LinearCostConfig {
        base: 4.0,
        per_unit: 0.5,
        size_units: SizeTable {
            small: 3.0,
            medium: 5.0,
            large: 10.0,
        },
    }
}

fn default_planning() -> ScaledCostConfig {
    ScaledCostConfig {
        base: 2.0,
        complexity: ComplexityFactors {
            low: 1.0,
            medium: 2.0,
            high: 3.0,
        },
        size: None,
    }
}

impl CostTableConfig {
    /// Every number in the table with a dotted key, for validation.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let mut out = Vec::new();
        let linear = [
            ("context_load", &self.context_load),
            ("discussion", &self.discussion),
            ("search", &self.search),
        ];
        for (name, cost) in linear {
            out.push((format!("costs.{name}.base"), cost.base));
            out.push((format!("costs.{name}.per_unit"), cost.per_unit));
            push_sizes(&mut out, &format!("costs.{name}.size_units"), &cost.size_units);
        }
        let scaled = [
            ("code_generation", &self.code_generation),
            ("artifact_creation", &self.artifact_creation),
            ("planning", &self.planning),
        ];
        for (name, cost) in scaled {
            out.push((format!("costs.{name}.base"), cost.base));
            out.push((format!("costs.{name}.complexity.low"), cost.complexity.low));
            out.push((format!("costs.{name}.complexity.medium"), cost.complexity.medium));
            out.push((format!("costs.{name}.complexity.high"), cost.complexity.high));
            if let Some(size) = &cost.size {
                push_sizes(&mut out, &format!("costs.{name}.size"), size);
            }
        }
        out
    }
}

fn push_sizes(out: &mut Vec<(String, f64)>, prefix: &str, table: &SizeTable) {
    out.push((format!("{prefix}.small"), table.small));
    out.push((format!("{prefix}.medium"), table.medium));
    out.push((format!("{prefix}.large"), table.large));
}
