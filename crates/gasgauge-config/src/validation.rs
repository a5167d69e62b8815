// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints serde cannot express: threshold ranges and ordering,
//! non-empty paths, positive window sizes and a non-negative cost table.

use crate::diagnostic::ConfigError;
use crate::model::GaugeConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &GaugeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let level = config.gauge.log_level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "gauge.log_level `{}` must be one of: {}",
            config.gauge.log_level,
            LOG_LEVELS.join(", ")
        )));
    }

    let thresholds = &config.thresholds;
    for (key, value) in [
        ("thresholds.warning", thresholds.warning),
        ("thresholds.hard_stop", thresholds.hard_stop),
    ] {
        if !(value > 0.0 && value < 100.0) {
            errors.push(ConfigError::validation(format!(
                "{key} must be strictly between 0 and 100, got {value}"
            )));
        }
    }
    if thresholds.warning >= thresholds.hard_stop {
        errors.push(ConfigError::validation(format!(
            "thresholds.warning ({}) must be below thresholds.hard_stop ({})",
            thresholds.warning, thresholds.hard_stop
        )));
    }

    if config.metrics.file.trim().is_empty() {
        errors.push(ConfigError::validation("metrics.file must not be empty"));
    }
    if config.metrics.max_sessions == 0 {
        errors.push(ConfigError::validation(
            "metrics.max_sessions must be at least 1",
        ));
    }
    if config.metrics.max_threshold_history == 0 {
        errors.push(ConfigError::validation(
            "metrics.max_threshold_history must be at least 1",
        ));
    }

    for (key, value) in config.costs.entries() {
        if !value.is_finite() || value < 0.0 {
            errors.push(ConfigError::validation(format!(
                "{key} must be a finite, non-negative number, got {value}"
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = GaugeConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn inverted_thresholds_fail_validation() {
        let mut config = GaugeConfig::default();
        config.thresholds.warning = 92.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "must be below thresholds.hard_stop"));
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = GaugeConfig::default();
        config.thresholds.hard_stop = 100.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "thresholds.hard_stop must be strictly between"));
    }

    #[test]
    fn zero_window_sizes_fail_validation() {
        let mut config = GaugeConfig::default();
        config.metrics.max_sessions = 0;
        config.metrics.max_threshold_history = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn negative_cost_fails_validation() {
        let mut config = GaugeConfig::default();
        config.costs.discussion.per_unit = -0.01;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "costs.discussion.per_unit"));
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = GaugeConfig::default();
        config.gauge.log_level = "loud".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "gauge.log_level"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = GaugeConfig::default();
        config.metrics.file = "  ".to_string();
        config.thresholds.warning = -1.0;
        config.costs.search.base = f64::NAN;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "got {} errors", errors.len());
    }
}
