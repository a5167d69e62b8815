// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the gasgauge capacity tracker.

use thiserror::Error;

/// The primary error type used across all gasgauge crates.
#[derive(Debug, Error)]
pub enum GaugeError {
    /// An operation kind name that does not map to any known kind.
    #[error("invalid operation kind `{given}` (valid kinds: {valid})")]
    InvalidOperationKind { given: String, valid: String },

    /// Parameters that do not fit the operation kind they were passed with.
    #[error("invalid parameters for {kind}: {message}")]
    InvalidParameterShape { kind: String, message: String },

    /// A checkpoint name that is not defined.
    #[error("unknown checkpoint `{name}` (valid checkpoints: {valid})")]
    UnknownCheckpoint { name: String, valid: String },

    /// The metrics file exists but could not be read or parsed.
    #[error("failed to read metrics from {path}: {source}")]
    PersistenceRead {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The metrics file could not be written.
    #[error("failed to write metrics to {path}: {source}")]
    PersistenceWrite {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, out-of-range thresholds).
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GaugeError {
    /// Whether the error was caused by the caller's input rather than the environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            GaugeError::InvalidOperationKind { .. }
                | GaugeError::InvalidParameterShape { .. }
                | GaugeError::UnknownCheckpoint { .. }
        )
    }
}
