// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the gasgauge capacity tracker.
//!
//! This crate provides the error type and the domain types shared by the
//! cost engine, the metrics store and the command-line front end.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::GaugeError;
pub use types::{
    Complexity, Magnitude, ObservationKind, ObservedEvent, OperationKind, OperationParams,
    OperationTotals, SessionRecord, SizeClass, Status, ThresholdPair, round1,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_error_has_all_variants() {
        let _kind = GaugeError::InvalidOperationKind {
            given: "dance".into(),
            valid: "search".into(),
        };
        let _shape = GaugeError::InvalidParameterShape {
            kind: "search".into(),
            message: "negative".into(),
        };
        let _checkpoint = GaugeError::UnknownCheckpoint {
            name: "lunch".into(),
            valid: "wrap_up".into(),
        };
        let _read = GaugeError::PersistenceRead {
            path: "/tmp/m.json".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _write = GaugeError::PersistenceWrite {
            path: "/tmp/m.json".into(),
            source: Box::new(std::io::Error::other("test")),
        };
        let _config = GaugeError::Config("test".into());
        let _internal = GaugeError::Internal("test".into());
    }

    #[test]
    fn caller_errors_are_distinguished_from_persistence_errors() {
        let kind = GaugeError::InvalidOperationKind {
            given: "dance".into(),
            valid: String::new(),
        };
        let write = GaugeError::PersistenceWrite {
            path: "/tmp/m.json".into(),
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(kind.is_caller_error());
        assert!(!write.is_caller_error());
    }

    #[test]
    fn invalid_kind_message_lists_valid_kinds() {
        let err = OperationKind::parse("dance").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("dance"), "got: {msg}");
        assert!(msg.contains("code_generation"), "got: {msg}");
        assert!(msg.contains("planning"), "got: {msg}");
    }
}
