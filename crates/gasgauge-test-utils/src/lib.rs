// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for gasgauge integration tests.
//!
//! [`TestHarness`] wires a configuration, a usage ledger and a metrics store
//! living in a temporary directory, so tests can drive whole sessions without
//! touching the user's data directory.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
