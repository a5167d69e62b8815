// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./gasgauge.toml` > `~/.config/gasgauge/gasgauge.toml` >
//! `/etc/gasgauge/gasgauge.toml`, with environment variable overrides via `GASGAUGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::GaugeConfig;

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/gasgauge/gasgauge.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "gasgauge.toml";

/// Path of the per-user config file, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gasgauge").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/gasgauge/gasgauge.toml` (system-wide)
/// 3. `~/.config/gasgauge/gasgauge.toml` (user XDG config)
/// 4. `./gasgauge.toml` (local directory)
/// 5. `GASGAUGE_*` environment variables
pub fn load_config() -> Result<GaugeConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<GaugeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GaugeConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<GaugeConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(GaugeConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the XDG hierarchy load.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(GaugeConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `GASGAUGE_THRESHOLDS_HARD_STOP` must map to
/// `thresholds.hard_stop`, not `thresholds.hard.stop`.
fn env_provider() -> Env {
    Env::prefixed("GASGAUGE_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 3] = ["gauge", "thresholds", "metrics"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
