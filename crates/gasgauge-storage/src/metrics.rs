// SPDX-FileCopyrightText: 2026 Gasgauge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON metrics store with bounded rolling windows.
//!
//! Every save is a read-modify-write of the whole document, serialized within
//! the process by a mutex and written atomically (temp file in the target
//! directory, then renamed over the target).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gasgauge_config::model::MetricsConfig;
use gasgauge_core::{GaugeError, SessionRecord, ThresholdPair, round1};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::MetricsFile;

/// What a successful save left on disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub sessions_retained: usize,
    pub avg_warning: Option<f64>,
    pub avg_hard_stop: Option<f64>,
}

/// File-backed store for session history and learned thresholds.
#[derive(Debug)]
pub struct MetricsStore {
    path: PathBuf,
    max_sessions: usize,
    max_threshold_history: usize,
    write_lock: Mutex<()>,
}

impl MetricsStore {
    pub fn new(config: &MetricsConfig) -> Self {
        Self {
            path: PathBuf::from(&config.file),
            max_sessions: config.max_sessions,
            max_threshold_history: config.max_threshold_history,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the metrics document.
    ///
    /// A missing file is `Ok(None)`. An unreadable or malformed file is a
    /// `PersistenceRead` error.
    pub fn load(&self) -> Result<Option<MetricsFile>, GaugeError> {
        let Some(content) = self.read_raw()? else {
            return Ok(None);
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| self.read_error(e))
    }

    /// Append a finished session and rewrite the file.
    ///
    /// A corrupt existing file is logged and replaced by a fresh document.
    /// A file that cannot be read at all is a `PersistenceRead` error and is
    /// left untouched.
    pub fn save(&self, record: &SessionRecord) -> Result<SaveOutcome, GaugeError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| GaugeError::Internal("metrics write lock poisoned".into()))?;

        let mut metrics: MetricsFile = match self.read_raw()? {
            None => MetricsFile::default(),
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "replacing corrupt metrics file");
                MetricsFile::default()
            }),
        };
        metrics.append(record, self.max_sessions, self.max_threshold_history);
        self.write(&metrics)?;

        info!(
            path = %self.path.display(),
            session_id = %record.session_id,
            sessions = metrics.sessions.len(),
            "session metrics saved"
        );
        Ok(SaveOutcome {
            path: self.path.clone(),
            sessions_retained: metrics.sessions.len(),
            avg_warning: metrics.avg_warning,
            avg_hard_stop: metrics.avg_hard_stop,
        })
    }

    /// Thresholds learned from previous sessions, if any are usable.
    ///
    /// The rolling averages are rounded to one decimal. Nothing is returned
    /// when the file is missing or unreadable, or when the averages are out
    /// of range or not ordered.
    pub fn recommended_thresholds(&self) -> Option<ThresholdPair> {
        let metrics = match self.load() {
            Ok(metrics) => metrics?,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable metrics file");
                return None;
            }
        };
        let pair = ThresholdPair::new(round1(metrics.avg_warning?), round1(metrics.avg_hard_stop?));
        let in_range = |v: f64| v > 0.0 && v < 100.0;
        if pair.is_ordered() && in_range(pair.warning) && in_range(pair.hard_stop) {
            debug!(warning = pair.warning, hard_stop = pair.hard_stop, "learned thresholds loaded");
            Some(pair)
        } else {
            warn!(
                warning = pair.warning,
                hard_stop = pair.hard_stop,
                "learned thresholds unusable, keeping configured ones"
            );
            None
        }
    }

    /// File contents, or `None` when there is no file at the path.
    fn read_raw(&self) -> Result<Option<String>, GaugeError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(None),
            Err(e) => Err(self.read_error(e)),
        }
    }

    fn write(&self, metrics: &MetricsFile) -> Result<(), GaugeError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e))?;

        let json = serde_json::to_string_pretty(metrics).map_err(|e| self.write_error(e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.write_error(e.error))?;
        Ok(())
    }

    fn read_error(&self, source: impl std::error::Error + Send + Sync + 'static) -> GaugeError {
        GaugeError::PersistenceRead {
            path: self.path.display().to_string(),
            source: Box::new(source),
        }
    }

    fn write_error(&self, source: impl std::error::Error + Send + Sync + 'static) -> GaugeError {
        GaugeError::PersistenceWrite {
            path: self.path.display().to_string(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn store_in(dir: &Path) -> MetricsStore {
        MetricsStore::new(&MetricsConfig {
            file: dir.join("metrics.json").display().to_string(),
            ..MetricsConfig::default()
        })
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(dir.path()).load().unwrap().is_none());
        assert!(store_in(dir.path()).recommended_thresholds().is_none());
    }

    #[test]
    fn malformed_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, GaugeError::PersistenceRead { .. }));
    }

    #[test]
    #[traced_test]
    fn corrupt_file_is_ignored_when_reading_thresholds() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::write(store.path(), "\u{0}garbage").unwrap();
        assert!(store.recommended_thresholds().is_none());
        assert!(logs_contain("ignoring unreadable metrics file"));
    }

    #[test]
    fn inverted_averages_are_not_recommended() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let metrics = MetricsFile {
            avg_warning: Some(92.0),
            avg_hard_stop: Some(88.0),
            ..MetricsFile::default()
        };
        fs::write(store.path(), serde_json::to_string(&metrics).unwrap()).unwrap();
        assert!(store.recommended_thresholds().is_none());
    }
}
