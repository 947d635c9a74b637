//! Usage history persistence.
//!
//! Each successful selection bumps a per-entry counter and timestamp. The whole
//! history is stored as one JSON document which is rewritten through a temporary
//! file in the same directory and renamed over the canonical path, so readers
//! never see a partially written document.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

const FILE_MODE: u32 = 0o600;
const DIRECTORY_MODE: u32 = 0o700;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct UsageRecord {
    pub count: u64,
    /// Seconds since the epoch of the most recent selection
    pub last: f64,
}

/// Usage records keyed by entry id.
pub type UsageHistory = IndexMap<String, UsageRecord>;

/// Current time in fractional seconds since the epoch.
pub fn current_time_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct UsageStore {
    path: PathBuf,
}

impl UsageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the usage history.
    ///
    /// A missing or unreadable document yields an empty history: losing the
    /// ranking is preferable to refusing to show the vault.
    pub fn load(&self) -> UsageHistory {
        let reader = match File::open(&self.path) {
            Ok(reader) => reader,
            Err(e) => {
                debug!("No usage history at `{}`: {e}", self.path.display());
                return UsageHistory::new();
            }
        };

        match serde_json::from_reader(reader) {
            Ok(history) => history,
            Err(e) => {
                warn!(
                    "Ignoring corrupt usage history at `{}`: {e}",
                    self.path.display()
                );
                UsageHistory::new()
            }
        }
    }

    /// Atomically replaces the stored document with `history`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, the temporary file or the final rename fails.
    pub fn save(&self, history: &UsageHistory) -> Result<()> {
        let directory = self.directory();
        let directory_description = directory.display().to_string();

        create_directory(&directory).map_err(|e| {
            Error::io_error("usage directory".to_string(), directory_description, e)
        })?;

        let temp_file = NamedTempFile::new_in(&directory)
            .map_err(|e| self.io_error("temporary usage", e))?;

        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer(&mut writer, history).map_err(|e| {
                Error::json_error(
                    "writing".to_string(),
                    "usage history".to_string(),
                    self.path.display().to_string(),
                    e,
                )
            })?;
            writer
                .into_inner()
                .map_err(|e| self.io_error("temporary usage", e.into_error()))?;
        }

        set_mode(temp_file.path(), FILE_MODE).map_err(|e| self.io_error("temporary usage", e))?;

        temp_file
            .persist(&self.path)
            .map_err(|e| self.io_error("usage history", e.error))?;

        debug!("Saved {} usage records to `{}`", history.len(), self.path.display());
        Ok(())
    }

    /// Records one use of `id` at the current time and persists the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be saved. The in-memory history is
    /// updated either way.
    pub fn record(&self, history: &mut UsageHistory, id: &str) -> Result<()> {
        self.record_at(history, id, current_time_secs())
    }

    /// Records one use of `id` at `now` and persists the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be saved.
    pub fn record_at(&self, history: &mut UsageHistory, id: &str, now: f64) -> Result<()> {
        let record = history.entry(id.to_string()).or_default();
        record.count += 1;
        record.last = record.last.max(now);

        self.save(history)
    }

    fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn io_error(&self, file_description: &str, original: std::io::Error) -> Error {
        Error::io_error(
            file_description.to_string(),
            self.path.display().to_string(),
            original,
        )
    }
}

/// Creates `path` and its missing parents as private directories. Existing
/// directories keep their permissions.
fn create_directory(path: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIRECTORY_MODE);
    }

    builder.create(path)
}

fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
        Ok(())
    }
}
