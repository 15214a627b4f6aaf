//! Progress cursor and its persistence
//!
//! The cursor is a single JSON snapshot:
//!
//! ```text
//! {"day": 11, "updated_on": "2026-01-10", "started_from": 10}
//! ```

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::error::StoicError;

/// Persisted position in the prompt cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Next unseen day; may exceed 366 until it is wrapped on use
    pub day: u32,
    /// Calendar date of the last persisted advance
    #[serde(with = "ymd")]
    pub updated_on: NaiveDate,
    /// Cursor the prompts shown on `updated_on` were drawn from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_from: Option<u32>,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            day: 1,
            // Any past date works; it only has to differ from today
            updated_on: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            started_from: None,
        }
    }
}

mod ymd {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Held for the duration of a load-advance-save sequence
#[derive(Debug)]
pub struct ProgressLock {
    file: Option<File>,
}

impl ProgressLock {
    /// A lock that guards nothing, for stores that live in one process
    pub fn unguarded() -> Self {
        Self { file: None }
    }
}

impl Drop for ProgressLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take()
            && let Err(e) = FileExt::unlock(&file)
        {
            warn!(error = %e, "Failed to release progress lock");
        }
    }
}

/// Storage for the progress cursor
pub trait ProgressStore {
    /// Read the cursor; anything unreadable is treated as a fresh start
    fn load(&self) -> Progress;

    /// Write the cursor
    fn save(&self, progress: &Progress) -> Result<(), StoicError>;

    /// Enter the exclusive section around load and save
    fn lock(&self) -> Result<ProgressLock, StoicError>;
}

/// Cursor kept in a JSON file, guarded by an advisory lock on `<file>.lock`
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!(?path, "JsonProgressStore::new: called");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    fn ensure_parent(&self) -> Result<(), StoicError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoicError::io(parent, e))?;
        }
        Ok(())
    }
}

impl ProgressStore for JsonProgressStore {
    fn load(&self) -> Progress {
        debug!(path = ?self.path, "JsonProgressStore::load: called");
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                info!(path = %self.path.display(), error = %e, "No progress file, starting from day 1");
                return Progress::default();
            }
        };

        match serde_json::from_str::<Progress>(&content) {
            Ok(progress) => progress,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Corrupt progress file, starting from day 1");
                Progress::default()
            }
        }
    }

    fn save(&self, progress: &Progress) -> Result<(), StoicError> {
        debug!(path = ?self.path, ?progress, "JsonProgressStore::save: called");
        self.ensure_parent()?;
        let json = serde_json::to_string(progress)?;
        fs::write(&self.path, json).map_err(|e| StoicError::io(&self.path, e))?;
        info!(day = progress.day, updated_on = %progress.updated_on, "Saved stoic progress");
        Ok(())
    }

    fn lock(&self) -> Result<ProgressLock, StoicError> {
        let lock_path = self.lock_path();
        debug!(?lock_path, "JsonProgressStore::lock: called");
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoicError::Lock {
                path: lock_path.clone(),
                source: e,
            })?;
        FileExt::lock_exclusive(&file).map_err(|e| StoicError::Lock {
            path: lock_path.clone(),
            source: e,
        })?;

        debug!("JsonProgressStore::lock: acquired");
        Ok(ProgressLock { file: Some(file) })
    }
}

/// Cursor kept in memory; counts writes so callers can see what was persisted
#[derive(Debug, Default)]
pub struct MemoryProgressStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    progress: Option<Progress>,
    writes: usize,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing cursor
    pub fn with_progress(progress: Progress) -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                progress: Some(progress),
                writes: 0,
            }),
        }
    }

    /// Number of successful saves
    pub fn writes(&self) -> usize {
        self.inner.lock().map(|s| s.writes).unwrap_or_default()
    }

    /// Last saved (or seeded) cursor
    pub fn current(&self) -> Option<Progress> {
        self.inner.lock().ok().and_then(|s| s.progress.clone())
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Progress {
        self.current().unwrap_or_default()
    }

    fn save(&self, progress: &Progress) -> Result<(), StoicError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|_| StoicError::io("<memory>", std::io::Error::other("progress store poisoned")))?;
        state.progress = Some(progress.clone());
        state.writes += 1;
        Ok(())
    }

    fn lock(&self) -> Result<ProgressLock, StoicError> {
        Ok(ProgressLock::unguarded())
    }
}
