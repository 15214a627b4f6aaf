//! Stoic prompt error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading prompts or persisting progress
#[derive(Debug, Error)]
pub enum StoicError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid prompt row at line {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoicError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from the prompt table rather than progress state
    pub fn is_table_error(&self) -> bool {
        matches!(self, StoicError::Csv(_) | StoicError::InvalidRow { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_table_error() {
        let err = StoicError::InvalidRow {
            line: 3,
            reason: "day 0 out of range".to_string(),
        };
        assert!(err.is_table_error());

        let err = StoicError::io("/tmp/x", std::io::Error::other("boom"));
        assert!(!err.is_table_error());
    }

    #[test]
    fn test_display_includes_path() {
        let err = StoicError::io("/tmp/progress.json", std::io::Error::other("denied"));
        let msg = err.to_string();
        assert!(msg.contains("/tmp/progress.json"));
        assert!(msg.contains("denied"));
    }
}
