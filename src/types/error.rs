//! Error types for doppel

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error types for mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A filesystem operation failed on one entry during a pass
    #[error("{action} failed for {}: {source}", path.display())]
    Entry {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl MirrorError {
    /// Build an entry-scoped error carrying the attempted action and path.
    pub fn entry(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        MirrorError::Entry {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Check if this error is a startup configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, MirrorError::Config(_))
    }

    /// Check if this error is scoped to a single entry.
    ///
    /// The reconciler absorbs these per entry and keeps going; a listing
    /// failure on a pass root propagates and fails the pass instead.
    pub fn is_entry_error(&self) -> bool {
        matches!(self, MirrorError::Entry { .. })
    }
}
