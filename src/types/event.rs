//! MirrorEvent - per-mutation records emitted during a pass

use crate::types::MirrorError;
use indicatif::HumanBytes;
use std::fmt;
use std::path::PathBuf;

/// One record per mutation performed (or per-entry failure absorbed) during
/// a pass. The logging layer renders each event as one line; `PassStats`
/// accumulates them.
#[derive(Debug)]
pub enum MirrorEvent {
    /// A fresh file was copied into the copy tree.
    FileCopied { path: PathBuf, bytes: u64 },

    /// A changed common file was deleted and copied again from the source.
    FileRecopied { path: PathBuf, bytes: u64 },

    /// A stale file was deleted from the copy tree.
    FileDeleted { path: PathBuf },

    /// A fresh directory was created in the copy tree.
    DirCreated { path: PathBuf },

    /// A stale directory tree was deleted from the copy tree.
    DirDeleted { path: PathBuf },

    /// An entry could not be processed this pass; the pass continued.
    EntryFailed { error: MirrorError },
}

impl fmt::Display for MirrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MirrorEvent::FileCopied { path, .. } => {
                write!(f, "Copied file {}", path.display())
            }
            MirrorEvent::FileRecopied { path, .. } => {
                write!(f, "Recopied changed file {}", path.display())
            }
            MirrorEvent::FileDeleted { path } => {
                write!(f, "Deleted stale file {}", path.display())
            }
            MirrorEvent::DirCreated { path } => {
                write!(f, "Created directory {}", path.display())
            }
            MirrorEvent::DirDeleted { path } => {
                write!(f, "Deleted stale directory {}", path.display())
            }
            MirrorEvent::EntryFailed { error } => {
                write!(f, "Entry failed: {}", error)
            }
        }
    }
}

/// Mutation counters for one pass.
///
/// A pass over an already-synchronized tree returns the zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Fresh files copied into the copy tree.
    pub files_copied: usize,
    /// Changed common files deleted and copied again.
    pub files_recopied: usize,
    /// Stale files deleted from the copy tree.
    pub files_deleted: usize,
    /// Fresh directories created.
    pub dirs_created: usize,
    /// Stale directory trees deleted.
    pub dirs_deleted: usize,
    /// Entries skipped after an absorbed failure.
    pub entries_failed: usize,
    /// Aggregate bytes written by copies and recopies.
    pub bytes_copied: u64,
}

impl PassStats {
    /// Fold one event into the counters.
    pub fn apply(&mut self, event: &MirrorEvent) {
        match event {
            MirrorEvent::FileCopied { bytes, .. } => {
                self.files_copied += 1;
                self.bytes_copied += bytes;
            }
            MirrorEvent::FileRecopied { bytes, .. } => {
                self.files_recopied += 1;
                self.bytes_copied += bytes;
            }
            MirrorEvent::FileDeleted { .. } => self.files_deleted += 1,
            MirrorEvent::DirCreated { .. } => self.dirs_created += 1,
            MirrorEvent::DirDeleted { .. } => self.dirs_deleted += 1,
            MirrorEvent::EntryFailed { .. } => self.entries_failed += 1,
        }
    }

    /// True when the pass performed no mutation and absorbed no failure.
    pub fn is_noop(&self) -> bool {
        *self == PassStats::default()
    }

    /// One-line human-readable pass summary.
    pub fn summary(&self) -> String {
        format!(
            "Pass complete: {} copied, {} recopied, {} deleted, {} dirs created, {} dirs deleted, {} failed ({} written)",
            self.files_copied,
            self.files_recopied,
            self.files_deleted,
            self.dirs_created,
            self.dirs_deleted,
            self.entries_failed,
            HumanBytes(self.bytes_copied)
        )
    }
}
