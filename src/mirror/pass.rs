//! The recursive reconciliation core

use crate::config::Config;
use crate::diff::{files_equal, partition_names};
use crate::executor;
use crate::logging::PassLog;
use crate::scanner::{self, DirListing};
use crate::types::{MirrorError, MirrorEvent, PassStats};
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::path::Path;

/// One reconciliation pass over the whole tree
///
/// Walks source and copy in lock-step from the roots. Per directory level:
/// files are reconciled first (delete stale, copy fresh, re-check common),
/// then the subdirectory structure (delete stale trees, create fresh),
/// then depth-first recursion into every source subdirectory. Any
/// single-entry failure is absorbed as an event and the pass continues
/// with the remaining entries.
pub struct MirrorPass<'a> {
    config: &'a Config,
    log: &'a mut PassLog,
    stats: PassStats,
}

impl<'a> MirrorPass<'a> {
    pub fn new(config: &'a Config, log: &'a mut PassLog) -> Self {
        MirrorPass {
            config,
            log,
            stats: PassStats::default(),
        }
    }

    /// Reconcile from the roots
    ///
    /// Only a failure listing one of the two roots aborts the pass; deeper
    /// listing failures skip that subtree and are absorbed by the parent
    /// level.
    pub fn run(mut self) -> Result<PassStats, MirrorError> {
        self.mirror_dir(Path::new(""))?;
        Ok(self.stats)
    }

    fn mirror_dir(&mut self, relative: &Path) -> Result<(), MirrorError> {
        let watched_dir = self.config.watched_dir.join(relative);
        let copy_dir = self.config.copy_dir.join(relative);

        let source = scanner::list_dir(&watched_dir)?;
        let copy = scanner::list_dir(&copy_dir)?;

        self.mirror_files(&watched_dir, &copy_dir, &source, &copy);

        let dirs = partition_names(&source.dirs, &copy.dirs);

        for name in &dirs.stale {
            let target = copy_dir.join(name);
            match executor::delete_dir_tree(&target) {
                Ok(()) => self.record(MirrorEvent::DirDeleted { path: target }),
                Err(error) => self.absorb(error),
            }
        }

        // A directory that failed to create has no copy side to recurse
        // into; skip it until the next pass.
        let mut unreachable: BTreeSet<OsString> = BTreeSet::new();
        for name in &dirs.fresh {
            let target = copy_dir.join(name);
            match executor::create_dir(&target) {
                Ok(()) => self.record(MirrorEvent::DirCreated { path: target }),
                Err(error) => {
                    self.absorb(error);
                    unreachable.insert(name.clone());
                }
            }
        }

        for name in &source.dirs {
            if unreachable.contains(name) {
                continue;
            }

            let child = relative.join(name);
            if let Err(error) = self.mirror_dir(&child) {
                self.absorb(error);
            }
        }

        Ok(())
    }

    fn mirror_files(
        &mut self,
        watched_dir: &Path,
        copy_dir: &Path,
        source: &DirListing,
        copy: &DirListing,
    ) {
        let files = partition_names(&source.files, &copy.files);

        for name in &files.stale {
            let target = copy_dir.join(name);
            match executor::delete_file(&target) {
                Ok(()) => self.record(MirrorEvent::FileDeleted { path: target }),
                Err(error) => self.absorb(error),
            }
        }

        for name in &files.fresh {
            let src = watched_dir.join(name);
            let dest = copy_dir.join(name);
            match executor::copy_file(&src, &dest) {
                Ok(bytes) => self.record(MirrorEvent::FileCopied { path: dest, bytes }),
                Err(error) => self.absorb(error),
            }
        }

        for name in &files.common {
            let src = watched_dir.join(name);
            let dest = copy_dir.join(name);
            match self.refresh_common(&src, &dest) {
                Ok(Some(event)) => self.record(event),
                Ok(None) => {}
                Err(error) => self.absorb(error),
            }
        }
    }

    /// Re-check one common file; delete and recopy it when content differs.
    ///
    /// Deliberately delete-then-recreate, not an in-place patch. A failure
    /// between the two steps leaves the entry missing until the next pass
    /// recreates it.
    fn refresh_common(&self, src: &Path, dest: &Path) -> Result<Option<MirrorEvent>, MirrorError> {
        if files_equal(src, dest, self.config.compare_mode)? {
            return Ok(None);
        }

        executor::delete_file(dest)?;
        let bytes = executor::copy_file(src, dest)?;

        Ok(Some(MirrorEvent::FileRecopied {
            path: dest.to_path_buf(),
            bytes,
        }))
    }

    fn record(&mut self, event: MirrorEvent) {
        self.stats.apply(&event);
        self.log.record(&event);
    }

    fn absorb(&mut self, error: MirrorError) {
        let event = MirrorEvent::EntryFailed { error };
        self.stats.apply(&event);
        self.log.record(&event);
    }
}
