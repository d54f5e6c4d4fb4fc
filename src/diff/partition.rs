//! Name-set partitioning

use std::collections::BTreeSet;
use std::ffi::OsString;

/// Three-way split of the names at one directory level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePartition {
    /// In the copy only: candidates for deletion.
    pub stale: Vec<OsString>,
    /// In the source only: candidates for creation.
    pub fresh: Vec<OsString>,
    /// In both: files get a content re-check, directories just recurse.
    pub common: Vec<OsString>,
}

/// Partition two name sets into stale / fresh / common.
///
/// Pure set arithmetic, no I/O. Output order is the sets' sorted order, so
/// the caller processes names deterministically.
pub fn partition_names(source: &BTreeSet<OsString>, copy: &BTreeSet<OsString>) -> NamePartition {
    NamePartition {
        stale: copy.difference(source).cloned().collect(),
        fresh: source.difference(copy).cloned().collect(),
        common: source.intersection(copy).cloned().collect(),
    }
}
