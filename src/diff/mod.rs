//! Diff stage - name-set partitioning and content equality

mod compare;
mod partition;

pub use compare::files_equal;
pub use partition::{partition_names, NamePartition};
