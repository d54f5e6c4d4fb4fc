//! # doppel - Polling Directory Mirror
//!
//! One source of truth, one faithful copy.
//!
//! A small watchdog that keeps a copy directory identical to a watched
//! directory by rescanning both trees on a fixed interval and reconciling
//! every difference it finds: stale entries are deleted, missing entries
//! are copied, and changed files are replaced.

// Module declarations
pub mod config;
pub mod scanner;
pub mod diff;
pub mod executor;
pub mod hash;
pub mod logging;
pub mod mirror;
pub mod commands;
pub mod types;

// Re-export commonly used types
pub use config::{CompareMode, Config};
pub use mirror::{mirror_once, Mirror, StopSignal};
pub use types::{MirrorError, MirrorEvent, PassStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
