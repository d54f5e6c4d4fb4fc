//! Configuration management

use crate::types::MirrorError;
use clap::Parser;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seconds between passes when no interval is configured.
pub const DEFAULT_INTERVAL_SECS: f64 = 10.0;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "doppel",
    version,
    about = "Polling directory mirror - keeps an exact copy of a watched directory tree"
)]
pub struct Cli {
    /// Directory tree to watch (the source of truth)
    #[arg(
        short = 'w',
        long = "watched",
        value_name = "DIR",
        visible_alias = "watched-dir"
    )]
    pub watched: Option<PathBuf>,

    /// Directory tree to keep as the mirror
    #[arg(
        short = 'c',
        long = "copy-to",
        value_name = "DIR",
        visible_alias = "copy-dir"
    )]
    pub copy_to: Option<PathBuf>,

    /// Directory for per-launch log files (console only when omitted)
    #[arg(short = 'l', long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Seconds between passes (fractional values accepted)
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "SECONDS",
        visible_alias = "delay"
    )]
    pub interval: Option<f64>,

    /// Compare common files byte by byte instead of by content hash
    #[arg(long = "byte-by-byte", visible_alias = "bbb")]
    pub byte_by_byte: bool,

    /// Run a single pass and exit
    #[arg(long)]
    pub once: bool,

    /// TOML settings file (flags override file values)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// How common files are compared for equality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareMode {
    /// Compare Blake3 digests of both files (default)
    #[default]
    Hash,

    /// Compare both byte streams in lock-step (exact, no digest)
    ByteByByte,
}

impl fmt::Display for CompareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareMode::Hash => write!(f, "content hash (blake3)"),
            CompareMode::ByteByByte => write!(f, "byte-by-byte"),
        }
    }
}

/// Optional TOML settings file; any field may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSettings {
    pub watched: Option<PathBuf>,
    pub copy_to: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub interval: Option<f64>,
    pub byte_by_byte: Option<bool>,
}

impl FileSettings {
    /// Load settings from a TOML file
    pub fn load(path: &Path) -> Result<Self, MirrorError> {
        let text = fs::read_to_string(path).map_err(|e| {
            MirrorError::Config(format!(
                "cannot read settings file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&text).map_err(|e| {
            MirrorError::Config(format!(
                "cannot parse settings file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// Validated, immutable configuration for one launch
///
/// Both roots are canonicalized, so path prefix checks and the
/// equality guard see through symlinks and relative components.
#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical watched root (source of truth)
    pub watched_dir: PathBuf,

    /// Canonical copy root (the mirror)
    pub copy_dir: PathBuf,

    /// Canonical log directory; None means console-only logging
    pub log_dir: Option<PathBuf>,

    /// Time between passes
    pub interval: Duration,

    /// How common files are compared
    pub compare_mode: CompareMode,

    /// Run a single pass instead of polling
    pub once: bool,
}

impl TryFrom<Cli> for Config {
    type Error = MirrorError;

    /// Merge CLI flags over file settings and validate the result
    fn try_from(cli: Cli) -> Result<Self, MirrorError> {
        let file = match &cli.config {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };

        let watched = cli.watched.or(file.watched).ok_or_else(|| {
            MirrorError::Config("no watched directory configured (--watched)".to_string())
        })?;
        let copy_to = cli.copy_to.or(file.copy_to).ok_or_else(|| {
            MirrorError::Config("no copy-to directory configured (--copy-to)".to_string())
        })?;
        let log_dir = cli.log_dir.or(file.log_dir);
        let interval = cli.interval.or(file.interval);
        let byte_by_byte = cli.byte_by_byte || file.byte_by_byte.unwrap_or(false);

        let compare_mode = if byte_by_byte {
            CompareMode::ByteByByte
        } else {
            CompareMode::Hash
        };

        Config::resolve(watched, copy_to, log_dir, interval, compare_mode, cli.once)
    }
}

impl Config {
    /// Validate directories and build the immutable configuration.
    ///
    /// - the watched directory must exist
    /// - the copy-to directory is created if missing
    /// - the two roots must be distinct and must not nest (a nested copy
    ///   would mirror into itself; a nested watched root would be deleted
    ///   as stale)
    /// - a log directory inside the copy root is rejected (a pass would
    ///   delete its own logs)
    fn resolve(
        watched: PathBuf,
        copy_to: PathBuf,
        log_dir: Option<PathBuf>,
        interval_secs: Option<f64>,
        compare_mode: CompareMode,
        once: bool,
    ) -> Result<Self, MirrorError> {
        let watched_dir = canonical_existing_dir(&watched, "watched")?;
        let copy_dir = canonical_created_dir(&copy_to, "copy-to")?;

        if copy_dir == watched_dir {
            return Err(MirrorError::Config(format!(
                "copy-to directory is the same as the watched directory: {}",
                copy_dir.display()
            )));
        }
        if copy_dir.starts_with(&watched_dir) || watched_dir.starts_with(&copy_dir) {
            return Err(MirrorError::Config(format!(
                "watched and copy-to directories may not contain each other: {} vs {}",
                watched_dir.display(),
                copy_dir.display()
            )));
        }

        let log_dir = match log_dir {
            Some(dir) => {
                let dir = canonical_created_dir(&dir, "log")?;
                if dir.starts_with(&copy_dir) {
                    return Err(MirrorError::Config(format!(
                        "log directory may not live inside the copy-to directory: {}",
                        dir.display()
                    )));
                }
                Some(dir)
            }
            None => None,
        };

        Ok(Config {
            watched_dir,
            copy_dir,
            log_dir,
            interval: resolve_interval(interval_secs),
            compare_mode,
            once,
        })
    }
}

fn canonical_existing_dir(path: &Path, role: &str) -> Result<PathBuf, MirrorError> {
    if !path.is_dir() {
        return Err(MirrorError::Config(format!(
            "{} directory does not exist: {}",
            role,
            path.display()
        )));
    }

    fs::canonicalize(path).map_err(|e| {
        MirrorError::Config(format!(
            "cannot resolve {} directory {}: {}",
            role,
            path.display(),
            e
        ))
    })
}

fn canonical_created_dir(path: &Path, role: &str) -> Result<PathBuf, MirrorError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            MirrorError::Config(format!(
                "cannot create {} directory {}: {}",
                role,
                path.display(),
                e
            ))
        })?;
    }

    if !path.is_dir() {
        return Err(MirrorError::Config(format!(
            "{} path exists but is not a directory: {}",
            role,
            path.display()
        )));
    }

    fs::canonicalize(path).map_err(|e| {
        MirrorError::Config(format!(
            "cannot resolve {} directory {}: {}",
            role,
            path.display(),
            e
        ))
    })
}

fn resolve_interval(secs: Option<f64>) -> Duration {
    let secs = secs.unwrap_or(DEFAULT_INTERVAL_SECS);

    // Zero converts fine but would never poll, so it takes the fallback too.
    match Duration::try_from_secs_f64(secs) {
        Ok(interval) if secs > 0.0 => interval,
        _ => {
            eprintln!(
                "Warning: update interval must be a positive number of seconds, using {}s",
                DEFAULT_INTERVAL_SECS
            );
            Duration::from_secs_f64(DEFAULT_INTERVAL_SECS)
        }
    }
}
