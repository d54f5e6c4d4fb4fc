//! Pass logging
//!
//! One log file per launch, one append-mode sink per pass. Every line is
//! echoed to the console; persistence only happens when a log directory is
//! configured.

use crate::config::Config;
use crate::types::{MirrorError, MirrorEvent};
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The launch's log file
///
/// Created once at startup: the name carries the launch timestamp, a
/// pre-existing file of the same name is deleted first (same-second
/// relaunch guard, not a lock), and the launch header is written before
/// the first pass.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Create the launch log file inside `log_dir` and write the header
    pub fn create(log_dir: &Path, config: &Config) -> Result<Self, MirrorError> {
        let name = format!("Logs_{}.log", Local::now().format("%y%m%d_%H%M%S"));
        let path = log_dir.join(name);

        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| MirrorError::entry("replace log file", &path, e))?;
        }

        let mut file =
            File::create(&path).map_err(|e| MirrorError::entry("create log file", &path, e))?;

        for message in launch_header(config) {
            let line = format_line(&message);
            println!("{}", line);
            writeln!(file, "{}", line)
                .map_err(|e| MirrorError::entry("write log file", &path, e))?;
        }

        Ok(LogFile { path })
    }

    /// Path of the launch's log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Append-mode sink for one pass
///
/// Opened when a pass starts and closed when it ends, so each pass's lines
/// are flushed to disk and no handle dangles between passes. A write
/// failure does not interrupt reconciliation mid-pass; the first failure
/// is kept and surfaced by [`PassLog::close`].
#[derive(Debug)]
pub struct PassLog {
    sink: Option<(File, PathBuf)>,
    write_error: Option<MirrorError>,
}

impl PassLog {
    /// Open the pass sink. With no log file, lines go to the console only.
    pub fn open(log_file: Option<&LogFile>) -> Result<Self, MirrorError> {
        let sink = match log_file {
            Some(log_file) => {
                let file = OpenOptions::new()
                    .append(true)
                    .open(log_file.path())
                    .map_err(|e| MirrorError::entry("open log file", log_file.path(), e))?;
                Some((file, log_file.path().to_path_buf()))
            }
            None => None,
        };

        Ok(PassLog {
            sink,
            write_error: None,
        })
    }

    /// Record one event as a timestamped line
    pub fn record(&mut self, event: &MirrorEvent) {
        self.note(&event.to_string());
    }

    /// Record one free-form message as a timestamped line
    pub fn note(&mut self, message: &str) {
        let line = format_line(message);
        println!("{}", line);

        if let Some((mut file, path)) = self.sink.take() {
            match writeln!(file, "{}", line) {
                Ok(()) => self.sink = Some((file, path)),
                Err(e) => {
                    // Keep reconciling; the failure surfaces when the pass closes.
                    self.write_error = Some(MirrorError::entry("write log file", &path, e));
                }
            }
        }
    }

    /// Close the sink and surface any deferred write failure
    pub fn close(mut self) -> Result<(), MirrorError> {
        self.sink.take();

        match self.write_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn launch_header(config: &Config) -> Vec<String> {
    let log_dir = match &config.log_dir {
        Some(dir) => dir.display().to_string(),
        None => "none".to_string(),
    };

    vec![
        format!("doppel {} launched with options:", crate::VERSION),
        format!("  watched directory: {}", config.watched_dir.display()),
        format!("  copy-to directory: {}", config.copy_dir.display()),
        format!("  log directory: {}", log_dir),
        format!("  update interval: {:?}", config.interval),
        format!("  comparison mode: {}", config.compare_mode),
    ]
}

/// Render one log line: wall-clock time, separator, message
fn format_line(message: &str) -> String {
    format!("{} - {}", Local::now().format("%H:%M:%S"), message)
}
