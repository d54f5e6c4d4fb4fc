//! Long-running mirror loop and its shutdown signal

use super::pass::MirrorPass;
use crate::config::Config;
use crate::logging::{LogFile, PassLog};
use crate::types::{MirrorError, PassStats};
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

/// Cooperative shutdown flag with an interruptible wait
///
/// Clones share one flag. Raising it wakes every waiter immediately, so a
/// loop sleeping between passes reacts without waiting out its interval.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

struct StopInner {
    stopped: Mutex<bool>,
    wakeup: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        StopSignal {
            inner: Arc::new(StopInner {
                stopped: Mutex::new(false),
                wakeup: Condvar::new(),
            }),
        }
    }

    /// Raise the signal and wake all waiters.
    pub fn stop(&self) {
        let mut stopped = self.lock_flag();
        *stopped = true;
        self.inner.wakeup.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.lock_flag()
    }

    /// Sleep for up to `timeout`, returning early when the signal is raised.
    ///
    /// Returns true when stopped, false when the timeout elapsed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut stopped = self.lock_flag();

        while !*stopped {
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    let (guard, _timed_out) = self
                        .inner
                        .wakeup
                        .wait_timeout(stopped, deadline - now)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    stopped = guard;
                }
                // A timeout beyond the clock's range never expires.
                None => {
                    stopped = self
                        .inner
                        .wakeup
                        .wait(stopped)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
            }
        }

        true
    }

    fn lock_flag(&self) -> std::sync::MutexGuard<'_, bool> {
        self.inner
            .stopped
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured mirror bound to its per-launch log file
pub struct Mirror {
    config: Config,
    log_file: Option<LogFile>,
}

impl Mirror {
    /// Bootstrap the mirror, creating the launch log file when configured.
    pub fn new(config: Config) -> Result<Self, MirrorError> {
        let log_file = match &config.log_dir {
            Some(log_dir) => Some(LogFile::create(log_dir, &config)?),
            None => None,
        };

        Ok(Mirror { config, log_file })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the launch log file, when one is configured.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_ref().map(|file| file.path())
    }

    /// Run one reconciliation pass.
    ///
    /// Opens the log for appending, runs the pass, writes a summary line
    /// when anything changed, then closes the log so the file is complete
    /// on disk between passes.
    pub fn run_pass(&self) -> Result<PassStats, MirrorError> {
        let mut log = PassLog::open(self.log_file.as_ref())?;

        let result = MirrorPass::new(&self.config, &mut log).run();

        match &result {
            Ok(stats) if !stats.is_noop() => log.note(&stats.summary()),
            Ok(_) => {}
            Err(error) => log.note(&format!("Mirror pass aborted: {}", error)),
        }

        let closed = log.close();
        let stats = result?;
        closed?;

        Ok(stats)
    }

    /// Run passes until `stop` is raised, sleeping the configured interval
    /// between them.
    ///
    /// A failed pass is reported and the loop keeps going; a later pass may
    /// find the roots healthy again.
    pub fn run_until_stopped(&self, stop: &StopSignal) {
        while !stop.is_stopped() {
            if let Err(error) = self.run_pass() {
                eprintln!("mirror pass failed: {}", error);
            }

            if stop.wait_timeout(self.config.interval) {
                break;
            }
        }
    }
}

/// Build a mirror from `config` and run a single pass.
pub fn mirror_once(config: Config) -> Result<PassStats, MirrorError> {
    Mirror::new(config)?.run_pass()
}
