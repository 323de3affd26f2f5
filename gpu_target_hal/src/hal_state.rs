/// Hal - process-wide state of the GPU target HAL
///
/// The only global the HAL keeps is the logging sink. Everything else
/// (driver, capability table, texture registry) is owned by a
/// `DeviceContext` and injected explicitly.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger on first use)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

/// Static façade over the HAL's global logging sink
///
/// # Example
///
/// ```no_run
/// use gpu_target_hal::hal::{Hal, log::{Logger, LogEntry}};
///
/// struct FileLogger;
/// impl Logger for FileLogger {
///     fn log(&self, _entry: &LogEntry) {
///         // Write to file...
///     }
/// }
///
/// Hal::set_logger(FileLogger);
/// ```
pub struct Hal;

impl Hal {
    /// Replace the logging sink
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Restore the colored console logger
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Emit an entry without source location.
    ///
    /// Used by `hal_trace!` .. `hal_warn!`. A poisoned logger lock drops
    /// the entry silently.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Emit an entry with file:line (used by `hal_error!`)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

// ===== TEST SUPPORT =====

/// Logger that keeps every entry, shared between clones.
///
/// Install a clone with `Hal::set_logger` and inspect the original.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct CaptureLogger {
    entries: std::sync::Arc<std::sync::Mutex<Vec<LogEntry>>>,
}

#[cfg(test)]
impl CaptureLogger {
    /// Install a fresh capture logger globally and return a handle to it
    pub(crate) fn install() -> Self {
        let capture = Self::default();
        Hal::set_logger(capture.clone());
        capture
    }

    /// Entries emitted by `source`; other components may log concurrently
    pub(crate) fn entries_from(&self, source: &str) -> Vec<LogEntry> {
        self.entries.lock().unwrap().iter().filter(|e| e.source == source).cloned().collect()
    }

    pub(crate) fn count(&self, source: &str, severity: LogSeverity) -> usize {
        self.entries_from(source).iter().filter(|e| e.severity == severity).count()
    }
}

#[cfg(test)]
impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

#[cfg(test)]
#[path = "hal_state_tests.rs"]
mod tests;
