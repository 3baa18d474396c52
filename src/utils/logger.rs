//! Logger utility for application-wide logging
//!
//! A `log` backend that writes every record to a log file and echoes it to
//! the console. Commands also use it directly for summary lines.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use log::{Log, Record, Level, Metadata, LevelFilter};

/// File-backed logger, cheap to clone (clones share the file)
#[derive(Clone)]
pub struct Logger {
    /// File handle for log output; `None` logs to the console only
    file: Arc<Mutex<Option<File>>>,
    level: LevelFilter,
    console: bool,
}

impl Logger {
    /// Creates a logger writing to `log_file`, truncating it
    ///
    /// # Arguments
    ///
    /// * `log_file` - Path to the log file
    /// * `level` - Most verbose level that is recorded
    pub fn new(log_file: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Arc::new(Mutex::new(Some(file))),
            level,
            console: true,
        })
    }

    /// A logger without file output and without console echo
    pub fn silent() -> Self {
        Logger {
            file: Arc::new(Mutex::new(None)),
            level: LevelFilter::Off,
            console: false,
        }
    }

    /// Logs a message to the log file
    pub fn log(&self, message: &str) -> io::Result<()> {
        let mut guard = self.file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Creates a logger for `log_file` and installs a clone as the global `log` backend
    ///
    /// Returns the handle commands use for their own summary lines.
    pub fn init_global_logger(log_file: &Path, level: LevelFilter) -> io::Result<Logger> {
        let logger = Logger::new(log_file, level)?;

        // set_boxed_logger only fails when a logger is already installed
        if log::set_boxed_logger(Box::new(logger.clone())).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level);
        Ok(logger)
    }
}

// Implement the Log trait to make our Logger work with the log crate
impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = Logger::log(self, &message);

            if self.console {
                if record.level() <= Level::Warn {
                    eprintln!("{}", message);
                } else {
                    println!("{}", message);
                }
            }
        }
    }

    fn flush(&self) {
        // Already flushing in the log method
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let logger = Logger::new(&path, LevelFilter::Info).unwrap();
        logger.log("converted 3 files").unwrap();
        logger.clone().log("second line").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "converted 3 files\nsecond line\n");
    }

    #[test]
    fn test_level_filter() {
        let logger = Logger::silent();
        let metadata = Metadata::builder().level(Level::Error).build();
        assert!(!logger.enabled(&metadata));
        assert!(logger.log("dropped").is_ok());
    }

    #[test]
    fn test_global_logger_receives_log_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("global.log");

        let logger = Logger::init_global_logger(&path, LevelFilter::Info).unwrap();
        log::info!("batch started");
        log::debug!("hidden detail");
        logger.log("summary").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[INFO] batch started"), "{}", content);
        assert!(!content.contains("hidden detail"), "{}", content);
        assert!(content.contains("summary\n"), "{}", content);
    }
}
