//! File-backed `log` sink.
//!
//! The terminal is the UI, so log records go to `$TMPDIR/fmtview.log`
//! (truncated on start) and never to stdout/stderr. The level comes from
//! `FMTVIEW_LOG` (`off|error|warn|info|debug|trace`); unset means off.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

const LEVEL_VAR: &str = "FMTVIEW_LOG";

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

fn timestamp() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        let mut file = self.file.lock();
        let _ = file.write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

fn level_from_env() -> LevelFilter {
    std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|v| v.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Off)
}

pub fn log_path() -> PathBuf {
    std::env::temp_dir().join("fmtview.log")
}

/// Installs the file logger. Does nothing when logging is off or the log
/// file cannot be opened; a broken log never stops the app.
pub fn init() {
    let level = level_from_env();
    if level == LevelFilter::Off {
        return;
    }
    let path = log_path();
    let Ok(file) = OpenOptions::new().write(true).truncate(true).create(true).open(&path) else {
        return;
    };
    let logger = FileLogger { level, file: Mutex::new(file) };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
        log::info!("fmtview {} started (level {level})", env!("CARGO_PKG_VERSION"));
    }
}
