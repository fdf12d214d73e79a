//! Shared helpers for unit tests.

use std::path::PathBuf;
use std::sync::{Mutex, Once};
use tempfile::TempDir;

pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn create_test_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

static RECORDS: Mutex<Vec<(log::Level, String)>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        let mut records = RECORDS.lock().unwrap_or_else(|e| e.into_inner());
        records.push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

/// Route log records of the test binary into memory. Safe to call from
/// every test.
pub fn capture_logs() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        log::set_logger(&CaptureLogger).expect("Failed to install test logger");
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// Whether a record at `level` containing `needle` was logged. Tests run in
/// parallel, so `needle` should be unique to the calling test.
pub fn logged(level: log::Level, needle: &str) -> bool {
    let records = RECORDS.lock().unwrap_or_else(|e| e.into_inner());
    records
        .iter()
        .any(|(l, message)| *l == level && message.contains(needle))
}
