//! Unit tests for log.rs
//!
//! The logger slot is process-global, so tests that install probes run
//! serially.

use std::sync::{Arc, Mutex};

use serial_test::serial;

use crate::log::{self, LogEntry, LogSeverity, Logger};

/// Test logger that records entries for inspection.
struct ProbeLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for ProbeLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

fn install_probe() -> Arc<Mutex<Vec<LogEntry>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    log::set_logger(Arc::new(ProbeLogger { entries: entries.clone() }));
    entries
}

// ============================================================================
// Severity ordering
// ============================================================================

#[test]
fn test_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
#[serial]
fn test_dispatch_reaches_installed_logger() {
    let entries = install_probe();
    log::set_min_severity(LogSeverity::Trace);

    crate::engine_info!("vista3d::test", "hello {}", 42);

    let recorded = entries.lock().unwrap();
    let entry = recorded.last().expect("entry recorded");
    assert_eq!(entry.severity, LogSeverity::Info);
    assert_eq!(entry.source, "vista3d::test");
    assert_eq!(entry.message, "hello 42");
    assert!(entry.file.is_none());
}

#[test]
#[serial]
fn test_min_severity_filters() {
    let entries = install_probe();
    log::set_min_severity(LogSeverity::Warn);

    crate::engine_debug!("vista3d::test", "you should not see this");
    crate::engine_warn!("vista3d::test", "but this");

    let recorded = entries.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].severity, LogSeverity::Warn);
}

#[test]
#[serial]
fn test_error_macro_captures_location() {
    let entries = install_probe();
    log::set_min_severity(LogSeverity::Trace);

    crate::engine_error!("vista3d::test", "boom");

    let recorded = entries.lock().unwrap();
    let entry = recorded.last().expect("entry recorded");
    assert_eq!(entry.severity, LogSeverity::Error);
    assert!(entry.file.is_some());
    assert!(entry.line.is_some());
}
