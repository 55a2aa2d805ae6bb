//! Unit tests for log.rs
//!
//! Tests Logger trait, LogEntry, LogSeverity, and DefaultLogger filtering/formatting.

use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
use std::sync::Mutex;
use std::time::SystemTime;

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_are_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Warn.label(), "WARN ");
}

// ============================================================================
// LOG ENTRY TESTS
// ============================================================================

#[test]
fn test_log_entry_new_has_no_location() {
    let entry = LogEntry::new(
        LogSeverity::Debug,
        "galaxy3d::MultiRenderTarget",
        "Allocated 3 attachments".to_string(),
    );

    assert_eq!(entry.severity, LogSeverity::Debug);
    assert_eq!(entry.source, "galaxy3d::MultiRenderTarget");
    assert_eq!(entry.message, "Allocated 3 attachments");
    assert!(entry.file.is_none());
    assert!(entry.line.is_none());
}

#[test]
fn test_log_entry_with_location() {
    let entry = LogEntry::new(LogSeverity::Error, "galaxy3d::Engine", "boom".to_string())
        .with_location("engine.rs", 42);

    assert_eq!(entry.file, Some("engine.rs"));
    assert_eq!(entry.line, Some(42));
}

#[test]
fn test_log_entry_timestamps_are_monotonic() {
    let first = LogEntry::new(LogSeverity::Info, "test", "first".to_string());
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = LogEntry::new(LogSeverity::Info, "test", "second".to_string());

    assert!(second.timestamp >= first.timestamp);
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_filters_below_min_severity() {
    let logger = DefaultLogger::new(LogSeverity::Warn);

    assert!(!logger.accepts(LogSeverity::Trace));
    assert!(!logger.accepts(LogSeverity::Info));
    assert!(logger.accepts(LogSeverity::Warn));
    assert!(logger.accepts(LogSeverity::Error));
}

#[test]
fn test_default_logger_format_without_location() {
    let logger = DefaultLogger::new(LogSeverity::Trace);
    let entry = LogEntry::new(LogSeverity::Info, "galaxy3d::TargetManager", "created gbuffer".to_string());

    let line = logger.format_entry(&entry);
    assert!(line.contains("galaxy3d::TargetManager"));
    assert!(line.contains("created gbuffer"));
    assert!(!line.contains("):"));
}

#[test]
fn test_default_logger_format_with_location() {
    let logger = DefaultLogger::new(LogSeverity::Trace);
    let entry = LogEntry {
        severity: LogSeverity::Error,
        timestamp: SystemTime::now(),
        source: "galaxy3d::MultiRenderTarget".to_string(),
        message: "device lock poisoned".to_string(),
        file: Some("multi_render_target.rs"),
        line: Some(123),
    };

    let line = logger.format_entry(&entry);
    assert!(line.contains("device lock poisoned"));
    assert!(line.contains("multi_render_target.rs:123"));
}

#[test]
fn test_default_logger_log_all_severities_does_not_panic() {
    let logger = DefaultLogger::new(LogSeverity::Trace);
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        logger.log(&LogEntry::new(severity, "test", format!("{:?} message", severity)));
    }
}

// ============================================================================
// LOGGER TRAIT TESTS
// ============================================================================

struct CountingLogger {
    count: Mutex<usize>,
}

impl Logger for CountingLogger {
    fn log(&self, _entry: &LogEntry) {
        *self.count.lock().unwrap() += 1;
    }
}

#[test]
fn test_custom_logger_implementation() {
    let logger = CountingLogger { count: Mutex::new(0) };
    let entry = LogEntry::new(LogSeverity::Info, "test", "test".to_string());

    logger.log(&entry);
    logger.log(&entry);

    assert_eq!(*logger.count.lock().unwrap(), 2);
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
    assert_send_sync::<CountingLogger>();
}
