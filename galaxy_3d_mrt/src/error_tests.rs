//! Unit tests for error.rs
//!
//! Covers Display output per variant, the engine_err! / engine_bail! macros,
//! and how device failures surface through `?` in render target code.

use crate::error::{Error, Result};
use crate::galaxy3d::log::{LogEntry, LogSeverity, Logger};
use crate::galaxy3d::Engine;
use serial_test::serial;
use std::sync::{Arc, Mutex};

struct CaptureLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.source == "galaxy3d::error_test" {
            self.entries.lock().unwrap().push(entry.clone());
        }
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

#[test]
fn test_display_prefixes_by_variant() {
    let cases = [
        (Error::BackendError("framebuffer allocation failed".to_string()), "Backend error: framebuffer allocation failed"),
        (Error::OutOfMemory, "Out of GPU memory"),
        (Error::InvalidResource("GraphicsDevice 'main' not found".to_string()), "Invalid resource: GraphicsDevice 'main' not found"),
        (Error::InitializationFailed("Engine not initialized".to_string()), "Initialization failed: Engine not initialized"),
    ];

    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_error_boxes_as_std_error() {
    let boxed: Box<dyn std::error::Error> = Box::new(Error::OutOfMemory);
    assert_eq!(boxed.to_string(), "Out of GPU memory");
}

// ============================================================================
// PROPAGATION
// ============================================================================

#[test]
fn test_allocation_failure_propagates_unchanged() {
    fn allocate(fail: bool) -> Result<usize> {
        if fail {
            return Err(Error::OutOfMemory);
        }
        Ok(4)
    }

    fn rebuild(fail: bool) -> Result<usize> {
        let textures = allocate(fail)?;
        Ok(textures + 1)
    }

    assert_eq!(rebuild(false).unwrap(), 5);
    assert!(matches!(rebuild(true), Err(Error::OutOfMemory)));
}

#[test]
fn test_cloned_error_keeps_message() {
    let original = Error::InvalidResource("slot 3".to_string());
    let copy = original.clone();
    assert!(matches!(copy, Error::InvalidResource(ref msg) if msg == "slot 3"));
}

// ============================================================================
// MACROS
// ============================================================================

#[test]
#[serial]
fn test_engine_err_logs_with_location() {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });

    let err = crate::engine_err!("galaxy3d::error_test", "slot {} is broken", 3);
    Engine::reset_logger();

    assert!(matches!(err, Error::BackendError(ref msg) if msg == "slot 3 is broken"));
    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].severity, LogSeverity::Error);
    assert!(entries[0].file.is_some());
    assert!(entries[0].line.is_some());
}

#[test]
fn test_engine_bail_returns_early() {
    fn check_slot(index: usize, count: usize) -> Result<usize> {
        if index > count {
            crate::engine_bail!("galaxy3d::error_test", "slot {} past {} attachments", index, count);
        }
        Ok(index)
    }

    assert_eq!(check_slot(1, 2).unwrap(), 1);
    match check_slot(5, 2) {
        Err(Error::BackendError(msg)) => assert_eq!(msg, "slot 5 past 2 attachments"),
        other => panic!("Expected BackendError, got {:?}", other),
    }
}
