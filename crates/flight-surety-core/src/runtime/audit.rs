// crates/flight-surety-core/src/runtime/audit.rs
// ============================================================================
// Module: Flight Surety Audit Sinks
// Description: JSON-line audit sinks for ledger events.
// Purpose: Emit structured logs without a hard logging-framework dependency.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! Sinks serialize [`LedgerAuditEvent`] values as one JSON object per line.
//! Deployments pick stderr, an append-only file, or nothing; tests use the
//! recording sink to assert on emitted events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::sync::PoisonError;

use crate::core::LedgerAuditEvent;
use crate::interfaces::LedgerAuditSink;

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl LedgerAuditSink for StderrAuditSink {
    fn record(&self, event: &LedgerAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LedgerAuditSink for FileAuditSink {
    fn record(&self, event: &LedgerAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl LedgerAuditSink for NoopAuditSink {
    fn record(&self, _event: &LedgerAuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<LedgerAuditEvent>>,
}

impl RecordingAuditSink {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerAuditEvent> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl LedgerAuditSink for RecordingAuditSink {
    fn record(&self, event: &LedgerAuditEvent) {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).push(event.clone());
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
