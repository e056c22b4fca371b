// crates/flight-surety-core/src/interfaces/mod.rs
// ============================================================================
// Module: Flight Surety Interfaces
// Description: Backend-agnostic interfaces for persistence and audit logging.
// Purpose: Define the contract surfaces used by the ledger runtime.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the ledger integrates with storage backends and log
//! pipelines without embedding backend-specific details. Stores must fail
//! closed on missing or corrupt data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::LedgerAuditEvent;
use crate::core::LedgerState;

// ============================================================================
// SECTION: Ledger Store
// ============================================================================

/// Ledger store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("ledger store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("ledger store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("ledger store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("ledger store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("ledger store error: {0}")]
    Store(String),
}

/// Durable home of the committed ledger state.
///
/// `save` must be all-or-nothing: after an error the previously saved state
/// is still the one returned by `load`.
pub trait LedgerStore {
    /// Loads the committed ledger state, if any was saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(&self) -> Result<Option<LedgerState>, StoreError>;

    /// Saves the ledger state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when saving fails.
    fn save(&self, state: &LedgerState) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Audit sink for ledger events.
pub trait LedgerAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &LedgerAuditEvent);
}
