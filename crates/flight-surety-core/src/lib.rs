// crates/flight-surety-core/src/lib.rs
// ============================================================================
// Module: Flight Surety Core Library
// Description: Public API surface for the flight surety ledger.
// Purpose: Expose core types, interfaces, and runtime components.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Flight surety core implements the ledger of a consortium-run flight delay
//! insurance scheme: an operational kill-switch, an allow-list of app
//! components trusted by storage, a funding-gated airline registry, and a
//! dense flight registry. It is backend-agnostic and persists through the
//! [`LedgerStore`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::LedgerAuditSink;
pub use interfaces::LedgerStore;
pub use interfaces::StoreError;
pub use runtime::FileAuditSink;
pub use runtime::InMemoryLedgerStore;
pub use runtime::LedgerConfig;
pub use runtime::LedgerTxn;
pub use runtime::NoopAuditSink;
pub use runtime::RecordingAuditSink;
pub use runtime::SharedLedgerStore;
pub use runtime::StderrAuditSink;
pub use runtime::SuretyApp;
pub use runtime::SuretyData;
pub use runtime::SuretyError;
