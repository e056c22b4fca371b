// crates/flight-surety-core/src/runtime/mod.rs
// ============================================================================
// Module: Flight Surety Runtime
// Description: Storage and app components, transactions, stores, and sinks.
// Purpose: Execute ledger operations with serialized, all-or-nothing commits.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the storage component, the app component that
//! relays client calls into it, and the default store and audit sink
//! implementations. Every surface (CLI, tests, embedders) calls into the same
//! commit path.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod app;
pub mod audit;
pub mod data;
pub mod error;
pub mod store;
pub mod txn;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use app::SuretyApp;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RecordingAuditSink;
pub use audit::StderrAuditSink;
pub use data::LedgerConfig;
pub use data::SuretyData;
pub use error::SuretyError;
pub use store::InMemoryLedgerStore;
pub use store::SharedLedgerStore;
pub use txn::LedgerTxn;
