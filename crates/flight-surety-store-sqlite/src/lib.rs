// crates/flight-surety-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Ledger Store
// Description: Durable LedgerStore backend using SQLite WAL.
// Purpose: Persist the flight surety ledger across restarts.
// Dependencies: flight-surety-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`LedgerStore`] implementation. The
//! ledger is stored as four tables (operational flag, authorized callers,
//! airlines, flights) plus a metadata row carrying a canonical hash of the
//! whole snapshot. Loads recompute the hash and fail closed on mismatch.
//!
//! [`LedgerStore`]: flight_surety_core::LedgerStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::LedgerMetadata;
pub use store::SqliteLedgerStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
