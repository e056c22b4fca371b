// crates/flight-surety-core/src/core/mod.rs
// ============================================================================
// Module: Flight Surety Core Types
// Description: Canonical ledger schema, admission policy, and audit records.
// Purpose: Provide stable, serializable types for the ledger and its logs.
// Dependencies: serde, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types define the ledger tables, the admission policy, and the audit
//! event payloads. They are the single source of truth for the store, config,
//! and CLI crates.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod access;
pub mod amount;
pub mod audit;
pub mod hashing;
pub mod identifiers;
pub mod state;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access::AirlineStanding;
pub use access::CallerContext;
pub use access::Denial;
pub use access::Operation;
pub use access::Role;
pub use access::admit;
pub use amount::DEFAULT_MIN_FUNDING;
pub use amount::WEI_PER_ETHER;
pub use amount::Wei;
pub use audit::LedgerAuditEvent;
pub use audit::LedgerChange;
pub use audit::OperationAttempt;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use identifiers::AccountId;
pub use identifiers::FlightId;
pub use state::Airline;
pub use state::Flight;
pub use state::FlightStatus;
pub use state::LedgerState;
pub use state::MAX_FLIGHT_TIMESTAMP;
pub use state::StateError;
pub use state::meets_funding_threshold;
