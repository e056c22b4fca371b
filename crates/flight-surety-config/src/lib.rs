// crates/flight-surety-config/src/lib.rs
// ============================================================================
// Module: Flight Surety Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for flight-surety.toml semantics.
// Dependencies: flight-surety-core, flight-surety-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `flight-surety-config` defines the configuration model for the flight
//! surety ledger: the contract owner and app identity, the funding
//! threshold, the backing store, and the audit sink. Validation is strict and
//! fails closed. A canonical example file is provided for `init` flows.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod example;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use example::config_toml_example;
