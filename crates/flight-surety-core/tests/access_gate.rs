// crates/flight-surety-core/tests/access_gate.rs
// ============================================================================
// Module: Access Gate Tests
// Description: Operational flag semantics and owner-only toggling.
// Purpose: Ensure every mutating operation is blocked while paused.
// Dependencies: flight-surety-core
// ============================================================================
//! ## Overview
//! Exercises the kill-switch: initial value, owner restriction, and the
//! `ContractPaused` guard across app and storage operations.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::sync::Arc;

use flight_surety_core::AccountId;
use flight_surety_core::FlightId;
use flight_surety_core::FlightStatus;
use flight_surety_core::InMemoryLedgerStore;
use flight_surety_core::LedgerConfig;
use flight_surety_core::NoopAuditSink;
use flight_surety_core::SuretyApp;
use flight_surety_core::SuretyData;
use flight_surety_core::SuretyError;
use flight_surety_core::Wei;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn deploy() -> (SuretyApp<InMemoryLedgerStore>, AccountId) {
    let owner = AccountId::new("0xowner");
    let data = SuretyData::open(
        InMemoryLedgerStore::new(),
        LedgerConfig::new(owner.clone()),
        Arc::new(NoopAuditSink),
    )
    .expect("open ledger");
    let app = SuretyApp::new(AccountId::new("0xapp"), Arc::new(data));
    app.data().add_authorized_caller(&owner, app.app_id()).expect("authorize app");
    (app, owner)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies the ledger starts operational.
#[test]
fn ledger_is_operational_at_genesis() {
    let (app, _owner) = deploy();
    assert!(app.is_operational());
    assert!(app.data().is_operational());
}

/// Verifies non-owner callers cannot toggle the flag.
#[test]
fn non_owner_cannot_set_operating_status() {
    let (app, _owner) = deploy();
    for caller in ["0xairline", "0xstranger", "0xapp"] {
        let result = app.data().set_operating_status(&AccountId::new(caller), false);
        assert!(matches!(result, Err(SuretyError::Unauthorized)));
    }
    assert!(app.is_operational());
}

/// Verifies the owner can pause and unpause, including redundant writes.
#[test]
fn owner_can_set_operating_status() {
    let (app, owner) = deploy();
    app.data().set_operating_status(&owner, false).unwrap();
    assert!(!app.is_operational());
    app.data().set_operating_status(&owner, false).unwrap();
    assert!(!app.is_operational());
    app.data().set_operating_status(&owner, true).unwrap();
    assert!(app.is_operational());
}

/// Verifies every mutating operation fails with `ContractPaused` while paused.
#[test]
fn paused_ledger_rejects_all_mutations() {
    let (app, owner) = deploy();
    let airline = AccountId::new("0xairline");
    app.register_airline_as_owner(&owner, &airline).unwrap();
    app.fund(&airline, Wei::from_ether(2)).unwrap();
    let flight = app.register_flight(&airline, 1_900_000_000).unwrap();
    let before = app.data().snapshot();

    app.data().set_operating_status(&owner, false).unwrap();

    let other = AccountId::new("0xother");
    assert!(matches!(
        app.register_airline_as_owner(&owner, &other),
        Err(SuretyError::ContractPaused)
    ));
    assert!(matches!(
        app.register_airline(&airline, &other, Wei::ZERO),
        Err(SuretyError::ContractPaused)
    ));
    assert!(matches!(app.fund(&airline, Wei::from_ether(1)), Err(SuretyError::ContractPaused)));
    assert!(matches!(
        app.register_flight(&airline, 1_900_000_100),
        Err(SuretyError::ContractPaused)
    ));
    assert!(matches!(app.set_testing_mode(&owner, true), Err(SuretyError::ContractPaused)));
    assert!(matches!(
        app.data().update_flight_status(app.app_id(), flight, FlightStatus::OnTime),
        Err(SuretyError::ContractPaused)
    ));

    app.data().set_operating_status(&owner, true).unwrap();
    let mut after = app.data().snapshot();
    after.operational = before.operational;
    assert_eq!(after, before);
}

/// Verifies the pause check runs before admission for non-owner callers.
#[test]
fn pause_check_precedes_owner_check() {
    let (app, owner) = deploy();
    app.data().set_operating_status(&owner, false).unwrap();
    let stranger = AccountId::new("0xstranger");
    assert!(matches!(
        app.register_airline_as_owner(&stranger, &stranger),
        Err(SuretyError::ContractPaused)
    ));
}

/// Verifies reads keep working while paused.
#[test]
fn reads_are_available_while_paused() {
    let (app, owner) = deploy();
    let airline = AccountId::new("0xairline");
    app.register_airline_as_owner(&owner, &airline).unwrap();
    app.fund(&airline, Wei::from_ether(2)).unwrap();
    app.register_flight(&airline, 1_900_000_000).unwrap();

    app.data().set_operating_status(&owner, false).unwrap();

    assert!(app.data().get_registered_airline(&airline));
    assert_eq!(app.get_flight(FlightId::new(0)).unwrap().airline, airline);
    assert!(matches!(app.get_flight(FlightId::new(1)), Err(SuretyError::FlightNotFound(_))));
}

/// Walks the pause scenario including the testing-mode probe.
#[test]
fn pause_scenario_restores_normal_operation() {
    let (app, owner) = deploy();
    assert!(app.is_operational());
    assert!(app.data().set_operating_status(&AccountId::new("0xstranger"), false).is_err());

    app.data().set_operating_status(&owner, false).unwrap();
    assert!(matches!(app.set_testing_mode(&owner, true), Err(SuretyError::ContractPaused)));
    assert!(!app.is_testing_mode());

    app.data().set_operating_status(&owner, true).unwrap();
    app.set_testing_mode(&owner, true).unwrap();
    assert!(app.is_testing_mode());
}

/// Verifies only the owner may toggle testing mode.
#[test]
fn testing_mode_is_owner_only() {
    let (app, _owner) = deploy();
    assert!(matches!(
        app.set_testing_mode(&AccountId::new("0xstranger"), true),
        Err(SuretyError::Unauthorized)
    ));
    assert!(!app.is_testing_mode());
}
