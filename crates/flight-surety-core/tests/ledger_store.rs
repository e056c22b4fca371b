// crates/flight-surety-core/tests/ledger_store.rs
// ============================================================================
// Module: Ledger Store Tests
// Description: Genesis, reopen, owner binding, and store failure handling.
// Purpose: Ensure committed state only changes when the store accepts it.
// Dependencies: flight-surety-core
// ============================================================================
//! ## Overview
//! Exercises the storage component against the in-memory store and a store
//! that fails on demand, covering reopen semantics and rollback on failure.

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
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use flight_surety_core::AccountId;
use flight_surety_core::Airline;
use flight_surety_core::FlightId;
use flight_surety_core::InMemoryLedgerStore;
use flight_surety_core::LedgerConfig;
use flight_surety_core::LedgerState;
use flight_surety_core::LedgerStore;
use flight_surety_core::NoopAuditSink;
use flight_surety_core::SharedLedgerStore;
use flight_surety_core::StoreError;
use flight_surety_core::SuretyApp;
use flight_surety_core::SuretyData;
use flight_surety_core::SuretyError;
use flight_surety_core::Wei;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Store that rejects saves while the flag is set.
#[derive(Default)]
struct FlakyStore {
    /// Backing store used while saves succeed.
    inner: InMemoryLedgerStore,
    /// Rejects every save while set.
    fail_saves: AtomicBool,
}

impl LedgerStore for FlakyStore {
    fn load(&self) -> Result<Option<LedgerState>, StoreError> {
        self.inner.load()
    }

    fn save(&self, state: &LedgerState) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io("disk unavailable".to_string()));
        }
        self.inner.save(state)
    }
}

/// Opens a ledger for `owner` with auditing disabled.
fn open<S: LedgerStore>(store: S, owner: &AccountId) -> Result<SuretyData<S>, SuretyError> {
    SuretyData::open(store, LedgerConfig::new(owner.clone()), Arc::new(NoopAuditSink))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies opening an empty store persists the genesis state.
#[test]
fn open_persists_genesis() {
    let store = InMemoryLedgerStore::new();
    let owner = AccountId::new("0xowner");
    let data = open(store.clone(), &owner).unwrap();

    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved, LedgerState::genesis(owner.clone()));
    assert_eq!(data.owner(), owner);
    assert!(data.is_operational());
    assert_eq!(data.flight_count(), 0);
}

/// Verifies reopening a store resumes from the committed state.
#[test]
fn reopen_resumes_committed_state() {
    let store = InMemoryLedgerStore::new();
    let owner = AccountId::new("0xowner");
    let airline = AccountId::new("0xa1");
    {
        let data = open(store.clone(), &owner).unwrap();
        let app = SuretyApp::new(AccountId::new("0xapp"), Arc::new(data));
        app.data().add_authorized_caller(&owner, app.app_id()).unwrap();
        app.register_airline_as_owner(&owner, &airline).unwrap();
        app.fund(&airline, Wei::from_ether(2)).unwrap();
        app.register_flight(&airline, 1_900_000_000).unwrap();
        app.data().set_operating_status(&owner, false).unwrap();
    }

    let app = SuretyApp::new(AccountId::new("0xapp"), Arc::new(open(store, &owner).unwrap()));
    assert!(!app.is_operational());
    assert!(app.data().is_authorized_caller(app.app_id()));
    assert!(app.data().is_funded_airline(&airline));
    assert_eq!(app.get_flight(FlightId::new(0)).unwrap().airline, airline);

    app.data().set_operating_status(&owner, true).unwrap();
    assert_eq!(app.register_flight(&airline, 1_900_003_600).unwrap(), FlightId::new(1));
}

/// Verifies a ledger cannot be reopened under a different owner.
#[test]
fn reopen_with_other_owner_fails() {
    let store = InMemoryLedgerStore::new();
    open(store.clone(), &AccountId::new("0xowner")).unwrap();

    let result = open(store, &AccountId::new("0xintruder"));
    assert!(matches!(
        result,
        Err(SuretyError::OwnerMismatch { stored, configured })
            if stored.as_str() == "0xowner" && configured.as_str() == "0xintruder"
    ));
}

/// Verifies inconsistent snapshots are rejected on open.
#[test]
fn open_rejects_inconsistent_snapshot() {
    let owner = AccountId::new("0xowner");
    let mut state = LedgerState::genesis(owner.clone());
    let mut airline = Airline::new(AccountId::new("0xa1"));
    airline.funded = true;
    state.airlines.insert(airline.address.clone(), airline);
    let store = InMemoryLedgerStore::new();
    store.save(&state).unwrap();

    let result = open(store, &owner);
    assert!(matches!(result, Err(SuretyError::State(_))));
}

/// Verifies a failed save leaves committed state untouched.
#[test]
fn failed_save_discards_operation() {
    let owner = AccountId::new("0xowner");
    let store = Arc::new(FlakyStore::default());
    let shared = SharedLedgerStore::new(store.clone());
    let app = SuretyApp::new(AccountId::new("0xapp"), Arc::new(open(shared, &owner).unwrap()));
    app.data().add_authorized_caller(&owner, app.app_id()).unwrap();
    let airline = AccountId::new("0xa1");
    app.register_airline_as_owner(&owner, &airline).unwrap();
    let before = app.data().snapshot();

    store.fail_saves.store(true, Ordering::SeqCst);
    let result = app.fund(&airline, Wei::from_ether(2));
    assert!(matches!(result, Err(SuretyError::Store(StoreError::Io(_)))));
    assert_eq!(app.data().snapshot(), before);
    assert_eq!(store.load().unwrap().unwrap(), before);

    store.fail_saves.store(false, Ordering::SeqCst);
    app.fund(&airline, Wei::from_ether(2)).unwrap();
    assert!(app.data().is_funded_airline(&airline));
}

/// Verifies open surfaces a failing genesis save.
#[test]
fn open_fails_when_genesis_cannot_be_saved() {
    let store = FlakyStore::default();
    store.fail_saves.store(true, Ordering::SeqCst);
    let result = open(store, &AccountId::new("0xowner"));
    assert!(matches!(result, Err(SuretyError::Store(_))));
}

/// Verifies concurrent registrations serialize into dense identifiers.
#[test]
fn concurrent_flight_registrations_are_serialized() {
    let owner = AccountId::new("0xowner");
    let data = open(InMemoryLedgerStore::new(), &owner).unwrap();
    let app = Arc::new(SuretyApp::new(AccountId::new("0xapp"), Arc::new(data)));
    app.data().add_authorized_caller(&owner, app.app_id()).unwrap();
    let airline = AccountId::new("0xa1");
    app.register_airline_as_owner(&owner, &airline).unwrap();
    app.fund(&airline, Wei::from_ether(2)).unwrap();

    let handles: Vec<_> = (0 .. 8_u64)
        .map(|worker| {
            let app = Arc::clone(&app);
            let airline = airline.clone();
            std::thread::spawn(move || {
                (0 .. 25_u64)
                    .map(|n| app.register_flight(&airline, worker * 1_000 + n).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut ids: Vec<u64> =
        handles.into_iter().flat_map(|handle| handle.join().unwrap()).map(FlightId::get).collect();
    ids.sort_unstable();

    assert_eq!(ids, (0 .. 200).collect::<Vec<_>>());
    let snapshot = app.data().snapshot();
    assert!(snapshot.validate().is_ok());
    assert_eq!(snapshot.flight_count(), 200);
}
