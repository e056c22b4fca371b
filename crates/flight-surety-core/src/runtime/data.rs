// crates/flight-surety-core/src/runtime/data.rs
// ============================================================================
// Module: Flight Surety Data Component
// Description: Storage component holding the ledger tables and its gates.
// Purpose: Commit operations one at a time with all-or-nothing semantics.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`SuretyData`] owns the committed [`LedgerState`] and the backing
//! [`LedgerStore`]. It exposes three surfaces:
//! - read-only lookups that never mutate and never fail on unknown keys,
//! - owner operations (operational flag, authorized callers),
//! - the storage channel ([`SuretyData::execute`]) through which an
//!   allow-listed app component applies a transaction.
//!
//! Mutations are serialized by a write lock. Each one checks the operational
//! flag first, then the allow-list, then runs against a working copy that is
//! saved to the store before it replaces the committed state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;

use crate::core::AccountId;
use crate::core::Airline;
use crate::core::AirlineStanding;
use crate::core::DEFAULT_MIN_FUNDING;
use crate::core::Flight;
use crate::core::FlightId;
use crate::core::FlightStatus;
use crate::core::LedgerAuditEvent;
use crate::core::LedgerChange;
use crate::core::LedgerState;
use crate::core::Operation;
use crate::core::OperationAttempt;
use crate::core::Wei;
use crate::interfaces::LedgerAuditSink;
use crate::interfaces::LedgerStore;
use crate::runtime::error::SuretyError;
use crate::runtime::txn::LedgerTxn;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Contract owner recorded at genesis.
    pub owner: AccountId,
    /// Cumulative contribution required before an airline counts as funded.
    pub min_funding: Wei,
}

impl LedgerConfig {
    /// Creates a configuration with the default funding threshold.
    #[must_use]
    pub const fn new(owner: AccountId) -> Self {
        Self {
            owner,
            min_funding: DEFAULT_MIN_FUNDING,
        }
    }
}

// ============================================================================
// SECTION: Data Component
// ============================================================================

/// Storage component of the ledger.
pub struct SuretyData<S> {
    /// Backing store for committed state.
    store: S,
    /// Ledger configuration.
    config: LedgerConfig,
    /// Committed state. Writers hold the lock for the whole commit.
    state: RwLock<LedgerState>,
    /// Audit sink for commits and rejections.
    audit: Arc<dyn LedgerAuditSink>,
}

impl<S: LedgerStore> SuretyData<S> {
    /// Opens the ledger from `store`, creating the genesis state when empty.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::Store`] when the store fails,
    /// [`SuretyError::State`] when the saved snapshot is inconsistent, and
    /// [`SuretyError::OwnerMismatch`] when it belongs to another owner.
    pub fn open(
        store: S,
        config: LedgerConfig,
        audit: Arc<dyn LedgerAuditSink>,
    ) -> Result<Self, SuretyError> {
        let state = if let Some(state) = store.load()? {
            state.validate()?;
            if state.owner != config.owner {
                return Err(SuretyError::OwnerMismatch {
                    stored: state.owner,
                    configured: config.owner,
                });
            }
            state
        } else {
            let state = LedgerState::genesis(config.owner.clone());
            store.save(&state)?;
            audit.record(&LedgerAuditEvent::genesis(config.owner.clone()));
            state
        };
        Ok(Self {
            store,
            config,
            state: RwLock::new(state),
            audit,
        })
    }

    /// Returns the ledger configuration.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Returns the operational flag.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.read().operational
    }

    /// Returns the contract owner.
    #[must_use]
    pub fn owner(&self) -> AccountId {
        self.read().owner.clone()
    }

    /// Returns true when `identity` may use the storage channel.
    #[must_use]
    pub fn is_authorized_caller(&self, identity: &AccountId) -> bool {
        self.read().authorized_callers.contains(identity)
    }

    /// Returns true when `address` is a registered airline.
    #[must_use]
    pub fn get_registered_airline(&self, address: &AccountId) -> bool {
        self.read().standing(address) != AirlineStanding::Unregistered
    }

    /// Returns true when `address` is a registered and funded airline.
    #[must_use]
    pub fn is_funded_airline(&self, address: &AccountId) -> bool {
        self.read().standing(address) == AirlineStanding::Funded
    }

    /// Returns the airline record for `address`.
    #[must_use]
    pub fn airline(&self, address: &AccountId) -> Option<Airline> {
        self.read().airline(address).cloned()
    }

    /// Returns the number of registered airlines.
    #[must_use]
    pub fn registered_airline_count(&self) -> usize {
        self.read().registered_airline_count()
    }

    /// Returns the flight stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::FlightNotFound`] when `id` was never assigned.
    pub fn flight(&self, id: FlightId) -> Result<Flight, SuretyError> {
        self.read().flight(id).cloned().ok_or(SuretyError::FlightNotFound(id))
    }

    /// Returns the number of registered flights.
    #[must_use]
    pub fn flight_count(&self) -> u64 {
        self.read().flight_count()
    }

    /// Returns the testing mode flag.
    #[must_use]
    pub fn is_testing_mode(&self) -> bool {
        self.read().testing_mode
    }

    /// Returns a copy of the committed state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerState {
        self.read().clone()
    }

    // ------------------------------------------------------------------------
    // Owner operations
    // ------------------------------------------------------------------------

    /// Writes the operational flag. Works while paused.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::Unauthorized`] for non-owner callers.
    pub fn set_operating_status(
        &self,
        caller: &AccountId,
        operational: bool,
    ) -> Result<(), SuretyError> {
        let operation = Operation::SetOperatingStatus;
        self.commit(operation, caller, None, |txn| {
            txn.admit(operation, caller)?;
            txn.set_operational(operational);
            Ok(())
        })
    }

    /// Adds `identity` to the storage allow-list. Adding twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::Unauthorized`] for non-owner callers.
    pub fn add_authorized_caller(
        &self,
        caller: &AccountId,
        identity: &AccountId,
    ) -> Result<(), SuretyError> {
        let operation = Operation::AddAuthorizedCaller;
        self.commit(operation, caller, None, |txn| {
            txn.admit(operation, caller)?;
            txn.authorize_caller(identity);
            Ok(())
        })
    }

    // ------------------------------------------------------------------------
    // Storage channel
    // ------------------------------------------------------------------------

    /// Applies `apply` on behalf of `caller`, relayed by app component `origin`.
    ///
    /// The operational flag and the allow-list are checked before `apply`
    /// runs. Admission is left to `apply` so it can order payment crediting
    /// and admission as the operation requires.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// any error from `apply`, or [`SuretyError::Store`] when persisting fails.
    pub fn execute<T, F>(
        &self,
        origin: &AccountId,
        caller: &AccountId,
        operation: Operation,
        apply: F,
    ) -> Result<T, SuretyError>
    where
        F: FnOnce(&mut LedgerTxn) -> Result<T, SuretyError>,
    {
        self.commit(operation, caller, Some(origin), apply)
    }

    /// Overwrites the status of a flight through the storage channel.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// or [`SuretyError::FlightNotFound`].
    pub fn update_flight_status(
        &self,
        origin: &AccountId,
        id: FlightId,
        status: FlightStatus,
    ) -> Result<(), SuretyError> {
        let operation = Operation::UpdateFlightStatus;
        self.execute(origin, origin, operation, |txn| {
            txn.admit(operation, origin)?;
            txn.set_flight_status(id, status)
        })
    }

    // ------------------------------------------------------------------------
    // Commit path
    // ------------------------------------------------------------------------

    /// Serializes one operation and commits or discards its working copy.
    fn commit<T, F>(
        &self,
        operation: Operation,
        caller: &AccountId,
        origin: Option<&AccountId>,
        apply: F,
    ) -> Result<T, SuretyError>
    where
        F: FnOnce(&mut LedgerTxn) -> Result<T, SuretyError>,
    {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let attempt = OperationAttempt {
            operation,
            caller: caller.clone(),
            origin: origin.cloned(),
            role: guard.caller_context(caller).role(),
        };
        match self.stage(&guard, operation, origin, apply) {
            Ok((value, next, changes)) => {
                *guard = next;
                self.audit.record(&LedgerAuditEvent::committed(attempt, changes));
                drop(guard);
                Ok(value)
            }
            Err(err) => {
                self.audit.record(&LedgerAuditEvent::rejected(attempt, err.kind()));
                drop(guard);
                Err(err)
            }
        }
    }

    /// Runs the gates and `apply` against a copy, then persists the copy.
    fn stage<T, F>(
        &self,
        committed: &LedgerState,
        operation: Operation,
        origin: Option<&AccountId>,
        apply: F,
    ) -> Result<(T, LedgerState, Vec<LedgerChange>), SuretyError>
    where
        F: FnOnce(&mut LedgerTxn) -> Result<T, SuretyError>,
    {
        if operation.requires_operational() && !committed.operational {
            return Err(SuretyError::ContractPaused);
        }
        if let Some(origin) = origin
            && !committed.authorized_callers.contains(origin)
        {
            return Err(SuretyError::NotAuthorized(origin.clone()));
        }
        let mut txn = LedgerTxn::new(committed.clone(), self.config.min_funding);
        let value = apply(&mut txn)?;
        let (next, changes) = txn.into_parts();
        self.store.save(&next)?;
        Ok((value, next, changes))
    }

    /// Acquires the committed state for reading.
    ///
    /// A poisoned lock still guards the last committed state, since commits
    /// replace it only after every fallible step succeeded.
    fn read(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
