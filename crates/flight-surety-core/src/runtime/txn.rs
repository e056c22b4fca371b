// crates/flight-surety-core/src/runtime/txn.rs
// ============================================================================
// Module: Flight Surety Ledger Transaction
// Description: Working copy of ledger state for a single operation.
// Purpose: Apply mutations all-or-nothing and record the resulting changes.
// Dependencies: crate::core, crate::runtime::error
// ============================================================================

//! ## Overview
//! A [`LedgerTxn`] owns a copy of the committed state. Mutations apply to the
//! copy and append a [`LedgerChange`]. The runtime persists and swaps in the
//! copy only when the whole operation succeeds; an error discards it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::AccountId;
use crate::core::Airline;
use crate::core::CallerContext;
use crate::core::Flight;
use crate::core::FlightId;
use crate::core::FlightStatus;
use crate::core::LedgerChange;
use crate::core::LedgerState;
use crate::core::MAX_FLIGHT_TIMESTAMP;
use crate::core::Operation;
use crate::core::Wei;
use crate::core::admit;
use crate::core::meets_funding_threshold;
use crate::runtime::error::SuretyError;

// ============================================================================
// SECTION: Transaction
// ============================================================================

/// Working copy of the ledger for one operation.
#[derive(Debug)]
pub struct LedgerTxn {
    /// Mutable copy of the committed state.
    state: LedgerState,
    /// Funding threshold in effect.
    min_funding: Wei,
    /// Changes applied so far.
    changes: Vec<LedgerChange>,
}

impl LedgerTxn {
    /// Starts a transaction over a copy of `state`.
    pub(crate) const fn new(state: LedgerState, min_funding: Wei) -> Self {
        Self {
            state,
            min_funding,
            changes: Vec::new(),
        }
    }

    /// Returns the working state, including changes applied so far.
    #[must_use]
    pub const fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Runs the admission policy for `caller` against the working state.
    ///
    /// # Errors
    ///
    /// Returns the operation-specific denial as a [`SuretyError`].
    pub fn admit(
        &self,
        operation: Operation,
        caller: &AccountId,
    ) -> Result<CallerContext, SuretyError> {
        let context = self.state.caller_context(caller);
        admit(operation, &context)?;
        Ok(context)
    }

    /// Writes the operational flag.
    pub fn set_operational(&mut self, operational: bool) {
        self.state.operational = operational;
        self.changes.push(LedgerChange::OperatingStatus {
            operational,
        });
    }

    /// Adds `identity` to the storage allow-list. Returns false when present.
    pub fn authorize_caller(&mut self, identity: &AccountId) -> bool {
        let newly_added = self.state.authorized_callers.insert(identity.clone());
        self.changes.push(LedgerChange::CallerAuthorized {
            caller: identity.clone(),
            newly_added,
        });
        newly_added
    }

    /// Marks `airline` registered, creating the record when missing.
    ///
    /// Funding state is left as is.
    pub fn register_airline(&mut self, airline: &AccountId, sponsor: &AccountId) {
        let record =
            self.state.airlines.entry(airline.clone()).or_insert_with(|| Airline::new(airline.clone()));
        let newly_registered = !record.registered;
        record.registered = true;
        self.changes.push(LedgerChange::AirlineRegistered {
            airline: airline.clone(),
            sponsor: sponsor.clone(),
            newly_registered,
        });
    }

    /// Credits `amount` to a registered airline and applies the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::InvalidAmount`] for zero, [`SuretyError::AirlineNotRegistered`]
    /// for unknown airlines, and [`SuretyError::BalanceOverflow`] on overflow.
    pub fn credit_funding(
        &mut self,
        airline: &AccountId,
        amount: Wei,
    ) -> Result<Airline, SuretyError> {
        if amount.is_zero() {
            return Err(SuretyError::InvalidAmount("funding amount must be non-zero".to_string()));
        }
        let record = self
            .state
            .airlines
            .get_mut(airline)
            .filter(|record| record.registered)
            .ok_or(SuretyError::AirlineNotRegistered)?;
        let balance = record
            .balance
            .checked_add(amount)
            .ok_or_else(|| SuretyError::BalanceOverflow(airline.clone()))?;
        record.balance = balance;
        record.funded = record.funded || meets_funding_threshold(balance, self.min_funding);
        let updated = record.clone();
        self.changes.push(LedgerChange::AirlineFunded {
            airline: airline.clone(),
            amount,
            balance,
            funded: updated.funded,
        });
        Ok(updated)
    }

    /// Appends a flight owned by `airline` and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::AirlineNotAuthorized`] when `airline` is not
    /// registered, or [`SuretyError::InvalidTimestamp`] when `timestamp`
    /// exceeds [`MAX_FLIGHT_TIMESTAMP`].
    pub fn append_flight(
        &mut self,
        airline: &AccountId,
        timestamp: u64,
    ) -> Result<FlightId, SuretyError> {
        if !self.state.airline(airline).is_some_and(|record| record.registered) {
            return Err(SuretyError::AirlineNotAuthorized);
        }
        if timestamp > MAX_FLIGHT_TIMESTAMP {
            return Err(SuretyError::InvalidTimestamp(timestamp));
        }
        let id = FlightId::new(self.state.flight_count());
        self.state.flights.push(Flight {
            id,
            airline: airline.clone(),
            timestamp,
            status: FlightStatus::Unknown,
        });
        self.changes.push(LedgerChange::FlightRegistered {
            flight_id: id,
            airline: airline.clone(),
            timestamp,
        });
        Ok(id)
    }

    /// Overwrites the status of an existing flight.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::FlightNotFound`] for unassigned identifiers.
    pub fn set_flight_status(
        &mut self,
        id: FlightId,
        status: FlightStatus,
    ) -> Result<(), SuretyError> {
        let flight = usize::try_from(id.get())
            .ok()
            .and_then(|index| self.state.flights.get_mut(index))
            .ok_or(SuretyError::FlightNotFound(id))?;
        flight.status = status;
        self.changes.push(LedgerChange::FlightStatusUpdated {
            flight_id: id,
            status,
        });
        Ok(())
    }

    /// Writes the testing mode flag.
    pub fn set_testing_mode(&mut self, enabled: bool) {
        self.state.testing_mode = enabled;
        self.changes.push(LedgerChange::TestingMode {
            enabled,
        });
    }

    /// Consumes the transaction into the new state and its change list.
    pub(crate) fn into_parts(self) -> (LedgerState, Vec<LedgerChange>) {
        (self.state, self.changes)
    }
}
