// crates/flight-surety-core/src/runtime/app.rs
// ============================================================================
// Module: Flight Surety App Component
// Description: Client-facing airline and flight operations.
// Purpose: Apply the admission policy and relay mutations to storage.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`SuretyApp`] is the app-logic component clients call. It has its own
//! identity, which the owner must add to the data component's allow-list
//! before any mutation succeeds. Each operation runs as a single transaction
//! on the data component, so a payment attached to `register_airline` is only
//! kept when the registration itself succeeds.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use crate::core::AccountId;
use crate::core::Airline;
use crate::core::AirlineStanding;
use crate::core::Flight;
use crate::core::FlightId;
use crate::core::Operation;
use crate::core::Wei;
use crate::interfaces::LedgerStore;
use crate::runtime::data::SuretyData;
use crate::runtime::error::SuretyError;

// ============================================================================
// SECTION: App Component
// ============================================================================

/// App-logic component relaying client calls to [`SuretyData`].
pub struct SuretyApp<S> {
    /// Identity presented to the storage allow-list.
    app_id: AccountId,
    /// Shared storage component.
    data: Arc<SuretyData<S>>,
}

impl<S: LedgerStore> SuretyApp<S> {
    /// Creates an app component bound to `data`.
    #[must_use]
    pub const fn new(app_id: AccountId, data: Arc<SuretyData<S>>) -> Self {
        Self {
            app_id,
            data,
        }
    }

    /// Returns the app component identity.
    #[must_use]
    pub const fn app_id(&self) -> &AccountId {
        &self.app_id
    }

    /// Returns the storage component.
    #[must_use]
    pub fn data(&self) -> &SuretyData<S> {
        &self.data
    }

    /// Returns the operational flag of the storage component.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.data.is_operational()
    }

    /// Registers `airline` without a funding check. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// or [`SuretyError::Unauthorized`].
    pub fn register_airline_as_owner(
        &self,
        caller: &AccountId,
        airline: &AccountId,
    ) -> Result<(), SuretyError> {
        let operation = Operation::RegisterAirlineAsOwner;
        self.data.execute(&self.app_id, caller, operation, |txn| {
            txn.admit(operation, caller)?;
            txn.register_airline(airline, caller);
            Ok(())
        })
    }

    /// Registers `airline` on behalf of a funded airline.
    ///
    /// A non-zero `value` is first credited to the caller's funding balance
    /// when the caller is registered. The new airline is registered but not
    /// funded.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// or [`SuretyError::SenderNotFunded`]; on error neither the payment nor
    /// the registration is kept.
    pub fn register_airline(
        &self,
        caller: &AccountId,
        airline: &AccountId,
        value: Wei,
    ) -> Result<(), SuretyError> {
        let operation = Operation::RegisterAirline;
        self.data.execute(&self.app_id, caller, operation, |txn| {
            if !value.is_zero() && txn.state().standing(caller) != AirlineStanding::Unregistered {
                txn.credit_funding(caller, value)?;
            }
            txn.admit(operation, caller)?;
            txn.register_airline(airline, caller);
            Ok(())
        })
    }

    /// Contributes `value` to the caller's funding balance.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// [`SuretyError::AirlineNotRegistered`], [`SuretyError::InvalidAmount`], or
    /// [`SuretyError::BalanceOverflow`].
    pub fn fund(&self, caller: &AccountId, value: Wei) -> Result<Airline, SuretyError> {
        let operation = Operation::Fund;
        self.data.execute(&self.app_id, caller, operation, |txn| {
            txn.admit(operation, caller)?;
            txn.credit_funding(caller, value)
        })
    }

    /// Registers a flight departing at `timestamp` for the calling airline.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// [`SuretyError::AirlineNotAuthorized`], or
    /// [`SuretyError::InvalidTimestamp`].
    pub fn register_flight(
        &self,
        caller: &AccountId,
        timestamp: u64,
    ) -> Result<FlightId, SuretyError> {
        let operation = Operation::RegisterFlight;
        self.data.execute(&self.app_id, caller, operation, |txn| {
            txn.admit(operation, caller)?;
            txn.append_flight(caller, timestamp)
        })
    }

    /// Returns the flight stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::FlightNotFound`] when `id` was never assigned.
    pub fn get_flight(&self, id: FlightId) -> Result<Flight, SuretyError> {
        self.data.flight(id)
    }

    /// Writes the testing mode flag. Owner only.
    ///
    /// # Errors
    ///
    /// Returns [`SuretyError::ContractPaused`], [`SuretyError::NotAuthorized`],
    /// or [`SuretyError::Unauthorized`].
    pub fn set_testing_mode(&self, caller: &AccountId, enabled: bool) -> Result<(), SuretyError> {
        let operation = Operation::SetTestingMode;
        self.data.execute(&self.app_id, caller, operation, |txn| {
            txn.admit(operation, caller)?;
            txn.set_testing_mode(enabled);
            Ok(())
        })
    }

    /// Returns the testing mode flag.
    #[must_use]
    pub fn is_testing_mode(&self) -> bool {
        self.data.is_testing_mode()
    }
}
