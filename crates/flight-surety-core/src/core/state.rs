// crates/flight-surety-core/src/core/state.rs
// ============================================================================
// Module: Flight Surety Ledger State
// Description: Operational flag, authorized callers, airlines, and flights.
// Purpose: Hold the four logical ledger tables as one serializable snapshot.
// Dependencies: crate::core::{access, amount, identifiers}, serde
// ============================================================================

//! ## Overview
//! [`LedgerState`] is the committed state of the ledger. It is mutated only
//! through a runtime transaction that works on a copy and swaps it in after
//! the store accepts it. Flights are append-only and stored in identifier
//! order, so a flight's position equals its identifier.
//!
//! Loaded snapshots are untrusted; [`LedgerState::validate`] checks the
//! structural invariants before a snapshot is accepted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::access::AirlineStanding;
use crate::core::access::CallerContext;
use crate::core::amount::Wei;
use crate::core::identifiers::AccountId;
use crate::core::identifiers::FlightId;

// ============================================================================
// SECTION: Airlines
// ============================================================================

/// Airline participant record.
///
/// # Invariants
/// - `funded` implies `registered`.
/// - `funded` never reverts to false once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Airline identity (primary key).
    pub address: AccountId,
    /// Whether the airline was admitted to the registry.
    pub registered: bool,
    /// Whether cumulative funding reached the threshold.
    pub funded: bool,
    /// Cumulative funding contributed by the airline.
    pub balance: Wei,
}

impl Airline {
    /// Creates an unregistered, unfunded airline record.
    #[must_use]
    pub const fn new(address: AccountId) -> Self {
        Self {
            address,
            registered: false,
            funded: false,
            balance: Wei::ZERO,
        }
    }

    /// Returns the admission standing of the airline.
    #[must_use]
    pub const fn standing(&self) -> AirlineStanding {
        match (self.registered, self.funded) {
            (true, true) => AirlineStanding::Funded,
            (true, false) => AirlineStanding::Registered,
            (false, _) => AirlineStanding::Unregistered,
        }
    }
}

/// Returns true when `balance` meets the funding threshold.
#[must_use]
pub fn meets_funding_threshold(balance: Wei, min_funding: Wei) -> bool {
    balance >= min_funding
}

// ============================================================================
// SECTION: Flights
// ============================================================================

/// Flight status as reported by the (out of scope) oracle layer.
///
/// Numeric codes: 0, 10, 20, 30, 40, 50.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    /// No status reported yet.
    #[default]
    Unknown,
    /// Departed on time.
    OnTime,
    /// Late due to the airline.
    LateAirline,
    /// Late due to weather.
    LateWeather,
    /// Late due to a technical fault.
    LateTechnical,
    /// Late for any other reason.
    LateOther,
}

impl FlightStatus {
    /// Returns the numeric wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::OnTime => 10,
            Self::LateAirline => 20,
            Self::LateWeather => 30,
            Self::LateTechnical => 40,
            Self::LateOther => 50,
        }
    }

    /// Parses a numeric wire code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            10 => Some(Self::OnTime),
            20 => Some(Self::LateAirline),
            30 => Some(Self::LateWeather),
            40 => Some(Self::LateTechnical),
            50 => Some(Self::LateOther),
            _ => None,
        }
    }
}

/// Latest departure timestamp (unix seconds) a flight may carry.
///
/// Every store backend must hold the full range, so the bound is the signed
/// 64-bit maximum.
pub const MAX_FLIGHT_TIMESTAMP: u64 = i64::MAX.unsigned_abs();

/// Registered flight record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Sequential identifier.
    pub id: FlightId,
    /// Owning airline.
    pub airline: AccountId,
    /// Scheduled departure (unix seconds), at most [`MAX_FLIGHT_TIMESTAMP`].
    pub timestamp: u64,
    /// Current status; the only mutable field.
    pub status: FlightStatus,
}

// ============================================================================
// SECTION: Ledger State
// ============================================================================

/// Committed ledger state.
///
/// # Invariants
/// - `flights[i].id == i` for every index.
/// - Every flight references a registered airline.
/// - Flight timestamps never exceed [`MAX_FLIGHT_TIMESTAMP`].
/// - Airline map keys equal the record address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Contract owner identity fixed at genesis.
    pub owner: AccountId,
    /// Operational kill-switch.
    pub operational: bool,
    /// Testing mode flag toggled through the app surface.
    pub testing_mode: bool,
    /// App components allowed to mutate storage.
    pub authorized_callers: BTreeSet<AccountId>,
    /// Airline registry keyed by address.
    pub airlines: BTreeMap<AccountId, Airline>,
    /// Flight registry in identifier order.
    pub flights: Vec<Flight>,
}

impl LedgerState {
    /// Creates the genesis state for `owner`.
    #[must_use]
    pub const fn genesis(owner: AccountId) -> Self {
        Self {
            owner,
            operational: true,
            testing_mode: false,
            authorized_callers: BTreeSet::new(),
            airlines: BTreeMap::new(),
            flights: Vec::new(),
        }
    }

    /// Returns the airline record for `address`.
    #[must_use]
    pub fn airline(&self, address: &AccountId) -> Option<&Airline> {
        self.airlines.get(address)
    }

    /// Returns the admission standing of `address`.
    #[must_use]
    pub fn standing(&self, address: &AccountId) -> AirlineStanding {
        self.airline(address).map_or(AirlineStanding::Unregistered, Airline::standing)
    }

    /// Resolves the caller context used by the admission policy.
    #[must_use]
    pub fn caller_context(&self, caller: &AccountId) -> CallerContext {
        CallerContext {
            is_owner: *caller == self.owner,
            standing: self.standing(caller),
        }
    }

    /// Returns the flight stored under `id`.
    #[must_use]
    pub fn flight(&self, id: FlightId) -> Option<&Flight> {
        usize::try_from(id.get()).ok().and_then(|index| self.flights.get(index))
    }

    /// Returns the number of registered flights.
    #[must_use]
    pub fn flight_count(&self) -> u64 {
        u64::try_from(self.flights.len()).unwrap_or(u64::MAX)
    }

    /// Returns the number of registered airlines.
    #[must_use]
    pub fn registered_airline_count(&self) -> usize {
        self.airlines.values().filter(|airline| airline.registered).count()
    }

    /// Checks the structural invariants of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] naming the first violated invariant.
    pub fn validate(&self) -> Result<(), StateError> {
        for (key, airline) in &self.airlines {
            if *key != airline.address {
                return Err(StateError::new(format!(
                    "airline key {key} does not match record address {}",
                    airline.address
                )));
            }
            if airline.funded && !airline.registered {
                return Err(StateError::new(format!("airline {key} is funded but unregistered")));
            }
        }
        for (index, flight) in self.flights.iter().enumerate() {
            if usize::try_from(flight.id.get()).ok() != Some(index) {
                return Err(StateError::new(format!(
                    "flight at position {index} carries id {}",
                    flight.id
                )));
            }
            if !self.airline(&flight.airline).is_some_and(|airline| airline.registered) {
                return Err(StateError::new(format!(
                    "flight {} references unregistered airline {}",
                    flight.id, flight.airline
                )));
            }
            if flight.timestamp > MAX_FLIGHT_TIMESTAMP {
                return Err(StateError::new(format!(
                    "flight {} departure timestamp {} is out of range",
                    flight.id, flight.timestamp
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Structural invariant violation in a ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ledger state: {0}")]
pub struct StateError(String);

impl StateError {
    /// Creates a new state error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
