// crates/flight-surety-core/src/core/audit.rs
// ============================================================================
// Module: Flight Surety Audit Events
// Description: Structured records of committed and rejected ledger operations.
// Purpose: Give every mutation attempt exactly one machine-readable trace.
// Dependencies: crate::core::{access, amount, identifiers, state}, serde
// ============================================================================

//! ## Overview
//! Audit events are emitted after a commit (with the list of changes applied)
//! or after a rejection (with the error kind). Reads never emit events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::access::Operation;
use crate::core::access::Role;
use crate::core::amount::Wei;
use crate::core::identifiers::AccountId;
use crate::core::identifiers::FlightId;
use crate::core::state::FlightStatus;

// ============================================================================
// SECTION: Changes
// ============================================================================

/// State change applied by a committed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum LedgerChange {
    /// Ledger created for `owner`.
    Genesis {
        /// Contract owner.
        owner: AccountId,
    },
    /// Operational flag written.
    OperatingStatus {
        /// New flag value.
        operational: bool,
    },
    /// App component added to the allow-list.
    CallerAuthorized {
        /// Authorized identity.
        caller: AccountId,
        /// False when the identity was already present.
        newly_added: bool,
    },
    /// Airline marked registered.
    AirlineRegistered {
        /// Registered airline.
        airline: AccountId,
        /// Identity that performed the registration.
        sponsor: AccountId,
        /// False when the airline was already registered.
        newly_registered: bool,
    },
    /// Funding credited to an airline.
    AirlineFunded {
        /// Funded airline.
        airline: AccountId,
        /// Contributed amount.
        amount: Wei,
        /// Cumulative balance after the contribution.
        balance: Wei,
        /// Funding flag after the contribution.
        funded: bool,
    },
    /// Flight appended to the registry.
    FlightRegistered {
        /// Assigned identifier.
        flight_id: FlightId,
        /// Owning airline.
        airline: AccountId,
        /// Scheduled departure.
        timestamp: u64,
    },
    /// Flight status overwritten.
    FlightStatusUpdated {
        /// Flight identifier.
        flight_id: FlightId,
        /// New status.
        status: FlightStatus,
    },
    /// Testing mode written.
    TestingMode {
        /// New flag value.
        enabled: bool,
    },
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u64,
    /// Operation attempted, absent for genesis.
    pub operation: Option<Operation>,
    /// Calling identity, absent for genesis.
    pub caller: Option<AccountId>,
    /// App component that relayed the call through the storage channel.
    pub origin: Option<AccountId>,
    /// Caller role resolved against committed state.
    pub role: Option<Role>,
    /// Changes applied (empty on rejection).
    pub changes: Vec<LedgerChange>,
    /// Error kind label on rejection.
    pub error_kind: Option<&'static str>,
}

/// Inputs describing an attempted operation.
#[derive(Debug, Clone)]
pub struct OperationAttempt {
    /// Operation attempted.
    pub operation: Operation,
    /// Calling identity.
    pub caller: AccountId,
    /// Relaying app component, when called through the storage channel.
    pub origin: Option<AccountId>,
    /// Caller role resolved against committed state.
    pub role: Role,
}

impl LedgerAuditEvent {
    /// Builds the event recorded when a ledger is created.
    #[must_use]
    pub fn genesis(owner: AccountId) -> Self {
        Self {
            event: "ledger_genesis",
            timestamp_ms: unix_millis(),
            operation: None,
            caller: None,
            origin: None,
            role: None,
            changes: vec![LedgerChange::Genesis {
                owner,
            }],
            error_kind: None,
        }
    }

    /// Builds the event recorded after a successful commit.
    #[must_use]
    pub fn committed(attempt: OperationAttempt, changes: Vec<LedgerChange>) -> Self {
        Self {
            event: "ledger_commit",
            timestamp_ms: unix_millis(),
            operation: Some(attempt.operation),
            caller: Some(attempt.caller),
            origin: attempt.origin,
            role: Some(attempt.role),
            changes,
            error_kind: None,
        }
    }

    /// Builds the event recorded after a rejected operation.
    #[must_use]
    pub fn rejected(attempt: OperationAttempt, error_kind: &'static str) -> Self {
        Self {
            event: "ledger_rejection",
            timestamp_ms: unix_millis(),
            operation: Some(attempt.operation),
            caller: Some(attempt.caller),
            origin: attempt.origin,
            role: Some(attempt.role),
            changes: Vec::new(),
            error_kind: Some(error_kind),
        }
    }
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> u64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(now.as_millis()).unwrap_or(u64::MAX)
}
