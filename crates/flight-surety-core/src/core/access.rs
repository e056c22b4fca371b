// crates/flight-surety-core/src/core/access.rs
// ============================================================================
// Module: Flight Surety Admission Policy
// Description: Caller roles, airline standing, and per-operation admission.
// Purpose: Keep every privilege decision in one auditable function.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Every ledger operation is named by [`Operation`]. The caller of an
//! operation is reduced to a [`CallerContext`] (owner flag plus airline
//! standing) and [`admit`] decides whether the operation may proceed. The
//! operational flag and the authorized-caller allow-list are enforced by the
//! runtime before admission runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Ledger operations subject to admission control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Toggle the operational flag.
    SetOperatingStatus,
    /// Add an app component to the storage allow-list.
    AddAuthorizedCaller,
    /// Owner bootstrap registration of an airline.
    RegisterAirlineAsOwner,
    /// Peer registration of an airline by a funded airline.
    RegisterAirline,
    /// Funding contribution by a registered airline.
    Fund,
    /// Flight registration by a funded airline.
    RegisterFlight,
    /// Flight status write through the storage channel.
    UpdateFlightStatus,
    /// Toggle the app testing mode.
    SetTestingMode,
}

impl Operation {
    /// Returns the stable wire name of the operation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SetOperatingStatus => "setOperatingStatus",
            Self::AddAuthorizedCaller => "addAuthorizedCaller",
            Self::RegisterAirlineAsOwner => "registerAirlineAsOwner",
            Self::RegisterAirline => "registerAirline",
            Self::Fund => "fund",
            Self::RegisterFlight => "registerFlight",
            Self::UpdateFlightStatus => "updateFlightStatus",
            Self::SetTestingMode => "setTestingMode",
        }
    }

    /// Returns true when the operation is rejected while the ledger is paused.
    ///
    /// Toggling the flag and managing the allow-list stay available so the
    /// owner can always recover a paused ledger.
    #[must_use]
    pub const fn requires_operational(self) -> bool {
        !matches!(self, Self::SetOperatingStatus | Self::AddAuthorizedCaller)
    }
}

// ============================================================================
// SECTION: Caller Context
// ============================================================================

/// Admission standing of an airline identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirlineStanding {
    /// Unknown or not yet admitted.
    Unregistered,
    /// Admitted but below the funding threshold.
    Registered,
    /// Admitted and funded.
    Funded,
}

/// Coarse authorization level of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Contract owner.
    Owner,
    /// Registered airline (funded or not).
    Airline,
    /// Anyone else.
    Anonymous,
}

/// Caller facts consulted by [`admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerContext {
    /// Caller is the contract owner.
    pub is_owner: bool,
    /// Caller's standing in the airline registry.
    pub standing: AirlineStanding,
}

impl CallerContext {
    /// Returns the role of the caller. Ownership takes precedence.
    #[must_use]
    pub const fn role(&self) -> Role {
        if self.is_owner {
            return Role::Owner;
        }
        match self.standing {
            AirlineStanding::Registered | AirlineStanding::Funded => Role::Airline,
            AirlineStanding::Unregistered => Role::Anonymous,
        }
    }
}

// ============================================================================
// SECTION: Admission
// ============================================================================

/// Admission denial reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Denial {
    /// Caller lacks the owner privilege.
    #[error("caller is not the contract owner")]
    Unauthorized,
    /// Registering airline has not met the funding threshold.
    #[error("sender airline is not funded")]
    SenderNotFunded,
    /// Caller is not a registered airline.
    #[error("caller is not a registered airline")]
    AirlineNotRegistered,
    /// Caller is not a registered and funded airline.
    #[error("airline is not registered and funded")]
    AirlineNotAuthorized,
}

/// Decides whether `caller` may perform `operation`.
///
/// # Errors
///
/// Returns the operation-specific [`Denial`] when the caller lacks standing.
pub const fn admit(operation: Operation, caller: &CallerContext) -> Result<(), Denial> {
    match operation {
        Operation::SetOperatingStatus
        | Operation::AddAuthorizedCaller
        | Operation::RegisterAirlineAsOwner
        | Operation::SetTestingMode => {
            if caller.is_owner {
                Ok(())
            } else {
                Err(Denial::Unauthorized)
            }
        }
        Operation::RegisterAirline => match caller.standing {
            AirlineStanding::Funded => Ok(()),
            AirlineStanding::Registered | AirlineStanding::Unregistered => {
                Err(Denial::SenderNotFunded)
            }
        },
        Operation::Fund => match caller.standing {
            AirlineStanding::Registered | AirlineStanding::Funded => Ok(()),
            AirlineStanding::Unregistered => Err(Denial::AirlineNotRegistered),
        },
        Operation::RegisterFlight => match caller.standing {
            AirlineStanding::Funded => Ok(()),
            AirlineStanding::Registered | AirlineStanding::Unregistered => {
                Err(Denial::AirlineNotAuthorized)
            }
        },
        // The allow-list check on the storage channel is the only gate.
        Operation::UpdateFlightStatus => Ok(()),
    }
}
