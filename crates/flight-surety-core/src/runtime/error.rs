// crates/flight-surety-core/src/runtime/error.rs
// ============================================================================
// Module: Flight Surety Runtime Errors
// Description: Error taxonomy for ledger operations.
// Purpose: Surface every failure synchronously with a stable kind label.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! Every failed operation leaves committed state untouched and returns one
//! [`SuretyError`]. Nothing is retried; callers fix the precondition and
//! resubmit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::AccountId;
use crate::core::Denial;
use crate::core::FlightId;
use crate::core::StateError;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Ledger operation errors.
#[derive(Debug, Error)]
pub enum SuretyError {
    /// Caller lacks the owner privilege.
    #[error("caller is not the contract owner")]
    Unauthorized,
    /// Operational flag is false.
    #[error("contract is paused")]
    ContractPaused,
    /// Storage caller is not on the allow-list.
    #[error("caller {0} is not an authorized storage caller")]
    NotAuthorized(AccountId),
    /// Registering airline has not met the funding threshold.
    #[error("sender airline is not funded")]
    SenderNotFunded,
    /// Caller is not a registered and funded airline.
    #[error("airline is not registered and funded")]
    AirlineNotAuthorized,
    /// Caller is not a registered airline.
    #[error("airline is not registered")]
    AirlineNotRegistered,
    /// Flight identifier beyond the registered range.
    #[error("flight not found: {0}")]
    FlightNotFound(FlightId),
    /// Amount rejected before any state change.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// Flight departure timestamp beyond the storable range.
    #[error("invalid flight timestamp: {0}")]
    InvalidTimestamp(u64),
    /// Funding balance would exceed the representable range.
    #[error("funding balance overflow for airline {0}")]
    BalanceOverflow(AccountId),
    /// Persisted ledger belongs to a different owner than configured.
    #[error("ledger owner mismatch: stored {stored}, configured {configured}")]
    OwnerMismatch {
        /// Owner recorded at genesis.
        stored: AccountId,
        /// Owner supplied by configuration.
        configured: AccountId,
    },
    /// Loaded snapshot violates a structural invariant.
    #[error(transparent)]
    State(#[from] StateError),
    /// Ledger store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SuretyError {
    /// Returns a stable label for logs and CLI output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::ContractPaused => "contract_paused",
            Self::NotAuthorized(_) => "not_authorized",
            Self::SenderNotFunded => "sender_not_funded",
            Self::AirlineNotAuthorized => "airline_not_authorized",
            Self::AirlineNotRegistered => "airline_not_registered",
            Self::FlightNotFound(_) => "flight_not_found",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::InvalidTimestamp(_) => "invalid_timestamp",
            Self::BalanceOverflow(_) => "balance_overflow",
            Self::OwnerMismatch {
                ..
            } => "owner_mismatch",
            Self::State(_) => "invalid_state",
            Self::Store(_) => "store",
        }
    }
}

impl From<Denial> for SuretyError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthorized => Self::Unauthorized,
            Denial::SenderNotFunded => Self::SenderNotFunded,
            Denial::AirlineNotRegistered => Self::AirlineNotRegistered,
            Denial::AirlineNotAuthorized => Self::AirlineNotAuthorized,
        }
    }
}
