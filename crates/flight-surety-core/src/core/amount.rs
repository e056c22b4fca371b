// crates/flight-surety-core/src/core/amount.rs
// ============================================================================
// Module: Flight Surety Amounts
// Description: Ether-denominated value type for airline funding.
// Purpose: Keep funding arithmetic exact and serialization lossless.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Funding is tracked in wei (10^-18 ether) using an unsigned 128-bit value.
//! Amounts serialize as decimal strings so canonical JSON and SQLite text
//! columns never lose precision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Minimum cumulative contribution before an airline counts as funded.
pub const DEFAULT_MIN_FUNDING: Wei = Wei::from_ether(2);

// ============================================================================
// SECTION: Wei
// ============================================================================

/// Ether-denominated amount expressed in wei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wei(u128);

impl Wei {
    /// Zero wei.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from raw wei.
    #[must_use]
    pub const fn new(wei: u128) -> Self {
        Self(wei)
    }

    /// Creates an amount from whole ether.
    #[must_use]
    pub const fn from_ether(ether: u64) -> Self {
        Self(ether as u128 * WEI_PER_ETHER)
    }

    /// Returns the raw wei value.
    #[must_use]
    pub const fn get(self) -> u128 {
        self.0
    }

    /// Returns true when the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Wei {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<u128>().map(Self)
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl Serialize for Wei {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Wei {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse::<Self>().map_err(|err| de::Error::custom(format!("invalid wei amount: {err}")))
    }
}
