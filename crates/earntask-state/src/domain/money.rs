//! # Monetary Amounts
//!
//! Fixed-point money with two decimal places, stored as integer cents.
//!
//! ## Type Decisions
//!
//! - `u64` cents covers ~184 quadrillion whole units, far beyond what a
//!   rewards wallet holds, while keeping arithmetic exact. Floats would make
//!   a 0.50 reward drift; signed types would let a bug encode a negative
//!   balance that the domain forbids.
//! - Debits are checked: an operation that would drive a balance below zero
//!   is rejected by returning `None`, never clamped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative monetary amount in cents.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Build from cents (1/100 of a display unit).
    pub const fn from_cents(cents: u64) -> Self {
        Amount(cents)
    }

    /// Build from whole display units.
    pub const fn from_units(units: u64) -> Self {
        Amount(units * 100)
    }

    /// Raw cent count.
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Returns true if the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Credit, saturating at the type maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Debit. Returns `None` if the result would be negative.
    #[must_use]
    pub const fn checked_sub(self, other: Amount) -> Option<Amount> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Amount(cents)),
            None => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Parse failures for user-entered amounts.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseAmountError;

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount; expected e.g. 12 or 12.34")
    }
}

impl std::error::Error for ParseAmountError {}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts `"12"`, `"12.3"`, and `"12.34"`. More than two decimal places
    /// is an error rather than silent truncation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(ParseAmountError);
        }
        let units: u64 = whole.parse().map_err(|_| ParseAmountError)?;
        let cents: u64 = if frac.is_empty() {
            0
        } else {
            let parsed: u64 = frac.parse().map_err(|_| ParseAmountError)?;
            if frac.len() == 1 {
                parsed * 10
            } else {
                parsed
            }
        };
        units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Amount)
            .ok_or(ParseAmountError)
    }
}
