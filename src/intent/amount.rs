//! Wei amounts
//!
//! Amounts arrive as decimal strings of any length. They are held as their
//! canonical digits so comparisons against policy ceilings never overflow;
//! conversion to a 256-bit word happens only when a transaction is built.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use ethers_core::types::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a decimal string was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty value")]
    Empty,

    #[error("sign not allowed: {0:?}")]
    Signed(String),

    #[error("invalid decimal integer: {0:?}")]
    NotDecimal(String),

    #[error("value does not fit in 256 bits: {0}")]
    Overflow(String),
}

/// Non-negative integer amount in wei, arbitrary precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeiAmount {
    // No leading zeros; "0" for zero.
    digits: String,
}

impl WeiAmount {
    pub fn zero() -> Self {
        Self {
            digits: "0".to_string(),
        }
    }

    /// `whole * 10^exp`, e.g. `from_units(200, 9)` is 200 gwei.
    pub fn from_units(whole: u64, exp: usize) -> Self {
        if whole == 0 {
            return Self::zero();
        }
        Self {
            digits: format!("{}{}", whole, "0".repeat(exp)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn to_u256(&self) -> Result<U256, AmountError> {
        U256::from_dec_str(&self.digits).map_err(|_| AmountError::Overflow(self.digits.clone()))
    }
}

/// Parse a non-negative base-10 integer: ASCII digits only, no sign, no
/// whitespace, not empty.
pub fn parse_wei(s: &str) -> Result<WeiAmount, AmountError> {
    if s.is_empty() {
        return Err(AmountError::Empty);
    }
    if s.starts_with('-') || s.starts_with('+') {
        return Err(AmountError::Signed(s.to_string()));
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotDecimal(s.to_string()));
    }

    let trimmed = s.trim_start_matches('0');
    let digits = if trimmed.is_empty() { "0" } else { trimmed };
    Ok(WeiAmount {
        digits: digits.to_string(),
    })
}

impl FromStr for WeiAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_wei(s)
    }
}

impl TryFrom<String> for WeiAmount {
    type Error = AmountError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        parse_wei(&s)
    }
}

impl From<WeiAmount> for String {
    fn from(amount: WeiAmount) -> Self {
        amount.digits
    }
}

impl From<U256> for WeiAmount {
    fn from(value: U256) -> Self {
        Self {
            digits: value.to_string(),
        }
    }
}

impl Ord for WeiAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for WeiAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WeiAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}
