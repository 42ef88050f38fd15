//! Fixed-point token amounts
//!
//! Balances and transfer amounts are held as integer micro-units. The ledger
//! API speaks JSON numbers, so conversion to and from `f64` happens only at the
//! wire boundary; everything in between is integer arithmetic.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Micro-units per whole AHM
pub const UNITS_PER_COIN: i64 = 1_000_000;

/// Fraction digits representable by [`Amount`]
const FRACTION_DIGITS: usize = 6;

/// Micro-units per displayed hundredth
const UNITS_PER_CENT: u64 = (UNITS_PER_COIN / 100) as u64;

/// A token amount in micro-units (10^-6 AHM)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from raw micro-units
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Raw micro-units
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Create an amount from whole coins
    pub fn from_coins(coins: i64) -> Self {
        Self(coins.saturating_mul(UNITS_PER_COIN))
    }

    /// Convert a wire value, rounding to the nearest micro-unit
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * UNITS_PER_COIN as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// Wire representation
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / UNITS_PER_COIN as f64
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }
}

/// Two-decimal fixed point, rounding half away from zero
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = (self.0.unsigned_abs() + UNITS_PER_CENT / 2) / UNITS_PER_CENT;
        let sign = if self.0 < 0 && cents > 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, cents / 100, cents % 100)
    }
}

/// Errors from parsing user-entered amounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount: {0}")]
    Invalid(String),

    #[error("amounts support at most 6 decimal places")]
    TooPrecise,

    #[error("amount is too large")]
    Overflow,
}

impl FromStr for Amount {
    type Err = AmountParseError;

    /// Parse a plain decimal string (`"50.5"`, `"-3"`, `".25"`) without going
    /// through floating point.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountParseError::Invalid(s.to_string()));
        }
        if fraction.len() > FRACTION_DIGITS {
            return Err(AmountParseError::TooPrecise);
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<i64>()
                .map_err(|_| AmountParseError::Overflow)?
        };
        let fraction_units = if fraction.is_empty() {
            0
        } else {
            format!("{:0<width$}", fraction, width = FRACTION_DIGITS)
                .parse::<i64>()
                .map_err(|_| AmountParseError::Invalid(s.to_string()))?
        };

        let units = whole_units
            .checked_mul(UNITS_PER_COIN)
            .and_then(|u| u.checked_add(fraction_units))
            .ok_or(AmountParseError::Overflow)?;

        Ok(Self(if negative { -units } else { units }))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::from_f64(value)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {}", value)))
    }
}
