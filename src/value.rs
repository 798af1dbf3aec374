//! Sequence value inputs and the safe-integer bound check.
//!
//! Callers may supply an initial sequence value either as a native integer
//! or as an arbitrary-precision decimal string (a value too large for a
//! machine integer must still be classified as overflowing, never silently
//! wrapped or truncated). The bound check therefore compares in big-integer
//! space and converts to `u64` only after it passes.

use std::str::FromStr;

use num_bigint::BigUint;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::MAX_SAFE_VALUE;

/// A sequence value as supplied by a caller.
///
/// Deserializes from either a JSON number or a decimal string, so wire
/// payloads can carry values wider than `u64` and still be rejected with
/// the overflow error rather than a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SequenceValue {
    /// A native non-negative integer value.
    Number(u64),
    /// A decimal string, evaluated with arbitrary precision.
    Text(String),
}

impl SequenceValue {
    /// Evaluates the value and enforces the [`MAX_SAFE_VALUE`] ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceOverflow`] if the value exceeds
    /// [`MAX_SAFE_VALUE`], and [`Error::InvalidValue`] if a textual value is
    /// not a non-negative decimal integer.
    pub fn into_checked(self) -> Result<u64> {
        match self {
            SequenceValue::Number(value) => {
                if value > MAX_SAFE_VALUE {
                    return Err(Error::SequenceOverflow);
                }
                Ok(value)
            }
            SequenceValue::Text(text) => {
                let trimmed = text.trim();
                let big = BigUint::from_str(trimmed)
                    .map_err(|_| Error::InvalidValue(format!("not a decimal integer: {:?}", text)))?;
                if big > BigUint::from(MAX_SAFE_VALUE) {
                    return Err(Error::SequenceOverflow);
                }
                u64::try_from(big)
                    .map_err(|_| Error::InvalidValue(format!("not a decimal integer: {:?}", text)))
            }
        }
    }
}

impl From<u64> for SequenceValue {
    fn from(value: u64) -> Self {
        SequenceValue::Number(value)
    }
}

impl From<&str> for SequenceValue {
    fn from(value: &str) -> Self {
        SequenceValue::Text(value.to_string())
    }
}

impl From<String> for SequenceValue {
    fn from(value: String) -> Self {
        SequenceValue::Text(value)
    }
}
