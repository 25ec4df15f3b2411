//! Checked integer primitives. Every failure is `CurveError::Overflow`.

use crate::error::CurveError;

pub fn checked_add(a: u64, b: u64) -> Result<u64, CurveError> {
    a.checked_add(b).ok_or(CurveError::Overflow)
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64, CurveError> {
    a.checked_sub(b).ok_or(CurveError::Overflow)
}

/// Widening multiply.
pub fn checked_mul(a: u64, b: u64) -> Result<u128, CurveError> {
    (a as u128)
        .checked_mul(b as u128)
        .ok_or(CurveError::Overflow)
}

/// Division rounding toward positive infinity. A zero divisor is an error.
pub fn ceil_div(numerator: u128, denominator: u128) -> Result<u128, CurveError> {
    if denominator == 0 {
        return Err(CurveError::Overflow);
    }
    let quotient = numerator / denominator;
    if numerator % denominator == 0 {
        Ok(quotient)
    } else {
        quotient.checked_add(1).ok_or(CurveError::Overflow)
    }
}

pub fn to_u64(value: u128) -> Result<u64, CurveError> {
    u64::try_from(value).map_err(|_| CurveError::Overflow)
}
