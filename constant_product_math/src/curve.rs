use spl_math::uint::U192;

use crate::error::CurveError;
use crate::math::{ceil_div, checked_add, checked_mul, checked_sub, to_u64};
use crate::params::{CurveParams, BPS_DENOMINATOR};

/// Result of pricing a swap against a pair of reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub amount_in: u64,
    /// Input left after the fee; this is what moves the price.
    pub amount_in_after_fee: u64,
    pub amount_out: u64,
    /// `amount_out / reserve_out` in basis points, rounded down.
    pub price_impact_bps: u64,
    /// Input reserve after the swap. The full input, fee included, stays in the pool.
    pub new_reserve_in: u64,
    pub new_reserve_out: u64,
}

/// Prices `amount_in` against `reserve_in`/`reserve_out` with the fee taken on input.
///
/// The post-trade output reserve is `ceil(k / (reserve_in + amount_in_after_fee))`,
/// so any rounding stays with the pool.
pub fn swap_quote(
    reserve_in: u64,
    reserve_out: u64,
    amount_in: u64,
    params: &CurveParams,
) -> Result<SwapQuote, CurveError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(CurveError::EmptyReserve);
    }

    let amount_in_after_fee = params.amount_after_fee(amount_in)?;

    let invariant = checked_mul(reserve_in, reserve_out)?;
    let effective_reserve_in = (reserve_in as u128)
        .checked_add(amount_in_after_fee as u128)
        .ok_or(CurveError::Overflow)?;

    let reserve_out_floor = ceil_div(invariant, effective_reserve_in)?;
    let amount_out = to_u64(
        (reserve_out as u128)
            .checked_sub(reserve_out_floor)
            .ok_or(CurveError::Overflow)?,
    )?;

    let new_reserve_in = checked_add(reserve_in, amount_in)?;
    let new_reserve_out = checked_sub(reserve_out, amount_out)?;

    let price_impact_bps = to_u64(
        checked_mul(amount_out, BPS_DENOMINATOR)?
            .checked_div(reserve_out as u128)
            .ok_or(CurveError::EmptyReserve)?,
    )?;

    Ok(SwapQuote {
        amount_in,
        amount_in_after_fee,
        amount_out,
        price_impact_bps,
        new_reserve_in,
        new_reserve_out,
    })
}

pub fn check_price_impact(quote: &SwapQuote, params: &CurveParams) -> Result<(), CurveError> {
    if quote.price_impact_bps > params.max_price_impact_bps {
        return Err(CurveError::PriceImpactExceeded);
    }
    Ok(())
}

/// Fails unless `new_reserve_in * new_reserve_out >= reserve_in * reserve_out`.
pub fn check_invariant(
    reserve_in: u64,
    reserve_out: u64,
    new_reserve_in: u64,
    new_reserve_out: u64,
) -> Result<(), CurveError> {
    let before = checked_mul(reserve_in, reserve_out)?;
    let after = checked_mul(new_reserve_in, new_reserve_out)?;
    if after < before {
        return Err(CurveError::InvariantViolated);
    }
    Ok(())
}

/// Accepts `amount_a : amount_b` when it is within `tolerance_bps` of `reserve_a : reserve_b`.
///
/// With `lhs = amount_a * reserve_b` and `rhs = amount_b * reserve_a`, the deposit
/// passes iff `|lhs - rhs| * 10_000 <= tolerance_bps * lhs`.
pub fn check_deposit_ratio(
    amount_a: u64,
    amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    tolerance_bps: u64,
) -> Result<(), CurveError> {
    let lhs = U192::from(checked_mul(amount_a, reserve_b)?);
    let rhs = U192::from(checked_mul(amount_b, reserve_a)?);
    let diff = if lhs > rhs { lhs - rhs } else { rhs - lhs };

    let scaled_diff = diff
        .checked_mul(U192::from(BPS_DENOMINATOR))
        .ok_or(CurveError::Overflow)?;
    let allowed = lhs
        .checked_mul(U192::from(tolerance_bps))
        .ok_or(CurveError::Overflow)?;

    if scaled_diff > allowed {
        return Err(CurveError::DisproportionateDeposit);
    }
    Ok(())
}

/// Reserves after depositing `amount_a` and `amount_b`.
///
/// The first deposit into an empty pool sets the price and is taken as given.
pub fn deposit(
    reserve_a: u64,
    reserve_b: u64,
    amount_a: u64,
    amount_b: u64,
    params: &CurveParams,
) -> Result<(u64, u64), CurveError> {
    if reserve_a != 0 || reserve_b != 0 {
        check_deposit_ratio(
            amount_a,
            amount_b,
            reserve_a,
            reserve_b,
            params.deposit_tolerance_bps,
        )?;
    }
    Ok((
        checked_add(reserve_a, amount_a)?,
        checked_add(reserve_b, amount_b)?,
    ))
}
