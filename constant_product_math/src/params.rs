use crate::error::CurveError;
use crate::math::{checked_mul, checked_sub, to_u64};

/// Basis points in a whole.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Pool policy: trading fee, price impact ceiling and deposit tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveParams {
    /// Fee charged on the swap input, as `fee_numerator / fee_denominator`.
    pub fee_numerator: u64,
    pub fee_denominator: u64,
    /// Largest accepted `amount_out / reserve_out`, in basis points.
    pub max_price_impact_bps: u64,
    /// Largest accepted deviation of a deposit from the pool ratio, in basis points.
    pub deposit_tolerance_bps: u64,
}

impl CurveParams {
    /// 0.3% fee, 10% max price impact, 1% deposit tolerance.
    pub const DEFAULT: Self = Self {
        fee_numerator: 3,
        fee_denominator: 1000,
        max_price_impact_bps: 1000,
        deposit_tolerance_bps: 100,
    };

    pub fn validate(&self) -> Result<(), CurveError> {
        if self.fee_denominator == 0
            || self.fee_numerator >= self.fee_denominator
            || self.max_price_impact_bps > BPS_DENOMINATOR
            || self.deposit_tolerance_bps > BPS_DENOMINATOR
        {
            return Err(CurveError::InvalidParams);
        }
        Ok(())
    }

    /// The part of `amount_in` that is priced, rounded down. The rest is the fee.
    pub fn amount_after_fee(&self, amount_in: u64) -> Result<u64, CurveError> {
        let keep = checked_sub(self.fee_denominator, self.fee_numerator)
            .map_err(|_| CurveError::InvalidParams)?;
        let scaled = checked_mul(amount_in, keep)?;
        let after_fee = scaled
            .checked_div(self.fee_denominator as u128)
            .ok_or(CurveError::InvalidParams)?;
        to_u64(after_fee)
    }
}

impl Default for CurveParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
