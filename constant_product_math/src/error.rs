use thiserror::Error;

/// Failures of the pricing functions.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CurveError {
    /// A checked add, sub, mul or narrowing cast failed.
    #[error("Arithmetic overflow")]
    Overflow,

    /// A swap was priced against a zero reserve.
    #[error("Reserve is zero")]
    EmptyReserve,

    /// Output exceeds the allowed share of the output reserve.
    #[error("Price impact exceeds the configured maximum")]
    PriceImpactExceeded,

    /// Deposit ratio is outside the tolerance band around the pool ratio.
    #[error("Deposit is not proportional to the reserves")]
    DisproportionateDeposit,

    /// reserve_in * reserve_out decreased.
    #[error("Constant product decreased")]
    InvariantViolated,

    #[error("Invalid curve parameters")]
    InvalidParams,
}
