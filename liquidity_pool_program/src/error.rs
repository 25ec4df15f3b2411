use constant_product_math::CurveError;
use solana_program::{msg, program_error::ProgramError};
use thiserror::Error;

use crate::constants::INVARIANT_VIOLATION;

/// Errors returned by the pool program. Codes are stable and surface as
/// `ProgramError::Custom(code)`.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum PoolError {
    /// Mint is malformed, duplicated, or not one of the pool's mints.
    #[error("Invalid token mint provided")]
    InvalidMint = 6000,

    /// Destination token account holds the wrong mint.
    #[error("Invalid destination token mint provided")]
    InvalidDestinationMint = 6001,

    #[error("Input amount must be greater than zero")]
    ZeroAmount = 6002,

    #[error("Pool reserve is zero, cannot swap")]
    PoolIsEmpty = 6003,

    /// Output fell below the caller's minimum.
    #[error("Slippage tolerance exceeded")]
    SlippageExceeded = 6004,

    #[error("Calculation overflow")]
    CalculationOverflow = 6005,

    /// Vault is not the pool's recorded vault, not owned by the pool authority,
    /// holds the wrong mint, or holds less than the recorded reserve.
    #[error("Invalid vault account provided")]
    InvalidVault = 6006,

    /// Account is not owned by the expected authority, or a derived address
    /// does not match its recomputation.
    #[error("Invalid owner of the account")]
    InvalidOwner = 6007,

    #[error("Price impact too high")]
    ExcessivePriceImpact = 6008,

    #[error("Disproportionate liquidity provided")]
    DisproportionateLiquidity = 6009,
}

impl PoolError {
    pub fn code(self) -> u32 {
        self as u32
    }
}

impl From<PoolError> for ProgramError {
    fn from(e: PoolError) -> Self {
        ProgramError::Custom(e.code())
    }
}

impl TryFrom<u32> for PoolError {
    type Error = ProgramError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            6000 => Ok(PoolError::InvalidMint),
            6001 => Ok(PoolError::InvalidDestinationMint),
            6002 => Ok(PoolError::ZeroAmount),
            6003 => Ok(PoolError::PoolIsEmpty),
            6004 => Ok(PoolError::SlippageExceeded),
            6005 => Ok(PoolError::CalculationOverflow),
            6006 => Ok(PoolError::InvalidVault),
            6007 => Ok(PoolError::InvalidOwner),
            6008 => Ok(PoolError::ExcessivePriceImpact),
            6009 => Ok(PoolError::DisproportionateLiquidity),
            _ => Err(ProgramError::InvalidArgument),
        }
    }
}

/// Maps a pricing failure onto the program's error surface.
pub fn curve_error(err: CurveError) -> ProgramError {
    match err {
        CurveError::Overflow => PoolError::CalculationOverflow.into(),
        CurveError::EmptyReserve => PoolError::PoolIsEmpty.into(),
        CurveError::PriceImpactExceeded => PoolError::ExcessivePriceImpact.into(),
        CurveError::DisproportionateDeposit => PoolError::DisproportionateLiquidity.into(),
        CurveError::InvariantViolated => {
            msg!("Pool FATAL: constant product decreased");
            ProgramError::Custom(INVARIANT_VIOLATION)
        }
        CurveError::InvalidParams => ProgramError::InvalidArgument,
    }
}
