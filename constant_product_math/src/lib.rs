//! Constant-product pricing used by the liquidity pool program.
//!
//! Everything here is a pure function over `u64` reserves and amounts.
//! Intermediate products are widened to `u128` (or `U192` for the deposit
//! tolerance check) and every operation is checked.

pub mod curve;
pub mod error;
pub mod math;
pub mod params;

pub use curve::{check_deposit_ratio, check_invariant, check_price_impact, deposit, swap_quote, SwapQuote};
pub use error::CurveError;
pub use params::{CurveParams, BPS_DENOMINATOR};
