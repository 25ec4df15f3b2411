pub mod constants;
#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;
pub mod error;
pub mod events;
pub mod instruction;
pub mod ledger;
pub mod pda;
pub mod processor;
pub mod state;

pub use constant_product_math;
pub use constants::*;
pub use solana_program;

solana_program::declare_id!("2gYBBgDhmahLSyPK1xiu7T9s3saFXDvzQGhaJZDqr3rk");
