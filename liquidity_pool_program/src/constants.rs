/// Seed tag for the pool address. The vault authority uses the same seeds.
pub const POOL_SEED: &[u8] = b"pool";

pub const DISCRIMINATOR_LEN: usize = 8;

// Instruction discriminators: sha256("global:<instruction_name>")[..8]
pub const INITIALIZE_POOL_DISCRIMINATOR: [u8; 8] = [95, 180, 10, 172, 84, 174, 232, 40];
pub const ADD_LIQUIDITY_DISCRIMINATOR: [u8; 8] = [181, 157, 89, 67, 143, 182, 52, 72];
pub const SWAP_DISCRIMINATOR: [u8; 8] = [248, 198, 158, 145, 225, 117, 135, 200];
pub const PROCESS_TRANSACTION_DISCRIMINATOR: [u8; 8] = [70, 108, 123, 244, 12, 102, 131, 249];

// sha256("account:LiquidityPool")[..8]
pub const POOL_ACCOUNT_DISCRIMINATOR: [u8; 8] = [66, 38, 17, 64, 188, 80, 68, 129];

// Event discriminators: sha256("event:<EventName>")[..8]
pub const SWAP_EVENT_DISCRIMINATOR: [u8; 8] = [64, 198, 205, 232, 38, 8, 113, 226];
pub const LIQUIDITY_ADDED_EVENT_DISCRIMINATOR: [u8; 8] = [220, 104, 7, 39, 147, 1, 194, 142];
pub const TRANSACTION_EVENT_DISCRIMINATOR: [u8; 8] = [164, 87, 102, 61, 105, 53, 147, 32];

/// Custom error code returned when a swap would lower `reserve_in * reserve_out`.
/// Outside the `PoolError` range: reaching it means the pricing code is wrong.
pub const INVARIANT_VIOLATION: u32 = 6100;
