use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::constants::{
    ADD_LIQUIDITY_DISCRIMINATOR, DISCRIMINATOR_LEN, INITIALIZE_POOL_DISCRIMINATOR,
    PROCESS_TRANSACTION_DISCRIMINATOR, SWAP_DISCRIMINATOR,
};
use crate::pda::{derive_authority, derive_pool, sorted, vault_address};

/// Defines the instructions available in the Pool program.
///
/// Wire format: an 8-byte discriminator followed by the borsh-encoded
/// arguments (little-endian `u64`s).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolInstruction {
    /// Creates the pool account and both vaults for a mint pair.
    ///
    /// Accounts (expected):
    /// 0. [read]   mint A
    /// 1. [read]   mint B
    /// 2. [writable] pool: derived from the sorted mints
    /// 3. [read]   pool authority: same address as the pool
    /// 4. [writable] vault A: associated token account of the authority for mint A
    /// 5. [writable] vault B: associated token account of the authority for mint B
    /// 6. [signer, writable] initializer: pays for the new accounts
    /// 7. [read]   token_program
    /// 8. [read]   associated_token_program
    /// 9. [read]   system_program
    InitializePool,

    /// Deposits both tokens into the vaults and bumps the recorded reserves.
    ///
    /// Accounts:
    /// 0. [writable] pool
    /// 1. [read]   pool authority
    /// 2. [read]   token A mint (the pool's canonical A)
    /// 3. [read]   token B mint
    /// 4. [writable] user token A
    /// 5. [writable] user token B
    /// 6. [writable] token A vault
    /// 7. [writable] token B vault
    /// 8. [signer] user
    /// 9. [read]   token_program
    AddLiquidity { amount_a: u64, amount_b: u64 },

    /// Swaps `amount_in` of the source mint for the destination mint.
    ///
    /// Accounts:
    /// 0. [read]   source mint
    /// 1. [read]   destination mint
    /// 2. [writable] pool
    /// 3. [read]   pool authority
    /// 4. [writable] user source token account
    /// 5. [writable] user destination token account
    /// 6. [writable] token A vault
    /// 7. [writable] token B vault
    /// 8. [signer] user
    /// 9. [read]   token_program
    Swap { amount_in: u64, min_amount_out: u64 },

    /// Plain token transfer signed by the sender account's owner.
    ///
    /// Accounts:
    /// 0. [read]   mint
    /// 1. [writable] sender token account
    /// 2. [writable] receiver token account
    /// 3. [read]   token_program
    /// 4. [signer] authority: owner of the sender token account
    ProcessTransaction { amount: u64 },
}

#[derive(BorshSerialize, BorshDeserialize)]
struct AddLiquidityArgs {
    amount_a: u64,
    amount_b: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct SwapArgs {
    amount_in: u64,
    min_amount_out: u64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct ProcessTransactionArgs {
    amount: u64,
}

impl PoolInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        if input.len() < DISCRIMINATOR_LEN {
            return Err(ProgramError::InvalidInstructionData);
        }
        let (tag, rest) = input.split_at(DISCRIMINATOR_LEN);
        let tag: [u8; 8] = tag
            .try_into()
            .map_err(|_| ProgramError::InvalidInstructionData)?;

        let instruction = match tag {
            INITIALIZE_POOL_DISCRIMINATOR => {
                if !rest.is_empty() {
                    return Err(ProgramError::InvalidInstructionData);
                }
                Self::InitializePool
            }
            ADD_LIQUIDITY_DISCRIMINATOR => {
                let args = AddLiquidityArgs::try_from_slice(rest)
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Self::AddLiquidity {
                    amount_a: args.amount_a,
                    amount_b: args.amount_b,
                }
            }
            SWAP_DISCRIMINATOR => {
                let args = SwapArgs::try_from_slice(rest)
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Self::Swap {
                    amount_in: args.amount_in,
                    min_amount_out: args.min_amount_out,
                }
            }
            PROCESS_TRANSACTION_DISCRIMINATOR => {
                let args = ProcessTransactionArgs::try_from_slice(rest)
                    .map_err(|_| ProgramError::InvalidInstructionData)?;
                Self::ProcessTransaction {
                    amount: args.amount,
                }
            }
            _ => return Err(ProgramError::InvalidInstructionData),
        };
        Ok(instruction)
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(DISCRIMINATOR_LEN + 16);
        match *self {
            Self::InitializePool => buf.extend_from_slice(&INITIALIZE_POOL_DISCRIMINATOR),
            Self::AddLiquidity { amount_a, amount_b } => {
                buf.extend_from_slice(&ADD_LIQUIDITY_DISCRIMINATOR);
                buf.extend_from_slice(&amount_a.to_le_bytes());
                buf.extend_from_slice(&amount_b.to_le_bytes());
            }
            Self::Swap {
                amount_in,
                min_amount_out,
            } => {
                buf.extend_from_slice(&SWAP_DISCRIMINATOR);
                buf.extend_from_slice(&amount_in.to_le_bytes());
                buf.extend_from_slice(&min_amount_out.to_le_bytes());
            }
            Self::ProcessTransaction { amount } => {
                buf.extend_from_slice(&PROCESS_TRANSACTION_DISCRIMINATOR);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
        }
        buf
    }
}

/// Builds an `InitializePool` instruction. Mints may be given in either order.
pub fn initialize_pool(
    program_id: &Pubkey,
    initializer: &Pubkey,
    mint_a: &Pubkey,
    mint_b: &Pubkey,
) -> Instruction {
    let (pool, _) = derive_pool(program_id, mint_a, mint_b);
    let authority = derive_authority(&pool);
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*mint_a, false),
            AccountMeta::new_readonly(*mint_b, false),
            AccountMeta::new(pool, false),
            AccountMeta::new_readonly(authority, false),
            AccountMeta::new(vault_address(&authority, mint_a), false),
            AccountMeta::new(vault_address(&authority, mint_b), false),
            AccountMeta::new(*initializer, true),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: PoolInstruction::InitializePool.pack(),
    }
}

/// Builds an `AddLiquidity` instruction. `user_token_a` holds `mint_a` and is
/// debited `amount_a`; the pair is reordered to the pool's canonical order.
#[allow(clippy::too_many_arguments)]
pub fn add_liquidity(
    program_id: &Pubkey,
    user: &Pubkey,
    mint_a: &Pubkey,
    mint_b: &Pubkey,
    user_token_a: &Pubkey,
    user_token_b: &Pubkey,
    amount_a: u64,
    amount_b: u64,
) -> Instruction {
    let (pool, _) = derive_pool(program_id, mint_a, mint_b);
    let authority = derive_authority(&pool);
    let (token_a_mint, token_b_mint) = sorted(mint_a, mint_b);
    let ((user_token_a, amount_a), (user_token_b, amount_b)) = if token_a_mint == mint_a {
        ((user_token_a, amount_a), (user_token_b, amount_b))
    } else {
        ((user_token_b, amount_b), (user_token_a, amount_a))
    };

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(pool, false),
            AccountMeta::new_readonly(authority, false),
            AccountMeta::new_readonly(*token_a_mint, false),
            AccountMeta::new_readonly(*token_b_mint, false),
            AccountMeta::new(*user_token_a, false),
            AccountMeta::new(*user_token_b, false),
            AccountMeta::new(vault_address(&authority, token_a_mint), false),
            AccountMeta::new(vault_address(&authority, token_b_mint), false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: PoolInstruction::AddLiquidity { amount_a, amount_b }.pack(),
    }
}

/// Builds a `Swap` instruction from `source_mint` into `destination_mint`.
#[allow(clippy::too_many_arguments)]
pub fn swap(
    program_id: &Pubkey,
    user: &Pubkey,
    source_mint: &Pubkey,
    destination_mint: &Pubkey,
    user_source: &Pubkey,
    user_destination: &Pubkey,
    amount_in: u64,
    min_amount_out: u64,
) -> Instruction {
    let (pool, _) = derive_pool(program_id, source_mint, destination_mint);
    let authority = derive_authority(&pool);
    let (token_a_mint, token_b_mint) = sorted(source_mint, destination_mint);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*source_mint, false),
            AccountMeta::new_readonly(*destination_mint, false),
            AccountMeta::new(pool, false),
            AccountMeta::new_readonly(authority, false),
            AccountMeta::new(*user_source, false),
            AccountMeta::new(*user_destination, false),
            AccountMeta::new(vault_address(&authority, token_a_mint), false),
            AccountMeta::new(vault_address(&authority, token_b_mint), false),
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: PoolInstruction::Swap {
            amount_in,
            min_amount_out,
        }
        .pack(),
    }
}

/// Builds a `ProcessTransaction` instruction.
pub fn process_transaction(
    program_id: &Pubkey,
    mint: &Pubkey,
    sender: &Pubkey,
    receiver: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*sender, false),
            AccountMeta::new(*receiver, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: PoolInstruction::ProcessTransaction { amount }.pack(),
    }
}
