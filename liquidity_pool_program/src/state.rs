use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::constants::{DISCRIMINATOR_LEN, POOL_ACCOUNT_DISCRIMINATOR};

/// The state account for one liquidity pool.
///
/// Mints are stored in canonical order (`token_a_mint < token_b_mint`), so
/// a pair maps to the same pool whichever order a client supplies it in.
/// On the account the record is prefixed with `POOL_ACCOUNT_DISCRIMINATOR`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct LiquidityPool {
    /// The byte-wise smaller mint of the pair.
    pub token_a_mint: Pubkey,
    /// The byte-wise larger mint of the pair.
    pub token_b_mint: Pubkey,
    /// Token account holding the pool's reserves of Token A.
    pub token_a_vault: Pubkey,
    /// Token account holding the pool's reserves of Token B.
    pub token_b_vault: Pubkey,
    /// Bump of the pool address derivation; also signs for the vaults.
    pub bump: u8,
    pub reserve_a: u64,
    pub reserve_b: u64,
}

impl LiquidityPool {
    pub const LEN: usize = DISCRIMINATOR_LEN + 32 * 4 + 1 + 8 + 8;

    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() != Self::LEN {
            msg!("Pool state: expected {} bytes, got {}", Self::LEN, data.len());
            return Err(ProgramError::InvalidAccountData);
        }
        let (discriminator, body) = data.split_at(DISCRIMINATOR_LEN);
        if discriminator != POOL_ACCOUNT_DISCRIMINATOR {
            msg!("Pool state: account discriminator mismatch");
            return Err(ProgramError::InvalidAccountData);
        }
        Self::try_from_slice(body).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        if dst.len() != Self::LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        let body = self.try_to_vec()?;
        dst[..DISCRIMINATOR_LEN].copy_from_slice(&POOL_ACCOUNT_DISCRIMINATOR);
        dst[DISCRIMINATOR_LEN..].copy_from_slice(&body);
        Ok(())
    }

    /// Recorded reserve and vault for `mint`, if it is one of the pool's mints.
    pub fn side(&self, mint: &Pubkey) -> Option<(u64, &Pubkey)> {
        if mint == &self.token_a_mint {
            Some((self.reserve_a, &self.token_a_vault))
        } else if mint == &self.token_b_mint {
            Some((self.reserve_b, &self.token_b_vault))
        } else {
            None
        }
    }
}
