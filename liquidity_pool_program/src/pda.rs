use crate::constants::POOL_SEED;
use crate::error::PoolError;
use crate::state::LiquidityPool;
use solana_program::{
    account_info::AccountInfo, msg, program_error::ProgramError, program_pack::Pack,
    pubkey::Pubkey,
};
use spl_associated_token_account_client::address::get_associated_token_address;
use spl_token::{
    state::{Account as TokenAccount, AccountState, Mint},
    ID as TOKEN_PROGRAM_ID,
};

/// Orders a mint pair byte-lexicographically.
pub fn sorted<'a>(a: &'a Pubkey, b: &'a Pubkey) -> (&'a Pubkey, &'a Pubkey) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Get the pool address and bump seed for a mint pair, in either order.
pub fn derive_pool(program_id: &Pubkey, mint_a: &Pubkey, mint_b: &Pubkey) -> (Pubkey, u8) {
    let (lo, hi) = sorted(mint_a, mint_b);
    Pubkey::find_program_address(&[POOL_SEED, lo.as_ref(), hi.as_ref()], program_id)
}

/// The vault authority of a pool.
///
/// Authority seeds are the pool seeds, so the pool account signs for its own
/// vaults. Being off-curve, it has no private key.
pub fn derive_authority(pool_address: &Pubkey) -> Pubkey {
    *pool_address
}

/// Seeds (bump included) the pool signs with.
pub fn pool_signer_seeds<'a>(
    token_a_mint: &'a Pubkey,
    token_b_mint: &'a Pubkey,
    bump_seed: &'a [u8],
) -> [&'a [u8]; 4] {
    [
        POOL_SEED,
        token_a_mint.as_ref(),
        token_b_mint.as_ref(),
        bump_seed,
    ]
}

/// Re-derives the pool address from the stored mints and bump.
pub fn pool_address_from_state(
    program_id: &Pubkey,
    pool: &LiquidityPool,
) -> Result<Pubkey, ProgramError> {
    let bump_seed = [pool.bump];
    let seeds = pool_signer_seeds(&pool.token_a_mint, &pool.token_b_mint, &bump_seed);
    Pubkey::create_program_address(&seeds, program_id).map_err(|_| {
        msg!("Pool Error: stored seeds do not derive a program address");
        PoolError::InvalidOwner.into()
    })
}

/// Address of the pool vault holding `mint`.
pub fn vault_address(authority: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(authority, mint)
}

/// Loads the pool record and checks the account is the pool it claims to be.
/// Checks: program owner, layout, canonical mint order, address re-derivation.
pub fn load_pool(
    program_id: &Pubkey,
    pool_info: &AccountInfo,
) -> Result<LiquidityPool, ProgramError> {
    if pool_info.owner != program_id {
        msg!(
            "Pool Error: Account {} owned by {}, expected {}",
            pool_info.key,
            pool_info.owner,
            program_id
        );
        return Err(PoolError::InvalidOwner.into());
    }

    let pool = LiquidityPool::unpack(&pool_info.data.borrow())?;
    if pool.token_a_mint >= pool.token_b_mint {
        msg!("Pool Error: Account {} mints out of order", pool_info.key);
        return Err(ProgramError::InvalidAccountData);
    }

    let expected = pool_address_from_state(program_id, &pool)?;
    if &expected != pool_info.key {
        msg!(
            "Pool Error: Expected pool address {}, got {}",
            expected,
            pool_info.key
        );
        return Err(PoolError::InvalidOwner.into());
    }

    Ok(pool)
}

pub fn validate_authority(
    expected_authority: &Pubkey,
    authority_info: &AccountInfo,
) -> Result<(), ProgramError> {
    if authority_info.key != expected_authority {
        msg!(
            "Authority Error: Expected {}, got {}",
            expected_authority,
            authority_info.key
        );
        return Err(PoolError::InvalidOwner.into());
    }
    Ok(())
}

/// Validates a pool vault against the pool record.
/// Checks: recorded key, Token Program owner, Initialized, internal owner (pool authority),
/// mint, and that the balance covers the recorded reserve.
pub fn validate_vault(
    pool: &LiquidityPool,
    authority: &Pubkey,
    vault_info: &AccountInfo,
    expected_mint: &Pubkey,
) -> Result<TokenAccount, ProgramError> {
    let (recorded_reserve, recorded_vault) = pool.side(expected_mint).ok_or_else(|| {
        msg!("Vault Error: Mint {} is not in this pool", expected_mint);
        ProgramError::from(PoolError::InvalidMint)
    })?;

    if vault_info.key != recorded_vault {
        msg!(
            "Vault Error: Expected {}, got {}",
            recorded_vault,
            vault_info.key
        );
        return Err(PoolError::InvalidVault.into());
    }

    if vault_info.owner != &TOKEN_PROGRAM_ID {
        msg!(
            "Vault Error: Account {} owned by {}, expected {}",
            vault_info.key,
            vault_info.owner,
            TOKEN_PROGRAM_ID
        );
        return Err(PoolError::InvalidVault.into());
    }

    let vault = TokenAccount::unpack(&vault_info.data.borrow()).map_err(|_| {
        msg!("Vault Error: Account {} is not a token account", vault_info.key);
        ProgramError::from(PoolError::InvalidVault)
    })?;

    if vault.state != AccountState::Initialized {
        msg!("Vault Error: Account {} is not usable", vault_info.key);
        return Err(PoolError::InvalidVault.into());
    }

    if &vault.owner != authority {
        msg!(
            "Vault Error: Account {} owner {} does not match pool authority {}",
            vault_info.key,
            vault.owner,
            authority
        );
        return Err(PoolError::InvalidVault.into());
    }

    if &vault.mint != expected_mint {
        msg!(
            "Vault Error: Account {} mint {} does not match expected mint {}",
            vault_info.key,
            vault.mint,
            expected_mint
        );
        return Err(PoolError::InvalidVault.into());
    }

    if vault.amount < recorded_reserve {
        msg!(
            "Vault Error: Account {} holds {}, recorded reserve is {}",
            vault_info.key,
            vault.amount,
            recorded_reserve
        );
        return Err(PoolError::InvalidVault.into());
    }

    Ok(vault)
}

/// Validates a caller's SPL Token account.
/// Checks: Token Program owner, Initialized, internal owner (when given), mint.
/// A wrong mint fails with `mint_error`.
pub fn validate_token_account(
    account_info: &AccountInfo,
    expected_owner: Option<&Pubkey>,
    expected_mint: &Pubkey,
    mint_error: PoolError,
) -> Result<TokenAccount, ProgramError> {
    if account_info.owner != &TOKEN_PROGRAM_ID {
        msg!(
            "Token Account Error: Account {} owned by {}, expected {}",
            account_info.key,
            account_info.owner,
            TOKEN_PROGRAM_ID
        );
        return Err(ProgramError::InvalidAccountData);
    }

    let token_account = TokenAccount::unpack(&account_info.data.borrow())?;

    if token_account.state != AccountState::Initialized {
        msg!(
            "Token Account Error: Account {} is not usable",
            account_info.key
        );
        return Err(ProgramError::InvalidAccountData);
    }

    if let Some(owner) = expected_owner {
        if &token_account.owner != owner {
            msg!(
                "Token Account Error: Account {} owner {} does not match expected owner {}",
                account_info.key,
                token_account.owner,
                owner
            );
            return Err(PoolError::InvalidOwner.into());
        }
    }

    if &token_account.mint != expected_mint {
        msg!(
            "Token Account Error: Account {} mint {} does not match expected mint {}",
            account_info.key,
            token_account.mint,
            expected_mint
        );
        return Err(mint_error.into());
    }

    Ok(token_account)
}

/// Validates an SPL Mint account. Any failure is `InvalidMint`.
pub fn validate_mint(mint_info: &AccountInfo) -> Result<Mint, ProgramError> {
    if mint_info.owner != &TOKEN_PROGRAM_ID {
        msg!(
            "Mint Error: Account {} owned by {}, expected {}",
            mint_info.key,
            mint_info.owner,
            TOKEN_PROGRAM_ID
        );
        return Err(PoolError::InvalidMint.into());
    }

    Mint::unpack(&mint_info.data.borrow()).map_err(|_| {
        msg!("Mint Error: Account {} is not an initialized mint", mint_info.key);
        PoolError::InvalidMint.into()
    })
}

/// Validates that the provided account's key matches the expected program ID.
pub fn validate_program_id(
    account_info: &AccountInfo,
    expected_program_id: &Pubkey,
) -> Result<(), ProgramError> {
    if account_info.key != expected_program_id {
        msg!(
            "Program ID Error: Expected {}, got {}",
            expected_program_id,
            account_info.key
        );
        Err(ProgramError::IncorrectProgramId)
    } else {
        Ok(())
    }
}

pub fn validate_signer(account_info: &AccountInfo) -> Result<(), ProgramError> {
    if !account_info.is_signer {
        msg!("Signer Error: Account {} did not sign", account_info.key);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}
