//! Everything the processor asks of the runtime: account creation, token
//! transfers and event logging. On chain this is `SplTokenLedger`; hosts and
//! tests can run the processor against another `Ledger`.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    log::sol_log_data,
    msg,
    program::{invoke, invoke_signed},
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};

use crate::events::PoolEvent;

/// Accounts for creating one pool vault.
pub struct VaultAccounts<'a, 'info> {
    pub payer: &'a AccountInfo<'info>,
    pub vault: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
    pub mint: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub associated_token_program: &'a AccountInfo<'info>,
}

/// Accounts for a checked token transfer.
pub struct TransferAccounts<'a, 'info> {
    pub token_program: &'a AccountInfo<'info>,
    pub source: &'a AccountInfo<'info>,
    pub mint: &'a AccountInfo<'info>,
    pub destination: &'a AccountInfo<'info>,
    pub authority: &'a AccountInfo<'info>,
}

pub trait Ledger {
    /// Allocates `space` bytes at `pool`, owned by `owner`, keeping any lamports
    /// already sent there. Must fail if the account is already in use.
    fn create_pool_account<'info>(
        &mut self,
        payer: &AccountInfo<'info>,
        pool: &AccountInfo<'info>,
        system_program: &AccountInfo<'info>,
        space: usize,
        owner: &Pubkey,
        signer_seeds: &[&[&[u8]]],
    ) -> ProgramResult;

    /// Creates the associated token account of `authority` for `mint`. An
    /// existing one is left as it is.
    fn create_vault(&mut self, accounts: VaultAccounts<'_, '_>) -> ProgramResult;

    /// Moves `amount` from `source` to `destination`. `signer_seeds` is empty
    /// when `authority` signed the transaction itself.
    fn transfer(
        &mut self,
        accounts: TransferAccounts<'_, '_>,
        amount: u64,
        decimals: u8,
        signer_seeds: &[&[&[u8]]],
    ) -> ProgramResult;

    fn emit(&mut self, event: &PoolEvent) -> ProgramResult;
}

/// The on-chain ledger: CPIs into the System, Associated Token Account and SPL Token programs.
pub struct SplTokenLedger;

impl Ledger for SplTokenLedger {
    fn create_pool_account<'info>(
        &mut self,
        payer: &AccountInfo<'info>,
        pool: &AccountInfo<'info>,
        system_program: &AccountInfo<'info>,
        space: usize,
        owner: &Pubkey,
        signer_seeds: &[&[&[u8]]],
    ) -> ProgramResult {
        let rent = Rent::get()?;
        let required = rent.minimum_balance(space).max(1);

        // create_account refuses an address that already holds lamports
        if pool.lamports() > 0 {
            let top_up = required.saturating_sub(pool.lamports());
            msg!("Pool: address pre-funded, top up {} lamports", top_up);
            if top_up > 0 {
                invoke(
                    &system_instruction::transfer(payer.key, pool.key, top_up),
                    &[payer.clone(), pool.clone(), system_program.clone()],
                )?;
            }
            invoke_signed(
                &system_instruction::allocate(pool.key, space as u64),
                &[pool.clone(), system_program.clone()],
                signer_seeds,
            )?;
            invoke_signed(
                &system_instruction::assign(pool.key, owner),
                &[pool.clone(), system_program.clone()],
                signer_seeds,
            )
        } else {
            msg!("Pool: create_account space {} lamports {}", space, required);
            invoke_signed(
                &system_instruction::create_account(
                    payer.key,
                    pool.key,
                    required,
                    space as u64,
                    owner,
                ),
                &[payer.clone(), pool.clone(), system_program.clone()],
                signer_seeds,
            )
        }
    }

    fn create_vault(&mut self, accounts: VaultAccounts<'_, '_>) -> ProgramResult {
        invoke(
            &spl_associated_token_account::instruction::create_associated_token_account_idempotent(
                accounts.payer.key,
                accounts.authority.key,
                accounts.mint.key,
                accounts.token_program.key,
            ),
            &[
                accounts.payer.clone(),
                accounts.vault.clone(),
                accounts.authority.clone(),
                accounts.mint.clone(),
                accounts.system_program.clone(),
                accounts.token_program.clone(),
                accounts.associated_token_program.clone(),
            ],
        )
    }

    fn transfer(
        &mut self,
        accounts: TransferAccounts<'_, '_>,
        amount: u64,
        decimals: u8,
        signer_seeds: &[&[&[u8]]],
    ) -> ProgramResult {
        let ix = spl_token::instruction::transfer_checked(
            accounts.token_program.key,
            accounts.source.key,
            accounts.mint.key,
            accounts.destination.key,
            accounts.authority.key,
            &[],
            amount,
            decimals,
        )?;
        invoke_signed(
            &ix,
            &[
                accounts.source.clone(),
                accounts.mint.clone(),
                accounts.destination.clone(),
                accounts.authority.clone(),
                accounts.token_program.clone(),
            ],
            signer_seeds,
        )
    }

    fn emit(&mut self, event: &PoolEvent) -> ProgramResult {
        let data = event.to_log_data()?;
        sol_log_data(&[&data]);
        Ok(())
    }
}
