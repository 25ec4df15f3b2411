use constant_product_math::{check_invariant, check_price_impact, deposit, swap_quote, CurveParams};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    pubkey::Pubkey,
    system_program,
};

use crate::error::{curve_error, PoolError};
use crate::events::{LiquidityAddedEvent, PoolEvent, SwapEvent, TransactionEvent};
use crate::instruction::PoolInstruction;
use crate::ledger::{Ledger, SplTokenLedger, TransferAccounts, VaultAccounts};
use crate::pda::{
    derive_authority, derive_pool, load_pool, pool_signer_seeds, sorted, validate_authority,
    validate_mint, validate_program_id, validate_signer, validate_token_account, validate_vault,
    vault_address,
};
use crate::state::LiquidityPool;

/// Processes instructions for the Pool program.
pub struct Processor;
impl Processor {
    /// Program entry: on-chain ledger, default curve parameters.
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instr_data: &[u8],
    ) -> ProgramResult {
        Self::process_with(
            program_id,
            accounts,
            instr_data,
            &mut SplTokenLedger,
            &CurveParams::DEFAULT,
        )
    }

    /// Dispatches to the instruction handlers with an explicit ledger and policy.
    pub fn process_with<L: Ledger>(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instr_data: &[u8],
        ledger: &mut L,
        params: &CurveParams,
    ) -> ProgramResult {
        params.validate().map_err(curve_error)?;
        let instruction = PoolInstruction::unpack(instr_data)?;

        match instruction {
            PoolInstruction::InitializePool => {
                Self::process_initialize_pool(program_id, accounts, ledger)
            }
            PoolInstruction::AddLiquidity { amount_a, amount_b } => {
                Self::process_add_liquidity(program_id, accounts, amount_a, amount_b, ledger, params)
            }
            PoolInstruction::Swap {
                amount_in,
                min_amount_out,
            } => Self::process_swap(program_id, accounts, amount_in, min_amount_out, ledger, params),
            PoolInstruction::ProcessTransaction { amount } => {
                Self::process_transaction(accounts, amount, ledger)
            }
        }
    }

    fn process_initialize_pool<L: Ledger>(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        ledger: &mut L,
    ) -> ProgramResult {
        msg!("Pool: InitializePool");
        let acc_iter = &mut accounts.iter();
        let mint_a_acc = next_account_info(acc_iter)?; // 0
        let mint_b_acc = next_account_info(acc_iter)?; // 1
        let pool_acc = next_account_info(acc_iter)?; // 2
        let authority_acc = next_account_info(acc_iter)?; // 3
        let vault_a_acc = next_account_info(acc_iter)?; // 4
        let vault_b_acc = next_account_info(acc_iter)?; // 5
        let initializer_acc = next_account_info(acc_iter)?; // 6
        let token_prog_acc = next_account_info(acc_iter)?; // 7
        let ata_prog_acc = next_account_info(acc_iter)?; // 8
        let system_acc = next_account_info(acc_iter)?; // 9

        // --- Signer & Programs ---
        validate_signer(initializer_acc)?;
        validate_program_id(token_prog_acc, &spl_token::id())?;
        validate_program_id(ata_prog_acc, &spl_associated_token_account::id())?;
        validate_program_id(system_acc, &system_program::id())?;

        // --- Mints ---
        if mint_a_acc.key == mint_b_acc.key {
            msg!("Mint A and Mint B cannot be the same");
            return Err(PoolError::InvalidMint.into());
        }
        validate_mint(mint_a_acc)?;
        validate_mint(mint_b_acc)?;

        // --- Derived Addresses ---
        let (pool_address, bump) = derive_pool(program_id, mint_a_acc.key, mint_b_acc.key);
        if pool_acc.key != &pool_address {
            msg!(
                "Pool ERROR: Expected pool address {}, got {}",
                pool_address,
                pool_acc.key
            );
            return Err(PoolError::InvalidOwner.into());
        }
        let authority = derive_authority(&pool_address);
        validate_authority(&authority, authority_acc)?;

        for (vault_acc, mint_acc) in [(vault_a_acc, mint_a_acc), (vault_b_acc, mint_b_acc)] {
            let expected_vault = vault_address(&authority, mint_acc.key);
            if vault_acc.key != &expected_vault {
                msg!(
                    "Vault ERROR: Expected vault {} for mint {}, got {}",
                    expected_vault,
                    mint_acc.key,
                    vault_acc.key
                );
                return Err(PoolError::InvalidVault.into());
            }
        }

        // --- State ---
        let (token_a_mint, token_b_mint) = sorted(mint_a_acc.key, mint_b_acc.key);
        let (token_a_vault, token_b_vault) = if mint_a_acc.key == token_a_mint {
            (vault_a_acc.key, vault_b_acc.key)
        } else {
            (vault_b_acc.key, vault_a_acc.key)
        };
        let pool_data = LiquidityPool {
            token_a_mint: *token_a_mint,
            token_b_mint: *token_b_mint,
            token_a_vault: *token_a_vault,
            token_b_vault: *token_b_vault,
            bump,
            reserve_a: 0,
            reserve_b: 0,
        };

        // --- Account Creation ---
        let bump_seed = [bump];
        let seeds = pool_signer_seeds(token_a_mint, token_b_mint, &bump_seed);
        ledger.create_pool_account(
            initializer_acc,
            pool_acc,
            system_acc,
            LiquidityPool::LEN,
            program_id,
            &[&seeds[..]],
        )?;
        for (vault_acc, mint_acc) in [(vault_a_acc, mint_a_acc), (vault_b_acc, mint_b_acc)] {
            ledger.create_vault(VaultAccounts {
                payer: initializer_acc,
                vault: vault_acc,
                authority: authority_acc,
                mint: mint_acc,
                system_program: system_acc,
                token_program: token_prog_acc,
                associated_token_program: ata_prog_acc,
            })?;
            // may have existed before this instruction
            validate_vault(&pool_data, &authority, vault_acc, mint_acc.key)?;
        }

        pool_data.pack(&mut pool_acc.data.borrow_mut()[..])?;
        msg!(
            "Pool: initialized {} for {} / {}",
            pool_acc.key,
            token_a_mint,
            token_b_mint
        );
        Ok(())
    }

    fn process_add_liquidity<L: Ledger>(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount_a: u64,
        amount_b: u64,
        ledger: &mut L,
        params: &CurveParams,
    ) -> ProgramResult {
        msg!("Pool AddLiq: amount_a {} amount_b {}", amount_a, amount_b);
        if amount_a == 0 || amount_b == 0 {
            return Err(PoolError::ZeroAmount.into());
        }

        let acc_iter = &mut accounts.iter();
        let pool_acc = next_account_info(acc_iter)?; // 0
        let authority_acc = next_account_info(acc_iter)?; // 1
        let mint_a_acc = next_account_info(acc_iter)?; // 2
        let mint_b_acc = next_account_info(acc_iter)?; // 3
        let user_token_a_acc = next_account_info(acc_iter)?; // 4
        let user_token_b_acc = next_account_info(acc_iter)?; // 5
        let vault_a_acc = next_account_info(acc_iter)?; // 6
        let vault_b_acc = next_account_info(acc_iter)?; // 7
        let user_acc = next_account_info(acc_iter)?; // 8
        let token_prog_acc = next_account_info(acc_iter)?; // 9

        // --- Load State & Basic Checks ---
        validate_signer(user_acc)?;
        validate_program_id(token_prog_acc, &spl_token::id())?;
        let mut pool_data = load_pool(program_id, pool_acc)?;
        let authority = derive_authority(pool_acc.key);
        validate_authority(&authority, authority_acc)?;

        // --- Account Checks vs Pool State ---
        if mint_a_acc.key != &pool_data.token_a_mint || mint_b_acc.key != &pool_data.token_b_mint
        {
            msg!(
                "Pool AddLiq: mints {} / {} do not match pool {} / {}",
                mint_a_acc.key,
                mint_b_acc.key,
                pool_data.token_a_mint,
                pool_data.token_b_mint
            );
            return Err(PoolError::InvalidMint.into());
        }
        let mint_a = validate_mint(mint_a_acc)?;
        let mint_b = validate_mint(mint_b_acc)?;
        validate_vault(&pool_data, &authority, vault_a_acc, &pool_data.token_a_mint)?;
        validate_vault(&pool_data, &authority, vault_b_acc, &pool_data.token_b_mint)?;
        validate_token_account(
            user_token_a_acc,
            Some(user_acc.key),
            &pool_data.token_a_mint,
            PoolError::InvalidMint,
        )?;
        validate_token_account(
            user_token_b_acc,
            Some(user_acc.key),
            &pool_data.token_b_mint,
            PoolError::InvalidMint,
        )?;

        // --- Reserves ---
        let (new_reserve_a, new_reserve_b) = deposit(
            pool_data.reserve_a,
            pool_data.reserve_b,
            amount_a,
            amount_b,
            params,
        )
        .map_err(curve_error)?;

        // --- Transfers ---
        ledger.transfer(
            TransferAccounts {
                token_program: token_prog_acc,
                source: user_token_a_acc,
                mint: mint_a_acc,
                destination: vault_a_acc,
                authority: user_acc,
            },
            amount_a,
            mint_a.decimals,
            &[],
        )?;
        ledger.transfer(
            TransferAccounts {
                token_program: token_prog_acc,
                source: user_token_b_acc,
                mint: mint_b_acc,
                destination: vault_b_acc,
                authority: user_acc,
            },
            amount_b,
            mint_b.decimals,
            &[],
        )?;

        pool_data.reserve_a = new_reserve_a;
        pool_data.reserve_b = new_reserve_b;
        pool_data.pack(&mut pool_acc.data.borrow_mut()[..])?;

        ledger.emit(&PoolEvent::LiquidityAdded(LiquidityAddedEvent {
            pool: *pool_acc.key,
            user: *user_acc.key,
            amount_a,
            amount_b,
        }))?;
        msg!(
            "Pool AddLiq: reserves now {} / {}",
            new_reserve_a,
            new_reserve_b
        );
        Ok(())
    }

    fn process_swap<L: Ledger>(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount_in: u64,
        min_amount_out: u64,
        ledger: &mut L,
        params: &CurveParams,
    ) -> ProgramResult {
        msg!("Pool Swap: amount_in {} min_out {}", amount_in, min_amount_out);
        if amount_in == 0 {
            return Err(PoolError::ZeroAmount.into());
        }

        let acc_iter = &mut accounts.iter();
        let source_mint_acc = next_account_info(acc_iter)?; // 0
        let destination_mint_acc = next_account_info(acc_iter)?; // 1
        let pool_acc = next_account_info(acc_iter)?; // 2
        let authority_acc = next_account_info(acc_iter)?; // 3
        let user_source_acc = next_account_info(acc_iter)?; // 4
        let user_destination_acc = next_account_info(acc_iter)?; // 5
        let vault_a_acc = next_account_info(acc_iter)?; // 6
        let vault_b_acc = next_account_info(acc_iter)?; // 7
        let user_acc = next_account_info(acc_iter)?; // 8
        let token_prog_acc = next_account_info(acc_iter)?; // 9

        // --- Load State & Basic Checks ---
        validate_signer(user_acc)?;
        validate_program_id(token_prog_acc, &spl_token::id())?;
        let mut pool_data = load_pool(program_id, pool_acc)?;
        let authority = derive_authority(pool_acc.key);
        validate_authority(&authority, authority_acc)?;

        // --- Direction ---
        let a_to_b = if source_mint_acc.key == &pool_data.token_a_mint
            && destination_mint_acc.key == &pool_data.token_b_mint
        {
            true
        } else if source_mint_acc.key == &pool_data.token_b_mint
            && destination_mint_acc.key == &pool_data.token_a_mint
        {
            false
        } else {
            msg!(
                "Pool Swap: mints {} -> {} do not match pool {} / {}",
                source_mint_acc.key,
                destination_mint_acc.key,
                pool_data.token_a_mint,
                pool_data.token_b_mint
            );
            return Err(PoolError::InvalidMint.into());
        };

        // --- Account Data Validations ---
        let source_mint = validate_mint(source_mint_acc)?;
        let destination_mint = validate_mint(destination_mint_acc)?;
        validate_vault(&pool_data, &authority, vault_a_acc, &pool_data.token_a_mint)?;
        validate_vault(&pool_data, &authority, vault_b_acc, &pool_data.token_b_mint)?;
        validate_token_account(
            user_source_acc,
            Some(user_acc.key),
            source_mint_acc.key,
            PoolError::InvalidMint,
        )?;
        validate_token_account(
            user_destination_acc,
            Some(user_acc.key),
            destination_mint_acc.key,
            PoolError::InvalidDestinationMint,
        )?;

        let (source_vault_acc, destination_vault_acc) = if a_to_b {
            (vault_a_acc, vault_b_acc)
        } else {
            (vault_b_acc, vault_a_acc)
        };
        let (reserve_in, reserve_out) = if a_to_b {
            (pool_data.reserve_a, pool_data.reserve_b)
        } else {
            (pool_data.reserve_b, pool_data.reserve_a)
        };
        if reserve_in == 0 || reserve_out == 0 {
            msg!("Pool Swap: reserves {} / {}", reserve_in, reserve_out);
            return Err(PoolError::PoolIsEmpty.into());
        }

        // --- Pricing ---
        let quote = swap_quote(reserve_in, reserve_out, amount_in, params).map_err(curve_error)?;
        msg!(
            "Pool Swap: amount_out {} price impact {} bps",
            quote.amount_out,
            quote.price_impact_bps
        );
        if quote.amount_out < min_amount_out {
            msg!(
                "Pool Swap: amount_out {} below minimum {}",
                quote.amount_out,
                min_amount_out
            );
            return Err(PoolError::SlippageExceeded.into());
        }
        check_price_impact(&quote, params).map_err(curve_error)?;
        if quote.amount_out == 0 {
            msg!("Pool Swap: input too small to produce output");
            return Err(PoolError::ZeroAmount.into());
        }
        check_invariant(
            reserve_in,
            reserve_out,
            quote.new_reserve_in,
            quote.new_reserve_out,
        )
        .map_err(curve_error)?;

        // --- Transfers ---
        ledger.transfer(
            TransferAccounts {
                token_program: token_prog_acc,
                source: user_source_acc,
                mint: source_mint_acc,
                destination: source_vault_acc,
                authority: user_acc,
            },
            amount_in,
            source_mint.decimals,
            &[],
        )?;

        let bump_seed = [pool_data.bump];
        let seeds = pool_signer_seeds(&pool_data.token_a_mint, &pool_data.token_b_mint, &bump_seed);
        ledger.transfer(
            TransferAccounts {
                token_program: token_prog_acc,
                source: destination_vault_acc,
                mint: destination_mint_acc,
                destination: user_destination_acc,
                authority: authority_acc,
            },
            quote.amount_out,
            destination_mint.decimals,
            &[&seeds[..]],
        )?;

        if a_to_b {
            pool_data.reserve_a = quote.new_reserve_in;
            pool_data.reserve_b = quote.new_reserve_out;
        } else {
            pool_data.reserve_b = quote.new_reserve_in;
            pool_data.reserve_a = quote.new_reserve_out;
        }
        pool_data.pack(&mut pool_acc.data.borrow_mut()[..])?;

        ledger.emit(&PoolEvent::Swap(SwapEvent {
            pool: *pool_acc.key,
            user: *user_acc.key,
            amount_in,
            amount_out: quote.amount_out,
            source_mint: *source_mint_acc.key,
            destination_mint: *destination_mint_acc.key,
        }))?;
        Ok(())
    }

    fn process_transaction<L: Ledger>(
        accounts: &[AccountInfo],
        amount: u64,
        ledger: &mut L,
    ) -> ProgramResult {
        msg!("Pool Transfer: amount {}", amount);
        if amount == 0 {
            return Err(PoolError::ZeroAmount.into());
        }

        let acc_iter = &mut accounts.iter();
        let mint_acc = next_account_info(acc_iter)?; // 0
        let sender_acc = next_account_info(acc_iter)?; // 1
        let receiver_acc = next_account_info(acc_iter)?; // 2
        let token_prog_acc = next_account_info(acc_iter)?; // 3
        let authority_acc = next_account_info(acc_iter)?; // 4

        validate_signer(authority_acc)?;
        validate_program_id(token_prog_acc, &spl_token::id())?;
        let mint = validate_mint(mint_acc)?;
        validate_token_account(
            sender_acc,
            Some(authority_acc.key),
            mint_acc.key,
            PoolError::InvalidMint,
        )?;
        validate_token_account(receiver_acc, None, mint_acc.key, PoolError::InvalidMint)?;

        ledger.transfer(
            TransferAccounts {
                token_program: token_prog_acc,
                source: sender_acc,
                mint: mint_acc,
                destination: receiver_acc,
                authority: authority_acc,
            },
            amount,
            mint.decimals,
            &[],
        )?;

        ledger.emit(&PoolEvent::Transaction(TransactionEvent {
            from: *authority_acc.key,
            to: *receiver_acc.key,
            amount,
        }))?;
        Ok(())
    }
}
