use {
    constant_product_math::{swap_quote, CurveParams},
    liquidity_pool_program::{
        error::PoolError,
        events::{LiquidityAddedEvent, PoolEvent, SwapEvent, TransactionEvent},
        instruction::{add_liquidity, initialize_pool, process_transaction, swap},
        state::LiquidityPool,
    },
    proptest::prelude::*,
    solana_program::{instruction::AccountMeta, program_error::ProgramError, pubkey::Pubkey},
    spl_token::error::TokenError,
    std::error::Error,
    tests::{PoolKeys, TestAccount, TestBank},
};

const DECIMALS: u8 = 6;
const USER_FUNDS: u64 = 1_000_000_000_000;

// Common setup: an initialized, empty pool and a funded user
struct TestSetup {
    bank: TestBank,
    payer: Pubkey,
    user: Pubkey,
    keys: PoolKeys,
    user_token_a: Pubkey,
    user_token_b: Pubkey,
}

impl TestSetup {
    fn program_id(&self) -> Pubkey {
        self.bank.program_id
    }

    fn add_liquidity(&mut self, amount_a: u64, amount_b: u64) -> Result<(), ProgramError> {
        let ix = add_liquidity(
            &self.program_id(),
            &self.user,
            &self.keys.token_a_mint,
            &self.keys.token_b_mint,
            &self.user_token_a,
            &self.user_token_b,
            amount_a,
            amount_b,
        );
        self.bank.process(&ix)
    }

    fn swap_a_to_b(&mut self, amount_in: u64, min_amount_out: u64) -> Result<(), ProgramError> {
        let ix = swap(
            &self.program_id(),
            &self.user,
            &self.keys.token_a_mint,
            &self.keys.token_b_mint,
            &self.user_token_a,
            &self.user_token_b,
            amount_in,
            min_amount_out,
        );
        self.bank.process(&ix)
    }

    fn swap_b_to_a(&mut self, amount_in: u64, min_amount_out: u64) -> Result<(), ProgramError> {
        let ix = swap(
            &self.program_id(),
            &self.user,
            &self.keys.token_b_mint,
            &self.keys.token_a_mint,
            &self.user_token_b,
            &self.user_token_a,
            amount_in,
            min_amount_out,
        );
        self.bank.process(&ix)
    }

    fn pool(&self) -> Result<LiquidityPool, ProgramError> {
        self.bank.pool_state(&self.keys.pool)
    }
}

fn setup_test_environment() -> Result<TestSetup, Box<dyn Error>> {
    let mut bank = TestBank::default();
    let payer = bank.create_user();
    let user = bank.create_user();

    let mint_x = bank.create_mint(DECIMALS)?;
    let mint_y = bank.create_mint(DECIMALS)?;
    let keys = bank.prepare_pool(&mint_x, &mint_y);

    let init_ix = initialize_pool(&bank.program_id, &payer, &mint_x, &mint_y);
    bank.process(&init_ix)?;

    let user_token_a = bank.create_token_account(&keys.token_a_mint, &user, USER_FUNDS)?;
    let user_token_b = bank.create_token_account(&keys.token_b_mint, &user, USER_FUNDS)?;

    Ok(TestSetup {
        bank,
        payer,
        user,
        keys,
        user_token_a,
        user_token_b,
    })
}

/// Setup plus a 1_000_000 / 1_000_000 first deposit.
fn setup_funded_pool() -> Result<TestSetup, Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    setup.add_liquidity(1_000_000, 1_000_000)?;
    Ok(setup)
}

fn assert_pool_error(result: Result<(), ProgramError>, expected: PoolError) {
    assert_eq!(result, Err(ProgramError::from(expected)));
}

// --- InitializePool ---

#[test]
fn test_initialize_pool() -> Result<(), Box<dyn Error>> {
    let setup = setup_test_environment()?;
    let pool = setup.pool()?;

    assert!(pool.token_a_mint < pool.token_b_mint);
    assert_eq!(pool.token_a_mint, setup.keys.token_a_mint);
    assert_eq!(pool.token_b_mint, setup.keys.token_b_mint);
    assert_eq!(pool.token_a_vault, setup.keys.token_a_vault);
    assert_eq!(pool.token_b_vault, setup.keys.token_b_vault);
    assert_eq!((pool.reserve_a, pool.reserve_b), (0, 0));

    let (_, bump) = Pubkey::find_program_address(
        &[
            b"pool",
            setup.keys.token_a_mint.as_ref(),
            setup.keys.token_b_mint.as_ref(),
        ],
        &setup.program_id(),
    );
    assert_eq!(pool.bump, bump);

    for vault in [setup.keys.token_a_vault, setup.keys.token_b_vault] {
        let account = setup.bank.token_account(&vault)?;
        assert_eq!(account.owner, setup.keys.authority);
        assert_eq!(account.amount, 0);
    }
    assert_eq!(
        setup.bank.token_account(&setup.keys.token_a_vault)?.mint,
        setup.keys.token_a_mint
    );

    let pool_account = setup
        .bank
        .account(&setup.keys.pool)
        .ok_or("pool account missing")?;
    assert_eq!(pool_account.owner, setup.program_id());
    assert!(pool_account.lamports > 0);
    assert!(setup.bank.events().is_empty());
    println!("Initialize Pool Test Passed!");
    Ok(())
}

#[test]
fn test_initialize_pool_twice_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    let before = setup.bank.snapshot();

    let same_order = initialize_pool(
        &setup.program_id(),
        &setup.payer,
        &setup.keys.token_a_mint,
        &setup.keys.token_b_mint,
    );
    assert_eq!(
        setup.bank.process(&same_order),
        Err(ProgramError::AccountAlreadyInitialized)
    );

    // the reversed pair resolves to the same pool
    let reversed = initialize_pool(
        &setup.program_id(),
        &setup.payer,
        &setup.keys.token_b_mint,
        &setup.keys.token_a_mint,
    );
    assert_eq!(
        setup.bank.process(&reversed),
        Err(ProgramError::AccountAlreadyInitialized)
    );

    assert_eq!(setup.bank.snapshot(), before);
    Ok(())
}

#[test]
fn test_initialize_pool_same_mint_fails() -> Result<(), Box<dyn Error>> {
    let mut bank = TestBank::default();
    let payer = bank.create_user();
    let mint = bank.create_mint(DECIMALS)?;

    let ix = initialize_pool(&bank.program_id, &payer, &mint, &mint);
    assert_pool_error(bank.process(&ix), PoolError::InvalidMint);
    Ok(())
}

#[test]
fn test_initialize_pool_with_substituted_vault_fails() -> Result<(), Box<dyn Error>> {
    let mut bank = TestBank::default();
    let payer = bank.create_user();
    let mint_x = bank.create_mint(DECIMALS)?;
    let mint_y = bank.create_mint(DECIMALS)?;
    bank.prepare_pool(&mint_x, &mint_y);

    let mut ix = initialize_pool(&bank.program_id, &payer, &mint_x, &mint_y);
    ix.accounts[4].pubkey = Pubkey::new_unique();
    assert_pool_error(bank.process(&ix), PoolError::InvalidVault);
    Ok(())
}

#[test]
fn test_initialize_pool_survives_prefunded_addresses() -> Result<(), Box<dyn Error>> {
    let mut bank = TestBank::default();
    let payer = bank.create_user();
    let mint_x = bank.create_mint(DECIMALS)?;
    let mint_y = bank.create_mint(DECIMALS)?;
    let keys = bank.pool_keys(&mint_x, &mint_y);

    // lamports sent to the pool address and one vault address, the other vault
    // already created by someone else
    bank.set_account(keys.pool, TestAccount::system(1));
    bank.set_account(keys.token_b_vault, TestAccount::system(5));
    bank.set_token_account(keys.token_a_vault, &keys.token_a_mint, &keys.authority, 0)?;

    bank.prepare_pool(&mint_x, &mint_y);
    bank.process(&initialize_pool(&bank.program_id, &payer, &mint_x, &mint_y))?;

    let pool = bank.pool_state(&keys.pool)?;
    assert_eq!(pool.token_a_vault, keys.token_a_vault);
    assert_eq!(pool.token_b_vault, keys.token_b_vault);
    let pool_account = bank.account(&keys.pool).ok_or("pool account missing")?;
    assert_eq!(pool_account.owner, bank.program_id);
    assert!(pool_account.lamports > 1);
    for (vault, mint) in [
        (keys.token_a_vault, keys.token_a_mint),
        (keys.token_b_vault, keys.token_b_mint),
    ] {
        let account = bank.token_account(&vault)?;
        assert_eq!(account.owner, keys.authority);
        assert_eq!(account.mint, mint);
    }
    Ok(())
}

#[test]
fn test_initialize_pool_rejects_foreign_account_at_vault_address() -> Result<(), Box<dyn Error>> {
    let mut bank = TestBank::default();
    let payer = bank.create_user();
    let mint_x = bank.create_mint(DECIMALS)?;
    let mint_y = bank.create_mint(DECIMALS)?;
    let keys = bank.pool_keys(&mint_x, &mint_y);

    // a token account at the vault address that the pool does not own
    let stranger = Pubkey::new_unique();
    bank.set_token_account(keys.token_a_vault, &keys.token_a_mint, &stranger, 0)?;
    bank.prepare_pool(&mint_x, &mint_y);
    let before = bank.snapshot();

    assert_eq!(
        bank.process(&initialize_pool(&bank.program_id, &payer, &mint_x, &mint_y)),
        Err(ProgramError::IllegalOwner)
    );
    assert_eq!(bank.snapshot(), before);
    Ok(())
}

#[test]
fn test_unknown_accounts_leave_no_trace() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let extra = Pubkey::new_unique();
    let mut ix = swap(
        &setup.program_id(),
        &setup.user,
        &setup.keys.token_a_mint,
        &setup.keys.token_b_mint,
        &setup.user_token_a,
        &setup.user_token_b,
        1_000,
        996,
    );
    ix.accounts.push(AccountMeta::new_readonly(extra, false));
    setup.bank.process(&ix)?;
    assert!(setup.bank.account(&extra).is_none());

    let fake_pool = Pubkey::new_unique();
    ix.accounts[2].pubkey = fake_pool;
    assert!(setup.bank.process(&ix).is_err());
    assert!(setup.bank.account(&fake_pool).is_none());
    assert!(!setup.bank.snapshot().contains_key(&extra));
    Ok(())
}

// --- AddLiquidity ---

#[test]
fn test_add_liquidity_first_deposit() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    setup.add_liquidity(1_000_000, 4_000_000)?;

    let pool = setup.pool()?;
    assert_eq!((pool.reserve_a, pool.reserve_b), (1_000_000, 4_000_000));
    assert_eq!(setup.bank.token_balance(&setup.keys.token_a_vault)?, 1_000_000);
    assert_eq!(setup.bank.token_balance(&setup.keys.token_b_vault)?, 4_000_000);
    assert_eq!(
        setup.bank.token_balance(&setup.user_token_a)?,
        USER_FUNDS - 1_000_000
    );
    assert_eq!(
        setup.bank.token_balance(&setup.user_token_b)?,
        USER_FUNDS - 4_000_000
    );
    println!("Add Liquidity Test Passed!");
    Ok(())
}

#[test]
fn test_add_liquidity_with_mints_reversed() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    let ix = add_liquidity(
        &setup.program_id(),
        &setup.user,
        &setup.keys.token_b_mint,
        &setup.keys.token_a_mint,
        &setup.user_token_b,
        &setup.user_token_a,
        300,
        100,
    );
    setup.bank.process(&ix)?;

    let pool = setup.pool()?;
    assert_eq!((pool.reserve_a, pool.reserve_b), (100, 300));
    Ok(())
}

#[test]
fn test_add_liquidity_proportional() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    // 1% off the pool ratio is still accepted
    setup.add_liquidity(1_000, 1_010)?;
    setup.add_liquidity(500_000, 500_000)?;

    let pool = setup.pool()?;
    assert_eq!((pool.reserve_a, pool.reserve_b), (1_501_000, 1_501_010));
    Ok(())
}

#[test]
fn test_add_liquidity_disproportionate_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let before = setup.bank.snapshot();

    assert_pool_error(
        setup.add_liquidity(1_000, 1_011),
        PoolError::DisproportionateLiquidity,
    );
    assert_pool_error(
        setup.add_liquidity(1_000, 2_000),
        PoolError::DisproportionateLiquidity,
    );
    assert_eq!(setup.bank.snapshot(), before);
    Ok(())
}

#[test]
fn test_add_liquidity_zero_amount_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    assert_pool_error(setup.add_liquidity(0, 1_000), PoolError::ZeroAmount);
    assert_pool_error(setup.add_liquidity(1_000, 0), PoolError::ZeroAmount);
    Ok(())
}

#[test]
fn test_add_liquidity_overflow_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    setup.user_token_a =
        setup
            .bank
            .create_token_account(&setup.keys.token_a_mint, &setup.user, u64::MAX)?;
    setup.user_token_b =
        setup
            .bank
            .create_token_account(&setup.keys.token_b_mint, &setup.user, u64::MAX)?;

    setup.add_liquidity(u64::MAX, u64::MAX)?;
    assert_pool_error(setup.add_liquidity(1, 1), PoolError::CalculationOverflow);

    let pool = setup.pool()?;
    assert_eq!((pool.reserve_a, pool.reserve_b), (u64::MAX, u64::MAX));
    Ok(())
}

#[test]
fn test_add_liquidity_insufficient_balance_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    let before = setup.bank.snapshot();
    assert_eq!(
        setup.add_liquidity(USER_FUNDS + 1, 1),
        Err(TokenError::InsufficientFunds.into())
    );
    assert_eq!(setup.bank.snapshot(), before);
    Ok(())
}

#[test]
fn test_add_liquidity_rolls_back_on_failed_transfer() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let before = setup.bank.snapshot();

    // first transfer lands, second one fails
    setup.bank.fail_transfer_at = Some(1);
    assert_eq!(
        setup.add_liquidity(1_000, 1_000),
        Err(TokenError::AccountFrozen.into())
    );

    assert_eq!(setup.bank.snapshot(), before);
    assert_eq!(setup.bank.events().len(), 1);
    Ok(())
}

// --- Swap ---

#[test]
fn test_swap_a_to_b() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;

    println!("--- Swap A to B ---");
    setup.swap_a_to_b(1_000, 996)?;

    let pool = setup.pool()?;
    assert_eq!((pool.reserve_a, pool.reserve_b), (1_001_000, 999_004));
    assert_eq!(setup.bank.token_balance(&setup.keys.token_a_vault)?, 1_001_000);
    assert_eq!(setup.bank.token_balance(&setup.keys.token_b_vault)?, 999_004);
    assert_eq!(
        setup.bank.token_balance(&setup.user_token_a)?,
        USER_FUNDS - 1_000_000 - 1_000
    );
    assert_eq!(
        setup.bank.token_balance(&setup.user_token_b)?,
        USER_FUNDS - 1_000_000 + 996
    );
    println!("Swap A to B Test Passed!");
    Ok(())
}

#[test]
fn test_swap_b_to_a() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    setup.swap_a_to_b(1_000, 996)?;

    let expected = swap_quote(999_004, 1_001_000, 1_000, &CurveParams::DEFAULT)?;
    assert!(expected.amount_out > 0);
    let balance_a = setup.bank.token_balance(&setup.user_token_a)?;

    println!("--- Swap B to A ---");
    setup.swap_b_to_a(1_000, expected.amount_out)?;

    let pool = setup.pool()?;
    assert_eq!(pool.reserve_b, 1_000_004);
    assert_eq!(pool.reserve_a, 1_001_000 - expected.amount_out);
    assert_eq!(
        setup.bank.token_balance(&setup.user_token_a)?,
        balance_a + expected.amount_out
    );
    assert!(
        pool.reserve_a as u128 * pool.reserve_b as u128 >= 1_001_000u128 * 999_004u128,
        "product must not shrink"
    );
    Ok(())
}

#[test]
fn test_swap_slippage_exceeded() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let before = setup.bank.snapshot();

    assert_pool_error(setup.swap_a_to_b(1_000, 997), PoolError::SlippageExceeded);
    assert_eq!(setup.bank.snapshot(), before);
    Ok(())
}

#[test]
fn test_swap_zero_amount_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    assert_pool_error(setup.swap_a_to_b(0, 0), PoolError::ZeroAmount);
    Ok(())
}

#[test]
fn test_swap_dust_input_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    // 1 unit has nothing left after the fee
    assert_pool_error(setup.swap_a_to_b(1, 0), PoolError::ZeroAmount);
    Ok(())
}

#[test]
fn test_swap_overflow_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let before = setup.bank.snapshot();
    assert_pool_error(
        setup.swap_a_to_b(u64::MAX, 0),
        PoolError::CalculationOverflow,
    );
    assert_eq!(setup.bank.snapshot(), before);
    Ok(())
}

#[test]
fn test_swap_empty_pool_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    assert_pool_error(setup.swap_a_to_b(1_000, 0), PoolError::PoolIsEmpty);
    Ok(())
}

#[test]
fn test_swap_price_impact() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let before = setup.bank.snapshot();

    assert_pool_error(
        setup.swap_a_to_b(200_000, 0),
        PoolError::ExcessivePriceImpact,
    );
    assert_eq!(setup.bank.snapshot(), before);

    // just under the 10% cap
    setup.swap_a_to_b(100_000, 0)?;
    Ok(())
}

#[test]
fn test_swap_invalid_destination_mint() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let ix = swap(
        &setup.program_id(),
        &setup.user,
        &setup.keys.token_a_mint,
        &setup.keys.token_b_mint,
        &setup.user_token_a,
        &setup.user_token_a,
        1_000,
        0,
    );
    assert_pool_error(setup.bank.process(&ix), PoolError::InvalidDestinationMint);
    Ok(())
}

#[test]
fn test_swap_foreign_mint_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let other_mint = setup.bank.create_mint(DECIMALS)?;

    let mut ix = swap(
        &setup.program_id(),
        &setup.user,
        &setup.keys.token_a_mint,
        &setup.keys.token_b_mint,
        &setup.user_token_a,
        &setup.user_token_b,
        1_000,
        0,
    );
    ix.accounts[1].pubkey = other_mint;
    assert_pool_error(setup.bank.process(&ix), PoolError::InvalidMint);
    Ok(())
}

#[test]
fn test_swap_foreign_vault_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    // right mint, wrong address
    let foreign_vault =
        setup
            .bank
            .create_token_account(&setup.keys.token_a_mint, &setup.keys.authority, 0)?;

    let mut ix = swap(
        &setup.program_id(),
        &setup.user,
        &setup.keys.token_a_mint,
        &setup.keys.token_b_mint,
        &setup.user_token_a,
        &setup.user_token_b,
        1_000,
        0,
    );
    ix.accounts[6].pubkey = foreign_vault;
    assert_pool_error(setup.bank.process(&ix), PoolError::InvalidVault);
    Ok(())
}

#[test]
fn test_swap_fake_pool_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let real = setup
        .bank
        .account(&setup.keys.pool)
        .cloned()
        .ok_or("pool account missing")?;

    // same bytes, owned by another program
    let foreign_owned = Pubkey::new_unique();
    setup.bank.set_account(
        foreign_owned,
        TestAccount {
            owner: Pubkey::new_unique(),
            ..real.clone()
        },
    );
    // same bytes and owner, wrong address
    let misplaced = Pubkey::new_unique();
    setup.bank.set_account(misplaced, real);

    for fake in [foreign_owned, misplaced] {
        let mut ix = swap(
            &setup.program_id(),
            &setup.user,
            &setup.keys.token_a_mint,
            &setup.keys.token_b_mint,
            &setup.user_token_a,
            &setup.user_token_b,
            1_000,
            0,
        );
        ix.accounts[2].pubkey = fake;
        assert_pool_error(setup.bank.process(&ix), PoolError::InvalidOwner);
    }
    Ok(())
}

#[test]
fn test_swap_with_someone_elses_account_fails() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let other = setup.bank.create_user();
    let others_tokens = setup
        .bank
        .create_token_account(&setup.keys.token_a_mint, &other, 10_000)?;

    let ix = swap(
        &setup.program_id(),
        &setup.user,
        &setup.keys.token_a_mint,
        &setup.keys.token_b_mint,
        &others_tokens,
        &setup.user_token_b,
        1_000,
        0,
    );
    assert_pool_error(setup.bank.process(&ix), PoolError::InvalidOwner);
    Ok(())
}

#[test]
fn test_swap_rolls_back_on_failed_payout() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    let before = setup.bank.snapshot();

    setup.bank.fail_transfer_at = Some(1);
    assert_eq!(
        setup.swap_a_to_b(1_000, 0),
        Err(TokenError::AccountFrozen.into())
    );
    assert_eq!(setup.bank.snapshot(), before);

    // the flag only applies to one instruction
    setup.swap_a_to_b(1_000, 996)?;
    Ok(())
}

#[test]
fn test_swaps_are_deterministic() -> Result<(), Box<dyn Error>> {
    let run = || -> Result<(LiquidityPool, u64, u64), Box<dyn Error>> {
        let mut setup = setup_funded_pool()?;
        setup.swap_a_to_b(12_345, 0)?;
        setup.swap_b_to_a(6_789, 0)?;
        setup.swap_a_to_b(1_000, 0)?;
        Ok((
            setup.pool()?,
            setup.bank.token_balance(&setup.user_token_a)?,
            setup.bank.token_balance(&setup.user_token_b)?,
        ))
    };

    let (first, first_a, first_b) = run()?;
    let (second, second_a, second_b) = run()?;
    assert_eq!(
        (first.reserve_a, first.reserve_b),
        (second.reserve_a, second.reserve_b)
    );
    assert_eq!((first_a, first_b), (second_a, second_b));
    Ok(())
}

// --- Events ---

#[test]
fn test_events_are_recorded() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_funded_pool()?;
    setup.swap_a_to_b(1_000, 996)?;
    // failed instructions leave no events behind
    let _ = setup.swap_a_to_b(1_000, u64::MAX);

    assert_eq!(
        setup.bank.events(),
        &[
            PoolEvent::LiquidityAdded(LiquidityAddedEvent {
                pool: setup.keys.pool,
                user: setup.user,
                amount_a: 1_000_000,
                amount_b: 1_000_000,
            }),
            PoolEvent::Swap(SwapEvent {
                pool: setup.keys.pool,
                user: setup.user,
                amount_in: 1_000,
                amount_out: 996,
                source_mint: setup.keys.token_a_mint,
                destination_mint: setup.keys.token_b_mint,
            }),
        ]
    );
    Ok(())
}

// --- ProcessTransaction ---

#[test]
fn test_process_transaction() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    let receiver = setup.bank.create_user();
    let receiver_tokens = setup
        .bank
        .create_token_account(&setup.keys.token_a_mint, &receiver, 0)?;

    let ix = process_transaction(
        &setup.program_id(),
        &setup.keys.token_a_mint,
        &setup.user_token_a,
        &receiver_tokens,
        &setup.user,
        5_000,
    );
    setup.bank.process(&ix)?;

    assert_eq!(setup.bank.token_balance(&receiver_tokens)?, 5_000);
    assert_eq!(
        setup.bank.token_balance(&setup.user_token_a)?,
        USER_FUNDS - 5_000
    );
    assert_eq!(
        setup.bank.events(),
        &[PoolEvent::Transaction(TransactionEvent {
            from: setup.user,
            to: receiver_tokens,
            amount: 5_000,
        })]
    );
    Ok(())
}

#[test]
fn test_process_transaction_failures() -> Result<(), Box<dyn Error>> {
    let mut setup = setup_test_environment()?;
    let receiver = setup.bank.create_user();
    let receiver_tokens_b = setup
        .bank
        .create_token_account(&setup.keys.token_b_mint, &receiver, 0)?;
    let receiver_tokens_a = setup
        .bank
        .create_token_account(&setup.keys.token_a_mint, &receiver, 0)?;
    let program_id = setup.program_id();
    let mint_a = setup.keys.token_a_mint;
    let before = setup.bank.snapshot();

    let zero = process_transaction(
        &program_id,
        &mint_a,
        &setup.user_token_a,
        &receiver_tokens_a,
        &setup.user,
        0,
    );
    assert_pool_error(setup.bank.process(&zero), PoolError::ZeroAmount);

    let wrong_mint = process_transaction(
        &program_id,
        &mint_a,
        &setup.user_token_a,
        &receiver_tokens_b,
        &setup.user,
        10,
    );
    assert_pool_error(setup.bank.process(&wrong_mint), PoolError::InvalidMint);

    // the receiver cannot pull from the user's account
    let not_owner = process_transaction(
        &program_id,
        &mint_a,
        &setup.user_token_a,
        &receiver_tokens_a,
        &receiver,
        10,
    );
    assert_pool_error(setup.bank.process(&not_owner), PoolError::InvalidOwner);

    let too_much = process_transaction(
        &program_id,
        &mint_a,
        &setup.user_token_a,
        &receiver_tokens_a,
        &setup.user,
        USER_FUNDS + 1,
    );
    assert_eq!(
        setup.bank.process(&too_much),
        Err(TokenError::InsufficientFunds.into())
    );

    assert_eq!(setup.bank.snapshot(), before);
    assert!(setup.bank.events().is_empty());
    Ok(())
}

// --- Properties ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn swaps_keep_product_and_honor_minimum(
        reserve_a in 1_000_000u64..1_000_000_000,
        reserve_b in 1_000_000u64..1_000_000_000,
        trades in prop::collection::vec((any::<bool>(), 1u64..50_000), 1..6),
    ) {
        let mut setup = setup_test_environment().unwrap();
        setup.add_liquidity(reserve_a, reserve_b).unwrap();

        for (a_to_b, amount_in) in trades {
            let pool = setup.pool().unwrap();
            let (reserve_in, reserve_out) = if a_to_b {
                (pool.reserve_a, pool.reserve_b)
            } else {
                (pool.reserve_b, pool.reserve_a)
            };
            let quote = swap_quote(reserve_in, reserve_out, amount_in, &CurveParams::DEFAULT).unwrap();
            let min_amount_out = quote.amount_out;
            let user_out = if a_to_b {
                setup.user_token_b
            } else {
                setup.user_token_a
            };
            let out_before = setup.bank.token_balance(&user_out).unwrap();
            let before = setup.bank.snapshot();

            // asking for one more than the quote always fails
            let too_greedy = if a_to_b {
                setup.swap_a_to_b(amount_in, min_amount_out + 1)
            } else {
                setup.swap_b_to_a(amount_in, min_amount_out + 1)
            };
            prop_assert!(too_greedy.is_err());
            prop_assert!(setup.bank.snapshot() == before);

            let result = if a_to_b {
                setup.swap_a_to_b(amount_in, min_amount_out)
            } else {
                setup.swap_b_to_a(amount_in, min_amount_out)
            };
            if quote.amount_out == 0 {
                prop_assert_eq!(result, Err(ProgramError::from(PoolError::ZeroAmount)));
                prop_assert!(setup.bank.snapshot() == before);
                continue;
            }
            prop_assert_eq!(result, Ok(()));

            let after = setup.pool().unwrap();
            prop_assert!(
                after.reserve_a as u128 * after.reserve_b as u128
                    >= pool.reserve_a as u128 * pool.reserve_b as u128
            );
            prop_assert_eq!(
                setup.bank.token_balance(&user_out).unwrap(),
                out_before + quote.amount_out
            );
            prop_assert_eq!(
                setup.bank.token_balance(&setup.keys.token_a_vault).unwrap(),
                after.reserve_a
            );
            prop_assert_eq!(
                setup.bank.token_balance(&setup.keys.token_b_vault).unwrap(),
                after.reserve_b
            );
        }
    }
}
