use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::constants::{
    DISCRIMINATOR_LEN, LIQUIDITY_ADDED_EVENT_DISCRIMINATOR, SWAP_EVENT_DISCRIMINATOR,
    TRANSACTION_EVENT_DISCRIMINATOR,
};

/// Emitted by `AddLiquidity`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct LiquidityAddedEvent {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
}

/// Emitted by `Swap`.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct SwapEvent {
    pub pool: Pubkey,
    pub user: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    pub source_mint: Pubkey,
    pub destination_mint: Pubkey,
}

/// Emitted by `ProcessTransaction`. `from` is the signing authority, `to` the receiving token account.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct TransactionEvent {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    LiquidityAdded(LiquidityAddedEvent),
    Swap(SwapEvent),
    Transaction(TransactionEvent),
}

impl PoolEvent {
    pub fn discriminator(&self) -> [u8; 8] {
        match self {
            PoolEvent::LiquidityAdded(_) => LIQUIDITY_ADDED_EVENT_DISCRIMINATOR,
            PoolEvent::Swap(_) => SWAP_EVENT_DISCRIMINATOR,
            PoolEvent::Transaction(_) => TRANSACTION_EVENT_DISCRIMINATOR,
        }
    }

    /// Discriminator followed by the borsh-encoded event, as written to the program log.
    pub fn to_log_data(&self) -> Result<Vec<u8>, ProgramError> {
        let body = match self {
            PoolEvent::LiquidityAdded(event) => event.try_to_vec()?,
            PoolEvent::Swap(event) => event.try_to_vec()?,
            PoolEvent::Transaction(event) => event.try_to_vec()?,
        };
        let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + body.len());
        data.extend_from_slice(&self.discriminator());
        data.extend_from_slice(&body);
        Ok(data)
    }

    pub fn from_log_data(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        let (discriminator, body) = data.split_at(DISCRIMINATOR_LEN);
        let event = match <[u8; 8]>::try_from(discriminator) {
            Ok(LIQUIDITY_ADDED_EVENT_DISCRIMINATOR) => {
                PoolEvent::LiquidityAdded(LiquidityAddedEvent::try_from_slice(body)?)
            }
            Ok(SWAP_EVENT_DISCRIMINATOR) => PoolEvent::Swap(SwapEvent::try_from_slice(body)?),
            Ok(TRANSACTION_EVENT_DISCRIMINATOR) => {
                PoolEvent::Transaction(TransactionEvent::try_from_slice(body)?)
            }
            _ => return Err(ProgramError::InvalidAccountData),
        };
        Ok(event)
    }
}
