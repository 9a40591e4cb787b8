pub mod rpc;

pub use rpc::RpcLedger;

use async_trait::async_trait;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    sysvar,
    transaction::TransactionError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account {0} is not a token account")]
    NotATokenAccount(Pubkey),

    #[error("Transaction rejected: {0}")]
    Rejected(TransactionError),

    #[error("Clock sysvar unavailable: {0}")]
    ClockUnavailable(String),

    #[error("RPC request failed: {0}")]
    Transport(String),
}

/// The remote ledger the auction program runs on.
///
/// Everything the client learns about an auction comes through here; the
/// program itself stays the authority on whether a request is valid.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Raw account data, or `None` when nothing is allocated at `address`.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Signs and submits `instructions` as one transaction, waiting for confirmation.
    async fn submit(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature, LedgerError>;

    async fn get_token_balance(&self, token_account: &Pubkey) -> Result<u64, LedgerError>;

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, LedgerError>;

    /// Cluster time as seen through the clock sysvar.
    async fn get_unix_timestamp(&self) -> Result<i64, LedgerError> {
        let data = self
            .get_account_data(&sysvar::clock::id())
            .await?
            .ok_or_else(|| LedgerError::ClockUnavailable("account not found".to_string()))?;
        unix_timestamp_from_clock(&data)
    }
}

// slot, epoch_start_timestamp, epoch, leader_schedule_epoch, unix_timestamp
const CLOCK_UNIX_TIMESTAMP_OFFSET: usize = 32;

pub fn unix_timestamp_from_clock(data: &[u8]) -> Result<i64, LedgerError> {
    data.get(CLOCK_UNIX_TIMESTAMP_OFFSET..CLOCK_UNIX_TIMESTAMP_OFFSET + 8)
        .and_then(|slice| slice.try_into().ok())
        .map(i64::from_le_bytes)
        .ok_or_else(|| {
            LedgerError::ClockUnavailable(format!("unexpected data length {}", data.len()))
        })
}

/// Cluster timestamps before the epoch are treated as zero.
pub fn as_auction_time(unix_timestamp: i64) -> u64 {
    u64::try_from(unix_timestamp).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_unix_timestamp_from_clock_layout() {
        let mut data = vec![0u8; 40];
        data[32..40].copy_from_slice(&1_650_000_000i64.to_le_bytes());
        assert_eq!(unix_timestamp_from_clock(&data).unwrap(), 1_650_000_000);
        assert!(unix_timestamp_from_clock(&data[..39]).is_err());
    }

    #[test]
    fn negative_time_clamps_to_zero() {
        assert_eq!(as_auction_time(-1), 0);
        assert_eq!(as_auction_time(42), 42);
    }
}
