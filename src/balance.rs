use std::fmt::{self, Display};

use solana_sdk::pubkey::Pubkey;
use tracing::warn;

use crate::{
    errors::Result,
    ledger::{Ledger, LedgerError},
};

/// Token balance as reported to users. Accounts that cannot be read as token
/// accounts show up as `Unknown` instead of failing the whole report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenBalance {
    Known(u64),
    Unknown,
}

impl Display for TokenBalance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenBalance::Known(amount) => write!(f, "{}", amount),
            TokenBalance::Unknown => write!(f, "unknown"),
        }
    }
}

pub async fn token_balance<L: Ledger + ?Sized>(ledger: &L, account: &Pubkey) -> Result<TokenBalance> {
    match ledger.get_token_balance(account).await {
        Ok(amount) => Ok(TokenBalance::Known(amount)),
        Err(LedgerError::NotATokenAccount(pubkey)) => {
            warn!("Not a token account {}", pubkey);
            Ok(TokenBalance::Unknown)
        }
        Err(err) => Err(err.into()),
    }
}
