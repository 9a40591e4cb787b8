use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::{
    errors::{AuctionClientError, Result},
    ledger::Ledger,
    state::Auction,
};

/// Reads the auction stored at `escrow`.
///
/// Returns `Ok(None)` when no auction exists there: the account was never
/// allocated, has been closed, or still carries the zeroed record. Data of the
/// wrong size is a decode error rather than an absent auction.
pub async fn read_auction<L: Ledger + ?Sized>(ledger: &L, escrow: &Pubkey) -> Result<Option<Auction>> {
    let data = match ledger.get_account_data(escrow).await? {
        Some(data) if !data.is_empty() => data,
        _ => {
            debug!("Escrow account {} has no data", escrow);
            return Ok(None);
        }
    };

    let auction = Auction::unpack(&data)?;
    if !auction.is_initialized {
        debug!("Escrow account {} is not initialized", escrow);
        return Ok(None);
    }

    Ok(Some(auction))
}

/// Like `read_auction`, but an absent auction is an error.
pub async fn require_auction<L: Ledger + ?Sized>(ledger: &L, escrow: &Pubkey) -> Result<Auction> {
    read_auction(ledger, escrow)
        .await?
        .ok_or(AuctionClientError::AbsentAccount(*escrow))
}

/// Polls the escrow account until `condition` holds or `timeout` elapses.
///
/// Committed changes become visible to reads after a propagation delay, so
/// callers that need to observe the effect of a submission wait here. The last
/// observed state is returned whether or not the condition was met.
pub async fn wait_for_auction<L, F>(
    ledger: &L,
    escrow: &Pubkey,
    condition: F,
    timeout: Duration,
    interval: Duration,
) -> Result<Option<Auction>>
where
    L: Ledger + ?Sized,
    F: Fn(Option<&Auction>) -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        let auction = read_auction(ledger, escrow).await?;
        if condition(auction.as_ref()) || Instant::now() >= deadline {
            return Ok(auction);
        }
        sleep(interval).await;
    }
}
