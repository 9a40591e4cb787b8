use std::time::Duration;

use chrono::NaiveDateTime;
use console::style;
pub use indicatif::{ProgressBar, ProgressStyle};
use solana_sdk::pubkey::Pubkey;

use crate::{
    balance::token_balance,
    constants::{STATE_POLL_INTERVAL_MILLIS, STATE_WAIT_TIMEOUT_SECS},
    errors::Result,
    ledger::Ledger,
    reader::wait_for_auction,
    state::{Auction, HighestBidder},
};

pub fn spinner_with_style() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(120);
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "▹▹▹▹▹",
                "▸▹▹▹▹",
                "▹▸▹▹▹",
                "▹▹▸▹▹",
                "▹▹▹▸▹",
                "▹▹▹▹▸",
                "▪▪▪▪▪",
            ])
            .template("{spinner:.dim} {msg}"),
    );
    pb
}

pub fn print_with_style(indent: &str, key: &str, value: String) {
    println!(
        " {} {}",
        style(format!("{}:.. {}:", indent, key)).dim(),
        value
    );
}

pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| NaiveDateTime::from_timestamp_opt(secs, 0))
        .map(|date| date.format("%a %B %e %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn print_auction(escrow: &Pubkey, authority: &Pubkey, auction: Option<&Auction>) {
    println!(" {}", style(":").dim());
    print_with_style("", "escrow", escrow.to_string());
    print_with_style("", "escrow authority", authority.to_string());

    let auction = match auction {
        Some(auction) => auction,
        None => {
            print_with_style("", "state", "absent".to_string());
            return;
        }
    };

    print_with_style("", "exhibitor", auction.exhibitor_pubkey.to_string());
    print_with_style(
        "",
        "nft custody",
        auction.exhibiting_nft_temp_pubkey.to_string(),
    );
    print_with_style(
        "",
        "exhibitor ft receiving",
        auction.exhibitor_ft_receiving_pubkey.to_string(),
    );
    print_with_style("", "price", auction.price.to_string());
    print_with_style("", "end at", format_timestamp(auction.end_at));

    match auction.highest_bidder {
        HighestBidder::NoBidderYet => {
            print_with_style("", "highest bidder", "none".to_string());
        }
        HighestBidder::Bidder(bidder) => {
            print_with_style("", "highest bidder", bidder.to_string());
            print_with_style(
                ":   ",
                "ft custody",
                auction.highest_bidder_ft_temp_pubkey.to_string(),
            );
            print_with_style(
                ":   ",
                "ft returning",
                auction.highest_bidder_ft_returning_pubkey.to_string(),
            );
        }
    }
}

/// Prints `own` and `escrow` balances for each labelled pair of token accounts.
pub async fn print_balances<L: Ledger + ?Sized>(
    ledger: &L,
    rows: &[(&str, Pubkey, Option<Pubkey>)],
) -> Result<()> {
    println!(" {}", style(":").dim());
    for (label, own, escrow) in rows {
        let own_balance = token_balance(ledger, own).await?;
        let value = match escrow {
            Some(escrow) => format!(
                "own {} / escrow {}",
                own_balance,
                token_balance(ledger, escrow).await?
            ),
            None => format!("own {}", own_balance),
        };
        print_with_style("", label, value);
    }
    Ok(())
}

/// Waits with a spinner until the escrow record satisfies `condition`.
pub async fn wait_for_state<L, F>(
    ledger: &L,
    escrow: &Pubkey,
    message: &str,
    condition: F,
) -> Result<Option<Auction>>
where
    L: Ledger + ?Sized,
    F: Fn(Option<&Auction>) -> bool,
{
    let pb = spinner_with_style();
    pb.set_message(message.to_string());

    let auction = wait_for_auction(
        ledger,
        escrow,
        condition,
        Duration::from_secs(STATE_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STATE_POLL_INTERVAL_MILLIS),
    )
    .await;

    pb.finish_and_clear();
    auction
}
