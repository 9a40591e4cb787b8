use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, sysvar};

use crate::{
    errors::{AuctionClientError, Precondition, Result},
    instruction::{AuctionInstruction, Request},
    pdas::find_escrow_authority_pda,
    state::{Auction, AuctionPhase},
};

pub struct BidAccounts {
    pub bidder: Pubkey,
    /// Freshly allocated token account that will hold this bid
    pub bidder_ft_custody: Pubkey,
    /// The bidder's own FT account paying the bid, refunded when outbid
    pub bidder_ft_account: Pubkey,
    pub escrow: Pubkey,
}

pub struct BidData {
    pub price: u64,
    /// Current cluster time, advisory only
    pub now: u64,
}

pub fn bid(
    program_id: &Pubkey,
    auction: &Auction,
    BidAccounts {
        bidder,
        bidder_ft_custody,
        bidder_ft_account,
        escrow,
    }: BidAccounts,
    BidData { price, now }: BidData,
) -> Result<Request> {
    if auction.phase(now) == AuctionPhase::Ended {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::AuctionEnded {
                end_at: auction.end_at,
                now,
            },
        ));
    }
    if price <= auction.price {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::BidNotHigher {
                bid: price,
                current: auction.price,
            },
        ));
    }
    if auction.highest_bidder.is_bidder(&bidder) {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::AlreadyHighestBidder(bidder),
        ));
    }

    let accounts = vec![
        AccountMeta::new_readonly(bidder, true),
        AccountMeta::new(auction.highest_bidder.address(), false),
        AccountMeta::new(auction.highest_bidder_ft_temp_pubkey, false),
        AccountMeta::new(auction.highest_bidder_ft_returning_pubkey, false),
        AccountMeta::new(bidder_ft_custody, false),
        AccountMeta::new(bidder_ft_account, false),
        AccountMeta::new(escrow, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(find_escrow_authority_pda(program_id), false),
    ];

    Ok(Request {
        instruction: AuctionInstruction::Bid { price },
        accounts,
    })
}
