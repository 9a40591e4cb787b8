use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

use crate::{
    errors::{AuctionClientError, Precondition, Result},
    instruction::{AuctionInstruction, Request},
    pdas::find_escrow_authority_pda,
    state::{Auction, HighestBidder},
};

pub struct CancelAccounts {
    pub exhibitor: Pubkey,
    /// NFT account the exhibited token is returned to
    pub exhibitor_nft_account: Pubkey,
    pub escrow: Pubkey,
}

pub fn cancel(
    program_id: &Pubkey,
    auction: &Auction,
    CancelAccounts {
        exhibitor,
        exhibitor_nft_account,
        escrow,
    }: CancelAccounts,
) -> Result<Request> {
    if let HighestBidder::Bidder(bidder) = auction.highest_bidder {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::AlreadyBid(bidder),
        ));
    }
    if auction.exhibitor_pubkey != exhibitor {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::NotExhibitor {
                signer: exhibitor,
                exhibitor: auction.exhibitor_pubkey,
            },
        ));
    }

    let accounts = vec![
        AccountMeta::new_readonly(exhibitor, true),
        AccountMeta::new(auction.exhibiting_nft_temp_pubkey, false),
        AccountMeta::new(exhibitor_nft_account, false),
        AccountMeta::new(escrow, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(find_escrow_authority_pda(program_id), false),
    ];

    Ok(Request {
        instruction: AuctionInstruction::Cancel,
        accounts,
    })
}
