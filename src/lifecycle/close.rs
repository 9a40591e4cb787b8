use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey, sysvar};

use crate::{
    errors::{AuctionClientError, Precondition, Result},
    instruction::{AuctionInstruction, Request},
    pdas::find_escrow_authority_pda,
    state::{Auction, AuctionPhase},
};

pub struct CloseAccounts {
    pub bidder: Pubkey,
    /// NFT account receiving the auctioned token
    pub bidder_nft_receiving: Pubkey,
    pub escrow: Pubkey,
}

/// Settles an ended auction. The program only accepts the highest bidder as
/// signer; the client does not second-guess that and builds the request for
/// any caller once the end time has passed.
pub fn close(
    program_id: &Pubkey,
    auction: &Auction,
    CloseAccounts {
        bidder,
        bidder_nft_receiving,
        escrow,
    }: CloseAccounts,
    now: u64,
) -> Result<Request> {
    if auction.phase(now) == AuctionPhase::Open {
        return Err(AuctionClientError::PreconditionFailed(
            Precondition::AuctionActive(auction.seconds_remaining(now)),
        ));
    }

    let accounts = vec![
        AccountMeta::new_readonly(bidder, true),
        AccountMeta::new(auction.exhibitor_pubkey, false),
        AccountMeta::new(auction.exhibiting_nft_temp_pubkey, false),
        AccountMeta::new(auction.exhibitor_ft_receiving_pubkey, false),
        AccountMeta::new(auction.highest_bidder_ft_temp_pubkey, false),
        AccountMeta::new(bidder_nft_receiving, false),
        AccountMeta::new(escrow, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(find_escrow_authority_pda(program_id), false),
    ];

    Ok(Request {
        instruction: AuctionInstruction::Close,
        accounts,
    })
}
