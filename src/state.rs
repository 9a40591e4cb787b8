use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::AUCTION_LEN,
    errors::{AuctionClientError, Result},
};

/// Wallet currently holding the highest bid.
///
/// The program stores an all-zero address until the first bid lands; that
/// placeholder is decoded into `NoBidderYet` so it cannot be confused with a
/// real wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighestBidder {
    NoBidderYet,
    Bidder(Pubkey),
}

impl HighestBidder {
    fn from_pubkey(pubkey: Pubkey) -> Self {
        if pubkey == Pubkey::default() {
            HighestBidder::NoBidderYet
        } else {
            HighestBidder::Bidder(pubkey)
        }
    }

    /// Address written to the record and passed in account lists.
    pub fn address(&self) -> Pubkey {
        match self {
            HighestBidder::NoBidderYet => Pubkey::default(),
            HighestBidder::Bidder(pubkey) => *pubkey,
        }
    }

    pub fn is_bidder(&self, wallet: &Pubkey) -> bool {
        matches!(self, HighestBidder::Bidder(pubkey) if pubkey == wallet)
    }
}

/// Escrow account data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Auction {
    pub is_initialized: bool,
    /// Wallet of the exhibitor
    pub exhibitor_pubkey: Pubkey,
    /// Custody token account holding the exhibited NFT
    pub exhibiting_nft_temp_pubkey: Pubkey,
    /// Exhibitor's FT account receiving the winning bid
    pub exhibitor_ft_receiving_pubkey: Pubkey,
    /// Current highest price
    pub price: u64,
    /// Unix timestamp the auction ends at
    pub end_at: u64,
    pub highest_bidder: HighestBidder,
    /// Custody token account holding the highest bidder's FT
    pub highest_bidder_ft_temp_pubkey: Pubkey,
    /// FT account refunded when the highest bidder is outbid
    pub highest_bidder_ft_returning_pubkey: Pubkey,
}

/// Lifecycle phase of a live record. `Absent` is represented by the reader
/// returning no record at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionPhase {
    Open,
    Ended,
}

impl Auction {
    pub const LEN: usize = AUCTION_LEN;

    pub fn unpack(src: &[u8]) -> Result<Self> {
        if src.len() != Self::LEN {
            return Err(AuctionClientError::Decode(format!(
                "expected {} bytes, found {}",
                Self::LEN,
                src.len()
            )));
        }

        let src = array_ref![src, 0, AUCTION_LEN];
        let (
            is_initialized,
            exhibitor_pubkey,
            exhibiting_nft_temp_pubkey,
            exhibitor_ft_receiving_pubkey,
            price,
            end_at,
            highest_bidder_pubkey,
            highest_bidder_ft_temp_pubkey,
            highest_bidder_ft_returning_pubkey,
        ) = array_refs![src, 1, 32, 32, 32, 8, 8, 32, 32, 32];

        let is_initialized = match is_initialized {
            [0] => false,
            [1] => true,
            [flag] => {
                return Err(AuctionClientError::Decode(format!(
                    "invalid initialized flag {}",
                    flag
                )))
            }
        };

        Ok(Auction {
            is_initialized,
            exhibitor_pubkey: Pubkey::new_from_array(*exhibitor_pubkey),
            exhibiting_nft_temp_pubkey: Pubkey::new_from_array(*exhibiting_nft_temp_pubkey),
            exhibitor_ft_receiving_pubkey: Pubkey::new_from_array(*exhibitor_ft_receiving_pubkey),
            price: u64::from_le_bytes(*price),
            end_at: u64::from_le_bytes(*end_at),
            highest_bidder: HighestBidder::from_pubkey(Pubkey::new_from_array(
                *highest_bidder_pubkey,
            )),
            highest_bidder_ft_temp_pubkey: Pubkey::new_from_array(*highest_bidder_ft_temp_pubkey),
            highest_bidder_ft_returning_pubkey: Pubkey::new_from_array(
                *highest_bidder_ft_returning_pubkey,
            ),
        })
    }

    pub fn pack_into_slice(&self, dst: &mut [u8; AUCTION_LEN]) {
        let dst = array_mut_ref![dst, 0, AUCTION_LEN];
        let (
            is_initialized_dst,
            exhibitor_pubkey_dst,
            exhibiting_nft_temp_pubkey_dst,
            exhibitor_ft_receiving_pubkey_dst,
            price_dst,
            end_at_dst,
            highest_bidder_pubkey_dst,
            highest_bidder_ft_temp_pubkey_dst,
            highest_bidder_ft_returning_pubkey_dst,
        ) = mut_array_refs![dst, 1, 32, 32, 32, 8, 8, 32, 32, 32];

        is_initialized_dst[0] = self.is_initialized as u8;
        exhibitor_pubkey_dst.copy_from_slice(self.exhibitor_pubkey.as_ref());
        exhibiting_nft_temp_pubkey_dst.copy_from_slice(self.exhibiting_nft_temp_pubkey.as_ref());
        exhibitor_ft_receiving_pubkey_dst
            .copy_from_slice(self.exhibitor_ft_receiving_pubkey.as_ref());
        *price_dst = self.price.to_le_bytes();
        *end_at_dst = self.end_at.to_le_bytes();
        highest_bidder_pubkey_dst.copy_from_slice(self.highest_bidder.address().as_ref());
        highest_bidder_ft_temp_pubkey_dst
            .copy_from_slice(self.highest_bidder_ft_temp_pubkey.as_ref());
        highest_bidder_ft_returning_pubkey_dst
            .copy_from_slice(self.highest_bidder_ft_returning_pubkey.as_ref());
    }

    pub fn pack(&self) -> [u8; AUCTION_LEN] {
        let mut dst = [0u8; AUCTION_LEN];
        self.pack_into_slice(&mut dst);
        dst
    }

    pub fn has_bid(&self) -> bool {
        self.highest_bidder != HighestBidder::NoBidderYet
    }

    pub fn phase(&self, now: u64) -> AuctionPhase {
        if now < self.end_at {
            AuctionPhase::Open
        } else {
            AuctionPhase::Ended
        }
    }

    pub fn seconds_remaining(&self, now: u64) -> u64 {
        self.end_at.saturating_sub(now)
    }
}
