use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::errors::{AuctionClientError, Result};

/// Instructions understood by the auction program, tagged by a single opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuctionInstruction {
    /// Starts the auction, moving the exhibited NFT into a custody account owned by the
    /// escrow authority.
    ///
    /// Accounts expected:
    ///
    /// 0. `[signer]` The exhibitor
    /// 1. `[writable]` The exhibitor's NFT account
    /// 2. `[writable]` Fresh custody account for the NFT
    /// 3. `[writable]` The exhibitor's FT account receiving the winning bid
    /// 4. `[writable]` Fresh escrow account holding the auction record
    /// 5. `[]` The rent sysvar
    /// 6. `[]` The clock sysvar
    /// 7. `[]` The token program
    Exhibit { initial_price: u64, seconds: u64 },

    /// Outbids the current highest bidder, refunding them.
    ///
    /// Accounts expected:
    ///
    /// 0. `[signer]` The bidder
    /// 1. `[writable]` The current highest bidder
    /// 2. `[writable]` The current highest bidder's FT custody account
    /// 3. `[writable]` The current highest bidder's FT returning account
    /// 4. `[writable]` Fresh FT custody account for this bid
    /// 5. `[writable]` The bidder's FT account paying the bid
    /// 6. `[writable]` The escrow account
    /// 7. `[]` The clock sysvar
    /// 8. `[]` The token program
    /// 9. `[]` The escrow authority
    Bid { price: u64 },

    /// Cancels an auction nobody has bid on.
    ///
    /// Accounts expected:
    ///
    /// 0. `[signer]` The exhibitor
    /// 1. `[writable]` The NFT custody account
    /// 2. `[writable]` The exhibitor's NFT account getting the token back
    /// 3. `[writable]` The escrow account
    /// 4. `[]` The token program
    /// 5. `[]` The escrow authority
    Cancel,

    /// Settles an ended auction.
    ///
    /// Accounts expected:
    ///
    /// 0. `[signer]` The highest bidder
    /// 1. `[writable]` The exhibitor
    /// 2. `[writable]` The NFT custody account
    /// 3. `[writable]` The exhibitor's FT receiving account
    /// 4. `[writable]` The highest bidder's FT custody account
    /// 5. `[writable]` The bidder's NFT account receiving the token
    /// 6. `[writable]` The escrow account
    /// 7. `[]` The clock sysvar
    /// 8. `[]` The token program
    /// 9. `[]` The escrow authority
    Close,
}

impl AuctionInstruction {
    pub const EXHIBIT: u8 = 0;
    pub const BID: u8 = 1;
    pub const CANCEL: u8 = 2;
    pub const CLOSE: u8 = 3;

    pub fn opcode(&self) -> u8 {
        match self {
            AuctionInstruction::Exhibit { .. } => Self::EXHIBIT,
            AuctionInstruction::Bid { .. } => Self::BID,
            AuctionInstruction::Cancel => Self::CANCEL,
            AuctionInstruction::Close => Self::CLOSE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AuctionInstruction::Exhibit { .. } => "Exhibit",
            AuctionInstruction::Bid { .. } => "Bid",
            AuctionInstruction::Cancel => "Cancel",
            AuctionInstruction::Close => "Close",
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(17);
        buf.push(self.opcode());
        match self {
            AuctionInstruction::Exhibit {
                initial_price,
                seconds,
            } => {
                buf.extend_from_slice(&initial_price.to_le_bytes());
                buf.extend_from_slice(&seconds.to_le_bytes());
            }
            AuctionInstruction::Bid { price } => {
                buf.extend_from_slice(&price.to_le_bytes());
            }
            AuctionInstruction::Cancel | AuctionInstruction::Close => {}
        }
        buf
    }

    pub fn unpack(input: &[u8]) -> Result<Self> {
        let (opcode, rest) = input
            .split_first()
            .ok_or_else(|| AuctionClientError::Decode("empty instruction data".to_string()))?;
        Ok(match *opcode {
            Self::EXHIBIT => AuctionInstruction::Exhibit {
                initial_price: unpack_u64(rest, 0)?,
                seconds: unpack_u64(rest, 8)?,
            },
            Self::BID => AuctionInstruction::Bid {
                price: unpack_u64(rest, 0)?,
            },
            Self::CANCEL => AuctionInstruction::Cancel,
            Self::CLOSE => AuctionInstruction::Close,
            other => return Err(AuctionClientError::UnrecognizedOpcode(other)),
        })
    }
}

fn unpack_u64(input: &[u8], start: usize) -> Result<u64> {
    input
        .get(start..start + 8)
        .and_then(|slice| slice.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or_else(|| {
            AuctionClientError::Decode(format!("missing u64 at payload offset {}", start))
        })
}

/// One outbound request: the instruction plus its ordered, tagged account list.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    pub instruction: AuctionInstruction,
    pub accounts: Vec<AccountMeta>,
}

impl Request {
    pub fn data(&self) -> Vec<u8> {
        self.instruction.pack()
    }

    pub fn to_instruction(&self, program_id: &Pubkey) -> Instruction {
        Instruction {
            program_id: *program_id,
            accounts: self.accounts.clone(),
            data: self.data(),
        }
    }
}

/// Converts a caller-supplied integer into a u64 amount, refusing to wrap.
pub fn checked_amount(value: i128, field: &'static str) -> Result<u64> {
    if value < 0 {
        return Err(AuctionClientError::Encoding {
            field,
            reason: format!("{} is negative", value),
        });
    }
    u64::try_from(value).map_err(|_| AuctionClientError::Encoding {
        field,
        reason: format!("{} exceeds {}", value, u64::MAX),
    })
}

/// Parses a decimal amount typed by a user.
pub fn parse_amount(text: &str, field: &'static str) -> Result<u64> {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AuctionClientError::Encoding {
            field,
            reason: format!("'{}' is not a whole number", text),
        });
    }
    let value = text.parse::<i128>().map_err(|_| AuctionClientError::Encoding {
        field,
        reason: format!("{} exceeds {}", text, u64::MAX),
    })?;
    checked_amount(value, field)
}
