use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_sdk::{
    instruction::InstructionError, pubkey::Pubkey, transaction::TransactionError,
};
use thiserror::Error;

use crate::ledger::LedgerError;

pub type Result<T> = std::result::Result<T, AuctionClientError>;

#[derive(Debug, Error)]
pub enum AuctionClientError {
    #[error("No auction exists at escrow account {0}")]
    AbsentAccount(Pubkey),

    #[error("Failed to decode escrow account: {0}")]
    Decode(String),

    #[error("Cannot encode {field}: {reason}")]
    Encoding { field: &'static str, reason: String },

    #[error("Unrecognized instruction opcode {0}")]
    UnrecognizedOpcode(u8),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(Precondition),

    #[error("Request was already applied: {0}")]
    AlreadyApplied(String),

    #[error("Submission rejected by the auction program: {reason}")]
    SubmissionRejected {
        reason: String,
        code: Option<EscrowProgramError>,
    },

    #[error("Auction changed before the submission landed: {reason}")]
    StaleAuction {
        reason: String,
        code: Option<EscrowProgramError>,
    },

    #[error("Account {0} is not a token account")]
    NotATokenAccount(Pubkey),

    #[error(transparent)]
    Ledger(LedgerError),
}

impl AuctionClientError {
    /// A rejected bid that lost a race against another one can be re-read and resubmitted.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuctionClientError::SubmissionRejected {
                code: Some(EscrowProgramError::InsufficientBidPrice),
                ..
            } | AuctionClientError::StaleAuction { .. }
        )
    }

    /// Reclassifies a rejection as caused by an auction that moved after the
    /// request was built. Other errors pass through unchanged.
    pub fn into_stale(self) -> Self {
        match self {
            AuctionClientError::SubmissionRejected { reason, code } => {
                AuctionClientError::StaleAuction { reason, code }
            }
            other => other,
        }
    }

    /// Maps a transaction-level rejection onto the client taxonomy.
    ///
    /// `program_instruction` is the index of the auction instruction within the
    /// transaction; custom codes raised by other instructions belong to other
    /// programs and are not decoded as escrow errors.
    pub fn from_rejection(error: TransactionError, program_instruction: u8) -> Self {
        match error {
            TransactionError::AlreadyProcessed => {
                AuctionClientError::AlreadyApplied("transaction already processed".to_string())
            }
            TransactionError::InstructionError(_, InstructionError::AccountAlreadyInitialized) => {
                AuctionClientError::AlreadyApplied("escrow account already initialized".to_string())
            }
            TransactionError::InstructionError(index, InstructionError::Custom(code))
                if index == program_instruction =>
            {
                let program_error = EscrowProgramError::from_u32(code);
                let reason = match program_error {
                    Some(e) => format!("instruction {}: {}", index, e),
                    None => format!("instruction {}: custom program error {:#x}", index, code),
                };
                AuctionClientError::SubmissionRejected {
                    reason,
                    code: program_error,
                }
            }
            other => AuctionClientError::SubmissionRejected {
                reason: other.to_string(),
                code: None,
            },
        }
    }
}

impl From<LedgerError> for AuctionClientError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::Rejected(e) => AuctionClientError::SubmissionRejected {
                reason: e.to_string(),
                code: None,
            },
            LedgerError::NotATokenAccount(pubkey) => AuctionClientError::NotATokenAccount(pubkey),
            other => AuctionClientError::Ledger(other),
        }
    }
}

/// Conditions the client checks before spending a submission.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Precondition {
    #[error("initial price must be greater than zero")]
    ZeroPrice,

    #[error("auction duration must be greater than zero")]
    ZeroDuration,

    #[error("bid {bid} is not higher than the current price {current}")]
    BidNotHigher { bid: u64, current: u64 },

    #[error("auction ended at {end_at}, current time is {now}")]
    AuctionEnded { end_at: u64, now: u64 },

    #[error("auction is still active for {0} seconds")]
    AuctionActive(u64),

    #[error("auction already has a bid from {0}")]
    AlreadyBid(Pubkey),

    #[error("{0} is already the highest bidder")]
    AlreadyHighestBidder(Pubkey),

    #[error("{signer} is not the exhibitor {exhibitor}")]
    NotExhibitor { signer: Pubkey, exhibitor: Pubkey },
}

/// Custom error codes returned by the on-chain auction program.
#[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
pub enum EscrowProgramError {
    #[error("Invalid Instruction")]
    InvalidInstruction,

    #[error("Not Rent Exempt")]
    NotRentExempt,

    #[error("Expected Amount Mismatch")]
    ExpectedAmountMismatch,

    #[error("Amount Overflow")]
    AmountOverflow,

    #[error("Insufficient Bid Price")]
    InsufficientBidPrice,

    #[error("Already Bid")]
    AlreadyBid,

    #[error("Inactive Auction")]
    InactiveAuction,

    #[error("Active Auction")]
    ActiveAuction,

    #[error("No Bidder Found")]
    NoBidderFound,
}

impl From<EscrowProgramError> for InstructionError {
    fn from(e: EscrowProgramError) -> Self {
        InstructionError::Custom(e as u32)
    }
}
