use solana_sdk::{
    instruction::Instruction,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction,
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};
use spl_token::state::Account as TokenAccount;
use tracing::{debug, info, warn};

use crate::{
    errors::{AuctionClientError, Result},
    instruction::Request,
    ledger::{as_auction_time, Ledger, LedgerError},
    lifecycle::{
        bid::{bid, BidAccounts, BidData},
        cancel::{cancel, CancelAccounts},
        close::{close, CloseAccounts},
        exhibit::{exhibit, ExhibitAccounts, ExhibitData},
    },
    pdas::find_escrow_authority,
    reader::{read_auction, require_auction},
    state::Auction,
};

pub struct ExhibitParams {
    pub exhibitor_nft_account: Pubkey,
    pub nft_mint: Pubkey,
    pub exhibitor_ft_receiving: Pubkey,
    pub price: u64,
    pub duration_seconds: u64,
}

pub struct BidParams {
    pub bidder_ft_account: Pubkey,
    pub ft_mint: Pubkey,
    pub price: u64,
}

/// Exhibit request together with the fresh accounts it allocates.
pub struct PreparedExhibit {
    pub escrow: Keypair,
    pub nft_custody: Keypair,
    pub setup: Vec<Instruction>,
    pub request: Request,
}

/// Bid request together with the fresh custody account it allocates.
pub struct PreparedBid {
    pub escrow: Pubkey,
    pub bidder_ft_custody: Keypair,
    /// Auction the request was built against
    pub snapshot: Auction,
    pub setup: Vec<Instruction>,
    pub request: Request,
}

pub struct ExhibitOutcome {
    pub signature: Signature,
    pub escrow: Pubkey,
    pub nft_custody: Pubkey,
}

pub struct BidOutcome {
    pub signature: Signature,
    pub bidder_ft_custody: Pubkey,
    /// Auction as observed right before the bid was built
    pub previous: Auction,
}

/// Read-decide-build-submit cycles against one deployment of the auction program.
///
/// No state is kept between calls: every operation re-reads the escrow record,
/// checks what it can locally and submits a single transaction. The program
/// remains the final judge; a local check passing does not mean the submission
/// will.
pub struct AuctionClient<L: Ledger> {
    ledger: L,
    program_id: Pubkey,
}

impl<L: Ledger> AuctionClient<L> {
    pub fn new(ledger: L, program_id: Pubkey) -> Self {
        AuctionClient { ledger, program_id }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn escrow_authority(&self) -> (Pubkey, u8) {
        find_escrow_authority(&self.program_id)
    }

    pub async fn read_auction(&self, escrow: &Pubkey) -> Result<Option<Auction>> {
        read_auction(&self.ledger, escrow).await
    }

    /// Cluster time, used for advisory end-time checks.
    pub async fn now(&self) -> Result<u64> {
        Ok(as_auction_time(self.ledger.get_unix_timestamp().await?))
    }

    async fn create_token_account(
        &self,
        payer: &Pubkey,
        account: &Pubkey,
        mint: &Pubkey,
        owner: &Pubkey,
    ) -> Result<Vec<Instruction>> {
        let lamports = self
            .ledger
            .get_minimum_balance_for_rent_exemption(TokenAccount::LEN)
            .await?;

        Ok(vec![
            system_instruction::create_account(
                payer,
                account,
                lamports,
                TokenAccount::LEN as u64,
                &spl_token::id(),
            ),
            spl_token::instruction::initialize_account(&spl_token::id(), account, mint, owner)
                .map_err(|err| AuctionClientError::Encoding {
                    field: "initialize_account",
                    reason: err.to_string(),
                })?,
        ])
    }

    pub async fn prepare_exhibit(
        &self,
        exhibitor: &Pubkey,
        params: ExhibitParams,
    ) -> Result<PreparedExhibit> {
        let escrow = Keypair::new();
        let nft_custody = Keypair::new();

        let request = exhibit(
            ExhibitAccounts {
                exhibitor: *exhibitor,
                exhibitor_nft_account: params.exhibitor_nft_account,
                nft_custody: nft_custody.pubkey(),
                exhibitor_ft_receiving: params.exhibitor_ft_receiving,
                escrow: escrow.pubkey(),
            },
            ExhibitData {
                price: params.price,
                duration_seconds: params.duration_seconds,
            },
        )?;

        let mut setup = self
            .create_token_account(exhibitor, &nft_custody.pubkey(), &params.nft_mint, exhibitor)
            .await?;
        let escrow_lamports = self
            .ledger
            .get_minimum_balance_for_rent_exemption(Auction::LEN)
            .await?;
        setup.push(system_instruction::create_account(
            exhibitor,
            &escrow.pubkey(),
            escrow_lamports,
            Auction::LEN as u64,
            &self.program_id,
        ));

        debug!(
            "Prepared exhibit: escrow {}, nft custody {}",
            escrow.pubkey(),
            nft_custody.pubkey()
        );

        Ok(PreparedExhibit {
            escrow,
            nft_custody,
            setup,
            request,
        })
    }

    pub async fn submit_exhibit(
        &self,
        exhibitor: &Keypair,
        prepared: &PreparedExhibit,
    ) -> Result<Signature> {
        let exhibitor_pubkey = exhibitor.pubkey();
        self.submit(
            &prepared.setup,
            &prepared.request,
            &[exhibitor, &prepared.nft_custody, &prepared.escrow],
            &prepared.escrow.pubkey(),
            |auction| matches!(auction, Some(a) if a.exhibitor_pubkey == exhibitor_pubkey),
            |_| false,
        )
        .await
    }

    pub async fn exhibit(&self, exhibitor: &Keypair, params: ExhibitParams) -> Result<ExhibitOutcome> {
        info!(
            "Exhibiting {} at price {} for {} seconds",
            params.exhibitor_nft_account, params.price, params.duration_seconds
        );
        let prepared = self.prepare_exhibit(&exhibitor.pubkey(), params).await?;
        let signature = self.submit_exhibit(exhibitor, &prepared).await?;

        Ok(ExhibitOutcome {
            signature,
            escrow: prepared.escrow.pubkey(),
            nft_custody: prepared.nft_custody.pubkey(),
        })
    }

    pub async fn prepare_bid(
        &self,
        escrow: &Pubkey,
        bidder: &Pubkey,
        params: BidParams,
    ) -> Result<(PreparedBid, Auction)> {
        let auction = require_auction(&self.ledger, escrow).await?;
        let now = self.now().await?;
        let bidder_ft_custody = Keypair::new();

        let request = bid(
            &self.program_id,
            &auction,
            BidAccounts {
                bidder: *bidder,
                bidder_ft_custody: bidder_ft_custody.pubkey(),
                bidder_ft_account: params.bidder_ft_account,
                escrow: *escrow,
            },
            BidData {
                price: params.price,
                now,
            },
        )?;

        let setup = self
            .create_token_account(bidder, &bidder_ft_custody.pubkey(), &params.ft_mint, bidder)
            .await?;

        Ok((
            PreparedBid {
                escrow: *escrow,
                bidder_ft_custody,
                snapshot: auction.clone(),
                setup,
                request,
            },
            auction,
        ))
    }

    /// Submits a prepared bid.
    ///
    /// A rejection is reported as retryable when the record no longer matches
    /// the snapshot the request was built from, whatever code the program gave.
    /// The record only holds the current highest bidder, so replaying a bid that
    /// landed and was since outbid comes back as a stale bid, not `AlreadyApplied`.
    pub async fn submit_bid(&self, bidder: &Keypair, prepared: &PreparedBid) -> Result<Signature> {
        let bidder_pubkey = bidder.pubkey();
        let custody = prepared.bidder_ft_custody.pubkey();
        let snapshot = &prepared.snapshot;
        self.submit(
            &prepared.setup,
            &prepared.request,
            &[bidder, &prepared.bidder_ft_custody],
            &prepared.escrow,
            |auction| {
                matches!(auction, Some(a)
                    if a.highest_bidder.is_bidder(&bidder_pubkey)
                        && a.highest_bidder_ft_temp_pubkey == custody)
            },
            |auction| {
                matches!(auction, Some(a)
                    if a.price != snapshot.price || a.highest_bidder != snapshot.highest_bidder)
            },
        )
        .await
    }

    pub async fn bid(&self, escrow: &Pubkey, bidder: &Keypair, params: BidParams) -> Result<BidOutcome> {
        info!("Bidding {} on escrow {}", params.price, escrow);
        let (prepared, previous) = self.prepare_bid(escrow, &bidder.pubkey(), params).await?;
        let signature = self.submit_bid(bidder, &prepared).await?;

        Ok(BidOutcome {
            signature,
            bidder_ft_custody: prepared.bidder_ft_custody.pubkey(),
            previous,
        })
    }

    pub async fn prepare_cancel(
        &self,
        escrow: &Pubkey,
        exhibitor: &Pubkey,
        exhibitor_nft_account: &Pubkey,
    ) -> Result<Request> {
        let auction = require_auction(&self.ledger, escrow).await?;
        cancel(
            &self.program_id,
            &auction,
            CancelAccounts {
                exhibitor: *exhibitor,
                exhibitor_nft_account: *exhibitor_nft_account,
                escrow: *escrow,
            },
        )
    }

    pub async fn cancel(
        &self,
        escrow: &Pubkey,
        exhibitor: &Keypair,
        exhibitor_nft_account: &Pubkey,
    ) -> Result<Signature> {
        info!("Cancelling auction {}", escrow);
        let request = self
            .prepare_cancel(escrow, &exhibitor.pubkey(), exhibitor_nft_account)
            .await?;
        self.submit_settlement(escrow, exhibitor, &request).await
    }

    pub async fn prepare_close(
        &self,
        escrow: &Pubkey,
        bidder: &Pubkey,
        bidder_nft_receiving: &Pubkey,
    ) -> Result<Request> {
        let auction = require_auction(&self.ledger, escrow).await?;
        let now = self.now().await?;
        close(
            &self.program_id,
            &auction,
            CloseAccounts {
                bidder: *bidder,
                bidder_nft_receiving: *bidder_nft_receiving,
                escrow: *escrow,
            },
            now,
        )
    }

    pub async fn close(
        &self,
        escrow: &Pubkey,
        bidder: &Keypair,
        bidder_nft_receiving: &Pubkey,
    ) -> Result<Signature> {
        info!("Closing auction {}", escrow);
        let request = self
            .prepare_close(escrow, &bidder.pubkey(), bidder_nft_receiving)
            .await?;
        self.submit_settlement(escrow, bidder, &request).await
    }

    /// Returns the associated token account of `owner` for `mint`, creating it
    /// first when the ledger has nothing at that address.
    pub async fn ensure_associated_token_account(
        &self,
        owner: &Keypair,
        mint: &Pubkey,
    ) -> Result<Pubkey> {
        let address = get_associated_token_address(&owner.pubkey(), mint);
        if self.ledger.get_account_data(&address).await?.is_some() {
            return Ok(address);
        }

        info!("Creating associated token account {} for mint {}", address, mint);
        let instruction = create_associated_token_account(
            &owner.pubkey(),
            &owner.pubkey(),
            mint,
            &spl_token::id(),
        );
        self.ledger
            .submit(&[instruction], &owner.pubkey(), &[owner])
            .await?;

        Ok(address)
    }

    /// Submits a cancel or close request; both end with the record gone.
    pub async fn submit_settlement(
        &self,
        escrow: &Pubkey,
        signer: &Keypair,
        request: &Request,
    ) -> Result<Signature> {
        self.submit(&[], request, &[signer], escrow, |auction| auction.is_none(), |_| false)
            .await
    }

    /// Submits `setup` followed by `request`; `signers[0]` pays.
    ///
    /// When the program rejects the transaction the record is read once more:
    /// if `applied` already holds for it the request is reported as
    /// `AlreadyApplied`, and if `moved` holds the rejection is reported as
    /// `StaleAuction` instead of a plain rejection.
    async fn submit<F, G>(
        &self,
        setup: &[Instruction],
        request: &Request,
        signers: &[&Keypair],
        escrow: &Pubkey,
        applied: F,
        moved: G,
    ) -> Result<Signature>
    where
        F: Fn(Option<&Auction>) -> bool,
        G: Fn(Option<&Auction>) -> bool,
    {
        let mut instructions = setup.to_vec();
        instructions.push(request.to_instruction(&self.program_id));
        let payer = signers[0].pubkey();

        info!(
            "Submitting {} for escrow {}",
            request.instruction.name(),
            escrow
        );

        let error = match self.ledger.submit(&instructions, &payer, signers).await {
            Ok(signature) => {
                info!("{} confirmed: {}", request.instruction.name(), signature);
                return Ok(signature);
            }
            Err(LedgerError::Rejected(error)) => {
                AuctionClientError::from_rejection(error, setup.len() as u8)
            }
            Err(error) => return Err(error.into()),
        };

        warn!("{} rejected: {}", request.instruction.name(), error);

        if matches!(error, AuctionClientError::AlreadyApplied(_)) {
            return Err(error);
        }

        match read_auction(&self.ledger, escrow).await {
            Ok(auction) if applied(auction.as_ref()) => Err(AuctionClientError::AlreadyApplied(
                format!("{} already took effect on {}", request.instruction.name(), escrow),
            )),
            Ok(auction) if !error.is_retryable() && moved(auction.as_ref()) => {
                Err(error.into_stale())
            }
            _ => Err(error),
        }
    }
}
