#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use auction_escrow::{
    errors::EscrowProgramError,
    instruction::AuctionInstruction,
    ledger::{Ledger, LedgerError},
    pdas::find_escrow_authority_pda,
    state::{Auction, HighestBidder},
};
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_program, sysvar,
    transaction::TransactionError,
};
use spl_token::instruction::TokenInstruction;

pub const START_TIME: i64 = 1_650_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenState {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

#[derive(Clone, Debug)]
struct MockAccount {
    owner: Pubkey,
    data: Vec<u8>,
    token: Option<TokenState>,
}

#[derive(Clone, Default)]
struct MockState {
    accounts: HashMap<Pubkey, MockAccount>,
    clock: i64,
    submissions: usize,
}

/// In-memory ledger running the escrow program's rules, the system program's
/// account creation and the token operations the auction relies on.
pub struct MockLedger {
    program_id: Pubkey,
    state: Mutex<MockState>,
}

type InstructionResult = Result<(), InstructionError>;

impl MockLedger {
    pub fn new(program_id: Pubkey) -> Self {
        MockLedger {
            program_id,
            state: Mutex::new(MockState {
                clock: START_TIME,
                ..MockState::default()
            }),
        }
    }

    pub fn now(&self) -> i64 {
        self.state.lock().unwrap().clock
    }

    pub fn advance_clock(&self, seconds: i64) {
        self.state.lock().unwrap().clock += seconds;
    }

    pub fn submissions(&self) -> usize {
        self.state.lock().unwrap().submissions
    }

    pub fn create_mint(&self) -> Pubkey {
        let mint = Pubkey::new_unique();
        self.state.lock().unwrap().accounts.insert(
            mint,
            MockAccount {
                owner: spl_token::id(),
                data: vec![0; spl_token::state::Mint::LEN],
                token: None,
            },
        );
        mint
    }

    pub fn create_token_account(&self, mint: &Pubkey, owner: &Pubkey, amount: u64) -> Pubkey {
        let address = Pubkey::new_unique();
        self.state.lock().unwrap().accounts.insert(
            address,
            token_account(TokenState {
                mint: *mint,
                owner: *owner,
                amount,
            }),
        );
        address
    }

    pub fn put_account(&self, address: &Pubkey, owner: &Pubkey, data: Vec<u8>) {
        self.state.lock().unwrap().accounts.insert(
            *address,
            MockAccount {
                owner: *owner,
                data,
                token: None,
            },
        );
    }

    pub fn token(&self, address: &Pubkey) -> Option<TokenState> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(address)
            .and_then(|account| account.token)
    }

    pub fn balance(&self, address: &Pubkey) -> Option<u64> {
        self.token(address).map(|token| token.amount)
    }

    fn process(
        &self,
        state: &mut MockState,
        instruction: &Instruction,
    ) -> InstructionResult {
        if instruction.program_id == system_program::id() {
            process_create_account(state, instruction)
        } else if instruction.program_id == spl_token::id() {
            process_token(state, instruction)
        } else if instruction.program_id == spl_associated_token_account::id() {
            process_create_associated(state, instruction)
        } else if instruction.program_id == self.program_id {
            self.process_auction(state, instruction)
        } else {
            Err(InstructionError::IncorrectProgramId)
        }
    }

    fn process_auction(&self, state: &mut MockState, instruction: &Instruction) -> InstructionResult {
        let accounts: Vec<Pubkey> = instruction.accounts.iter().map(|meta| meta.pubkey).collect();
        let parsed = AuctionInstruction::unpack(&instruction.data)
            .map_err(|_| InstructionError::from(EscrowProgramError::InvalidInstruction))?;
        let authority = find_escrow_authority_pda(&self.program_id);

        match parsed {
            AuctionInstruction::Exhibit {
                initial_price,
                seconds,
            } => {
                expect_len(&accounts, 8)?;
                let escrow = &accounts[4];
                let record = escrow_record(state, escrow, &self.program_id)?;
                if record.map_or(false, |auction| auction.is_initialized) {
                    return Err(InstructionError::AccountAlreadyInitialized);
                }

                transfer(state, &accounts[1], &accounts[2], &accounts[0], 1)?;
                set_token_owner(state, &accounts[2], &authority)?;

                let auction = Auction {
                    is_initialized: true,
                    exhibitor_pubkey: accounts[0],
                    exhibiting_nft_temp_pubkey: accounts[2],
                    exhibitor_ft_receiving_pubkey: accounts[3],
                    price: initial_price,
                    end_at: (state.clock + seconds as i64) as u64,
                    highest_bidder: HighestBidder::NoBidderYet,
                    highest_bidder_ft_temp_pubkey: Pubkey::default(),
                    highest_bidder_ft_returning_pubkey: Pubkey::default(),
                };
                write_record(state, escrow, &auction);
            }
            AuctionInstruction::Bid { price } => {
                expect_len(&accounts, 10)?;
                let escrow = &accounts[6];
                let mut auction = live_record(state, escrow, &self.program_id)?;

                if auction.end_at as i64 <= state.clock {
                    return Err(EscrowProgramError::InactiveAuction.into());
                }
                if auction.price >= price {
                    return Err(EscrowProgramError::InsufficientBidPrice.into());
                }
                if auction.highest_bidder_ft_temp_pubkey != accounts[2]
                    || auction.highest_bidder_ft_returning_pubkey != accounts[3]
                    || auction.highest_bidder.address() != accounts[1]
                {
                    return Err(EscrowProgramError::InvalidInstruction.into());
                }
                if auction.highest_bidder.is_bidder(&accounts[0]) {
                    return Err(EscrowProgramError::AlreadyBid.into());
                }

                transfer(state, &accounts[5], &accounts[4], &accounts[0], price)?;
                set_token_owner(state, &accounts[4], &authority)?;

                if auction.has_bid() {
                    transfer(state, &accounts[2], &accounts[3], &authority, auction.price)?;
                    state.accounts.remove(&accounts[2]);
                }

                auction.price = price;
                auction.highest_bidder = HighestBidder::Bidder(accounts[0]);
                auction.highest_bidder_ft_temp_pubkey = accounts[4];
                auction.highest_bidder_ft_returning_pubkey = accounts[5];
                write_record(state, escrow, &auction);
            }
            AuctionInstruction::Cancel => {
                expect_len(&accounts, 6)?;
                let escrow = &accounts[3];
                let auction = live_record(state, escrow, &self.program_id)?;

                if auction.exhibitor_pubkey != accounts[0]
                    || auction.exhibiting_nft_temp_pubkey != accounts[1]
                {
                    return Err(InstructionError::InvalidAccountData);
                }
                if auction.has_bid() {
                    return Err(EscrowProgramError::AlreadyBid.into());
                }

                let amount = balance_of(state, &accounts[1])?;
                transfer(state, &accounts[1], &accounts[2], &authority, amount)?;
                state.accounts.remove(&accounts[1]);
                close_record(state, escrow);
            }
            AuctionInstruction::Close => {
                expect_len(&accounts, 10)?;
                let escrow = &accounts[6];
                let auction = live_record(state, escrow, &self.program_id)?;

                if auction.end_at as i64 > state.clock {
                    return Err(EscrowProgramError::ActiveAuction.into());
                }
                if auction.exhibitor_pubkey != accounts[1]
                    || auction.exhibiting_nft_temp_pubkey != accounts[2]
                    || auction.exhibitor_ft_receiving_pubkey != accounts[3]
                    || auction.highest_bidder_ft_temp_pubkey != accounts[4]
                    || auction.highest_bidder.address() != accounts[0]
                {
                    return Err(InstructionError::InvalidAccountData);
                }

                let nft_amount = balance_of(state, &accounts[2])?;
                transfer(state, &accounts[2], &accounts[5], &authority, nft_amount)?;
                let ft_amount = balance_of(state, &accounts[4])?;
                transfer(state, &accounts[4], &accounts[3], &authority, ft_amount)?;
                state.accounts.remove(&accounts[4]);
                state.accounts.remove(&accounts[2]);
                close_record(state, escrow);
            }
        }

        Ok(())
    }
}

fn token_account(token: TokenState) -> MockAccount {
    MockAccount {
        owner: spl_token::id(),
        data: vec![0; spl_token::state::Account::LEN],
        token: Some(token),
    }
}

fn expect_len(accounts: &[Pubkey], len: usize) -> InstructionResult {
    if accounts.len() < len {
        return Err(InstructionError::NotEnoughAccountKeys);
    }
    Ok(())
}

fn read_u64(data: &[u8], offset: usize) -> Result<u64, InstructionError> {
    data.get(offset..offset + 8)
        .and_then(|slice| slice.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or(InstructionError::InvalidInstructionData)
}

fn process_create_account(state: &mut MockState, instruction: &Instruction) -> InstructionResult {
    // bincode SystemInstruction::CreateAccount { lamports, space, owner }
    let data = &instruction.data;
    if data.len() != 52 || data[0..4] != [0, 0, 0, 0] {
        return Err(InstructionError::InvalidInstructionData);
    }
    let space = read_u64(data, 12)? as usize;
    let owner = Pubkey::new_from_array(
        data[20..52]
            .try_into()
            .map_err(|_| InstructionError::InvalidInstructionData)?,
    );
    let address = instruction.accounts[1].pubkey;

    if state.accounts.contains_key(&address) {
        // SystemError::AccountAlreadyInUse
        return Err(InstructionError::Custom(0));
    }
    state.accounts.insert(
        address,
        MockAccount {
            owner,
            data: vec![0; space],
            token: None,
        },
    );
    Ok(())
}

fn process_token(state: &mut MockState, instruction: &Instruction) -> InstructionResult {
    match TokenInstruction::unpack(&instruction.data) {
        Ok(TokenInstruction::InitializeAccount) => {
            let address = instruction.accounts[0].pubkey;
            let mint = instruction.accounts[1].pubkey;
            let owner = instruction.accounts[2].pubkey;

            let account = state
                .accounts
                .get_mut(&address)
                .ok_or(InstructionError::InvalidAccountData)?;
            if account.owner != spl_token::id()
                || account.data.len() != spl_token::state::Account::LEN
            {
                return Err(InstructionError::InvalidAccountData);
            }
            if account.token.is_some() {
                // TokenError::AlreadyInUse
                return Err(InstructionError::Custom(6));
            }
            account.token = Some(TokenState {
                mint,
                owner,
                amount: 0,
            });
            Ok(())
        }
        _ => Err(InstructionError::InvalidInstructionData),
    }
}

fn process_create_associated(state: &mut MockState, instruction: &Instruction) -> InstructionResult {
    let address = instruction.accounts[1].pubkey;
    let wallet = instruction.accounts[2].pubkey;
    let mint = instruction.accounts[3].pubkey;

    if address != spl_associated_token_account::get_associated_token_address(&wallet, &mint) {
        return Err(InstructionError::InvalidSeeds);
    }
    if state.accounts.contains_key(&address) {
        return Err(InstructionError::Custom(0));
    }
    state.accounts.insert(
        address,
        token_account(TokenState {
            mint,
            owner: wallet,
            amount: 0,
        }),
    );
    Ok(())
}

fn token_mut<'a>(
    state: &'a mut MockState,
    address: &Pubkey,
) -> Result<&'a mut TokenState, InstructionError> {
    state
        .accounts
        .get_mut(address)
        .and_then(|account| account.token.as_mut())
        .ok_or(InstructionError::InvalidAccountData)
}

fn balance_of(state: &mut MockState, address: &Pubkey) -> Result<u64, InstructionError> {
    Ok(token_mut(state, address)?.amount)
}

fn set_token_owner(state: &mut MockState, address: &Pubkey, owner: &Pubkey) -> InstructionResult {
    token_mut(state, address)?.owner = *owner;
    Ok(())
}

fn transfer(
    state: &mut MockState,
    from: &Pubkey,
    to: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> InstructionResult {
    let source = *token_mut(state, from)?;
    let destination = *token_mut(state, to)?;
    if source.owner != *authority {
        return Err(InstructionError::IllegalOwner);
    }
    if source.mint != destination.mint {
        return Err(InstructionError::InvalidAccountData);
    }
    if source.amount < amount {
        return Err(InstructionError::InsufficientFunds);
    }
    token_mut(state, from)?.amount -= amount;
    token_mut(state, to)?.amount += amount;
    Ok(())
}

fn escrow_record(
    state: &MockState,
    escrow: &Pubkey,
    program_id: &Pubkey,
) -> Result<Option<Auction>, InstructionError> {
    let account = state
        .accounts
        .get(escrow)
        .ok_or(InstructionError::InvalidAccountData)?;
    if account.owner != *program_id {
        return Err(InstructionError::IncorrectProgramId);
    }
    if account.data.is_empty() {
        return Ok(None);
    }
    Auction::unpack(&account.data)
        .map(Some)
        .map_err(|_| InstructionError::InvalidAccountData)
}

fn live_record(
    state: &MockState,
    escrow: &Pubkey,
    program_id: &Pubkey,
) -> Result<Auction, InstructionError> {
    match escrow_record(state, escrow, program_id)? {
        Some(auction) if auction.is_initialized => Ok(auction),
        _ => Err(InstructionError::InvalidAccountData),
    }
}

fn write_record(state: &mut MockState, escrow: &Pubkey, auction: &Auction) {
    if let Some(account) = state.accounts.get_mut(escrow) {
        account.data = auction.pack().to_vec();
    }
}

fn close_record(state: &mut MockState, escrow: &Pubkey) {
    if let Some(account) = state.accounts.get_mut(escrow) {
        account.data.clear();
    }
}

fn clock_data(unix_timestamp: i64) -> Vec<u8> {
    let mut data = vec![0u8; 40];
    data[32..40].copy_from_slice(&unix_timestamp.to_le_bytes());
    data
}

#[async_trait]
impl Ledger for MockLedger {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let state = self.state.lock().unwrap();
        if *address == sysvar::clock::id() {
            return Ok(Some(clock_data(state.clock)));
        }
        Ok(state.accounts.get(address).map(|account| account.data.clone()))
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature, LedgerError> {
        let signed: Vec<Pubkey> = signers.iter().map(|signer| signer.pubkey()).collect();
        let missing_signer = instructions
            .iter()
            .flat_map(|instruction| instruction.accounts.iter())
            .filter(|meta| meta.is_signer)
            .map(|meta| &meta.pubkey)
            .chain(std::iter::once(payer))
            .any(|pubkey| !signed.contains(pubkey));
        if missing_signer {
            return Err(LedgerError::Transport("not enough signers".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        state.submissions += 1;

        let mut working = state.clone();
        for (index, instruction) in instructions.iter().enumerate() {
            self.process(&mut working, instruction).map_err(|err| {
                LedgerError::Rejected(TransactionError::InstructionError(index as u8, err))
            })?;
        }

        *state = working;
        Ok(Signature::new_unique())
    }

    async fn get_token_balance(&self, token_account: &Pubkey) -> Result<u64, LedgerError> {
        self.token(token_account)
            .map(|token| token.amount)
            .ok_or(LedgerError::NotATokenAccount(*token_account))
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, LedgerError> {
        Ok(890_880 + 6_960 * data_len as u64)
    }
}

/// Wallets and token accounts of one exhibitor and two bidders.
pub struct Fixture {
    pub program_id: Pubkey,
    pub nft_mint: Pubkey,
    pub ft_mint: Pubkey,
    pub exhibitor: Keypair,
    pub exhibitor_nft: Pubkey,
    pub exhibitor_ft: Pubkey,
    pub bidder1: Keypair,
    pub bidder1_ft: Pubkey,
    pub bidder2: Keypair,
    pub bidder2_ft: Pubkey,
}

pub const BIDDER_FUNDS: u64 = 1_000;

pub fn fixture(ledger: &MockLedger, program_id: Pubkey) -> Fixture {
    let nft_mint = ledger.create_mint();
    let ft_mint = ledger.create_mint();
    let exhibitor = Keypair::new();
    let bidder1 = Keypair::new();
    let bidder2 = Keypair::new();

    Fixture {
        program_id,
        nft_mint,
        ft_mint,
        exhibitor_nft: ledger.create_token_account(&nft_mint, &exhibitor.pubkey(), 1),
        exhibitor_ft: ledger.create_token_account(&ft_mint, &exhibitor.pubkey(), 0),
        bidder1_ft: ledger.create_token_account(&ft_mint, &bidder1.pubkey(), BIDDER_FUNDS),
        bidder2_ft: ledger.create_token_account(&ft_mint, &bidder2.pubkey(), BIDDER_FUNDS),
        exhibitor,
        bidder1,
        bidder2,
    }
}
