pub use anyhow::{anyhow, Result};
pub use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
};
pub use std::str::FromStr;
pub use tracing::{debug, error, info, warn};

pub use crate::constants::*;
pub use crate::keys::KeyStore;
pub use crate::setup::{auction_setup, resolve_escrow, setup_client};
pub use crate::utils::*;
