use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

/// Everything a command needs to reach one auction deployment.
#[derive(Clone, Debug)]
pub struct AuctionConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub keys_dir: PathBuf,
    pub commitment: CommitmentConfig,
}

/// The subset of the Solana CLI config file the client reads.
#[derive(Debug, Deserialize, Serialize)]
pub struct SolanaConfig {
    pub json_rpc_url: String,
    pub keypair_path: String,
    pub commitment: String,
}
