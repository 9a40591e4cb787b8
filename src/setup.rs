use std::{env, path::PathBuf};

use anyhow::Result;
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::{
    config::{data::AuctionConfig, errors::ConfigError, parser::*},
    constants::{DEFAULT_KEYS_DIR, ESCROW_KEY_NAME, NETWORK_ENV, PROGRAM_KEY_NAME},
    keys::KeyStore,
    ledger::RpcLedger,
    lifecycle::AuctionClient,
};

pub fn setup_client(auction_config: &AuctionConfig) -> AuctionClient<RpcLedger> {
    let ledger = RpcLedger::new(auction_config.rpc_url.clone(), auction_config.commitment);
    AuctionClient::new(ledger, auction_config.program_id)
}

pub fn auction_setup(
    rpc_url_opt: Option<String>,
    keys_dir_opt: Option<String>,
    program_id_opt: Option<String>,
) -> Result<AuctionConfig> {
    let sol_config_option = parse_solana_config();

    let rpc_url = resolve_rpc_url(
        rpc_url_opt,
        env::var(NETWORK_ENV).ok(),
        sol_config_option.as_ref(),
    );
    let commitment = resolve_commitment(sol_config_option.as_ref())?;

    let keys_dir = keys_dir_opt.unwrap_or_else(|| DEFAULT_KEYS_DIR.to_string());
    let keys_dir = PathBuf::from(shellexpand::tilde(&keys_dir).into_owned());
    let key_store = KeyStore::new(&keys_dir);

    let program_id: Pubkey = match program_id_opt {
        Some(program_id) => key_store
            .resolve(&program_id)
            .map_err(|err| ConfigError::MissingProgramId(err.to_string()))?,
        None => key_store
            .public_key(PROGRAM_KEY_NAME)
            .map_err(|err| ConfigError::MissingProgramId(err.to_string()))?,
    };

    info!(
        "Auction program {} on {} with keys from {}",
        program_id,
        rpc_url,
        keys_dir.display()
    );

    Ok(AuctionConfig {
        rpc_url,
        program_id,
        keys_dir,
        commitment,
    })
}

/// Escrow account given on the command line, or the one saved by the last exhibit.
pub fn resolve_escrow(key_store: &KeyStore, escrow_opt: Option<String>) -> Result<Pubkey> {
    let escrow = escrow_opt.unwrap_or_else(|| ESCROW_KEY_NAME.to_string());
    Ok(key_store.resolve(&escrow)?)
}
