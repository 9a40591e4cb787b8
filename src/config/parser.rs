use std::{fs::File, str::FromStr};

use solana_sdk::commitment_config::CommitmentConfig;
use tracing::debug;

use crate::{
    config::{data::*, errors::ConfigError},
    constants::DEFAULT_RPC_URL,
};

const SOLANA_CONFIG_PATH: &str = "~/.config/solana/cli/config.yml";

pub fn parse_solana_config() -> Option<SolanaConfig> {
    let config_path = shellexpand::tilde(SOLANA_CONFIG_PATH);

    let conf_file = match File::open(&*config_path) {
        Ok(f) => f,
        Err(_) => return None,
    };
    serde_yaml::from_reader(&conf_file).ok()
}

/// Picks the RPC endpoint: explicit flag, then the network environment
/// variable, then the Solana CLI config, then the local validator.
pub fn resolve_rpc_url(
    rpc_url_opt: Option<String>,
    network_env: Option<String>,
    sol_config: Option<&SolanaConfig>,
) -> String {
    let rpc_url = rpc_url_opt
        .or_else(|| network_env.filter(|url| !url.is_empty()))
        .or_else(|| sol_config.map(|config| config.json_rpc_url.clone()))
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string());

    debug!("Using RPC endpoint {}", rpc_url);
    rpc_url
}

/// Commitment from the Solana CLI config, `confirmed` when none is configured.
pub fn resolve_commitment(sol_config: Option<&SolanaConfig>) -> Result<CommitmentConfig, ConfigError> {
    match sol_config {
        Some(config) if !config.commitment.is_empty() => CommitmentConfig::from_str(&config.commitment)
            .map_err(|_| ConfigError::InvalidCommitment(config.commitment.clone())),
        _ => Ok(CommitmentConfig::confirmed()),
    }
}
