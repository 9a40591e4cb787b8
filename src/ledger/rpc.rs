use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::RpcError,
};
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use tracing::{debug, warn};

use super::{Ledger, LedgerError};

/// `Ledger` backed by a JSON RPC node.
pub struct RpcLedger {
    rpc_client: RpcClient,
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        RpcLedger {
            rpc_client: RpcClient::new_with_commitment(rpc_url, commitment),
        }
    }
}

const JSON_RPC_INVALID_PARAMS: i64 = -32602;

/// Whether the node refused a token query because the account is missing or
/// is not a token account. Other RPC failures are transport problems.
fn is_not_a_token_account(error: &ClientError) -> bool {
    match error.kind() {
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, .. }) => {
            *code == JSON_RPC_INVALID_PARAMS
        }
        ClientErrorKind::RpcError(RpcError::ForUser(message)) => {
            message.starts_with("AccountNotFound")
        }
        _ => false,
    }
}

fn to_ledger_error(error: ClientError) -> LedgerError {
    match error.get_transaction_error() {
        Some(transaction_error) => LedgerError::Rejected(transaction_error),
        None => LedgerError::Transport(error.to_string()),
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, LedgerError> {
        let response = self
            .rpc_client
            .get_account_with_commitment(address, self.rpc_client.commitment())
            .await
            .map_err(to_ledger_error)?;

        Ok(response.value.map(|account| account.data))
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        payer: &Pubkey,
        signers: &[&Keypair],
    ) -> Result<Signature, LedgerError> {
        let recent_blockhash = self
            .rpc_client
            .get_latest_blockhash()
            .await
            .map_err(to_ledger_error)?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(payer));
        transaction
            .try_sign(&signers.to_vec(), recent_blockhash)
            .map_err(|err| LedgerError::Transport(format!("failed to sign transaction: {}", err)))?;

        debug!(
            "Sending transaction with {} instruction(s) and {} signer(s)",
            instructions.len(),
            signers.len()
        );

        self.rpc_client
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(to_ledger_error)
    }

    async fn get_token_balance(&self, token_account: &Pubkey) -> Result<u64, LedgerError> {
        let amount = match self.rpc_client.get_token_account_balance(token_account).await {
            Ok(amount) => amount,
            Err(err) if is_not_a_token_account(&err) => {
                warn!("Balance lookup failed for {}: {}", token_account, err);
                return Err(LedgerError::NotATokenAccount(*token_account));
            }
            Err(err) => return Err(to_ledger_error(err)),
        };

        amount
            .amount
            .parse::<u64>()
            .map_err(|_| LedgerError::NotATokenAccount(*token_account))
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, LedgerError> {
        self.rpc_client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(to_ledger_error)
    }
}
