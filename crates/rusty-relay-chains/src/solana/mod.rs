//! Solana clusters.

pub mod format;
pub mod verify;

use std::str::FromStr;

use serde::Deserialize;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;

use rusty_relay_core::{ChainFamily, RelayError, RequestScope, RpcMethod, RpcResult};

use self::format::{format_message, format_test_transfer, test_message};
use self::verify::{verify_message, verify_transaction};

pub const NAMESPACE: &str = "solana";

pub const SOLANA_SIGN_TRANSACTION: &str = "solana_signTransaction";
pub const SOLANA_SIGN_MESSAGE: &str = "solana_signMessage";

pub fn family() -> ChainFamily {
    ChainFamily::new(
        NAMESPACE,
        vec![
            RpcMethod::fixed(SOLANA_SIGN_TRANSACTION, |s| Box::pin(sign_transaction(s))),
            RpcMethod::fixed(SOLANA_SIGN_MESSAGE, |s| Box::pin(sign_message(s))),
        ],
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureResponse {
    pub signature: String,
}

pub fn parse_pubkey(address: &str) -> Result<Pubkey, RelayError> {
    Pubkey::from_str(address)
        .map_err(|e| RelayError::InvalidInput(format!("invalid solana address {address}: {e}")))
}

pub async fn sign_transaction(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let chain = scope.require_chain_data()?;
    let fee_payer = parse_pubkey(&scope.address)?;

    let blockhash = scope.network().latest_blockhash(&chain.rpc_url).await?;
    let blockhash = Hash::from_str(&blockhash)
        .map_err(|e| RelayError::malformed(format!("recent blockhash {blockhash}: {e}")))?;
    let transfer = format_test_transfer(&fee_payer, &Keypair::new().pubkey(), blockhash);

    let response: SignatureResponse = scope
        .request_as(SOLANA_SIGN_TRANSACTION, transfer.params)
        .await?;
    let valid = verify_transaction(transfer.transaction, &response.signature)?;
    Ok(RpcResult::new(SOLANA_SIGN_TRANSACTION, scope.address, valid, response.signature))
}

pub async fn sign_message(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let pubkey = parse_pubkey(&scope.address)?;
    let message = test_message(scope.now_ms()?);

    let response: SignatureResponse = scope
        .request_as(SOLANA_SIGN_MESSAGE, format_message(&pubkey, &message))
        .await?;
    let valid = verify_message(&pubkey, message.as_bytes(), &response.signature)?;
    Ok(RpcResult::new(SOLANA_SIGN_MESSAGE, scope.address, valid, response.signature))
}
