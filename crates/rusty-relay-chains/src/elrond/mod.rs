//! MultiversX (Elrond) chains, chain id `1`, `D` or `T` as the reference.

pub mod format;
pub mod verify;

use serde::Deserialize;
use serde_json::json;

use rusty_relay_core::{ChainFamily, RelayError, RequestScope, RpcMethod, RpcResult};

use self::format::{format_transaction, format_transactions, signable_message_hash, test_message};
use self::verify::verify_signature;

pub const NAMESPACE: &str = "elrond";

pub const ELROND_SIGN_TRANSACTION: &str = "erd_signTransaction";
pub const ELROND_SIGN_TRANSACTIONS: &str = "erd_signTransactions";
pub const ELROND_SIGN_MESSAGE: &str = "erd_signMessage";

pub fn family() -> ChainFamily {
    ChainFamily::new(
        NAMESPACE,
        vec![
            RpcMethod::fixed(ELROND_SIGN_TRANSACTION, |s| Box::pin(sign_transaction(s))),
            RpcMethod::fixed(ELROND_SIGN_TRANSACTIONS, |s| Box::pin(sign_transactions(s))),
            RpcMethod::fixed(ELROND_SIGN_MESSAGE, |s| Box::pin(sign_message(s))),
        ],
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureResponse {
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchSignatureResponse {
    pub signatures: Vec<SignatureResponse>,
}

pub async fn sign_transaction(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let tx = format_transaction(&scope.address, scope.chain_id.reference());

    let response: SignatureResponse = scope
        .request_as(ELROND_SIGN_TRANSACTION, json!({ "transaction": tx }))
        .await?;
    let valid = verify_signature(&scope.address, &tx.signing_bytes()?, &response.signature)?;
    Ok(RpcResult::new(ELROND_SIGN_TRANSACTION, scope.address, valid, response.signature))
}

/// The batch is valid only if every returned signature verifies.
pub async fn sign_transactions(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let txs = format_transactions(&scope.address, scope.chain_id.reference());

    let response: BatchSignatureResponse = scope
        .request_as(ELROND_SIGN_TRANSACTIONS, json!({ "transactions": txs }))
        .await?;
    if response.signatures.len() != txs.len() {
        return Err(RelayError::malformed(format!(
            "expected {} signatures, got {}",
            txs.len(),
            response.signatures.len()
        )));
    }

    let mut valid = true;
    for (tx, sig) in txs.iter().zip(&response.signatures) {
        valid &= verify_signature(&scope.address, &tx.signing_bytes()?, &sig.signature)?;
    }
    let joined = response
        .signatures
        .iter()
        .map(|s| s.signature.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(RpcResult::new(ELROND_SIGN_TRANSACTIONS, scope.address, valid, joined))
}

pub async fn sign_message(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let message = test_message(scope.now_ms()?);
    let params = json!({
        "address": scope.address,
        "message": message,
    });

    let response: SignatureResponse = scope.request_as(ELROND_SIGN_MESSAGE, params).await?;
    let digest = signable_message_hash(&message);
    let valid = verify_signature(&scope.address, digest.as_slice(), &response.signature)?;
    Ok(RpcResult::new(ELROND_SIGN_MESSAGE, scope.address, valid, response.signature))
}
