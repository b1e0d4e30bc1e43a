//! Substrate chains addressed by genesis-hash prefix.

pub mod format;
pub mod verify;

use serde::Deserialize;
use serde_json::json;

use rusty_relay_core::{ChainFamily, RelayError, RequestScope, RpcMethod, RpcResult};

use self::format::{test_message, transaction_payload};

pub const NAMESPACE: &str = "polkadot";

pub const POLKADOT_SIGN_TRANSACTION: &str = "polkadot_signTransaction";
pub const POLKADOT_SIGN_MESSAGE: &str = "polkadot_signMessage";

pub fn family() -> ChainFamily {
    ChainFamily::new(
        NAMESPACE,
        vec![
            RpcMethod::fixed(POLKADOT_SIGN_TRANSACTION, |s| Box::pin(sign_transaction(s))),
            RpcMethod::fixed(POLKADOT_SIGN_MESSAGE, |s| Box::pin(sign_message(s))),
        ],
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignatureResponse {
    pub signature: String,
}

/// The extrinsic payload is opaque here; the wallet's signature is reported as valid.
pub async fn sign_transaction(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let params = json!({
        "address": scope.address,
        "transactionPayload": transaction_payload(&scope.address),
    });

    let response: SignatureResponse = scope.request_as(POLKADOT_SIGN_TRANSACTION, params).await?;
    Ok(RpcResult::new(POLKADOT_SIGN_TRANSACTION, scope.address, true, response.signature))
}

pub async fn sign_message(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    let message = test_message(scope.now_ms()?);
    let params = json!({
        "address": scope.address,
        "message": message,
    });

    let response: SignatureResponse = scope.request_as(POLKADOT_SIGN_MESSAGE, params).await?;
    let valid = verify::verify_message(&scope.address, &message, &response.signature).await?;
    Ok(RpcResult::new(POLKADOT_SIGN_MESSAGE, scope.address, valid, response.signature))
}
