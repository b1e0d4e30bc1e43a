//! Cosmos SDK chains, direct (protobuf) and amino (JSON) sign modes.

pub mod format;
pub mod verify;

use serde::Deserialize;
use serde_json::json;

use rusty_relay_core::{ChainFamily, RelayError, RequestScope, RpcMethod, RpcResult};

use self::format::{format_amino_sign_doc, format_direct_sign_doc};
use self::verify::verify_signature;

pub const NAMESPACE: &str = "cosmos";

pub const COSMOS_SIGN_DIRECT: &str = "cosmos_signDirect";
pub const COSMOS_SIGN_AMINO: &str = "cosmos_signAmino";

pub fn family() -> ChainFamily {
    ChainFamily::new(
        NAMESPACE,
        vec![
            RpcMethod::fixed(COSMOS_SIGN_DIRECT, |s| Box::pin(sign_direct(s))),
            RpcMethod::fixed(COSMOS_SIGN_AMINO, |s| Box::pin(sign_amino(s))),
        ],
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignResponse {
    pub signature: StdSignature,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StdSignature {
    #[serde(default)]
    pub pub_key: Option<PubKey>,
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

impl StdSignature {
    fn pubkey(&self, address: &str) -> Result<&str, RelayError> {
        self.pub_key
            .as_ref()
            .map(|k| k.value.as_str())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| RelayError::MissingPublicKey(address.to_owned()))
    }
}

pub async fn sign_direct(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    scope.require_chain_data()?;
    let doc = format_direct_sign_doc(scope.chain_id.reference())?;
    let params = json!({
        "signerAddress": scope.address,
        "signDoc": doc.to_wire(),
    });

    let response: SignResponse = scope.request_as(COSMOS_SIGN_DIRECT, params).await?;
    let sig = response.signature;
    let valid = verify_signature(
        &scope.address,
        sig.pubkey(&scope.address)?,
        &sig.signature,
        &doc.sign_bytes(),
    )?;
    Ok(RpcResult::new(COSMOS_SIGN_DIRECT, scope.address, valid, sig.signature))
}

pub async fn sign_amino(scope: RequestScope) -> Result<RpcResult, RelayError> {
    scope.require_account()?;
    scope.require_chain_data()?;
    let doc = format_amino_sign_doc(scope.chain_id.reference());
    let params = json!({
        "signerAddress": scope.address,
        "signDoc": doc,
    });

    let response: SignResponse = scope.request_as(COSMOS_SIGN_AMINO, params).await?;
    let sig = response.signature;
    let valid = verify_signature(
        &scope.address,
        sig.pubkey(&scope.address)?,
        &sig.signature,
        &doc.sign_bytes()?,
    )?;
    Ok(RpcResult::new(COSMOS_SIGN_AMINO, scope.address, valid, sig.signature))
}
