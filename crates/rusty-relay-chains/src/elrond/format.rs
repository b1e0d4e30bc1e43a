use alloy::primitives::{keccak256, B256};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use rusty_relay_core::RelayError;

pub const GAS_PRICE: u64 = 1_000_000_000;
pub const MIN_GAS_LIMIT: u64 = 50_000;
pub const GAS_PER_DATA_BYTE: u64 = 1_500;
pub const TRANSACTION_VERSION: u32 = 1;

const SIGNED_MESSAGE_PREFIX: &str = "\x17Elrond Signed Message:\n";

pub fn test_message(now_ms: u64) -> String {
    format!("This is an example message to be signed - {now_ms}")
}

/// Plain-object form of a transaction. Field order is significant: the signature covers
/// the JSON text of this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElrondTransaction {
    pub nonce: u64,
    pub value: String,
    pub receiver: String,
    pub sender: String,
    pub gas_price: u64,
    pub gas_limit: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub version: u32,
}

impl ElrondTransaction {
    /// A self-transfer of `value` carrying `data` as its payload.
    pub fn self_transfer(address: &str, chain_id: &str, nonce: u64, value: &str, data: &str) -> Self {
        Self {
            nonce,
            value: value.to_owned(),
            receiver: address.to_owned(),
            sender: address.to_owned(),
            gas_price: GAS_PRICE,
            gas_limit: MIN_GAS_LIMIT + GAS_PER_DATA_BYTE * data.len() as u64,
            data: (!data.is_empty()).then(|| BASE64.encode(data)),
            chain_id: chain_id.to_owned(),
            version: TRANSACTION_VERSION,
        }
    }

    pub fn signing_bytes(&self) -> Result<Vec<u8>, RelayError> {
        serde_json::to_vec(self)
            .map_err(|e| RelayError::InvalidInput(format!("elrond transaction: {e}")))
    }
}

pub fn format_transaction(address: &str, chain_id: &str) -> ElrondTransaction {
    ElrondTransaction::self_transfer(address, chain_id, 1, "1000000000000000000", "testdata")
}

pub fn format_transactions(address: &str, chain_id: &str) -> Vec<ElrondTransaction> {
    vec![
        ElrondTransaction::self_transfer(address, chain_id, 1, "1000000000000000000", "testdata"),
        ElrondTransaction::self_transfer(address, chain_id, 2, "2000000000000000000", ""),
        ElrondTransaction::self_transfer(address, chain_id, 3, "3000000000000000000", "third"),
    ]
}

/// Keccak-256 of the prefixed message, the preimage of an `erd_signMessage` signature.
pub fn signable_message_hash(message: &str) -> B256 {
    let mut bytes = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + 20 + message.len());
    bytes.extend_from_slice(SIGNED_MESSAGE_PREFIX.as_bytes());
    bytes.extend_from_slice(message.len().to_string().as_bytes());
    bytes.extend_from_slice(message.as_bytes());
    keccak256(bytes)
}
