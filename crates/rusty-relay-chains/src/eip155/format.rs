use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use rusty_relay_core::{NetworkPort, RelayError};

use crate::encoding::to_hex_prefixed;

/// Gas consumed by a plain value transfer.
pub const INTRINSIC_GAS: u64 = 21_000;

pub fn test_message(now_ms: u64) -> String {
    format!("My email is john@doe.com - {now_ms}")
}

pub fn encode_message_hex(message: &str) -> String {
    to_hex_prefixed(message.as_bytes())
}

/// A zero-value self-transfer carrying live nonce and gas price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTransaction {
    pub from: String,
    pub to: String,
    pub data: String,
    pub nonce: String,
    pub gas_price: String,
    pub gas_limit: String,
    pub value: String,
}

impl TestTransaction {
    pub fn new(address: &str, nonce: u64, gas_price: U256) -> Self {
        Self {
            from: address.to_owned(),
            to: address.to_owned(),
            data: "0x".to_owned(),
            nonce: format!("{nonce:#x}"),
            gas_price: format!("0x{gas_price:x}"),
            gas_limit: format!("{INTRINSIC_GAS:#x}"),
            value: "0x0".to_owned(),
        }
    }
}

pub async fn format_test_transaction(
    network: &dyn NetworkPort,
    rpc_url: &str,
    address: &str,
) -> Result<(TestTransaction, U256), RelayError> {
    let nonce = network.transaction_count(rpc_url, address).await?;
    let gas_price = network.gas_price(rpc_url).await?;
    Ok((TestTransaction::new(address, nonce, gas_price), gas_price))
}

pub fn intrinsic_cost(gas_price: U256) -> U256 {
    gas_price.saturating_mul(U256::from(INTRINSIC_GAS))
}

/// The EIP-712 "Ether Mail" example document.
pub fn typed_data_example() -> Value {
    json!({
        "types": {
            "EIP712Domain": [
                { "name": "name", "type": "string" },
                { "name": "version", "type": "string" },
                { "name": "chainId", "type": "uint256" },
                { "name": "verifyingContract", "type": "address" }
            ],
            "Person": [
                { "name": "name", "type": "string" },
                { "name": "wallet", "type": "address" }
            ],
            "Mail": [
                { "name": "from", "type": "Person" },
                { "name": "to", "type": "Person" },
                { "name": "contents", "type": "string" }
            ]
        },
        "primaryType": "Mail",
        "domain": {
            "name": "Ether Mail",
            "version": "1",
            "chainId": 1,
            "verifyingContract": "0xCcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"
        },
        "message": {
            "from": {
                "name": "Cow",
                "wallet": "0xCD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"
            },
            "to": {
                "name": "Bob",
                "wallet": "0xbBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"
            },
            "contents": "Hello, Bob!"
        }
    })
}
