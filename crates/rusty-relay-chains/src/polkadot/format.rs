use serde_json::{json, Value};

/// `system.remark("I am signing this transaction!")`, SCALE-encoded.
pub const REMARK_CALL: &str =
    "0x0001784920616d207369676e696e672074686973207472616e73616374696f6e21";

pub const SIGNED_EXTENSIONS: [&str; 8] = [
    "CheckNonZeroSender",
    "CheckSpecVersion",
    "CheckTxVersion",
    "CheckGenesis",
    "CheckMortality",
    "CheckNonce",
    "CheckWeight",
    "ChargeTransactionPayment",
];

pub fn test_message(now_ms: u64) -> String {
    format!("This is an example message to be signed - {now_ms}")
}

/// Signer payload for a mortal remark extrinsic on Westend.
pub fn transaction_payload(address: &str) -> Value {
    json!({
        "specVersion": "0x00002468",
        "transactionVersion": "0x0000000e",
        "address": address,
        "blockHash": "0x554d682a74099d05e8b7852d19c93b527b5fae1e9e1969f6e1b82a2f09a14cc9",
        "blockNumber": "0x00cb539c",
        "era": "0xc501",
        "genesisHash": "0xe143f23803ac50e8f6f8e62695d1ce9e4e1d68aa36c1cd2cfd15340213f3423e",
        "method": REMARK_CALL,
        "nonce": "0x00000000",
        "signedExtensions": SIGNED_EXTENSIONS,
        "tip": "0x00000000000000000000000000000000",
        "version": 4
    })
}
