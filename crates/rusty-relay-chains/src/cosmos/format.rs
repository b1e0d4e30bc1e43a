use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use rusty_relay_core::RelayError;

use crate::encoding::sorted_json;

pub const FEE_DENOM: &str = "ucosm";
pub const FEE_AMOUNT: &str = "2000";
pub const GAS_LIMIT: u64 = 200_000;
pub const ACCOUNT_NUMBER: u64 = 1;
pub const SEQUENCE: u64 = 1;
/// Compressed secp256k1 key placed in the signer info of the test document.
pub const SIGNER_PUBKEY_BASE64: &str = "AgSEjOuOr991QlHCORRmdE5ahVKeyBrmtgoYepCpQGOW";

pub const SEND_FROM: &str = "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6";
pub const SEND_TO: &str = "cosmos1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5lzv7xu";
pub const SEND_AMOUNT: &str = "1234567";

const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";
const SIGN_MODE_DIRECT: u64 = 1;

/// Minimal proto3 writer; default-valued scalars are omitted like the reference encoder.
#[derive(Debug, Default)]
struct ProtoWriter {
    buf: Vec<u8>,
}

impl ProtoWriter {
    fn varint(&mut self, mut v: u64) {
        while v >= 0x80 {
            self.buf.push((v as u8 & 0x7f) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
    }

    fn tag(&mut self, field: u32, wire_type: u8) {
        self.varint(u64::from(field) << 3 | u64::from(wire_type));
    }

    fn uint64(mut self, field: u32, v: u64) -> Self {
        if v != 0 {
            self.tag(field, 0);
            self.varint(v);
        }
        self
    }

    fn bytes(mut self, field: u32, v: &[u8]) -> Self {
        if !v.is_empty() {
            self.tag(field, 2);
            self.varint(v.len() as u64);
            self.buf.extend_from_slice(v);
        }
        self
    }

    fn string(self, field: u32, v: &str) -> Self {
        self.bytes(field, v.as_bytes())
    }

    fn message(self, field: u32, inner: ProtoWriter) -> Self {
        self.bytes(field, &inner.buf)
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

fn coin(denom: &str, amount: &str) -> ProtoWriter {
    ProtoWriter::default().string(1, denom).string(2, amount)
}

/// `TxBody` holding one bank `MsgSend`.
pub fn make_body_bytes(from: &str, to: &str, denom: &str, amount: &str) -> Vec<u8> {
    let msg = ProtoWriter::default()
        .string(1, from)
        .string(2, to)
        .message(3, coin(denom, amount));
    let any = ProtoWriter::default()
        .string(1, MSG_SEND_TYPE_URL)
        .message(2, msg);
    ProtoWriter::default().message(1, any).finish()
}

/// `AuthInfo` with a single direct-mode secp256k1 signer.
pub fn make_auth_info_bytes(
    pubkey: &[u8],
    denom: &str,
    fee_amount: &str,
    gas_limit: u64,
    sequence: u64,
) -> Vec<u8> {
    let key = ProtoWriter::default().bytes(1, pubkey);
    let public_key = ProtoWriter::default()
        .string(1, SECP256K1_PUBKEY_TYPE_URL)
        .message(2, key);
    let single = ProtoWriter::default().uint64(1, SIGN_MODE_DIRECT);
    let mode_info = ProtoWriter::default().message(1, single);
    let signer_info = ProtoWriter::default()
        .message(1, public_key)
        .message(2, mode_info)
        .uint64(3, sequence);
    let fee = ProtoWriter::default()
        .message(1, coin(denom, fee_amount))
        .uint64(2, gas_limit);
    ProtoWriter::default()
        .message(1, signer_info)
        .message(2, fee)
        .finish()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSignDoc {
    pub body_bytes: Vec<u8>,
    pub auth_info_bytes: Vec<u8>,
    pub chain_id: String,
    pub account_number: u64,
}

impl DirectSignDoc {
    /// Protobuf `SignDoc` bytes, the preimage of the direct-mode signature.
    pub fn sign_bytes(&self) -> Vec<u8> {
        ProtoWriter::default()
            .bytes(1, &self.body_bytes)
            .bytes(2, &self.auth_info_bytes)
            .string(3, &self.chain_id)
            .uint64(4, self.account_number)
            .finish()
    }

    pub fn to_wire(&self) -> Value {
        json!({
            "chainId": self.chain_id,
            "accountNumber": self.account_number.to_string(),
            "authInfoBytes": hex::encode(&self.auth_info_bytes),
            "bodyBytes": hex::encode(&self.body_bytes),
        })
    }
}

pub fn format_direct_sign_doc(chain_reference: &str) -> Result<DirectSignDoc, RelayError> {
    let pubkey = BASE64
        .decode(SIGNER_PUBKEY_BASE64)
        .map_err(|e| RelayError::InvalidInput(format!("signer pubkey: {e}")))?;
    Ok(DirectSignDoc {
        body_bytes: make_body_bytes(SEND_FROM, SEND_TO, FEE_DENOM, SEND_AMOUNT),
        auth_info_bytes: make_auth_info_bytes(&pubkey, FEE_DENOM, FEE_AMOUNT, GAS_LIMIT, SEQUENCE),
        chain_id: chain_reference.to_owned(),
        account_number: ACCOUNT_NUMBER,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AminoSignDoc {
    pub chain_id: String,
    pub account_number: String,
    pub sequence: String,
    pub fee: StdFee,
    pub msgs: Vec<Value>,
    pub memo: String,
}

impl AminoSignDoc {
    /// Sorted-key JSON with `&`, `<` and `>` escaped, the preimage of the amino signature.
    pub fn sign_bytes(&self) -> Result<Vec<u8>, RelayError> {
        let value = serde_json::to_value(self)
            .map_err(|e| RelayError::InvalidInput(format!("amino sign doc: {e}")))?;
        let text = sorted_json(&value)?
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e");
        Ok(text.into_bytes())
    }
}

pub fn format_amino_sign_doc(chain_reference: &str) -> AminoSignDoc {
    AminoSignDoc {
        chain_id: chain_reference.to_owned(),
        account_number: "7".to_owned(),
        sequence: "54".to_owned(),
        fee: StdFee {
            amount: Vec::new(),
            gas: "23".to_owned(),
        },
        msgs: Vec::new(),
        memo: "hello, world".to_owned(),
    }
}
