use std::str::FromStr;

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Transaction, TxEnvelope};
use alloy::dyn_abi::TypedData;
use alloy::eips::eip2718::Decodable2718;
use alloy::primitives::{Address, Signature, B256, U256};

use rusty_relay_core::RelayError;

use super::format::TestTransaction;

fn parse_signature(signature: &str) -> Result<Signature, RelayError> {
    Signature::from_str(signature)
        .map_err(|e| RelayError::Verification(format!("invalid signature: {e}")))
}

fn parse_address(address: &str) -> Result<Address, RelayError> {
    Address::from_str(address)
        .map_err(|e| RelayError::InvalidInput(format!("invalid address {address}: {e}")))
}

/// Recovers the EIP-191 signer of `message` and compares it with `address`.
pub fn verify_personal_message(
    message: &[u8],
    signature: &str,
    address: &str,
) -> Result<bool, RelayError> {
    let expected = parse_address(address)?;
    let sig = parse_signature(signature)?;
    Ok(sig
        .recover_address_from_msg(message)
        .map(|signer| signer == expected)
        .unwrap_or(false))
}

pub fn typed_data_hash(typed_data: &TypedData) -> Result<B256, RelayError> {
    typed_data
        .eip712_signing_hash()
        .map_err(|e| RelayError::InvalidInput(format!("typed data hashing failed: {e}")))
}

pub fn verify_typed_data(
    typed_data: &TypedData,
    signature: &str,
    address: &str,
) -> Result<bool, RelayError> {
    let expected = parse_address(address)?;
    let hash = typed_data_hash(typed_data)?;
    let sig = parse_signature(signature)?;
    Ok(sig
        .recover_address_from_prehash(&hash)
        .map(|signer| signer == expected)
        .unwrap_or(false))
}

fn parse_quantity(field: &str, value: &str) -> Result<U256, RelayError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| RelayError::InvalidInput(format!("{field} missing 0x prefix: {value}")))?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| RelayError::InvalidInput(format!("invalid {field} {value}: {e}")))
}

/// Decodes the raw EIP-2718 transaction returned by the wallet and checks that it is the
/// requested transfer signed by `address`. Anything that does not decode is invalid.
pub fn verify_signed_transaction(
    raw: &str,
    expected: &TestTransaction,
    address: &str,
) -> Result<bool, RelayError> {
    let signer = parse_address(address)?;
    let to = parse_address(&expected.to)?;
    let nonce = parse_quantity("nonce", &expected.nonce)?;
    let value = parse_quantity("value", &expected.value)?;

    let Ok(bytes) = hex::decode(raw.trim_start_matches("0x")) else {
        return Ok(false);
    };
    let Ok(envelope) = TxEnvelope::decode_2718(&mut bytes.as_slice()) else {
        return Ok(false);
    };
    let Ok(recovered) = envelope.recover_signer() else {
        return Ok(false);
    };

    Ok(recovered == signer
        && U256::from(envelope.nonce()) == nonce
        && envelope.to() == Some(to)
        && envelope.value() == value)
}
