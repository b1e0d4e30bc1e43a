use bech32::{Bech32, Hrp};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use rusty_relay_core::RelayError;

use crate::encoding::decode_hex;

pub const ADDRESS_HRP: &str = "erd";

pub fn decode_address(address: &str) -> Result<[u8; 32], RelayError> {
    let (hrp, data) = bech32::decode(address)
        .map_err(|e| RelayError::InvalidInput(format!("invalid elrond address {address}: {e}")))?;
    if hrp.as_str() != ADDRESS_HRP {
        return Err(RelayError::InvalidInput(format!(
            "unexpected address prefix {hrp} in {address}"
        )));
    }
    data.try_into()
        .map_err(|_| RelayError::InvalidInput(format!("elrond address {address} is not 32 bytes")))
}

pub fn encode_address(pubkey: &[u8; 32]) -> Result<String, RelayError> {
    let hrp = Hrp::parse(ADDRESS_HRP).map_err(|e| RelayError::InvalidInput(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, pubkey).map_err(|e| RelayError::InvalidInput(e.to_string()))
}

/// Checks a hex ed25519 signature over `message` by the key behind `address`.
pub fn verify_signature(address: &str, message: &[u8], signature: &str) -> Result<bool, RelayError> {
    let key = VerifyingKey::from_bytes(&decode_address(address)?)
        .map_err(|e| RelayError::Verification(format!("ed25519 public key: {e}")))?;
    let sig = Signature::from_slice(&decode_hex(signature)?)
        .map_err(|e| RelayError::Verification(format!("ed25519 signature: {e}")))?;
    Ok(key.verify(message, &sig).is_ok())
}
