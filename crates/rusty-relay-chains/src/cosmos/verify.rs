use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bech32::{Bech32, Hrp};
use k256::ecdsa::signature::Verifier;
use k256::ecdsa::{Signature, VerifyingKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use rusty_relay_core::RelayError;

/// Bech32 account address of a compressed secp256k1 key under `hrp`.
pub fn address_from_pubkey(hrp: &str, pubkey: &[u8]) -> Result<String, RelayError> {
    let hrp = Hrp::parse(hrp).map_err(|e| RelayError::InvalidInput(format!("bech32 hrp: {e}")))?;
    let hash = Ripemd160::digest(Sha256::digest(pubkey));
    bech32::encode::<Bech32>(hrp, &hash)
        .map_err(|e| RelayError::InvalidInput(format!("bech32 encode: {e}")))
}

fn address_hrp(address: &str) -> Result<String, RelayError> {
    let (hrp, _) = bech32::decode(address)
        .map_err(|e| RelayError::InvalidInput(format!("invalid bech32 address {address}: {e}")))?;
    Ok(hrp.to_string())
}

/// Checks a base64 secp256k1 signature over `sign_bytes` (hashed with SHA-256) and that
/// the signing key belongs to `address`.
pub fn verify_signature(
    address: &str,
    pubkey_base64: &str,
    signature_base64: &str,
    sign_bytes: &[u8],
) -> Result<bool, RelayError> {
    let pubkey = BASE64
        .decode(pubkey_base64)
        .map_err(|e| RelayError::Verification(format!("pubkey base64: {e}")))?;
    let signature = BASE64
        .decode(signature_base64)
        .map_err(|e| RelayError::Verification(format!("signature base64: {e}")))?;

    if address_from_pubkey(&address_hrp(address)?, &pubkey)? != address {
        return Ok(false);
    }

    let key = VerifyingKey::from_sec1_bytes(&pubkey)
        .map_err(|e| RelayError::Verification(format!("secp256k1 pubkey: {e}")))?;
    let sig = Signature::from_slice(&signature)
        .map_err(|e| RelayError::Verification(format!("secp256k1 signature: {e}")))?;
    Ok(key.verify(sign_bytes, &sig).is_ok())
}
