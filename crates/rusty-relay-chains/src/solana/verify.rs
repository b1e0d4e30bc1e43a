use std::str::FromStr;

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use rusty_relay_core::RelayError;

fn parse_signature(signature: &str) -> Result<Signature, RelayError> {
    Signature::from_str(signature)
        .map_err(|e| RelayError::Verification(format!("invalid base58 signature: {e}")))
}

fn ed25519_verify(pubkey: &Pubkey, message: &[u8], signature: &Signature) -> Result<bool, RelayError> {
    let key = VerifyingKey::from_bytes(&pubkey.to_bytes())
        .map_err(|e| RelayError::Verification(format!("ed25519 public key: {e}")))?;
    let sig = Ed25519Signature::from_slice(signature.as_ref())
        .map_err(|e| RelayError::Verification(format!("ed25519 signature: {e}")))?;
    Ok(key.verify(message, &sig).is_ok())
}

/// Attaches the fee payer signature and checks it against the serialized message.
pub fn verify_transaction(mut transaction: Transaction, signature: &str) -> Result<bool, RelayError> {
    let sig = parse_signature(signature)?;
    let fee_payer = *transaction
        .message
        .account_keys
        .first()
        .ok_or_else(|| RelayError::Verification("transaction has no fee payer".to_owned()))?;
    let Some(slot) = transaction.signatures.first_mut() else {
        return Err(RelayError::Verification("transaction has no signer".to_owned()));
    };
    *slot = sig;
    ed25519_verify(&fee_payer, &transaction.message_data(), &sig)
}

pub fn verify_message(pubkey: &Pubkey, message: &[u8], signature: &str) -> Result<bool, RelayError> {
    ed25519_verify(pubkey, message, &parse_signature(signature)?)
}
