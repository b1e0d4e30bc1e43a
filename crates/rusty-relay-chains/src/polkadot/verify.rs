use std::sync::OnceLock;

use blake2::{Blake2b512, Digest};
use schnorrkel::context::SigningContext;
use schnorrkel::{signing_context, PublicKey, Signature};
use tokio::sync::OnceCell;

use rusty_relay_core::RelayError;

use crate::encoding::decode_hex;

const SS58_PREFIX: &[u8] = b"SS58PRE";
const SUBSTRATE_CONTEXT: &[u8] = b"substrate";
/// sr25519 tag of a `MultiSignature`.
const SR25519_TAG: u8 = 0x01;

fn gate() -> &'static OnceCell<SigningContext> {
    static GATE: OnceLock<OnceCell<SigningContext>> = OnceLock::new();
    GATE.get_or_init(OnceCell::new)
}

/// Resolves once the sr25519 signing context is built; every verification awaits it.
pub async fn crypto_ready() -> &'static SigningContext {
    gate()
        .get_or_init(|| async {
            tracing::debug!("sr25519 context initialized");
            signing_context(SUBSTRATE_CONTEXT)
        })
        .await
}

fn ss58_checksum(prefix_and_key: &[u8]) -> [u8; 2] {
    let mut hasher = Blake2b512::new();
    hasher.update(SS58_PREFIX);
    hasher.update(prefix_and_key);
    let hash = hasher.finalize();
    [hash[0], hash[1]]
}

/// Decodes an SS58 address with a 32-byte account id, checking its checksum.
pub fn decode_ss58(address: &str) -> Result<[u8; 32], RelayError> {
    let invalid = |why: &str| RelayError::InvalidInput(format!("invalid ss58 address {address}: {why}"));
    let raw = bs58::decode(address)
        .into_vec()
        .map_err(|e| invalid(&e.to_string()))?;
    let prefix_len = match raw.first() {
        Some(b) if *b < 64 => 1,
        Some(b) if *b < 128 => 2,
        _ => return Err(invalid("reserved prefix")),
    };
    if raw.len() != prefix_len + 32 + 2 {
        return Err(invalid("unexpected length"));
    }
    let (body, checksum) = raw.split_at(prefix_len + 32);
    if ss58_checksum(body) != checksum {
        return Err(invalid("checksum mismatch"));
    }
    let mut key = [0u8; 32];
    key.copy_from_slice(&body[prefix_len..]);
    Ok(key)
}

pub fn encode_ss58(network: u16, key: &[u8; 32]) -> String {
    let mut raw = match network {
        0..=63 => vec![network as u8],
        _ => {
            let first = ((network & 0b1111_1100) >> 2) as u8 | 0b0100_0000;
            let second = ((network >> 8) as u8) | (((network & 0b11) as u8) << 6);
            vec![first, second]
        }
    };
    raw.extend_from_slice(key);
    let checksum = ss58_checksum(&raw);
    raw.extend_from_slice(&checksum);
    bs58::encode(raw).into_string()
}

fn parse_signature(signature: &str) -> Result<Signature, RelayError> {
    let mut bytes = decode_hex(signature)?;
    if bytes.len() == 65 && bytes[0] == SR25519_TAG {
        bytes.remove(0);
    }
    Signature::from_bytes(&bytes)
        .map_err(|e| RelayError::Verification(format!("sr25519 signature: {e}")))
}

/// Verifies an sr25519 message signature for `address`, accepting either the raw message
/// or the `<Bytes>` wrapped form wallets sign.
pub async fn verify_message(address: &str, message: &str, signature: &str) -> Result<bool, RelayError> {
    let ctx = crypto_ready().await;
    let key = PublicKey::from_bytes(&decode_ss58(address)?)
        .map_err(|e| RelayError::Verification(format!("sr25519 public key: {e}")))?;
    let sig = parse_signature(signature)?;

    let wrapped = format!("<Bytes>{message}</Bytes>");
    Ok([message.as_bytes(), wrapped.as_bytes()]
        .iter()
        .any(|candidate| key.verify(ctx.bytes(candidate), &sig).is_ok()))
}
