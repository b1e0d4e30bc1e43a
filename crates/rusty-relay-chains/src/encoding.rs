use serde_json::{Map, Value};

use rusty_relay_core::RelayError;

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

pub fn to_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn decode_hex(s: &str) -> Result<Vec<u8>, RelayError> {
    hex::decode(strip_0x(s)).map_err(|e| RelayError::Verification(format!("invalid hex: {e}")))
}

/// Rebuilds `value` with every object's keys in lexicographic order.
pub fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            let mut out = Map::with_capacity(keys.len());
            for key in keys {
                if let Some(v) = map.get(key) {
                    out.insert(key.clone(), sort_keys(v));
                }
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        _ => value.clone(),
    }
}

pub fn sorted_json(value: &Value) -> Result<String, RelayError> {
    serde_json::to_string(&sort_keys(value))
        .map_err(|e| RelayError::InvalidInput(format!("json serialization failed: {e}")))
}

/// Compact JSON text of a wallet response, used as the `result` of trusted methods.
pub fn response_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
