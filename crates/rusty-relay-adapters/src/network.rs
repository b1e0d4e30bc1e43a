use std::time::Duration;

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use rusty_relay_core::{NetworkPort, PortError};

use crate::RelayAdapterConfig;

/// Reads live chain state from public JSON-RPC endpoints.
#[derive(Debug, Clone)]
pub struct JsonRpcNetworkAdapter {
    client: reqwest::Client,
}

impl Default for JsonRpcNetworkAdapter {
    fn default() -> Self {
        Self::with_config(&RelayAdapterConfig::from_env())
    }
}

impl JsonRpcNetworkAdapter {
    pub fn with_config(config: &RelayAdapterConfig) -> Self {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "falling back to default rpc client");
                reqwest::Client::new()
            });
        Self { client }
    }

    async fn rpc_call(&self, rpc_url: &str, method: &str, params: Value) -> Result<Value, PortError> {
        if rpc_url.is_empty() {
            return Err(PortError::Validation(format!("no rpc endpoint for {method}")));
        }
        debug!(rpc_url, method, "json-rpc call");
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = self
            .client
            .post(rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("rpc request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("rpc json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "rpc status {}: {}",
                status, body
            )));
        }
        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            return Err(PortError::Transport(format!("rpc returned error: {err}")));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport(format!("rpc missing result for {method}")))
    }
}

/// Parses a `0x`-prefixed hex quantity.
pub fn parse_quantity(value: &Value) -> Result<U256, PortError> {
    let raw = value
        .as_str()
        .ok_or_else(|| PortError::Validation(format!("quantity must be a string: {value}")))?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| PortError::Validation(format!("quantity missing 0x prefix: {raw}")))?;
    if digits.is_empty() {
        return Err(PortError::Validation("empty quantity".to_owned()));
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| PortError::Validation(format!("invalid quantity {raw}: {e}")))
}

#[async_trait]
impl NetworkPort for JsonRpcNetworkAdapter {
    async fn gas_price(&self, rpc_url: &str) -> Result<U256, PortError> {
        let result = self.rpc_call(rpc_url, "eth_gasPrice", json!([])).await?;
        parse_quantity(&result)
    }

    async fn transaction_count(&self, rpc_url: &str, address: &str) -> Result<u64, PortError> {
        let result = self
            .rpc_call(rpc_url, "eth_getTransactionCount", json!([address, "latest"]))
            .await?;
        let count = parse_quantity(&result)?;
        u64::try_from(count).map_err(|e| PortError::Validation(format!("nonce overflow: {e}")))
    }

    async fn balance(&self, rpc_url: &str, address: &str) -> Result<U256, PortError> {
        let result = self
            .rpc_call(rpc_url, "eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&result)
    }

    async fn latest_blockhash(&self, rpc_url: &str) -> Result<String, PortError> {
        let result = self
            .rpc_call(
                rpc_url,
                "getLatestBlockhash",
                json!([{ "commitment": "finalized" }]),
            )
            .await?;
        result
            .pointer("/value/blockhash")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| PortError::Transport(format!("rpc blockhash missing: {result}")))
    }
}
