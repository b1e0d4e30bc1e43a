use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{ChainData, ChainId, RequestArguments};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// The paired wallet, reached through an established session.
#[async_trait]
pub trait SessionPort: Send + Sync {
    async fn request(
        &self,
        topic: &str,
        chain_id: &ChainId,
        request: RequestArguments,
    ) -> Result<Value, PortError>;

    async fn ping(&self, topic: &str) -> Result<(), PortError>;
}

/// Live chain data that formatters need before a request can be built.
#[async_trait]
pub trait NetworkPort: Send + Sync {
    async fn gas_price(&self, rpc_url: &str) -> Result<U256, PortError>;
    async fn transaction_count(&self, rpc_url: &str, address: &str) -> Result<u64, PortError>;
    async fn balance(&self, rpc_url: &str, address: &str) -> Result<U256, PortError>;
    async fn latest_blockhash(&self, rpc_url: &str) -> Result<String, PortError>;
}

pub trait ChainDataPort: Send + Sync {
    fn chain_data(&self, chain_id: &ChainId) -> Option<ChainData>;
    fn chains(&self, testnet: bool) -> Vec<ChainData>;
}

pub trait SettingsPort: Send + Sync {
    fn load_testnet(&self) -> Result<bool, PortError>;
    fn save_testnet(&self, testnet: bool) -> Result<(), PortError>;
}

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> Result<u64, PortError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| PortError::Validation(format!("system clock before epoch: {e}")))?;
        Ok(elapsed.as_millis() as u64)
    }
}
