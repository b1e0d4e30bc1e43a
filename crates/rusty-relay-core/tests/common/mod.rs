#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use alloy::primitives::U256;
use async_trait::async_trait;
use serde_json::Value;

use rusty_relay_core::{
    AccountId, ChainData, ChainDataPort, ChainId, ClockPort, NetworkPort, PortError,
    RelayContext, RequestArguments, SessionPort, SettingsPort, Session,
};

#[derive(Debug, Default)]
pub struct RecordingClient {
    pub requests: Mutex<Vec<RequestArguments>>,
    pub ping_fails: AtomicBool,
}

#[async_trait]
impl SessionPort for RecordingClient {
    async fn request(
        &self,
        _topic: &str,
        _chain_id: &ChainId,
        request: RequestArguments,
    ) -> Result<Value, PortError> {
        self.requests
            .lock()
            .map_err(|e| PortError::Transport(e.to_string()))?
            .push(request.clone());
        Ok(serde_json::json!({ "echo": request.method }))
    }

    async fn ping(&self, _topic: &str) -> Result<(), PortError> {
        if self.ping_fails.load(Ordering::SeqCst) {
            return Err(PortError::Transport("peer unreachable".to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoNetwork;

#[async_trait]
impl NetworkPort for NoNetwork {
    async fn gas_price(&self, _rpc_url: &str) -> Result<U256, PortError> {
        Err(PortError::NotImplemented("gas_price"))
    }
    async fn transaction_count(&self, _rpc_url: &str, _address: &str) -> Result<u64, PortError> {
        Err(PortError::NotImplemented("transaction_count"))
    }
    async fn balance(&self, _rpc_url: &str, _address: &str) -> Result<U256, PortError> {
        Err(PortError::NotImplemented("balance"))
    }
    async fn latest_blockhash(&self, _rpc_url: &str) -> Result<String, PortError> {
        Err(PortError::NotImplemented("latest_blockhash"))
    }
}

#[derive(Debug, Default)]
pub struct TwoChains;

impl ChainDataPort for TwoChains {
    fn chain_data(&self, chain_id: &ChainId) -> Option<ChainData> {
        self.chains(true)
            .into_iter()
            .chain(self.chains(false))
            .find(|c| &c.chain_id == chain_id)
    }

    fn chains(&self, testnet: bool) -> Vec<ChainData> {
        let (reference, name) = if testnet { ("5", "Goerli") } else { ("1", "Ethereum") };
        vec![ChainData {
            chain_id: ChainId::new("eip155", reference),
            name: name.to_owned(),
            rpc_url: format!("http://rpc.invalid/{reference}"),
            testnet,
        }]
    }
}

#[derive(Debug, Default)]
pub struct MemorySettings {
    pub testnet: Mutex<bool>,
}

impl SettingsPort for MemorySettings {
    fn load_testnet(&self) -> Result<bool, PortError> {
        Ok(*self.testnet.lock().map_err(|e| PortError::Transport(e.to_string()))?)
    }

    fn save_testnet(&self, testnet: bool) -> Result<(), PortError> {
        *self.testnet.lock().map_err(|e| PortError::Transport(e.to_string()))? = testnet;
        Ok(())
    }
}

pub struct FixedClock(pub u64);

impl ClockPort for FixedClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(self.0)
    }
}

pub fn mainnet() -> ChainId {
    ChainId::new("eip155", "1")
}

pub const ADDRESS: &str = "0x1000000000000000000000000000000000000001";

pub fn account() -> AccountId {
    mainnet().account(ADDRESS)
}

pub fn new_context(settings: Arc<MemorySettings>) -> RelayContext {
    RelayContext::new(Arc::new(NoNetwork), Arc::new(TwoChains), settings)
        .expect("context")
        .with_clock(Arc::new(FixedClock(1_700_000_000_000)))
}

pub fn connected_context() -> (RelayContext, Arc<RecordingClient>) {
    let ctx = new_context(Arc::new(MemorySettings::default()));
    let client = Arc::new(RecordingClient::default());
    ctx.attach_client(client.clone()).expect("attach client");
    ctx.connect(Session::new("topic-1", vec![account()]))
        .expect("connect");
    (ctx, client)
}
