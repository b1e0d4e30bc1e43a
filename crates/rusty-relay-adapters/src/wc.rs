use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use rusty_relay_core::{ChainId, PortError, RequestArguments, Session, SessionPort};

use crate::RelayAdapterConfig;

/// Session client for the paired wallet.
///
/// With a bridge URL configured, requests are forwarded to a WalletConnect bridge over
/// HTTP. Without one, development builds answer from scripted responses and production
/// builds refuse every call.
#[derive(Debug, Clone)]
pub struct WalletConnectAdapter {
    mode: SessionMode,
    state: Arc<Mutex<WalletConnectState>>,
}

#[derive(Debug, Clone)]
enum SessionMode {
    Disabled(String),
    InMemory,
    Bridge(BridgeRuntime),
}

#[derive(Debug, Clone)]
struct BridgeRuntime {
    base_url: String,
    client: reqwest::Client,
    project_id: Option<String>,
}

/// Header carrying the relay project id on every bridge request.
pub const PROJECT_ID_HEADER: &str = "x-project-id";

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub topic: String,
    pub chain_id: ChainId,
    pub request: RequestArguments,
}

#[derive(Debug)]
struct WalletConnectState {
    sessions: HashMap<String, Session>,
    scripted: HashMap<String, Value>,
    requests: Vec<RecordedRequest>,
    reachable: bool,
}

impl Default for WalletConnectState {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
            scripted: HashMap::new(),
            requests: Vec::new(),
            reachable: true,
        }
    }
}

impl Default for WalletConnectAdapter {
    fn default() -> Self {
        Self::with_config(RelayAdapterConfig::from_env())
    }
}

impl WalletConnectAdapter {
    pub fn with_config(config: RelayAdapterConfig) -> Self {
        let mode = if let Some(ref base_url) = config.bridge_url {
            let timeout = Duration::from_millis(config.request_timeout_ms);
            match reqwest::Client::builder().timeout(timeout).build() {
                Ok(client) => SessionMode::Bridge(BridgeRuntime {
                    base_url: base_url.trim_end_matches('/').to_owned(),
                    client,
                    project_id: config.project_id.clone(),
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        SessionMode::Disabled(format!(
                            "failed to initialize walletconnect bridge client in production profile: {e}"
                        ))
                    } else {
                        SessionMode::InMemory
                    }
                }
            }
        } else if config.strict_runtime_required() {
            SessionMode::Disabled(
                "walletconnect bridge URL not configured in production runtime profile".to_owned(),
            )
        } else {
            SessionMode::InMemory
        };

        Self {
            mode,
            state: Arc::new(Mutex::new(WalletConnectState::default())),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            mode: SessionMode::InMemory,
            state: Arc::new(Mutex::new(WalletConnectState::default())),
        }
    }

    pub fn is_bridged(&self) -> bool {
        matches!(self.mode, SessionMode::Bridge(_))
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let SessionMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, WalletConnectState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("wc lock poisoned: {e}")))
    }

    pub fn insert_session(&self, session: Session) -> Result<(), PortError> {
        let mut g = self.lock()?;
        g.sessions.insert(session.topic.clone(), session);
        Ok(())
    }

    /// Answer returned for `method` while running without a bridge.
    pub fn script_response(&self, method: &str, response: Value) -> Result<(), PortError> {
        let mut g = self.lock()?;
        g.scripted.insert(method.to_owned(), response);
        Ok(())
    }

    pub fn set_reachable(&self, reachable: bool) -> Result<(), PortError> {
        self.lock()?.reachable = reachable;
        Ok(())
    }

    pub fn recorded_requests(&self) -> Result<Vec<RecordedRequest>, PortError> {
        Ok(self.lock()?.requests.clone())
    }

    /// Current session for `topic`, as known to the bridge or the local store.
    pub async fn fetch_session(&self, topic: &str) -> Result<Session, PortError> {
        self.check_mode()?;
        match &self.mode {
            SessionMode::Bridge(bridge) => {
                let url = format!("{}/session/{topic}", bridge.base_url);
                let body = bridge.send(bridge.client.get(&url)).await?;
                serde_json::from_value(body)
                    .map_err(|e| PortError::Transport(format!("wc session decode failed: {e}")))
            }
            _ => self
                .lock()?
                .sessions
                .get(topic)
                .cloned()
                .ok_or_else(|| PortError::NotFound(format!("wc session missing: {topic}"))),
        }
    }

    fn answer_locally(
        &self,
        topic: &str,
        chain_id: &ChainId,
        request: RequestArguments,
    ) -> Result<Value, PortError> {
        let mut g = self.lock()?;
        if !g.sessions.is_empty() && !g.sessions.contains_key(topic) {
            return Err(PortError::NotFound(format!("wc session missing: {topic}")));
        }
        let response = g.scripted.get(&request.method).cloned();
        g.requests.push(RecordedRequest {
            topic: topic.to_owned(),
            chain_id: chain_id.clone(),
            request: request.clone(),
        });
        response.ok_or_else(|| {
            PortError::NotFound(format!("no scripted response for {}", request.method))
        })
    }
}

impl BridgeRuntime {
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Value, PortError> {
        let builder = match &self.project_id {
            Some(id) => builder.header(PROJECT_ID_HEADER, id),
            None => builder,
        };
        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("wc bridge request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("wc bridge json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "wc bridge status {}: {}",
                status, body
            )));
        }
        Ok(body)
    }

    /// Posts to `path` and unwraps the JSON-RPC style `result` / `error` envelope.
    async fn call(&self, path: &str, payload: Value) -> Result<Value, PortError> {
        let url = format!("{}{path}", self.base_url);
        let body = self.send(self.client.post(&url).json(&payload)).await?;
        if let Some(err) = body.get("error").filter(|e| !e.is_null()) {
            return Err(PortError::Transport(format!(
                "wc bridge returned error: {err}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("wc bridge missing result".to_owned()))
    }
}

#[async_trait]
impl SessionPort for WalletConnectAdapter {
    async fn request(
        &self,
        topic: &str,
        chain_id: &ChainId,
        request: RequestArguments,
    ) -> Result<Value, PortError> {
        self.check_mode()?;
        debug!(topic, chain = %chain_id, method = %request.method, "session request");
        match &self.mode {
            SessionMode::Bridge(bridge) => {
                let payload = json!({
                    "chainId": chain_id.to_string(),
                    "request": request,
                });
                bridge
                    .call(&format!("/session/{topic}/request"), payload)
                    .await
            }
            _ => self.answer_locally(topic, chain_id, request),
        }
    }

    async fn ping(&self, topic: &str) -> Result<(), PortError> {
        self.check_mode()?;
        match &self.mode {
            SessionMode::Bridge(bridge) => {
                bridge
                    .call(&format!("/session/{topic}/ping"), json!({}))
                    .await?;
                Ok(())
            }
            _ => {
                if self.lock()?.reachable {
                    Ok(())
                } else {
                    Err(PortError::Transport(format!("wc peer unreachable: {topic}")))
                }
            }
        }
    }
}
