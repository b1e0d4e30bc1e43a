use std::future::Future;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use alloy::primitives::U256;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::{AccountId, BalanceMap, ChainData, ChainId, RequestArguments, RpcResult, Session};
use crate::error::RelayError;
use crate::ports::{
    ChainDataPort, ClockPort, NetworkPort, PortError, SessionPort, SettingsPort, SystemClock,
};
use crate::state::{PendingGuard, RelayState, SharedState};

/// Everything a chain operation needs for one `(chain id, address)` call.
///
/// Built by the dispatch wrapper only after the client and session checks passed, so
/// handlers never observe a missing session.
#[derive(Clone)]
pub struct RequestScope {
    pub chain_id: ChainId,
    pub address: String,
    pub session: Session,
    client: Arc<dyn SessionPort>,
    network: Arc<dyn NetworkPort>,
    chain_data: Arc<dyn ChainDataPort>,
    clock: Arc<dyn ClockPort>,
}

impl RequestScope {
    pub fn account_id(&self) -> AccountId {
        self.chain_id.account(self.address.clone())
    }

    /// Fails unless the session carries `chain_id:address`.
    pub fn require_account(&self) -> Result<AccountId, RelayError> {
        let account = self.account_id();
        if !self.session.has_account(&account) {
            return Err(RelayError::AccountNotFound(account.to_string()));
        }
        Ok(account)
    }

    pub fn require_chain_data(&self) -> Result<ChainData, RelayError> {
        self.chain_data
            .chain_data(&self.chain_id)
            .ok_or_else(|| RelayError::MissingChainData(self.chain_id.to_string()))
    }

    pub fn network(&self) -> &dyn NetworkPort {
        self.network.as_ref()
    }

    pub fn now_ms(&self) -> Result<u64, RelayError> {
        Ok(self.clock.now_ms()?)
    }

    /// First listed asset balance of `account`; a missing entry counts as zero.
    pub fn balance_of(&self, account: &AccountId) -> U256 {
        self.session
            .balances
            .get(account)
            .and_then(|assets| assets.first())
            .and_then(|asset| U256::from_str(&asset.balance).ok())
            .unwrap_or(U256::ZERO)
    }

    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RelayError> {
        debug!(topic = %self.session.topic, chain = %self.chain_id, method, "session request");
        let args = RequestArguments::new(method, params);
        Ok(self
            .client
            .request(&self.session.topic, &self.chain_id, args)
            .await?)
    }

    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RelayError> {
        let value = self.request(method, params).await?;
        serde_json::from_value(value)
            .map_err(|e| RelayError::malformed(format!("{method} response: {e}")))
    }
}

/// Explicit context shared by every relay operation.
pub struct RelayContext {
    client: RwLock<Option<Arc<dyn SessionPort>>>,
    session: RwLock<Option<Session>>,
    network: Arc<dyn NetworkPort>,
    chain_data: Arc<dyn ChainDataPort>,
    settings: Arc<dyn SettingsPort>,
    clock: Arc<dyn ClockPort>,
    state: SharedState,
}

impl RelayContext {
    pub fn new(
        network: Arc<dyn NetworkPort>,
        chain_data: Arc<dyn ChainDataPort>,
        settings: Arc<dyn SettingsPort>,
    ) -> Result<Self, PortError> {
        let testnet = settings.load_testnet()?;
        Ok(Self {
            client: RwLock::new(None),
            session: RwLock::new(None),
            network,
            chain_data,
            settings,
            clock: Arc::new(SystemClock),
            state: SharedState::new(testnet),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockPort>) -> Self {
        self.clock = clock;
        self
    }

    pub fn attach_client(&self, client: Arc<dyn SessionPort>) -> Result<(), PortError> {
        *self
            .client
            .write()
            .map_err(|e| PortError::Transport(format!("client lock poisoned: {e}")))? = Some(client);
        Ok(())
    }

    pub fn connect(&self, session: Session) -> Result<(), PortError> {
        info!(topic = %session.topic, accounts = session.accounts.len(), "session connected");
        *self.session_slot()? = Some(session);
        Ok(())
    }

    pub fn disconnect(&self) -> Result<Option<Session>, PortError> {
        let previous = self.session_slot()?.take();
        if let Some(s) = &previous {
            info!(topic = %s.topic, "session disconnected");
        }
        Ok(previous)
    }

    pub fn session(&self) -> Result<Option<Session>, PortError> {
        Ok(self
            .session
            .read()
            .map_err(|e| PortError::Transport(format!("session lock poisoned: {e}")))?
            .clone())
    }

    /// Replaces the balance map of the connected session. No-op when disconnected.
    pub fn set_balances(&self, balances: BalanceMap) -> Result<(), PortError> {
        if let Some(session) = self.session_slot()?.as_mut() {
            session.balances = balances;
        }
        Ok(())
    }

    pub fn network(&self) -> Arc<dyn NetworkPort> {
        Arc::clone(&self.network)
    }

    pub fn chain_data(&self) -> Arc<dyn ChainDataPort> {
        Arc::clone(&self.chain_data)
    }

    pub fn state(&self) -> Result<RelayState, PortError> {
        self.state.snapshot()
    }

    pub fn is_pending(&self) -> Result<bool, PortError> {
        Ok(self.state.lock()?.pending)
    }

    pub fn result(&self) -> Result<Option<RpcResult>, PortError> {
        Ok(self.state.lock()?.result.clone())
    }

    pub fn is_testnet(&self) -> Result<bool, PortError> {
        Ok(self.state.lock()?.testnet)
    }

    /// Flips the network toggle and persists it.
    pub fn set_testnet(&self, testnet: bool) -> Result<(), PortError> {
        self.settings.save_testnet(testnet)?;
        self.state.lock()?.testnet = testnet;
        Ok(())
    }

    /// Chains listed for the current network toggle.
    pub fn chains(&self) -> Result<Vec<ChainData>, PortError> {
        Ok(self.chain_data.chains(self.is_testnet()?))
    }

    pub fn scope(&self, chain_id: ChainId, address: &str) -> Result<RequestScope, RelayError> {
        let (client, session) = self.require_session()?;
        Ok(RequestScope {
            chain_id,
            address: address.to_owned(),
            session,
            client,
            network: Arc::clone(&self.network),
            chain_data: Arc::clone(&self.chain_data),
            clock: Arc::clone(&self.clock),
        })
    }

    /// Runs one chain operation under the shared pending/result protocol.
    ///
    /// Missing client or session fails here, before `pending` is touched. Anything the
    /// operation itself raises becomes a `valid: false` record carrying the message.
    pub async fn dispatch<F, Fut>(
        &self,
        chain_id: ChainId,
        address: &str,
        op: F,
    ) -> Result<RpcResult, RelayError>
    where
        F: FnOnce(RequestScope) -> Fut,
        Fut: Future<Output = Result<RpcResult, RelayError>>,
    {
        let scope = self.scope(chain_id.clone(), address)?;
        let _pending = PendingGuard::enter(&self.state)?;
        info!(chain = %chain_id, address, "relay operation started");

        let record = match op(scope).await {
            Ok(record) => {
                info!(
                    chain = %chain_id,
                    method = record.method.as_deref().unwrap_or_default(),
                    valid = record.valid,
                    "relay operation finished"
                );
                record
            }
            Err(err) => {
                warn!(chain = %chain_id, address, kind = ?err.kind(), error = %err, "relay operation failed");
                RpcResult::failure(address, err.to_string())
            }
        };
        self.state.lock()?.result = Some(record.clone());
        Ok(record)
    }

    /// Liveness probe over the session. Never reports failure as an error once the
    /// client and session checks passed.
    pub async fn ping(&self) -> Result<RpcResult, RelayError> {
        let (client, session) = self.require_session()?;
        let _pending = PendingGuard::enter(&self.state)?;

        let valid = match client.ping(&session.topic).await {
            Ok(()) => true,
            Err(err) => {
                warn!(topic = %session.topic, error = %err, "ping failed");
                false
            }
        };
        let message = if valid { "Ping succeeded" } else { "Ping failed" };
        let record = RpcResult::new("ping", "", valid, message);
        self.state.lock()?.result = Some(record.clone());
        Ok(record)
    }

    fn require_session(&self) -> Result<(Arc<dyn SessionPort>, Session), RelayError> {
        let client = self
            .client
            .read()
            .map_err(|e| PortError::Transport(format!("client lock poisoned: {e}")))?
            .clone()
            .ok_or(RelayError::NotInitialized)?;
        let session = self.session()?.ok_or(RelayError::NotConnected)?;
        Ok((client, session))
    }

    fn session_slot(&self) -> Result<std::sync::RwLockWriteGuard<'_, Option<Session>>, PortError> {
        self.session
            .write()
            .map_err(|e| PortError::Transport(format!("session lock poisoned: {e}")))
    }
}
