use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::RpcResult;
use crate::ports::PortError;

/// Observable relay state: the in-flight flag, the last result and the network toggle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayState {
    pub pending: bool,
    pub result: Option<RpcResult>,
    pub testnet: bool,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct SharedState {
    inner: Arc<Mutex<RelayState>>,
}

impl SharedState {
    pub fn new(testnet: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RelayState {
                testnet,
                ..RelayState::default()
            })),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, RelayState>, PortError> {
        self.inner
            .lock()
            .map_err(|e| PortError::Transport(format!("relay state lock poisoned: {e}")))
    }

    pub fn snapshot(&self) -> Result<RelayState, PortError> {
        Ok(self.lock()?.clone())
    }
}

/// Holds `pending` for the lifetime of one operation.
///
/// Dropping the guard clears the flag unless a later operation has started since,
/// so the flag always reflects the most recently started call.
#[derive(Debug)]
pub struct PendingGuard {
    state: SharedState,
    generation: u64,
}

impl PendingGuard {
    pub fn enter(state: &SharedState) -> Result<Self, PortError> {
        let mut g = state.lock()?;
        g.generation += 1;
        g.pending = true;
        Ok(Self {
            state: state.clone(),
            generation: g.generation,
        })
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Ok(mut g) = self.state.inner.lock() {
            if g.generation == self.generation {
                g.pending = false;
            }
        }
    }
}
