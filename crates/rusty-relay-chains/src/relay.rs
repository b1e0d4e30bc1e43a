use rusty_relay_core::{ChainId, RelayContext, RelayError, RpcResult};
use tracing::info;

use crate::eip155;
use crate::registry::ChainRegistry;

/// Entry point for callers: resolves a wire method for a chain and runs it under the
/// context's dispatch wrapper.
pub struct Relay {
    context: RelayContext,
    registry: ChainRegistry,
}

impl Relay {
    pub fn new(context: RelayContext, registry: ChainRegistry) -> Self {
        Self { context, registry }
    }

    pub fn with_default_registry(context: RelayContext) -> Self {
        Self::new(context, ChainRegistry::default())
    }

    pub fn context(&self) -> &RelayContext {
        &self.context
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Wire methods available on `chain_id`, empty for unknown namespaces.
    pub fn methods(&self, chain_id: &ChainId) -> Vec<String> {
        self.registry
            .family(chain_id.namespace())
            .map(|f| f.wire_names())
            .unwrap_or_default()
    }

    pub async fn invoke(
        &self,
        chain_id: &ChainId,
        address: &str,
        method: &str,
    ) -> Result<RpcResult, RelayError> {
        let entry = self.registry.resolve(chain_id, method)?;
        info!(chain = %chain_id, address, method, "invoking relay method");
        self.context
            .dispatch(chain_id.clone(), address, entry.handler)
            .await
    }

    pub async fn ping(&self) -> Result<RpcResult, RelayError> {
        self.context.ping().await
    }

    pub async fn refresh_balances(&self) -> Result<(), RelayError> {
        eip155::refresh_balances(&self.context).await?;
        Ok(())
    }
}
