use std::collections::HashMap;

use rusty_relay_core::{ChainFamily, ChainId, RelayError, RpcMethod};

use crate::{cosmos, eip155, elrond, extensible, near, polkadot, solana};

/// Maps a chain namespace to its capability set.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    families: HashMap<String, ChainFamily>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(eip155::family());
        registry.register(cosmos::family());
        registry.register(solana::family());
        registry.register(polkadot::family());
        registry.register(near::family());
        registry.register(elrond::family());
        registry.register(extensible::chia_family());
        registry
    }
}

impl ChainRegistry {
    pub fn empty() -> Self {
        Self {
            families: HashMap::new(),
        }
    }

    pub fn register(&mut self, family: ChainFamily) {
        self.families.insert(family.namespace.clone(), family);
    }

    /// Serves the namespace-prefixed command set under another namespace.
    pub fn register_extensible(&mut self, namespace: &str) {
        self.register(extensible::family(namespace));
    }

    pub fn family(&self, namespace: &str) -> Option<&ChainFamily> {
        self.families.get(namespace)
    }

    pub fn namespaces(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.families.keys().map(String::as_str).collect();
        out.sort_unstable();
        out
    }

    pub fn resolve(&self, chain_id: &ChainId, method: &str) -> Result<RpcMethod, RelayError> {
        let family = self
            .family(chain_id.namespace())
            .ok_or_else(|| RelayError::UnsupportedNamespace(chain_id.namespace.clone()))?;
        family
            .method(method)
            .copied()
            .ok_or_else(|| RelayError::UnknownMethod {
                namespace: chain_id.namespace.clone(),
                method: method.to_owned(),
            })
    }
}
