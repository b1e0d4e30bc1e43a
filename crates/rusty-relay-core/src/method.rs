use std::borrow::Cow;
use std::future::Future;
use std::pin::Pin;

use crate::context::RequestScope;
use crate::domain::RpcResult;
use crate::error::RelayError;

pub type RpcFuture = Pin<Box<dyn Future<Output = Result<RpcResult, RelayError>> + Send>>;

/// Every table entry shares this shape: it receives the request scope for one
/// `(chain id, address)` pair and yields the normalized record.
pub type RpcHandler = fn(RequestScope) -> RpcFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireMethod {
    /// Sent as written.
    Fixed(&'static str),
    /// Sent as `<namespace>_<command>`.
    Namespaced(&'static str),
}

impl WireMethod {
    pub fn resolve(&self, namespace: &str) -> Cow<'static, str> {
        match self {
            WireMethod::Fixed(name) => Cow::Borrowed(*name),
            WireMethod::Namespaced(command) => Cow::Owned(format!("{namespace}_{command}")),
        }
    }
}

#[derive(Clone, Copy)]
pub struct RpcMethod {
    pub wire: WireMethod,
    pub handler: RpcHandler,
}

impl RpcMethod {
    pub const fn fixed(name: &'static str, handler: RpcHandler) -> Self {
        Self {
            wire: WireMethod::Fixed(name),
            handler,
        }
    }

    pub const fn namespaced(command: &'static str, handler: RpcHandler) -> Self {
        Self {
            wire: WireMethod::Namespaced(command),
            handler,
        }
    }

    pub fn wire_name(&self, namespace: &str) -> Cow<'static, str> {
        self.wire.resolve(namespace)
    }
}

impl std::fmt::Debug for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcMethod").field("wire", &self.wire).finish()
    }
}

/// Capability set of one chain namespace.
#[derive(Debug, Clone)]
pub struct ChainFamily {
    pub namespace: String,
    pub methods: Vec<RpcMethod>,
}

impl ChainFamily {
    pub fn new(namespace: impl Into<String>, methods: Vec<RpcMethod>) -> Self {
        Self {
            namespace: namespace.into(),
            methods,
        }
    }

    pub fn method(&self, wire_name: &str) -> Option<&RpcMethod> {
        self.methods
            .iter()
            .find(|m| m.wire_name(&self.namespace) == wire_name)
    }

    pub fn wire_names(&self) -> Vec<String> {
        self.methods
            .iter()
            .map(|m| m.wire_name(&self.namespace).into_owned())
            .collect()
    }
}
