use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A CAIP-2 chain identifier, `namespace:reference`.
///
/// The namespace selects the chain family (`eip155`, `cosmos`, `solana`, ...). The
/// reference is whatever that family uses to tell its networks apart: a decimal chain id
/// for EVM, a genesis-hash prefix for Polkadot, a cluster hash for Solana.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChainId {
    pub namespace: String,
    pub reference: String,
}

impl ChainId {
    pub fn new<N: Into<String>, R: Into<String>>(namespace: N, reference: R) -> Self {
        Self {
            namespace: namespace.into(),
            reference: reference.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Builds the CAIP-10 account id for `address` on this chain.
    pub fn account(&self, address: impl Into<String>) -> AccountId {
        AccountId {
            chain_id: self.clone(),
            address: address.into(),
        }
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.reference)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid chain id format {0}")]
pub struct ChainIdFormatError(String);

impl FromStr for ChainId {
    type Err = ChainIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ':');
        let namespace = parts.next().unwrap_or_default();
        let reference = parts.next().unwrap_or_default();
        if namespace.is_empty() || reference.is_empty() {
            return Err(ChainIdFormatError(s.into()));
        }
        Ok(ChainId::new(namespace, reference))
    }
}

impl Serialize for ChainId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChainId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ChainId::from_str(&s).map_err(de::Error::custom)
    }
}

/// A CAIP-10 account, `namespace:reference:address`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId {
    pub chain_id: ChainId,
    pub address: String,
}

impl AccountId {
    pub fn new(chain_id: ChainId, address: impl Into<String>) -> Self {
        chain_id.account(address)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain_id, self.address)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid account id format {0}")]
pub struct AccountIdFormatError(String);

impl FromStr for AccountId {
    type Err = AccountIdFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (Some(namespace), Some(reference), Some(address)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(AccountIdFormatError(s.into()));
        };
        if namespace.is_empty() || reference.is_empty() || address.is_empty() {
            return Err(AccountIdFormatError(s.into()));
        }
        Ok(ChainId::new(namespace, reference).account(address))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountId::from_str(&s).map_err(de::Error::custom)
    }
}

/// Body of a session request: the wire method and its chain-specific params.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestArguments {
    pub method: String,
    pub params: Value,
}

impl RequestArguments {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

/// Normalized outcome of one relay operation.
///
/// `method` is absent only on records produced from a captured failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    pub address: String,
    pub valid: bool,
    pub result: String,
}

impl RpcResult {
    pub fn new(
        method: impl Into<String>,
        address: impl Into<String>,
        valid: bool,
        result: impl Into<String>,
    ) -> Self {
        Self {
            method: Some(method.into()),
            address: address.into(),
            valid,
            result: result.into(),
        }
    }

    pub fn failure(address: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            method: None,
            address: address.into(),
            valid: false,
            result: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub symbol: String,
    pub name: String,
    /// Decimal amount in the chain's smallest unit.
    pub balance: String,
}

pub type BalanceMap = HashMap<AccountId, Vec<AssetBalance>>;

/// Snapshot of a connected session as handed over by the pairing layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub topic: String,
    pub accounts: Vec<AccountId>,
    #[serde(default)]
    pub balances: BalanceMap,
}

impl Session {
    pub fn new(topic: impl Into<String>, accounts: Vec<AccountId>) -> Self {
        Self {
            topic: topic.into(),
            accounts,
            balances: BalanceMap::new(),
        }
    }

    pub fn has_account(&self, account: &AccountId) -> bool {
        self.accounts.contains(account)
    }

    pub fn accounts_for<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a AccountId> {
        self.accounts
            .iter()
            .filter(move |a| a.chain_id.namespace == namespace)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainData {
    pub chain_id: ChainId,
    pub name: String,
    pub rpc_url: String,
    pub testnet: bool,
}
