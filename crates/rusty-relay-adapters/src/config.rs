use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const ENV_PROFILE: &str = "RUSTY_RELAY_PROFILE";
pub const ENV_BRIDGE_URL: &str = "RUSTY_RELAY_BRIDGE_URL";
pub const ENV_TIMEOUT_MS: &str = "RUSTY_RELAY_TIMEOUT_MS";
pub const ENV_SETTINGS_PATH: &str = "RUSTY_RELAY_SETTINGS_PATH";
pub const ENV_PROJECT_ID: &str = "RUSTY_RELAY_PROJECT_ID";
/// Comma separated `chain_id=url` pairs, e.g. `eip155:1=http://localhost:8545`.
pub const ENV_RPC_OVERRIDES: &str = "RUSTY_RELAY_RPC_OVERRIDES";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeProfile {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown runtime profile: {0}")]
    UnknownProfile(String),
    #[error("invalid rpc override entry: {0}")]
    InvalidOverride(String),
}

impl FromStr for RuntimeProfile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(RuntimeProfile::Development),
            "production" | "prod" => Ok(RuntimeProfile::Production),
            other => Err(ConfigError::UnknownProfile(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub bridge_url: Option<String>,
    pub request_timeout_ms: u64,
    pub settings_path: Option<PathBuf>,
    pub project_id: Option<String>,
    /// Chain id (`namespace:reference`) to RPC endpoint.
    pub rpc_overrides: HashMap<String, String>,
}

impl Default for RelayAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            bridge_url: None,
            request_timeout_ms: 15_000,
            settings_path: None,
            project_id: None,
            rpc_overrides: HashMap::new(),
        }
    }
}

impl RelayAdapterConfig {
    /// Reads `RUSTY_RELAY_*` variables. Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_PROFILE) {
            match raw.parse() {
                Ok(profile) => cfg.runtime_profile = profile,
                Err(e) => tracing::warn!(error = %e, "ignoring {ENV_PROFILE}"),
            }
        }
        cfg.bridge_url = lookup(ENV_BRIDGE_URL)
            .map(|u| u.trim_end_matches('/').to_owned())
            .filter(|u| !u.is_empty());
        if let Some(ms) = lookup(ENV_TIMEOUT_MS).and_then(|v| v.trim().parse().ok()) {
            cfg.request_timeout_ms = ms;
        }
        cfg.settings_path = lookup(ENV_SETTINGS_PATH)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        cfg.project_id = lookup(ENV_PROJECT_ID).filter(|p| !p.is_empty());
        if let Some(raw) = lookup(ENV_RPC_OVERRIDES) {
            match parse_rpc_overrides(&raw) {
                Ok(map) => cfg.rpc_overrides = map,
                Err(e) => tracing::warn!(error = %e, "ignoring {ENV_RPC_OVERRIDES}"),
            }
        }
        cfg
    }

    /// Production refuses to fall back to in-process stand-ins.
    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}

pub fn parse_rpc_overrides(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut out = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (chain, url) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidOverride(entry.to_owned()))?;
        let (chain, url) = (chain.trim(), url.trim());
        if chain.split_once(':').is_none() || url.is_empty() {
            return Err(ConfigError::InvalidOverride(entry.to_owned()));
        }
        out.insert(chain.to_owned(), url.to_owned());
    }
    Ok(out)
}
