use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use rusty_relay_adapters::config::{ENV_BRIDGE_URL, ENV_PROFILE, ENV_SETTINGS_PATH};
use rusty_relay_adapters::{RelayAdapterConfig, RuntimeProfile};

/// Relay JSON-RPC requests to a paired wallet across chain families.
#[derive(Debug, Parser)]
#[command(name = "rusty-relay", author, version, about)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// WalletConnect bridge base URL
    #[arg(long, global = true, env = ENV_BRIDGE_URL, value_name = "URL")]
    pub bridge_url: Option<String>,

    /// Runtime profile; production refuses to run without a bridge
    #[arg(long, global = true, env = ENV_PROFILE, value_enum, ignore_case = true)]
    pub profile: Option<Profile>,

    /// Settings file holding the testnet toggle
    #[arg(long, global = true, env = ENV_SETTINGS_PATH, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Session topic to relay through
    #[arg(long, global = true, env = "RUSTY_RELAY_TOPIC", default_value = "default")]
    pub topic: String,

    /// CAIP-10 account of the local session, used when no bridge is configured
    #[arg(long = "account", global = true, value_name = "CAIP10")]
    pub accounts: Vec<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    #[value(alias = "dev")]
    Development,
    #[value(alias = "prod")]
    Production,
}

impl From<Profile> for RuntimeProfile {
    fn from(p: Profile) -> Self {
        match p {
            Profile::Development => RuntimeProfile::Development,
            Profile::Production => RuntimeProfile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List chains for the current network toggle
    Chains,
    /// List wire methods served for a chain
    Methods {
        /// CAIP-2 chain id, e.g. `eip155:1`
        chain_id: String,
    },
    /// Run one relay method against the paired wallet
    Call {
        /// CAIP-2 chain id, e.g. `eip155:1`
        chain_id: String,
        /// Account address on that chain
        address: String,
        /// Wire method, e.g. `personal_sign`
        method: String,
    },
    /// Check that the paired wallet answers
    Ping,
    /// Show or set the testnet toggle
    Testnet {
        #[arg(value_enum)]
        mode: Option<Toggle>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Cli {
    /// Environment config with command-line flags layered on top.
    pub fn adapter_config(&self) -> RelayAdapterConfig {
        let mut cfg = RelayAdapterConfig::from_env();
        if let Some(url) = &self.bridge_url {
            cfg.bridge_url = Some(url.trim_end_matches('/').to_owned());
        }
        if let Some(profile) = self.profile {
            cfg.runtime_profile = profile.into();
        }
        if let Some(path) = &self.settings {
            cfg.settings_path = Some(path.clone());
        }
        cfg
    }
}
