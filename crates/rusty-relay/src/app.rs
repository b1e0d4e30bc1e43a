use std::sync::Arc;

use eyre::{bail, eyre, Result, WrapErr};
use tracing::warn;

use rusty_relay_adapters::{
    FileSettingsAdapter, InMemorySettingsAdapter, JsonRpcNetworkAdapter, RelayAdapterConfig,
    StaticChainTable, WalletConnectAdapter,
};
use rusty_relay_chains::Relay;
use rusty_relay_core::{AccountId, ChainId, RelayContext, Session, SettingsPort};

use crate::cli::{Cli, Command, Toggle};

pub struct App {
    relay: Relay,
    client: Arc<WalletConnectAdapter>,
    topic: String,
    accounts: Vec<AccountId>,
}

impl App {
    pub fn new(cli: &Cli) -> Result<Self> {
        let cfg = cli.adapter_config();
        let relay = build_relay(&cfg)?;
        let client = Arc::new(WalletConnectAdapter::with_config(cfg));
        relay
            .context()
            .attach_client(client.clone())
            .wrap_err("attach session client")?;

        let accounts = cli
            .accounts
            .iter()
            .map(|a| a.parse::<AccountId>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("parse --account")?;

        Ok(Self {
            relay,
            client,
            topic: cli.topic.clone(),
            accounts,
        })
    }

    pub async fn run(&self, command: &Command) -> Result<()> {
        match command {
            Command::Chains => self.chains(),
            Command::Methods { chain_id } => {
                let chain_id = parse_chain(chain_id)?;
                let methods = self.relay.methods(&chain_id);
                if methods.is_empty() {
                    bail!("no methods registered for namespace {}", chain_id.namespace());
                }
                for m in methods {
                    println!("{m}");
                }
                Ok(())
            }
            Command::Call {
                chain_id,
                address,
                method,
            } => {
                let chain_id = parse_chain(chain_id)?;
                self.connect().await?;
                if chain_id.namespace() == rusty_relay_chains::eip155::NAMESPACE {
                    if let Err(e) = self.relay.refresh_balances().await {
                        warn!(error = %e, "balance refresh failed");
                    }
                }
                let record = self.relay.invoke(&chain_id, address, method).await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
            Command::Ping => {
                self.connect().await?;
                let record = self.relay.ping().await?;
                println!("{}", serde_json::to_string_pretty(&record)?);
                Ok(())
            }
            Command::Testnet { mode } => {
                let ctx = self.relay.context();
                if let Some(mode) = mode {
                    ctx.set_testnet(*mode == Toggle::On)?;
                }
                println!("testnet: {}", ctx.is_testnet()?);
                Ok(())
            }
        }
    }

    fn chains(&self) -> Result<()> {
        for chain in self.relay.context().chains()? {
            let methods = self.relay.methods(&chain.chain_id);
            println!("{}\t{}\t{}", chain.chain_id, chain.name, methods.join(","));
        }
        Ok(())
    }

    /// Bridged sessions come from the bridge; otherwise `--account` flags form a local one.
    async fn connect(&self) -> Result<()> {
        let session = if self.client.is_bridged() {
            self.client
                .fetch_session(&self.topic)
                .await
                .wrap_err_with(|| format!("fetch session {}", self.topic))?
        } else {
            if self.accounts.is_empty() {
                bail!("no bridge configured; pass --account for a local session");
            }
            Session::new(self.topic.clone(), self.accounts.clone())
        };
        self.relay.context().connect(session)?;
        Ok(())
    }
}

pub fn build_relay(cfg: &RelayAdapterConfig) -> Result<Relay> {
    let settings: Arc<dyn SettingsPort> = match &cfg.settings_path {
        Some(path) => Arc::new(FileSettingsAdapter::new(path)),
        None => Arc::new(InMemorySettingsAdapter::default()),
    };
    let ctx = RelayContext::new(
        Arc::new(JsonRpcNetworkAdapter::with_config(cfg)),
        Arc::new(StaticChainTable::with_config(cfg)),
        settings,
    )
    .wrap_err("load settings")?;
    Ok(Relay::with_default_registry(ctx))
}

fn parse_chain(raw: &str) -> Result<ChainId> {
    raw.parse().map_err(|e| eyre!("{e}"))
}
