pub mod chain_data;
pub mod config;
pub mod network;
pub mod settings;
pub mod wc;

pub use chain_data::StaticChainTable;
pub use config::{ConfigError, RelayAdapterConfig, RuntimeProfile};
pub use network::JsonRpcNetworkAdapter;
pub use settings::{FileSettingsAdapter, InMemorySettingsAdapter};
pub use wc::{RecordedRequest, WalletConnectAdapter};
