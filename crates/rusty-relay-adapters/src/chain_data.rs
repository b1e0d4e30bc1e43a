use std::collections::HashMap;

use rusty_relay_core::{ChainData, ChainDataPort, ChainId};

use crate::RelayAdapterConfig;

/// `(namespace, reference, name, rpc_url, testnet)`.
const CHAINS: &[(&str, &str, &str, &str, bool)] = &[
    ("eip155", "1", "Ethereum", "https://cloudflare-eth.com", false),
    ("eip155", "10", "Optimism", "https://mainnet.optimism.io", false),
    ("eip155", "137", "Polygon", "https://polygon-rpc.com", false),
    ("eip155", "42161", "Arbitrum", "https://arb1.arbitrum.io/rpc", false),
    ("eip155", "42220", "Celo", "https://forno.celo.org", false),
    ("eip155", "5", "Ethereum Goerli", "https://rpc.ankr.com/eth_goerli", true),
    ("eip155", "11155111", "Ethereum Sepolia", "https://rpc.sepolia.org", true),
    ("eip155", "420", "Optimism Goerli", "https://goerli.optimism.io", true),
    ("eip155", "80001", "Polygon Mumbai", "https://rpc-mumbai.maticvigil.com", true),
    ("eip155", "44787", "Celo Alfajores", "https://alfajores-forno.celo-testnet.org", true),
    ("cosmos", "cosmoshub-4", "Cosmos Hub", "https://cosmos-rpc.publicnode.com", false),
    ("cosmos", "theta-testnet-001", "Cosmos Theta", "https://rpc.sentry-01.theta-testnet.polypore.xyz", true),
    ("solana", "4sGjMW1sUnHzSxGspuhpqLDx6wiyjNtZ", "Solana", "https://api.mainnet-beta.solana.com", false),
    ("solana", "8E9rvCKLFQia2Y35HvivXT8ZWGhs1wHk", "Solana Devnet", "https://api.devnet.solana.com", true),
    ("polkadot", "91b171bb158e2d3848fa23a9f1c25182", "Polkadot", "https://rpc.polkadot.io", false),
    ("polkadot", "e143f23803ac50e8f6f8e62695d1ce9e", "Westend", "https://westend-rpc.polkadot.io", true),
    ("near", "mainnet", "NEAR", "https://rpc.mainnet.near.org", false),
    ("near", "testnet", "NEAR Testnet", "https://rpc.testnet.near.org", true),
    ("elrond", "1", "Elrond", "https://api.elrond.com", false),
    ("elrond", "D", "Elrond Devnet", "https://devnet-api.elrond.com", true),
    // Chia wallets serve every call themselves; there is no node endpoint to reach.
    ("chia", "mainnet", "Chia", "", false),
    ("chia", "testnet10", "Chia Testnet", "", true),
];

/// Built-in chain metadata, with RPC endpoints optionally overridden per chain id.
#[derive(Debug, Clone)]
pub struct StaticChainTable {
    chains: Vec<ChainData>,
}

impl Default for StaticChainTable {
    fn default() -> Self {
        Self::with_overrides(&HashMap::new())
    }
}

impl StaticChainTable {
    pub fn with_config(config: &RelayAdapterConfig) -> Self {
        Self::with_overrides(&config.rpc_overrides)
    }

    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let chains = CHAINS
            .iter()
            .map(|(namespace, reference, name, rpc_url, testnet)| {
                let chain_id = ChainId::new(*namespace, *reference);
                let rpc_url = overrides
                    .get(&chain_id.to_string())
                    .cloned()
                    .unwrap_or_else(|| (*rpc_url).to_owned());
                ChainData {
                    chain_id,
                    name: (*name).to_owned(),
                    rpc_url,
                    testnet: *testnet,
                }
            })
            .collect();
        Self { chains }
    }
}

impl ChainDataPort for StaticChainTable {
    fn chain_data(&self, chain_id: &ChainId) -> Option<ChainData> {
        self.chains.iter().find(|c| &c.chain_id == chain_id).cloned()
    }

    fn chains(&self, testnet: bool) -> Vec<ChainData> {
        self.chains
            .iter()
            .filter(|c| c.testnet == testnet)
            .cloned()
            .collect()
    }
}
