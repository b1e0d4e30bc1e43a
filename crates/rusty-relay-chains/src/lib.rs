pub mod cosmos;
pub mod eip155;
pub mod elrond;
pub mod encoding;
pub mod extensible;
pub mod near;
pub mod polkadot;
pub mod registry;
pub mod relay;
pub mod solana;

pub use registry::ChainRegistry;
pub use relay::Relay;
