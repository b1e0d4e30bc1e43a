pub mod context;
pub mod domain;
pub mod error;
pub mod method;
pub mod ports;
pub mod state;

pub use context::{RelayContext, RequestScope};
pub use domain::{
    AccountId, AccountIdFormatError, AssetBalance, BalanceMap, ChainData, ChainId,
    ChainIdFormatError, RequestArguments, RpcResult, Session,
};
pub use error::{ErrorKind, RelayError};
pub use method::{ChainFamily, RpcFuture, RpcHandler, RpcMethod, WireMethod};
pub use ports::{
    ChainDataPort, ClockPort, NetworkPort, PortError, SessionPort, SettingsPort, SystemClock,
};
pub use state::{PendingGuard, RelayState, SharedState};
