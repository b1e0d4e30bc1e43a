use thiserror::Error;

use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised before any network call.
    Precondition,
    Transport,
    Verification,
}

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("WalletConnect is not initialized")]
    NotInitialized,
    #[error("Session is not connected")]
    NotConnected,
    #[error("Account for {0} not found")]
    AccountNotFound(String),
    #[error("Missing chain data for chainId: {0}")]
    MissingChainData(String),
    #[error("Missing public key for {0}")]
    MissingPublicKey(String),
    #[error("Unsupported chain namespace: {0}")]
    UnsupportedNamespace(String),
    #[error("Unknown method {method} for namespace {namespace}")]
    UnknownMethod { namespace: String, method: String },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Malformed wallet response: {0}")]
    MalformedResponse(String),
    #[error("Verification error: {0}")]
    Verification(String),
    #[error(transparent)]
    Port(#[from] PortError),
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::NotInitialized
            | RelayError::NotConnected
            | RelayError::AccountNotFound(_)
            | RelayError::MissingChainData(_)
            | RelayError::MissingPublicKey(_)
            | RelayError::UnsupportedNamespace(_)
            | RelayError::UnknownMethod { .. }
            | RelayError::InvalidInput(_) => ErrorKind::Precondition,
            RelayError::MalformedResponse(_) | RelayError::Port(_) => ErrorKind::Transport,
            RelayError::Verification(_) => ErrorKind::Verification,
        }
    }

    pub fn malformed(what: impl Into<String>) -> Self {
        RelayError::MalformedResponse(what.into())
    }
}
