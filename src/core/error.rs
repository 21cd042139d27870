//! Custom error types for the application.
//!
//! Provides structured error handling with meaningful error messages
//! and proper error categorization for each domain:
//!
//! - [`WalletError`] - Wallet connection, chain switching and EIP-1193 request errors
//! - [`ConfigError`] - Chain registry loading errors
//! - [`FetchError`] - ENS lookup failures

use thiserror::Error;

/// EIP-1193 / JSON-RPC provider error codes the manager reacts to.
pub mod codes {
    /// The user rejected the request.
    pub const USER_REJECTED: i64 = 4001;
    /// The wallet does not recognize the requested chain.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// Generic JSON-RPC internal error. Some mobile wallets report an
    /// unknown chain this way.
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// Wallet-related errors for EIP-1193 integration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Browser window not available
    #[error("Browser window not available")]
    NoWindow,
    /// No injected wallet and no usable connector
    #[error("No wallet found. Install a browser wallet such as MetaMask, or connect with WalletConnect.")]
    NoWallet,
    /// Connector id is not among the enumerated connectors
    #[error("Unknown wallet connector: {0}")]
    UnknownConnector(String),
    /// Connector exists but cannot be used in this environment
    #[error("{0} is not available in this browser")]
    ConnectorNotReady(String),
    /// Failed to create request object
    #[error("Failed to create wallet request")]
    RequestCreationFailed,
    /// No account returned from wallet
    #[error("No account returned from wallet")]
    NoAccount,
    /// Wallet returned an account that is not a valid address
    #[error("Invalid account returned from wallet: {0}")]
    InvalidAccount(String),
    /// Request rejected by the provider or the user
    #[error("{message}")]
    Rpc { code: i64, message: String },
    /// Wallet did not answer in time
    #[error("Wallet request timed out")]
    Timeout,
}

impl WalletError {
    /// Build an error from an EIP-1193 `{code, message}` rejection.
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        Self::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Provider error code, if this error came from the provider.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The user declined the prompt in their wallet.
    pub fn is_user_rejected(&self) -> bool {
        self.code() == Some(codes::USER_REJECTED)
    }

    /// The wallet does not know the requested chain and needs
    /// `wallet_addEthereumChain` first.
    pub fn is_unrecognized_chain(&self) -> bool {
        matches!(
            self.code(),
            Some(codes::UNRECOGNIZED_CHAIN | codes::INTERNAL_ERROR)
        )
    }
}

/// Errors loading the static chain registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TOML did not match the registry schema.
    #[error("invalid chain configuration: {0}")]
    Parse(String),
    /// The same chain id is listed twice.
    #[error("chain {0} is configured more than once")]
    DuplicateChain(u64),
    /// A chain has no RPC endpoint.
    #[error("chain {0} has no RPC URL")]
    MissingRpcUrl(u64),
    /// The preferred chain is not in the list.
    #[error("preferred chain {0} is not configured")]
    UnknownPreferredChain(u64),
}

/// Failures of a JSON lookup such as the ENS name query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Aborted at the deadline
    #[error("lookup timed out")]
    Timeout,
    /// Request never got a response (offline, CORS)
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response
    #[error("HTTP {0}")]
    Http(u16),
    /// Body was not the expected JSON
    #[error("unexpected response: {0}")]
    Decode(String),
}
