//! Wallet provider capability.
//!
//! [`WalletProvider`] is the seam between the connection manager and
//! whatever actually talks to wallets: [`BrowserProvider`](super::browser::BrowserProvider)
//! in the browser, [`MockProvider`](super::mock::MockProvider) in tests.

use serde_json::Value;

use crate::core::error::WalletError;
use crate::models::{ConnectionState, Connector, Environment};

/// Operations the connection manager needs from a wallet backend.
///
/// Implementations are single-threaded; futures are driven on the
/// browser event loop and never sent across threads.
#[allow(async_fn_in_trait)]
pub trait WalletProvider {
    /// Current account/connection/chain state.
    fn connection_state(&self) -> ConnectionState;

    /// All connectors this provider can offer, in display order.
    fn connectors(&self) -> Vec<Connector>;

    /// Browser facts used by the readiness rules.
    fn environment(&self) -> Environment;

    /// Re-establish a persisted session without prompting the user.
    async fn restore_session(&self) -> ConnectionState;

    /// Ask the wallet behind `connector` for account access.
    async fn connect(&self, connector: &Connector) -> Result<ConnectionState, WalletError>;

    /// Tear down the current session.
    async fn disconnect(&self) -> Result<(), WalletError>;

    /// `wallet_switchEthereumChain` on the active (or injected) wallet.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Issue an arbitrary request against the injected wallet object.
    async fn raw_request(&self, method: &str, params: Value) -> Result<Value, WalletError>;

    /// Hand off to the wallet's mobile app (install or open).
    fn open_wallet_app(&self, connector: &Connector);
}
