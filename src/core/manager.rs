//! Wallet connection and network management.
//!
//! [`WalletManager`] owns the connection state machine
//! (`Disconnected -> Connecting -> Connected`), the network switch flow with
//! its `wallet_addEthereumChain` fallback, and the wrong-network prompt.
//! It is generic over [`WalletProvider`] so the whole flow runs against
//! [`MockProvider`](super::mock::MockProvider) in tests.
//!
//! State lives in `Cell`/`RefCell`s; no borrow is held across an `.await`.
//! Every mutation is followed by a call to the registered change listener,
//! which the UI uses to mirror state into reactive signals.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use alloy_primitives::Address;
use serde_json::Value;

use crate::core::error::{WalletError, codes};
use crate::core::WalletProvider;
use crate::models::{
    ChainDescriptor, ChainRegistry, ConnectOutcome, ConnectionState, Connector, ConnectorKind,
    ConnectorOption, NetworkSwitchStatus, SwitchOutcome, WrongNetworkPrompt, present_connectors,
    readiness,
};

type Listener = Rc<dyn Fn()>;

/// Resets the switching flag when the switch future completes or is dropped.
struct SwitchGuard<'a>(&'a Cell<bool>);

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

pub struct WalletManager<P> {
    provider: P,
    chains: ChainRegistry,
    connection: RefCell<ConnectionState>,
    connect_error: RefCell<Option<String>>,
    /// Bumped on disconnect so late connect results are discarded.
    session_epoch: Cell<u64>,
    switching: Cell<bool>,
    status: RefCell<Option<NetworkSwitchStatus>>,
    status_generation: Cell<u64>,
    prompt: Cell<WrongNetworkPrompt>,
    network_selector_open: Cell<bool>,
    listener: RefCell<Option<Listener>>,
}

impl<P: WalletProvider> WalletManager<P> {
    /// Create a manager seeded with whatever the provider currently reports.
    pub fn new(provider: P, chains: ChainRegistry) -> Self {
        let connection = provider.connection_state();
        let manager = Self {
            provider,
            chains,
            connection: RefCell::new(connection),
            connect_error: RefCell::new(None),
            session_epoch: Cell::new(0),
            switching: Cell::new(false),
            status: RefCell::new(None),
            status_generation: Cell::new(0),
            prompt: Cell::new(WrongNetworkPrompt::default()),
            network_selector_open: Cell::new(false),
            listener: RefCell::new(None),
        };
        manager.prompt_if_wrong_network();
        manager
    }

    /// Register the change listener, replacing any previous one.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        self.listener.replace(Some(Rc::new(listener)));
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn chains(&self) -> &ChainRegistry {
        &self.chains
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection.borrow().clone()
    }

    pub fn connect_error(&self) -> Option<String> {
        self.connect_error.borrow().clone()
    }

    pub fn is_network_switching(&self) -> bool {
        self.switching.get()
    }

    pub fn status(&self) -> Option<NetworkSwitchStatus> {
        self.status.borrow().clone()
    }

    /// Identifies the most recently published status message.
    pub fn status_generation(&self) -> u64 {
        self.status_generation.get()
    }

    pub fn is_prompt_visible(&self) -> bool {
        self.prompt.get().visible
    }

    pub fn is_network_selector_open(&self) -> bool {
        self.network_selector_open.get()
    }

    pub fn current_chain_id(&self) -> Option<u64> {
        self.connection.borrow().chain_id
    }

    /// Connectors to offer, with readiness for the current environment.
    pub fn connector_options(&self) -> Vec<ConnectorOption> {
        present_connectors(&self.provider.connectors(), &self.provider.environment())
    }

    fn active_connector(&self) -> Option<Connector> {
        let id = self.connection.borrow().active_connector_id.clone()?;
        self.provider.connectors().into_iter().find(|c| c.id == id)
    }

    fn set_connection(&self, state: ConnectionState) {
        self.connection.replace(state);
        self.prompt_if_wrong_network();
        self.notify();
    }

    // ------------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------------

    /// Pick up a session persisted by the provider (page reload).
    pub async fn restore(&self) {
        let epoch = self.session_epoch.get();
        let state = self.provider.restore_session().await;
        if epoch != self.session_epoch.get() || self.connection.borrow().is_connecting() {
            return;
        }
        if state.is_connected() {
            log::info!(
                "Restored wallet session on {}",
                state.active_connector_id.as_deref().unwrap_or("unknown connector")
            );
        }
        self.set_connection(state);
    }

    /// Connect through the connector with id `connector_id`.
    ///
    /// On mobile, a missing extension wallet is handed off to its app via a
    /// deep link and no session is started.
    pub async fn connect(&self, connector_id: &str) -> Result<ConnectOutcome, WalletError> {
        let env = self.provider.environment();
        let connector = self
            .provider
            .connectors()
            .into_iter()
            .find(|c| c.id == connector_id)
            .ok_or_else(|| WalletError::UnknownConnector(connector_id.to_string()))?;

        match readiness(connector.kind, &env) {
            Some(true) => {}
            Some(false) if env.mobile && connector.kind == ConnectorKind::Extension => {
                log::info!("{} not detected, opening wallet app", connector.name);
                self.provider.open_wallet_app(&connector);
                return Ok(ConnectOutcome::DeepLinked);
            }
            _ => return Err(WalletError::ConnectorNotReady(connector.name)),
        }

        let epoch = self.session_epoch.get();
        self.connect_error.replace(None);
        self.set_connection(ConnectionState::connecting(&connector.id));

        let result = self.provider.connect(&connector).await;
        if epoch != self.session_epoch.get() {
            log::debug!("Discarding connect result for {}: session was reset", connector.id);
            return Ok(ConnectOutcome::Abandoned);
        }

        match result {
            Ok(state) => {
                log::info!("Wallet connected via {}", connector.name);
                self.set_connection(state);
                Ok(ConnectOutcome::Connected)
            }
            Err(e) => {
                log::warn!("Wallet connection via {} failed: {}", connector.name, e);
                self.connect_error.replace(Some(e.to_string()));
                self.set_connection(ConnectionState::default());
                Err(e)
            }
        }
    }

    /// Drop the session. The state becomes `Disconnected` before the
    /// provider teardown is awaited; teardown failures are only logged.
    pub async fn disconnect(&self) {
        self.session_epoch.set(self.session_epoch.get() + 1);
        self.connect_error.replace(None);
        self.set_connection(ConnectionState::default());

        if let Err(e) = self.provider.disconnect().await {
            log::warn!("Wallet teardown failed: {}", e);
        }
    }

    pub fn clear_connect_error(&self) {
        if self.connect_error.replace(None).is_some() {
            self.notify();
        }
    }

    /// Provider `accountsChanged` event.
    pub fn on_accounts_changed(&self, account: Option<String>) {
        let Some(account) = account else {
            if self.connection.borrow().is_connected() {
                log::info!("Wallet reported no accounts, disconnecting");
                self.session_epoch.set(self.session_epoch.get() + 1);
                self.set_connection(ConnectionState::default());
            }
            return;
        };

        if !self.connection.borrow().is_connected() {
            return;
        }
        match account.parse::<Address>() {
            Ok(address) => {
                let mut state = self.connection();
                state.address = Some(address);
                self.set_connection(state);
            }
            Err(_) => log::warn!("Ignoring invalid account from wallet: {}", account),
        }
    }

    /// Provider `chainChanged` event. Ignored unless connected.
    pub fn on_chain_changed(&self, chain_id: u64) {
        let mut state = self.connection();
        if !state.is_connected() || state.chain_id == Some(chain_id) {
            return;
        }
        log::debug!("Chain changed to {}", chain_id);
        state.chain_id = Some(chain_id);
        self.set_connection(state);
    }

    // ------------------------------------------------------------------------
    // Network switching
    // ------------------------------------------------------------------------

    /// Switch the wallet to `target`.
    ///
    /// Returns [`SwitchOutcome::Skipped`] without touching the wallet when
    /// already on `target` or while another switch is in flight. Unknown
    /// chains (4902, -32603) are registered with `wallet_addEthereumChain`
    /// and the switch is attempted once more. A switch that completes after
    /// [`disconnect`](Self::disconnect) leaves the session untouched.
    pub async fn switch_network(
        &self,
        target: &ChainDescriptor,
    ) -> Result<SwitchOutcome, WalletError> {
        if self.switching.get() || self.current_chain_id() == Some(target.id) {
            return Ok(SwitchOutcome::Skipped);
        }

        self.switching.set(true);
        let guard = SwitchGuard(&self.switching);
        let epoch = self.session_epoch.get();
        self.publish(NetworkSwitchStatus::pending(&target.name));

        let result = self.perform_switch(target).await;

        if epoch != self.session_epoch.get() {
            log::debug!("Discarding switch to {}: session was reset", target.name);
            drop(guard);
            self.clear_status();
            return result;
        }

        match &result {
            Ok(SwitchOutcome::DeepLinked) => {
                self.publish(NetworkSwitchStatus::info(format!(
                    "Continue in your wallet app to switch to {}",
                    target.name
                )));
            }
            Ok(_) => {
                log::info!("Switched network to {}", target.name);
                let mut state = self.connection();
                state.chain_id = Some(target.id);
                self.connection.replace(state);
                self.network_selector_open.set(false);
                self.prompt.set(WrongNetworkPrompt::default());
                self.prompt_if_wrong_network();
                self.publish(NetworkSwitchStatus::success(&target.name));
            }
            Err(e) if e.is_user_rejected() => {
                log::info!("Network switch to {} declined by user", target.name);
                self.publish(NetworkSwitchStatus::info("Network switch cancelled"));
            }
            Err(e) => {
                log::warn!("Network switch to {} failed: {}", target.name, e);
                self.publish(NetworkSwitchStatus::error(format!(
                    "Failed to switch to {}: {}",
                    target.name, e
                )));
            }
        }

        drop(guard);
        self.notify();
        result
    }

    async fn perform_switch(&self, target: &ChainDescriptor) -> Result<SwitchOutcome, WalletError> {
        let env = self.provider.environment();
        let active = self.active_connector();

        if active
            .as_ref()
            .is_some_and(|c| c.kind == ConnectorKind::RemotePairing)
        {
            self.provider.switch_chain(target.id).await?;
            return Ok(SwitchOutcome::Switched);
        }

        if !env.injected {
            if !env.mobile {
                return Err(WalletError::NoWallet);
            }
            if let Some(connector) = active.filter(|c| c.kind == ConnectorKind::Extension) {
                self.provider.open_wallet_app(&connector);
                return Ok(SwitchOutcome::DeepLinked);
            }
            self.provider.switch_chain(target.id).await?;
            return Ok(SwitchOutcome::Switched);
        }

        match self.provider.switch_chain(target.id).await {
            Ok(()) => Ok(SwitchOutcome::Switched),
            Err(e) if e.is_unrecognized_chain() => {
                if e.code() == Some(codes::INTERNAL_ERROR) {
                    log::warn!(
                        "Treating internal error as unknown chain {}: {}",
                        target.id,
                        e
                    );
                }
                self.add_chain(target).await?;
                self.provider.switch_chain(target.id).await?;
                Ok(SwitchOutcome::AddedAndSwitched)
            }
            Err(e) => Err(e),
        }
    }

    async fn add_chain(&self, target: &ChainDescriptor) -> Result<(), WalletError> {
        log::info!("Adding chain {} ({}) to wallet", target.name, target.hex_id());
        let params = serde_json::to_value(target.add_chain_params())
            .map_err(|_| WalletError::RequestCreationFailed)?;
        self.provider
            .raw_request("wallet_addEthereumChain", Value::Array(vec![params]))
            .await?;
        Ok(())
    }

    fn publish(&self, status: NetworkSwitchStatus) {
        self.status_generation.set(self.status_generation.get() + 1);
        self.status.replace(Some(status));
        self.notify();
    }

    fn clear_status(&self) {
        self.status_generation.set(self.status_generation.get() + 1);
        self.status.replace(None);
        self.notify();
    }

    /// Clear the status message if it is still the one published as
    /// `generation`. Called by the display timer.
    pub fn expire_status(&self, generation: u64) {
        if generation == self.status_generation.get() && self.status.replace(None).is_some() {
            self.notify();
        }
    }

    // ------------------------------------------------------------------------
    // Wrong-network prompt
    // ------------------------------------------------------------------------

    /// Re-evaluate the wrong-network prompt and return whether it shows.
    pub fn prompt_if_wrong_network(&self) -> bool {
        let preferred = self.chains.preferred_chain_id();
        let (connected, chain_id) = {
            let conn = self.connection.borrow();
            (conn.is_connected(), conn.chain_id)
        };

        let mut prompt = self.prompt.get();
        match chain_id {
            Some(id) if connected && id != preferred => {
                prompt.visible = prompt.dismissed_on != Some(id);
            }
            _ => prompt = WrongNetworkPrompt::default(),
        }
        self.prompt.set(prompt);
        prompt.visible
    }

    /// "Continue anyway": hide the prompt until the chain changes.
    pub fn dismiss_wrong_network(&self) {
        self.prompt.set(WrongNetworkPrompt {
            visible: false,
            dismissed_on: self.current_chain_id(),
        });
        self.notify();
    }

    /// "Switch now": switch to the preferred chain.
    pub async fn switch_to_preferred(&self) -> Result<SwitchOutcome, WalletError> {
        let target = self.chains.preferred().clone();
        self.switch_network(&target).await
    }

    // ------------------------------------------------------------------------
    // Network selector
    // ------------------------------------------------------------------------

    pub fn set_network_selector_open(&self, open: bool) {
        if self.network_selector_open.replace(open) != open {
            self.notify();
        }
    }

    pub fn toggle_network_selector(&self) {
        self.set_network_selector_open(!self.network_selector_open.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock::{MockCall, MockProvider};
    use crate::models::{ConnectionStatus, Environment, test_chain};

    const PREFERRED: u64 = 656476;
    const ADDR: &str = "0x1234567890123456789012345678901234567890";

    fn registry() -> ChainRegistry {
        let mut polygon = test_chain(137, "Polygon");
        polygon.block_explorer_url = Some("https://polygonscan.com".to_string());
        ChainRegistry::new(
            vec![
                test_chain(PREFERRED, "EDU Chain Testnet"),
                test_chain(1, "Ethereum"),
                polygon,
            ],
            PREFERRED,
        )
        .unwrap()
    }

    fn connected_on(chain_id: u64, connector: &str) -> MockProvider {
        let provider = MockProvider::new(Environment::desktop(true));
        provider.set_state(ConnectionState::connected(
            ADDR.parse().unwrap(),
            connector,
            Some(chain_id),
        ));
        provider
    }

    fn manager(provider: MockProvider) -> WalletManager<MockProvider> {
        WalletManager::new(provider, registry())
    }

    fn switch_calls(m: &WalletManager<MockProvider>) -> Vec<u64> {
        m.provider()
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::SwitchChain(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // connect / disconnect
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_connect_success() {
        let m = manager(MockProvider::new(Environment::desktop(true)));
        assert_eq!(m.connect("injected").await, Ok(ConnectOutcome::Connected));

        let conn = m.connection();
        assert_eq!(conn.status, ConnectionStatus::Connected);
        assert_eq!(conn.active_connector_id.as_deref(), Some("injected"));
        assert!(conn.address.is_some());
    }

    #[tokio::test]
    async fn test_connect_rejected_surfaces_message() {
        let provider = MockProvider::new(Environment::desktop(true));
        provider.fail_next_connect(WalletError::rpc(4001, "User rejected the request."));
        let m = manager(provider);

        let result = m.connect("metaMask").await;
        assert!(result.is_err());
        assert_eq!(m.connection().status, ConnectionStatus::Disconnected);
        assert_eq!(m.connect_error().as_deref(), Some("User rejected the request."));
    }

    #[tokio::test]
    async fn test_connect_unknown_connector() {
        let m = manager(MockProvider::new(Environment::desktop(true)));
        assert_eq!(
            m.connect("ledger").await,
            Err(WalletError::UnknownConnector("ledger".to_string()))
        );
        assert!(m.provider().calls().is_empty());
    }

    #[tokio::test]
    async fn test_desktop_injected_without_wallet_issues_no_request() {
        let m = manager(MockProvider::new(Environment::desktop(false)));

        let injected = m
            .connector_options()
            .into_iter()
            .find(|o| o.connector.id == "injected")
            .unwrap();
        assert!(!injected.ready);

        let result = m.connect("injected").await;
        assert!(matches!(result, Err(WalletError::ConnectorNotReady(_))));
        assert!(m.provider().calls().is_empty());
        assert_eq!(m.connection().status, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_mobile_missing_extension_deep_links() {
        let m = manager(MockProvider::new(Environment::mobile(false)));

        assert_eq!(m.connect("metaMask").await, Ok(ConnectOutcome::DeepLinked));
        assert_eq!(
            m.provider().calls(),
            vec![MockCall::OpenWalletApp("metaMask".to_string())]
        );
        assert_eq!(m.connection(), ConnectionState::default());
    }

    #[tokio::test]
    async fn test_mobile_remote_pairing_connects() {
        let m = manager(MockProvider::new(Environment::mobile(false)));
        assert_eq!(m.connect("walletConnect").await, Ok(ConnectOutcome::Connected));
        assert_eq!(
            m.connection().active_connector_id.as_deref(),
            Some("walletConnect")
        );
    }

    #[tokio::test]
    async fn test_mobile_hides_generic_injected() {
        let m = manager(MockProvider::new(Environment::mobile(true)));
        assert!(m.connector_options().iter().all(|o| o.connector.id != "injected"));
        assert!(matches!(
            m.connect("injected").await,
            Err(WalletError::ConnectorNotReady(_))
        ));
    }

    #[tokio::test]
    async fn test_disconnect_clears_session() {
        let m = manager(connected_on(PREFERRED, "metaMask"));
        assert!(m.connection().is_connected());

        m.disconnect().await;

        let conn = m.connection();
        assert_eq!(conn.status, ConnectionStatus::Disconnected);
        assert_eq!(conn.address, None);
        assert_eq!(conn.active_connector_id, None);
        assert!(m.provider().calls().contains(&MockCall::Disconnect));
    }

    #[tokio::test]
    async fn test_disconnect_during_connect_wins() {
        let provider = MockProvider::new(Environment::desktop(true));
        provider.set_yield_before_reply(true);
        let m = manager(provider);

        let (outcome, ()) = tokio::join!(m.connect("injected"), m.disconnect());

        assert_eq!(outcome, Ok(ConnectOutcome::Abandoned));
        assert_eq!(m.connection(), ConnectionState::default());
    }

    #[tokio::test]
    async fn test_disconnect_teardown_error_is_swallowed() {
        let provider = connected_on(1, "injected");
        provider.fail_next_disconnect(WalletError::rpc(-32601, "Method not found"));
        let m = manager(provider);

        m.disconnect().await;
        assert_eq!(m.connection().status, ConnectionStatus::Disconnected);
    }

    #[tokio::test]
    async fn test_restore_session() {
        let provider = MockProvider::new(Environment::desktop(true));
        provider.set_restorable(ConnectionState::connected(
            ADDR.parse().unwrap(),
            "metaMask",
            Some(PREFERRED),
        ));
        let m = manager(provider);
        assert!(!m.connection().is_connected());

        m.restore().await;
        assert!(m.connection().is_connected());
        assert!(!m.is_prompt_visible());
    }

    #[test]
    fn test_accounts_changed_to_empty_disconnects() {
        let m = manager(connected_on(PREFERRED, "injected"));
        m.on_accounts_changed(None);
        assert_eq!(m.connection().status, ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_accounts_changed_updates_address() {
        let m = manager(connected_on(PREFERRED, "injected"));
        m.on_accounts_changed(Some("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".to_string()));
        assert_eq!(
            m.connection().checksum_address().as_deref(),
            Some("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed")
        );

        m.on_accounts_changed(Some("not-an-address".to_string()));
        assert!(m.connection().is_connected());
    }

    // ------------------------------------------------------------------------
    // switch_network
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_switch_to_current_chain_is_noop() {
        let m = manager(connected_on(137, "injected"));
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(m.switch_network(&polygon).await, Ok(SwitchOutcome::Skipped));
        assert!(m.provider().calls().is_empty());
        assert_eq!(m.status(), None);
        assert!(!m.is_network_switching());
    }

    #[tokio::test]
    async fn test_concurrent_switches_issue_one_request() {
        let provider = connected_on(1, "injected");
        provider.set_yield_before_reply(true);
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        let (first, second) = tokio::join!(m.switch_network(&polygon), m.switch_network(&polygon));

        assert_eq!(first, Ok(SwitchOutcome::Switched));
        assert_eq!(second, Ok(SwitchOutcome::Skipped));
        assert_eq!(switch_calls(&m), vec![137]);
        assert!(!m.is_network_switching());
    }

    #[tokio::test]
    async fn test_switch_success_updates_status_and_closes_selector() {
        let m = manager(connected_on(1, "injected"));
        m.set_network_selector_open(true);
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(m.switch_network(&polygon).await, Ok(SwitchOutcome::Switched));
        assert_eq!(m.current_chain_id(), Some(137));
        assert!(!m.is_network_selector_open());
        assert_eq!(
            m.status(),
            Some(NetworkSwitchStatus::success("Polygon"))
        );
    }

    #[tokio::test]
    async fn test_unrecognized_chain_adds_chain() {
        let provider = connected_on(1, "injected");
        provider.fail_next_switch(WalletError::rpc(4902, "Unrecognized chain ID \"0x89\""));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(
            m.switch_network(&polygon).await,
            Ok(SwitchOutcome::AddedAndSwitched)
        );

        let add = m
            .provider()
            .calls()
            .into_iter()
            .find_map(|c| match c {
                MockCall::RawRequest { method, params } if method == "wallet_addEthereumChain" => {
                    Some(params)
                }
                _ => None,
            })
            .expect("add-chain request");
        assert_eq!(add[0]["chainId"], "0x89");
        assert_eq!(add[0]["chainName"], "Polygon");
        assert_eq!(add[0]["nativeCurrency"]["symbol"], "ETH");
        assert_eq!(add[0]["rpcUrls"][0], "https://rpc.137.example");
        assert_eq!(add[0]["blockExplorerUrls"][0], "https://polygonscan.com");
        assert_eq!(m.current_chain_id(), Some(137));
    }

    #[tokio::test]
    async fn test_internal_error_also_adds_chain() {
        let provider = connected_on(1, "injected");
        provider.fail_next_switch(WalletError::rpc(-32603, "Internal JSON-RPC error."));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(
            m.switch_network(&polygon).await,
            Ok(SwitchOutcome::AddedAndSwitched)
        );
    }

    #[tokio::test]
    async fn test_other_errors_skip_fallback() {
        let provider = connected_on(1, "injected");
        provider.fail_next_switch(WalletError::rpc(-32002, "Request already pending"));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        let result = m.switch_network(&polygon).await;
        assert_eq!(result, Err(WalletError::rpc(-32002, "Request already pending")));
        assert!(
            !m.provider()
                .calls()
                .iter()
                .any(|c| matches!(c, MockCall::RawRequest { .. }))
        );

        let status = m.status().unwrap();
        assert!(status.is_error);
        assert!(status.message.contains("Request already pending"));
        assert!(!m.is_network_switching());
    }

    #[tokio::test]
    async fn test_failed_add_chain_surfaces_error() {
        let provider = connected_on(1, "injected");
        provider.fail_next_switch(WalletError::rpc(4902, "Unrecognized chain"));
        provider.fail_next_raw_request(WalletError::rpc(-32602, "Invalid RPC URL"));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert!(m.switch_network(&polygon).await.is_err());
        assert_eq!(switch_calls(&m), vec![137]);
        assert!(m.status().unwrap().message.contains("Invalid RPC URL"));
        assert_eq!(m.current_chain_id(), Some(1));
    }

    #[tokio::test]
    async fn test_user_rejection_is_neutral() {
        let provider = connected_on(1, "injected");
        provider.fail_next_switch(WalletError::rpc(4001, "User rejected the request."));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert!(m.switch_network(&polygon).await.is_err());
        assert!(!m.status().unwrap().is_error);
    }

    #[tokio::test]
    async fn test_desktop_without_wallet_fails() {
        let m = manager(MockProvider::new(Environment::desktop(false)));
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(m.switch_network(&polygon).await, Err(WalletError::NoWallet));
        assert!(m.provider().calls().is_empty());
        assert!(m.status().unwrap().is_error);
    }

    #[tokio::test]
    async fn test_mobile_extension_without_wallet_deep_links() {
        let provider = MockProvider::new(Environment::mobile(false));
        provider.set_state(ConnectionState::connected(ADDR.parse().unwrap(), "metaMask", Some(1)));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(m.switch_network(&polygon).await, Ok(SwitchOutcome::DeepLinked));
        assert_eq!(
            m.provider().calls(),
            vec![MockCall::OpenWalletApp("metaMask".to_string())]
        );
    }

    #[tokio::test]
    async fn test_remote_pairing_delegates_without_fallback() {
        let provider = MockProvider::new(Environment::mobile(false));
        provider.set_state(ConnectionState::connected(
            ADDR.parse().unwrap(),
            "walletConnect",
            Some(1),
        ));
        provider.fail_next_switch(WalletError::rpc(4902, "Unrecognized chain"));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert!(m.switch_network(&polygon).await.is_err());
        assert_eq!(m.provider().calls(), vec![MockCall::SwitchChain(137)]);
    }

    #[tokio::test]
    async fn test_mobile_non_extension_without_wallet_delegates() {
        let provider = MockProvider::new(Environment::mobile(false));
        provider.set_state(ConnectionState::connected(ADDR.parse().unwrap(), "injected", Some(1)));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(m.switch_network(&polygon).await, Ok(SwitchOutcome::Switched));
        assert_eq!(m.provider().calls(), vec![MockCall::SwitchChain(137)]);
        assert_eq!(m.current_chain_id(), Some(137));
    }

    #[tokio::test]
    async fn test_failed_switch_after_add_chain_surfaces_error() {
        let provider = connected_on(1, "injected");
        provider.fail_next_switch(WalletError::rpc(4902, "Unrecognized chain"));
        provider.fail_next_switch(WalletError::rpc(4001, "User rejected the request."));
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        assert_eq!(
            m.switch_network(&polygon).await,
            Err(WalletError::rpc(4001, "User rejected the request."))
        );

        let calls = m.provider().calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], MockCall::SwitchChain(137));
        assert!(matches!(
            &calls[1],
            MockCall::RawRequest { method, .. } if method == "wallet_addEthereumChain"
        ));
        assert_eq!(calls[2], MockCall::SwitchChain(137));
        assert_eq!(m.current_chain_id(), Some(1));
        assert!(!m.is_network_switching());
    }

    #[tokio::test]
    async fn test_disconnect_during_switch_wins() {
        let provider = connected_on(1, "injected");
        provider.set_yield_before_reply(true);
        let m = manager(provider);
        let polygon = m.chains().get(137).unwrap().clone();

        let (outcome, ()) = tokio::join!(m.switch_network(&polygon), m.disconnect());

        assert_eq!(outcome, Ok(SwitchOutcome::Switched));
        assert_eq!(m.connection(), ConnectionState::default());
        assert_eq!(m.status(), None);
        assert!(!m.is_prompt_visible());
        assert!(!m.is_network_switching());
    }

    #[test]
    fn test_chain_changed_ignored_while_disconnected() {
        let m = manager(MockProvider::new(Environment::desktop(true)));
        m.on_chain_changed(1);
        assert_eq!(m.connection(), ConnectionState::default());
        assert!(!m.is_prompt_visible());
    }

    #[tokio::test]
    async fn test_status_expires_only_for_latest_generation() {
        let m = manager(connected_on(1, "injected"));
        let polygon = m.chains().get(137).unwrap().clone();

        m.switch_network(&polygon).await.unwrap();
        let generation = m.status_generation();

        m.expire_status(generation - 1);
        assert!(m.status().is_some());

        m.expire_status(generation);
        assert_eq!(m.status(), None);
    }

    #[tokio::test]
    async fn test_listener_sees_pending_status() {
        let m = Rc::new(manager(connected_on(1, "injected")));
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let weak = Rc::downgrade(&m);
            let seen = seen.clone();
            m.set_listener(move || {
                if let Some(m) = weak.upgrade()
                    && let Some(status) = m.status()
                {
                    seen.borrow_mut().push((status.message, m.is_network_switching()));
                }
            });
        }
        let polygon = m.chains().get(137).unwrap().clone();
        m.switch_network(&polygon).await.unwrap();

        let seen = seen.borrow();
        assert!(seen.contains(&("Switching to Polygon...".to_string(), true)));
        assert_eq!(
            seen.last(),
            Some(&("Successfully switched to Polygon".to_string(), false))
        );
    }

    // ------------------------------------------------------------------------
    // Wrong-network prompt
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_wrong_network_prompt_switch_now() {
        let m = manager(connected_on(1, "injected"));
        assert!(m.is_prompt_visible());

        assert_eq!(m.switch_to_preferred().await, Ok(SwitchOutcome::Switched));
        assert_eq!(switch_calls(&m), vec![PREFERRED]);
        assert!(!m.is_prompt_visible());
        assert!(m.status().unwrap().message.contains("Successfully switched"));
    }

    #[test]
    fn test_prompt_hidden_on_preferred_chain_or_disconnected() {
        let m = manager(connected_on(PREFERRED, "injected"));
        assert!(!m.is_prompt_visible());

        let m = manager(MockProvider::new(Environment::desktop(true)));
        assert!(!m.prompt_if_wrong_network());
    }

    #[test]
    fn test_dismissed_prompt_returns_after_chain_change() {
        let m = manager(connected_on(1, "injected"));
        m.dismiss_wrong_network();
        assert!(!m.is_prompt_visible());
        assert!(!m.prompt_if_wrong_network());

        m.on_chain_changed(137);
        assert!(m.is_prompt_visible());

        m.on_chain_changed(PREFERRED);
        assert!(!m.is_prompt_visible());

        m.on_chain_changed(1);
        assert!(m.is_prompt_visible());
    }
}
