//! Browser wallet provider.
//!
//! [`BrowserProvider`] implements [`WalletProvider`] on top of EIP-1193
//! objects found on `window`: the injected `window.ethereum` for the
//! generic and MetaMask connectors, and a remote-pairing provider exposed
//! under [`PAIRING_PROVIDER_GLOBAL`] for WalletConnect. The id of the
//! connector used for the last session is kept in localStorage so a reload
//! can restore it without a wallet popup.

use std::cell::RefCell;

use alloy_primitives::Address;
use serde_json::{Value, json};

use crate::config::{
    METAMASK_DEEP_LINK, PAIRING_PROVIDER_GLOBAL, WALLET_SESSION_KEY, WALLET_TIMEOUT_MS,
    connectors as ids,
};
use crate::core::eip1193::{Eip1193, EventSubscription};
use crate::core::error::WalletError;
use crate::core::WalletProvider;
use crate::models::{
    ConnectionState, Connector, ConnectorKind, Environment, is_mobile_user_agent, parse_chain_id,
    to_hex_chain_id,
};
use crate::utils::{dapp_deep_link, dom};

#[derive(Default)]
pub struct BrowserProvider {
    state: RefCell<ConnectionState>,
}

impl BrowserProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// The EIP-1193 object serving `connector`.
    fn endpoint(&self, connector: &Connector) -> Result<Eip1193, WalletError> {
        match connector.kind {
            ConnectorKind::Injected | ConnectorKind::Extension => Eip1193::injected(),
            ConnectorKind::RemotePairing => Eip1193::from_global(PAIRING_PROVIDER_GLOBAL)
                .map_err(|_| WalletError::ConnectorNotReady(connector.name.clone())),
        }
    }

    fn connector(&self, id: &str) -> Option<Connector> {
        self.connectors().into_iter().find(|c| c.id == id)
    }

    /// Endpoint of the active session, falling back to the injected wallet.
    fn active_endpoint(&self) -> Result<Eip1193, WalletError> {
        let active = self.state.borrow().active_connector_id.clone();
        match active.and_then(|id| self.connector(&id)) {
            Some(connector) => self.endpoint(&connector),
            None => Eip1193::injected(),
        }
    }

    async fn chain_id(endpoint: &Eip1193) -> Option<u64> {
        let result = endpoint.request("eth_chainId", None).await.ok()?;
        parse_chain_id(&result.as_string()?)
    }

    /// Forward provider events to the given handlers.
    ///
    /// Listeners are removed when the returned subscriptions are dropped.
    pub fn subscribe(
        &self,
        on_accounts: impl Fn(Option<String>) + 'static,
        on_chain: impl Fn(u64) + 'static,
    ) -> Vec<EventSubscription> {
        let mut subscriptions = Vec::new();
        let endpoints = [Eip1193::injected(), Eip1193::from_global(PAIRING_PROVIDER_GLOBAL)];
        let on_accounts = std::rc::Rc::new(on_accounts);
        let on_chain = std::rc::Rc::new(on_chain);

        for endpoint in endpoints.into_iter().flatten() {
            let accounts = on_accounts.clone();
            match endpoint.on("accountsChanged", move |value| {
                accounts(Eip1193::first_account(&value))
            }) {
                Ok(sub) => subscriptions.push(sub),
                Err(e) => log::warn!("Cannot listen for account changes: {}", e),
            }

            let chain = on_chain.clone();
            match endpoint.on("chainChanged", move |value| {
                if let Some(id) = value.as_string().as_deref().and_then(parse_chain_id) {
                    chain(id);
                }
            }) {
                Ok(sub) => subscriptions.push(sub),
                Err(e) => log::warn!("Cannot listen for chain changes: {}", e),
            }
        }
        subscriptions
    }
}

impl WalletProvider for BrowserProvider {
    fn connection_state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    fn connectors(&self) -> Vec<Connector> {
        vec![
            Connector::new(ids::METAMASK_ID, ids::METAMASK_NAME, ConnectorKind::Extension),
            Connector::new(
                ids::WALLET_CONNECT_ID,
                ids::WALLET_CONNECT_NAME,
                ConnectorKind::RemotePairing,
            ),
            Connector::new(ids::INJECTED_ID, ids::INJECTED_NAME, ConnectorKind::Injected),
        ]
    }

    fn environment(&self) -> Environment {
        let injected = Eip1193::injected().ok();
        Environment {
            mobile: dom::user_agent().is_some_and(|ua| is_mobile_user_agent(&ua)),
            injected: injected.is_some(),
            extension_detected: injected.is_some_and(|e| e.flag("isMetaMask")),
        }
    }

    async fn restore_session(&self) -> ConnectionState {
        let Some(connector) = dom::local_storage()
            .and_then(|s| s.get_item(WALLET_SESSION_KEY).ok().flatten())
            .and_then(|id| self.connector(&id))
        else {
            return self.connection_state();
        };

        let Ok(endpoint) = self.endpoint(&connector) else {
            clear_session();
            return self.connection_state();
        };

        let account = endpoint
            .request_with_timeout("eth_accounts", WALLET_TIMEOUT_MS)
            .await
            .ok()
            .and_then(|v| Eip1193::first_account(&v))
            .and_then(|a| a.parse::<Address>().ok());

        match account {
            Some(address) => {
                let chain_id = Self::chain_id(&endpoint).await;
                let state = ConnectionState::connected(address, &connector.id, chain_id);
                self.state.replace(state.clone());
                state
            }
            None => {
                log::debug!("Stored session for {} is no longer authorized", connector.id);
                clear_session();
                self.connection_state()
            }
        }
    }

    async fn connect(&self, connector: &Connector) -> Result<ConnectionState, WalletError> {
        let endpoint = self.endpoint(connector)?;
        let accounts = endpoint.request("eth_requestAccounts", None).await?;
        let account = Eip1193::first_account(&accounts).ok_or(WalletError::NoAccount)?;
        let address = account
            .parse::<Address>()
            .map_err(|_| WalletError::InvalidAccount(account.clone()))?;
        let chain_id = Self::chain_id(&endpoint).await;

        let state = ConnectionState::connected(address, &connector.id, chain_id);
        self.state.replace(state.clone());
        save_session(&connector.id);
        Ok(state)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        let previous = self.state.replace(ConnectionState::default());
        clear_session();

        let Some(connector) = previous.active_connector_id.and_then(|id| self.connector(&id))
        else {
            return Ok(());
        };
        let endpoint = self.endpoint(&connector)?;
        match connector.kind {
            ConnectorKind::RemotePairing => endpoint.call_if_present("disconnect").await,
            ConnectorKind::Injected | ConnectorKind::Extension => {
                let params = json!([{ "eth_accounts": {} }]);
                endpoint
                    .request("wallet_revokePermissions", Some(&params))
                    .await
                    .map(|_| ())
            }
        }
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        let endpoint = self.active_endpoint()?;
        let params = json!([{ "chainId": to_hex_chain_id(chain_id) }]);
        endpoint
            .request("wallet_switchEthereumChain", Some(&params))
            .await?;
        self.state.borrow_mut().chain_id = Some(chain_id);
        Ok(())
    }

    async fn raw_request(&self, method: &str, params: Value) -> Result<Value, WalletError> {
        Eip1193::injected()?.request_json(method, Some(&params)).await
    }

    fn open_wallet_app(&self, connector: &Connector) {
        let Some(page) = dom::location_href() else {
            return;
        };
        let link = match connector.kind {
            ConnectorKind::Extension => dapp_deep_link(METAMASK_DEEP_LINK, &page),
            ConnectorKind::Injected | ConnectorKind::RemotePairing => return,
        };
        log::info!("Opening {} app", connector.name);
        dom::navigate(&link);
    }
}

/// Remember the connector used for this session.
fn save_session(connector_id: &str) {
    if let Some(storage) = dom::local_storage() {
        let _ = storage.set_item(WALLET_SESSION_KEY, connector_id);
    }
}

/// Clear login session from localStorage.
fn clear_session() {
    if let Some(storage) = dom::local_storage() {
        let _ = storage.remove_item(WALLET_SESSION_KEY);
    }
}
