//! Root application module.
//!
//! Contains the main App component and the [`WalletContext`] through which
//! every component reaches the wallet: reactive state mirrored from the
//! [`WalletManager`] plus typed action callbacks.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::{NavBar, NetworkStatusToast, WrongNetworkPrompt};
use crate::config::{self, APP_NAME, NETWORK_STATUS_CLEAR_MS};
use crate::core::eip1193::EventSubscription;
use crate::core::ens::resolve_ens;
use crate::core::{BrowserProvider, WalletManager};
use crate::models::{
    ChainDescriptor, ChainRegistry, ConnectOutcome, ConnectionState, ConnectorOption,
    NetworkSwitchStatus, SwitchOutcome,
};

type Manager = WalletManager<BrowserProvider>;

fn set_if_changed<T>(signal: RwSignal<T>, value: T)
where
    T: PartialEq + Send + Sync + 'static,
{
    if signal.with_untracked(|current| current != &value) {
        signal.set(value);
    }
}

// ============================================================================
// WalletContext
// ============================================================================

/// Application-wide wallet context.
///
/// Provided at the root of the component tree; accessed with
/// `use_context::<WalletContext>()`. All fields are signals or stored
/// values, so the struct is `Copy`.
#[derive(Clone, Copy)]
pub struct WalletContext {
    /// Connection status, address, active connector and chain.
    pub connection: RwSignal<ConnectionState>,
    /// Primary ENS name of the connected address.
    pub ens_name: RwSignal<Option<String>>,
    /// Last connection failure, shown inline in the connector menu.
    pub connect_error: RwSignal<Option<String>>,
    /// A network switch is in flight; switch triggers are disabled.
    pub switching: RwSignal<bool>,
    /// Network switch feedback (auto-cleared).
    pub status: RwSignal<Option<NetworkSwitchStatus>>,
    /// Wrong-network prompt visibility.
    pub prompt_visible: RwSignal<bool>,
    /// Network selector dropdown visibility.
    pub network_selector_open: RwSignal<bool>,
    /// Connector menu visibility.
    pub connector_menu_open: RwSignal<bool>,
    manager: StoredValue<Rc<Manager>, LocalStorage>,
    subscriptions: StoredValue<Vec<EventSubscription>, LocalStorage>,
}

impl WalletContext {
    /// Creates the context around a fresh browser-backed manager.
    pub fn new(chains: ChainRegistry) -> Self {
        let manager = Rc::new(WalletManager::new(BrowserProvider::new(), chains));
        let initial = manager.connection();

        let ctx = Self {
            connection: RwSignal::new(initial),
            ens_name: RwSignal::new(None),
            connect_error: RwSignal::new(None),
            switching: RwSignal::new(false),
            status: RwSignal::new(None),
            prompt_visible: RwSignal::new(manager.is_prompt_visible()),
            network_selector_open: RwSignal::new(false),
            connector_menu_open: RwSignal::new(false),
            manager: StoredValue::new_local(manager.clone()),
            subscriptions: StoredValue::new_local(Vec::new()),
        };

        let weak = Rc::downgrade(&manager);
        manager.set_listener(move || {
            if let Some(manager) = weak.upgrade() {
                ctx.sync(&manager);
            }
        });
        ctx
    }

    fn manager(&self) -> Rc<Manager> {
        self.manager.get_value()
    }

    /// Mirror manager state into signals.
    fn sync(&self, manager: &Manager) {
        let connection = manager.connection();
        let address_changed = self
            .connection
            .with_untracked(|c| c.address != connection.address);
        let address = connection.checksum_address();

        set_if_changed(self.connection, connection);
        set_if_changed(self.connect_error, manager.connect_error());
        set_if_changed(self.switching, manager.is_network_switching());
        set_if_changed(self.status, manager.status());
        set_if_changed(self.prompt_visible, manager.is_prompt_visible());
        set_if_changed(self.network_selector_open, manager.is_network_selector_open());

        if address_changed {
            self.ens_name.set(None);
            if let Some(address) = address {
                self.lookup_ens(address);
            }
        }
    }

    fn lookup_ens(&self, address: String) {
        let ctx = *self;
        spawn_local(async move {
            let name = resolve_ens(&address).await;
            // Ignore answers for an address that is no longer connected.
            if ctx.connection.with_untracked(|c| c.checksum_address()) == Some(address) {
                ctx.ens_name.set(name);
            }
        });
    }

    /// Restore a persisted session and start listening to wallet events.
    pub fn start(&self) {
        let ctx = *self;
        let manager = self.manager();

        let on_accounts = {
            let manager = Rc::downgrade(&manager);
            move |account: Option<String>| {
                if let Some(m) = manager.upgrade() {
                    m.on_accounts_changed(account);
                }
            }
        };
        let on_chain = {
            let manager = Rc::downgrade(&manager);
            move |chain_id: u64| {
                if let Some(m) = manager.upgrade() {
                    m.on_chain_changed(chain_id);
                }
            }
        };
        let subscriptions = manager.provider().subscribe(on_accounts, on_chain);
        self.subscriptions.set_value(subscriptions);

        on_cleanup(move || ctx.subscriptions.update_value(|subs| subs.clear()));

        spawn_local(async move {
            manager.restore().await;
        });
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Connectors to offer right now (recomputed per call).
    pub fn connector_options(&self) -> Vec<ConnectorOption> {
        self.manager().connector_options()
    }

    pub fn chains(&self) -> Vec<ChainDescriptor> {
        self.manager().chains().chains().to_vec()
    }

    pub fn preferred_chain(&self) -> ChainDescriptor {
        self.manager().chains().preferred().clone()
    }

    /// Name of the wallet's current chain (reactive).
    pub fn chain_name(&self) -> Option<String> {
        let manager = self.manager();
        self.connection
            .with(|c| c.chain_id)
            .map(|id| manager.chains().name_of(id))
    }

    /// Label for the wallet button (reactive).
    pub fn display_name(&self) -> String {
        self.ens_name
            .get()
            .filter(|_| self.connection.with(|c| c.is_connected()))
            .unwrap_or_else(|| self.connection.with(|c| c.display_name()))
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    pub fn connect(&self, connector_id: String) {
        let ctx = *self;
        let manager = self.manager();
        spawn_local(async move {
            match manager.connect(&connector_id).await {
                Ok(ConnectOutcome::Connected) => ctx.connector_menu_open.set(false),
                Ok(_) => {}
                Err(e) => ctx.connect_error.set(Some(e.to_string())),
            }
        });
    }

    pub fn disconnect(&self) {
        self.connector_menu_open.set(false);
        let manager = self.manager();
        spawn_local(async move {
            manager.disconnect().await;
        });
    }

    pub fn open_connector_menu(&self) {
        self.manager().clear_connect_error();
        self.connect_error.set(None);
        self.connector_menu_open.set(true);
    }

    pub fn close_connector_menu(&self) {
        self.connector_menu_open.set(false);
    }

    pub fn toggle_network_selector(&self) {
        self.manager().toggle_network_selector();
    }

    pub fn close_network_selector(&self) {
        self.manager().set_network_selector_open(false);
    }

    /// Switch to the configured chain with id `chain_id`.
    pub fn switch_network(&self, chain_id: u64) {
        let manager = self.manager();
        let Some(target) = manager.chains().get(chain_id).cloned() else {
            log::warn!("Ignoring switch to unconfigured chain {}", chain_id);
            return;
        };
        spawn_local(async move {
            let outcome = manager.switch_network(&target).await;
            expire_status_later(&manager, outcome).await;
        });
    }

    /// "Switch now" from the wrong-network prompt.
    pub fn switch_to_preferred(&self) {
        let manager = self.manager();
        spawn_local(async move {
            let outcome = manager.switch_to_preferred().await;
            expire_status_later(&manager, outcome).await;
        });
    }

    /// "Continue anyway" from the wrong-network prompt.
    pub fn dismiss_wrong_network(&self) {
        self.manager().dismiss_wrong_network();
    }
}

/// Clear the status message published by a finished switch after the
/// display window.
async fn expire_status_later<E>(manager: &Manager, outcome: Result<SwitchOutcome, E>) {
    if matches!(outcome, Ok(SwitchOutcome::Skipped)) {
        return;
    }
    let generation = manager.status_generation();
    TimeoutFuture::new(NETWORK_STATUS_CLEAR_MS).await;
    manager.expire_status(generation);
}

/// Look up the wallet context.
pub fn use_wallet() -> WalletContext {
    expect_context::<WalletContext>()
}

// ============================================================================
// App
// ============================================================================

/// Root application component.
///
/// This component:
/// - Loads the chain registry and provides the [`WalletContext`]
/// - Renders the navigation bar, wrong-network prompt and status toast
/// - Shows a configuration error screen if the registry cannot be loaded
#[component]
pub fn App() -> impl IntoView {
    let chains = match config::configured_chains() {
        Ok(chains) => chains.clone(),
        Err(e) => {
            log::error!("{}", e);
            return view! { <ConfigErrorView message=e.to_string() /> }.into_any();
        }
    };

    let ctx = WalletContext::new(chains);
    provide_context(ctx);
    ctx.start();

    let headline = move || {
        if ctx.connection.with(|c| c.is_connected()) {
            format!("Welcome to {}", APP_NAME)
        } else {
            "Connect your wallet to open the dashboard".to_string()
        }
    };

    view! {
        <NavBar />
        <main style="padding: 2rem; font-family: system-ui, sans-serif;">
            <h1>{headline}</h1>
        </main>
        <WrongNetworkPrompt />
        <NetworkStatusToast />
    }
    .into_any()
}

#[component]
fn ConfigErrorView(message: String) -> impl IntoView {
    view! {
        <div style="
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
            height: 100vh;
            padding: 2rem;
            background: #0a0e27;
            color: #e0e0e0;
            font-family: system-ui, sans-serif;
        ">
            <h1 style="color: #ff6b6b; margin-bottom: 1rem;">"Network configuration error"</h1>
            <p style="color: #a0a0a0; max-width: 600px; text-align: center;">{message}</p>
            <button
                on:click=move |_| {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().reload();
                    }
                }
                style="
                    background: #4a90e2;
                    color: white;
                    border: none;
                    padding: 0.75rem 2rem;
                    border-radius: 4px;
                    cursor: pointer;
                    margin-top: 1rem;
                "
            >
                "Reload Page"
            </button>
        </div>
    }
}
