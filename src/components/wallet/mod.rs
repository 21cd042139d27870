//! Wallet button and connector menu.

use leptos::html::Div;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::use_wallet;
use crate::components::icons as ic;
use crate::components::overlay::use_overlay;
use crate::core::overlay::Placement;
use crate::models::{ConnectionStatus, ConnectorKind};

stylance::import_crate_style!(css, "src/components/wallet/wallet.module.css");

/// Approximate connector menu height before it is measured.
const MENU_HEIGHT: f64 = 220.0;

#[component]
pub fn WalletButton(#[prop(optional)] compact: bool) -> impl IntoView {
    let wallet = use_wallet();
    let trigger = NodeRef::<Div>::new();
    let panel = NodeRef::<Div>::new();
    let open = wallet.connector_menu_open;

    let placement = use_overlay(
        trigger,
        panel,
        open.into(),
        move || wallet.close_connector_menu(),
        MENU_HEIGHT,
    );

    let status = move || wallet.connection.with(|c| c.status);
    let toggle = move |_| {
        if open.get_untracked() {
            wallet.close_connector_menu();
        } else {
            wallet.open_connector_menu();
        }
    };

    view! {
        <div class=css::wallet node_ref=trigger>
            <button
                class=move || match status() {
                    ConnectionStatus::Connected => css::button_connected,
                    _ => css::button,
                }
                disabled=move || status() == ConnectionStatus::Connecting
                on:click=toggle
            >
                <Icon icon=ic::WALLET />
                <Show when=move || !compact || status() == ConnectionStatus::Connected>
                    <span class=css::label>{move || wallet.display_name()}</span>
                </Show>
            </button>

            <Show when=move || open.get()>
                <div
                    node_ref=panel
                    class=move || match placement.get() {
                        Placement::Below => css::menu_below,
                        Placement::Above => css::menu_above,
                    }
                >
                    {move || match status() {
                        ConnectionStatus::Connected => view! { <AccountPanel /> }.into_any(),
                        _ => view! { <ConnectorList /> }.into_any(),
                    }}
                </div>
            </Show>
        </div>
    }
}

/// Connected account details with a disconnect action.
#[component]
fn AccountPanel() -> impl IntoView {
    let wallet = use_wallet();
    let address = move || {
        wallet
            .connection
            .with(|c| c.checksum_address())
            .unwrap_or_default()
    };
    let network = move || wallet.chain_name().unwrap_or_else(|| "Unknown network".to_string());

    view! {
        <div class=css::account>
            <Show when=move || wallet.ens_name.with(|n| n.is_some())>
                <div class=css::ens>{move || wallet.ens_name.get()}</div>
            </Show>
            <div class=css::address title=address>{address}</div>
            <div class=css::network>{network}</div>
        </div>
        <button class=css::item on:click=move |_| wallet.disconnect()>
            <Icon icon=ic::LOGOUT />
            <span>"Disconnect"</span>
        </button>
    }
}

/// Available connectors with readiness; not-ready entries are disabled
/// unless selecting them opens the wallet app.
#[component]
fn ConnectorList() -> impl IntoView {
    let wallet = use_wallet();
    let options = wallet.connector_options();
    let is_empty = options.is_empty();

    view! {
        <div class=css::heading>"Connect a wallet"</div>
        {options
            .into_iter()
            .map(|option| {
                let id = option.connector.id.clone();
                let kind = option.connector.kind;
                // A missing extension on mobile still opens its app.
                let selectable = option.ready || kind == ConnectorKind::Extension;
                let hint = match (option.ready, kind) {
                    (true, _) => None,
                    (false, ConnectorKind::Extension) => Some("Open app"),
                    (false, _) => Some("Not installed"),
                };
                view! {
                    <button
                        class=if option.ready { css::item } else { css::item_unready }
                        disabled=!selectable
                        on:click=move |_| wallet.connect(id.clone())
                    >
                        {match kind {
                            ConnectorKind::RemotePairing => view! { <Icon icon=ic::PAIRING /> }.into_any(),
                            ConnectorKind::Extension if !option.ready => view! { <Icon icon=ic::MOBILE /> }.into_any(),
                            _ => view! { <Icon icon=ic::WALLET /> }.into_any(),
                        }}
                        <span>{option.connector.name.clone()}</span>
                        {hint.map(|h| view! { <span class=css::hint>{h}</span> })}
                    </button>
                }
            })
            .collect::<Vec<_>>()}
        {is_empty.then(|| view! {
            <div class=css::error>"No wallet found. Install MetaMask or use WalletConnect."</div>
        })}
        <Show when=move || wallet.connect_error.with(|e| e.is_some())>
            <div class=css::error>{move || wallet.connect_error.get()}</div>
        </Show>
        <Show when=move || wallet.connection.with(|c| c.is_connecting())>
            <div class=css::hint>"Confirm the request in your wallet..."</div>
        </Show>
    }
}
