//! Network selection UI.
//!
//! - [`NetworkSelector`] - Dropdown listing configured chains
//! - [`WrongNetworkPrompt`] - Blocking prompt shown off the preferred chain

use leptos::html::Div;
use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::use_wallet;
use crate::components::icons as ic;
use crate::components::overlay::use_overlay;
use crate::config::overlay::NETWORK_MENU_HEIGHT;
use crate::core::overlay::Placement;

stylance::import_crate_style!(css, "src/components/network/network.module.css");

/// Dropdown for switching networks.
///
/// Opens above the trigger when there is not enough room below, and
/// closes on outside clicks. Entries are disabled while a switch is in
/// flight.
#[component]
pub fn NetworkSelector(#[prop(optional)] compact: bool) -> impl IntoView {
    let wallet = use_wallet();
    let trigger = NodeRef::<Div>::new();
    let panel = NodeRef::<Div>::new();
    let open = wallet.network_selector_open;

    let placement = use_overlay(
        trigger,
        panel,
        open.into(),
        move || wallet.close_network_selector(),
        NETWORK_MENU_HEIGHT,
    );

    let label = move || {
        wallet
            .chain_name()
            .unwrap_or_else(|| "Select network".to_string())
    };
    let wrong_chain = move || wallet.prompt_visible.get();
    let current = move || wallet.connection.with(|c| c.chain_id);
    let chains = wallet.chains();

    view! {
        <div class=css::selector node_ref=trigger>
            <button
                class=move || if wrong_chain() { css::trigger_warning } else { css::trigger }
                disabled=move || wallet.switching.get()
                on:click=move |_| wallet.toggle_network_selector()
                title="Switch network"
            >
                {move || if wrong_chain() {
                    view! { <Icon icon=ic::WARNING /> }.into_any()
                } else {
                    view! { <Icon icon=ic::NETWORK /> }.into_any()
                }}
                <Show when=move || !compact>
                    <span class=css::label>{label}</span>
                </Show>
                <Icon icon=ic::CHEVRON_DOWN />
            </button>

            <Show when=move || open.get()>
                <div
                    node_ref=panel
                    class=move || match placement.get() {
                        Placement::Below => css::menu_below,
                        Placement::Above => css::menu_above,
                    }
                >
                    {chains
                        .iter()
                        .map(|chain| {
                            let id = chain.id;
                            let name = chain.name.clone();
                            let symbol = chain.native_currency.symbol.clone();
                            let active = move || current() == Some(id);
                            view! {
                                <button
                                    class=move || if active() { css::item_active } else { css::item }
                                    disabled=move || wallet.switching.get() || active()
                                    on:click=move |_| wallet.switch_network(id)
                                >
                                    <span class=css::item_name>{name}</span>
                                    <span class=css::item_symbol>{symbol}</span>
                                    <Show when=active>
                                        <Icon icon=ic::CHECK />
                                    </Show>
                                </button>
                            }
                        })
                        .collect::<Vec<_>>()}
                </div>
            </Show>
        </div>
    }
}

/// Modal asking the user to move to the preferred chain.
///
/// "Switch now" starts a switch; "Continue anyway" hides the prompt until
/// the chain changes again.
#[component]
pub fn WrongNetworkPrompt() -> impl IntoView {
    let wallet = use_wallet();
    let preferred = wallet.preferred_chain().name;
    let current = move || {
        wallet
            .chain_name()
            .unwrap_or_else(|| "an unsupported network".to_string())
    };

    view! {
        <Show when=move || wallet.prompt_visible.get()>
            <div class=css::backdrop role="dialog" aria-modal="true">
                <div class=css::dialog>
                    <div class=css::dialog_icon><Icon icon=ic::WARNING /></div>
                    <h2 class=css::dialog_title>"Wrong network"</h2>
                    <p class=css::dialog_text>
                        "Your wallet is connected to " {current} ". "
                        "The school contracts live on " {preferred.clone()} "."
                    </p>
                    <div class=css::dialog_actions>
                        <button
                            class=css::primary
                            disabled=move || wallet.switching.get()
                            on:click=move |_| wallet.switch_to_preferred()
                        >
                            {move || if wallet.switching.get() { "Switching..." } else { "Switch now" }}
                        </button>
                        <button
                            class=css::secondary
                            on:click=move |_| wallet.dismiss_wrong_network()
                        >
                            "Continue anyway"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
