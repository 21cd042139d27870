//! Network switch status toast.
//!
//! Shows the current [`NetworkSwitchStatus`](crate::models::NetworkSwitchStatus)
//! while one is published. The manager clears it after the display window.

use leptos::prelude::*;
use leptos_icons::Icon;

use crate::app::use_wallet;
use crate::components::icons as ic;

stylance::import_crate_style!(css, "src/components/status/status.module.css");

#[component]
pub fn NetworkStatusToast() -> impl IntoView {
    let wallet = use_wallet();
    let status = wallet.status;

    view! {
        <Show when=move || status.with(|s| s.is_some())>
            <div
                role="status"
                aria-live="polite"
                class=move || {
                    if status.with(|s| s.as_ref().is_some_and(|s| s.is_error)) {
                        css::toast_error
                    } else {
                        css::toast
                    }
                }
            >
                {move || if wallet.switching.get() {
                    view! { <span class=css::spinner></span> }.into_any()
                } else if status.with(|s| s.as_ref().is_some_and(|s| s.is_error)) {
                    view! { <Icon icon=ic::WARNING /> }.into_any()
                } else {
                    view! { <Icon icon=ic::CHECK /> }.into_any()
                }}
                <span class=css::message>
                    {move || status.with(|s| s.as_ref().map(|s| s.message.clone()))}
                </span>
            </div>
        </Show>
    }
}
