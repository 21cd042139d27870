//! Navigation bar.
//!
//! Hosts the network selector and wallet button. Below the compact
//! breakpoint labels collapse to icons.
//!
//! | Breakpoint | Display |
//! |------------|---------|
//! | Desktop (> 768px) | `Campus Ledger  [EDU Chain Testnet v] [0x1234...5678]` |
//! | Mobile (<= 768px) | `Campus Ledger  [globe v] [0x1234...5678]` |

use leptos::prelude::*;
use leptos_use::use_media_query;

use crate::components::network::NetworkSelector;
use crate::components::wallet::WalletButton;
use crate::config::{APP_NAME, COMPACT_MEDIA_QUERY};

stylance::import_crate_style!(css, "src/components/navbar/navbar.module.css");

#[component]
pub fn NavBar() -> impl IntoView {
    let compact = use_media_query(COMPACT_MEDIA_QUERY);

    view! {
        <header class=css::bar>
            <span class=css::brand>{APP_NAME}</span>
            <nav class=css::actions>
                {move || {
                    let compact = compact.get();
                    view! {
                        <NetworkSelector compact=compact />
                        <WalletButton compact=compact />
                    }
                }}
            </nav>
        </header>
    }
}
