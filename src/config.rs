//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.
//! The network list is loaded at compile time from `assets/chains.toml`
//! using `include_str!` and parsed on first use.

use std::sync::LazyLock;

use crate::core::error::ConfigError;
use crate::models::ChainRegistry;

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name displayed in the navigation bar.
pub const APP_NAME: &str = "Campus Ledger";

// =============================================================================
// Network Configuration
// =============================================================================

/// Chain registry source (TOML).
pub const CHAINS_TOML: &str = include_str!("../assets/chains.toml");

/// ENS lookups are aborted after this many milliseconds.
pub const FETCH_TIMEOUT_MS: u32 = 10000;

/// How long a network switch status message stays visible.
pub const NETWORK_STATUS_CLEAR_MS: u32 = 3000;

/// ENS reverse-resolution endpoint (address appended).
pub const ENS_RESOLVE_URL: &str = "https://api.ensideas.com/ens/resolve/";

// =============================================================================
// Wallet Configuration
// =============================================================================

/// localStorage key holding the id of the connector used for the last session.
pub const WALLET_SESSION_KEY: &str = "wallet_session";

/// Timeout for the silent `eth_accounts` check on page load.
pub const WALLET_TIMEOUT_MS: i32 = 2000;

/// Global under which the page exposes a remote-pairing EIP-1193 provider
/// (e.g. a WalletConnect `EthereumProvider` instance).
pub const PAIRING_PROVIDER_GLOBAL: &str = "walletConnectProvider";

/// Connector identifiers enumerated by the browser provider.
pub mod connectors {
    pub const INJECTED_ID: &str = "injected";
    pub const INJECTED_NAME: &str = "Browser Wallet";
    pub const METAMASK_ID: &str = "metaMask";
    pub const METAMASK_NAME: &str = "MetaMask";
    pub const WALLET_CONNECT_ID: &str = "walletConnect";
    pub const WALLET_CONNECT_NAME: &str = "WalletConnect";
}

/// MetaMask mobile deep link; the current host is appended so the dapp
/// opens inside the MetaMask in-app browser.
pub const METAMASK_DEEP_LINK: &str = "https://metamask.app.link/dapp/";

/// Ethereum address display constants.
pub mod eth_address {
    /// Full length of a hex address including `0x`.
    pub const FULL_LEN: usize = 42;
    /// Leading characters kept when shortening (`0x` + 4).
    pub const PREFIX_LEN: usize = 6;
    /// Index of the first trailing character kept.
    pub const SUFFIX_START: usize = 38;
}

// =============================================================================
// UI Configuration
// =============================================================================

/// Overlay (dropdown) layout constants, in CSS pixels.
pub mod overlay {
    /// Gap between the trigger and the dropdown.
    pub const MARGIN: f64 = 8.0;
    /// Height assumed for the network dropdown before it is measured.
    pub const NETWORK_MENU_HEIGHT: f64 = 280.0;
}

/// Viewport width under which the navigation bar switches to compact layout.
pub const COMPACT_MEDIA_QUERY: &str = "(max-width: 768px)";

/// Icon theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(dead_code)]
pub enum IconTheme {
    #[default]
    Bootstrap,
    Lucide,
}

/// Current icon theme used throughout the application.
pub const ICON_THEME: IconTheme = IconTheme::Bootstrap;

// =============================================================================
// Chain Registry
// =============================================================================

static CHAINS: LazyLock<Result<ChainRegistry, ConfigError>> =
    LazyLock::new(|| ChainRegistry::from_toml(CHAINS_TOML));

/// Get the configured chain registry.
///
/// The registry is parsed once; a malformed `chains.toml` is reported on
/// every call rather than panicking so the app can still render an error.
pub fn configured_chains() -> Result<&'static ChainRegistry, ConfigError> {
    CHAINS.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_chains_parse() {
        let registry = configured_chains().expect("bundled chains.toml must parse");
        assert_eq!(registry.preferred_chain_id(), 656476);
        assert!(registry.get(656476).is_some());
        assert!(registry.get(137).is_some());
    }

    #[test]
    fn test_preferred_chain_listed_first() {
        let registry = configured_chains().unwrap();
        assert_eq!(registry.chains()[0].id, registry.preferred_chain_id());
    }
}
