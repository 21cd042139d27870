//! UI components built with Leptos.
//!
//! - [`navbar`] - Top bar hosting the wallet controls
//! - [`network`] - Network selector and wrong-network prompt
//! - [`wallet`] - Wallet button and connector menu
//! - [`status`] - Network switch status toast
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod icons;
pub mod navbar;
pub mod network;
mod overlay;
pub mod status;
pub mod wallet;

pub use navbar::NavBar;
pub use network::WrongNetworkPrompt;
pub use status::NetworkStatusToast;
