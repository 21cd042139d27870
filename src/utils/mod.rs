//! Utility modules for web and DOM operations.
//!
//! Provides:
//! - [`dom`] - Window, storage, navigation and geometry accessors
//! - [`fetch_json`] - JSON lookups with an abort deadline
//! - [`dapp_deep_link`] - Wallet app deep links

pub mod dom;
mod fetch;
mod url;

pub use fetch::fetch_json;
pub use url::dapp_deep_link;
