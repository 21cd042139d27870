//! Core wallet logic.
//!
//! This module provides:
//! - [`WalletManager`] connection state machine and network switching
//! - [`WalletProvider`] capability seam, with [`BrowserProvider`] for the
//!   browser and `MockProvider` for tests
//! - [`overlay`] dropdown placement geometry

pub mod browser;
pub mod eip1193;
pub mod ens;
pub mod error;
mod manager;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod overlay;
mod provider;

pub use browser::BrowserProvider;
pub use manager::WalletManager;
pub use provider::WalletProvider;
