//! Data models and types for the application.
//!
//! Contains domain types for:
//! - [`ChainDescriptor`], [`ChainRegistry`] - Configured networks
//! - [`ConnectionState`], [`ConnectionStatus`] - Wallet connection state
//! - [`Connector`], [`ConnectorKind`], [`Environment`] - Connectors and their readiness
//! - [`NetworkSwitchStatus`], [`SwitchOutcome`] - Network switch feedback

mod chain;
mod connection;
mod connector;
mod network;

#[cfg(test)]
pub(crate) use chain::test_chain;
pub use chain::{ChainDescriptor, ChainRegistry, parse_chain_id, to_hex_chain_id};
pub use connection::{ConnectionState, ConnectionStatus};
pub use connector::{
    Connector, ConnectorKind, ConnectorOption, Environment, is_mobile_user_agent,
    present_connectors, readiness,
};
pub use network::{ConnectOutcome, NetworkSwitchStatus, SwitchOutcome, WrongNetworkPrompt};
