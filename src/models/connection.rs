use alloy_primitives::Address;

use crate::config::eth_address;

/// Wallet connection lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Wallet connection state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    pub address: Option<Address>,
    pub active_connector_id: Option<String>,
    pub chain_id: Option<u64>,
}

impl ConnectionState {
    /// A fully established session.
    pub fn connected(address: Address, connector_id: impl Into<String>, chain_id: Option<u64>) -> Self {
        Self {
            status: ConnectionStatus::Connected,
            address: Some(address),
            active_connector_id: Some(connector_id.into()),
            chain_id,
        }
    }

    /// A connection request in flight on `connector_id`.
    pub fn connecting(connector_id: impl Into<String>) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            active_connector_id: Some(connector_id.into()),
            ..Self::default()
        }
    }

    /// Check if wallet is connected
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    pub fn is_connecting(&self) -> bool {
        self.status == ConnectionStatus::Connecting
    }

    /// EIP-55 checksummed address, if connected.
    pub fn checksum_address(&self) -> Option<String> {
        self.address.map(|a| a.to_checksum(None))
    }

    /// Format address for display (0x1234...5678)
    pub fn short_address(&self) -> Option<String> {
        self.checksum_address().map(|address| shorten_address(&address))
    }

    /// Label for the wallet button.
    pub fn display_name(&self) -> String {
        match self.status {
            ConnectionStatus::Connected => self
                .short_address()
                .unwrap_or_else(|| "connected".to_string()),
            ConnectionStatus::Connecting => "connecting...".to_string(),
            ConnectionStatus::Disconnected => "Connect Wallet".to_string(),
        }
    }
}

/// Shorten a hex address to `0x1234...5678`; shorter strings pass through.
pub fn shorten_address(address: &str) -> String {
    if address.len() >= eth_address::FULL_LEN && address.is_ascii() {
        format!(
            "{}...{}",
            &address[..eth_address::PREFIX_LEN],
            &address[eth_address::SUFFIX_START..]
        )
    } else {
        address.to_string()
    }
}
