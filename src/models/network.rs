/// Transient feedback for a network switch attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkSwitchStatus {
    pub message: String,
    pub is_error: bool,
}

impl NetworkSwitchStatus {
    pub fn pending(chain_name: &str) -> Self {
        Self::info(format!("Switching to {}...", chain_name))
    }

    pub fn success(chain_name: &str) -> Self {
        Self::info(format!("Successfully switched to {}", chain_name))
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Result of a `switch_network` call that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Already on the target chain, or another switch is in flight.
    Skipped,
    /// The wallet is now on the target chain.
    Switched,
    /// The unknown chain was registered with `wallet_addEthereumChain` first.
    AddedAndSwitched,
    /// Handed off to the wallet app through a deep link.
    DeepLinked,
}

/// Result of a `connect` call that did not fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    /// Wallet app opened through a deep link; no session yet.
    DeepLinked,
    /// The session was reset (disconnect) before the wallet answered.
    Abandoned,
}

/// Wrong-network prompt bookkeeping.
///
/// `dismissed_on` remembers the chain the user chose to stay on so the
/// prompt only comes back after the chain changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WrongNetworkPrompt {
    pub visible: bool,
    pub dismissed_on: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_constructors() {
        let pending = NetworkSwitchStatus::pending("Polygon");
        assert_eq!(pending.message, "Switching to Polygon...");
        assert!(!pending.is_error);

        let done = NetworkSwitchStatus::success("Polygon");
        assert!(done.message.contains("Successfully switched"));

        assert!(NetworkSwitchStatus::error("boom").is_error);
    }
}
