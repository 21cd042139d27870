//! Wallet connectors and the readiness rules deciding which are offered.

/// How a connector reaches the wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectorKind {
    /// Generic `window.ethereum`, whichever extension injected it.
    Injected,
    /// A specific browser extension wallet (MetaMask) with a mobile app.
    Extension,
    /// Pairs with a wallet on another device (QR code).
    RemotePairing,
}

/// A method of connecting a wallet, as enumerated by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connector {
    pub id: String,
    pub name: String,
    pub kind: ConnectorKind,
}

impl Connector {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ConnectorKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Browser facts the readiness rules depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Environment {
    /// Mobile user agent.
    pub mobile: bool,
    /// `window.ethereum` exists.
    pub injected: bool,
    /// The named extension wallet is detectable (`window.ethereum.isMetaMask`).
    pub extension_detected: bool,
}

#[cfg(any(test, feature = "mock"))]
impl Environment {
    pub fn desktop(injected: bool) -> Self {
        Self {
            mobile: false,
            injected,
            extension_detected: injected,
        }
    }

    pub fn mobile(extension_detected: bool) -> Self {
        Self {
            mobile: true,
            injected: extension_detected,
            extension_detected,
        }
    }
}

/// Readiness of `kind` in `env`. `None` means the connector is hidden.
pub fn readiness(kind: ConnectorKind, env: &Environment) -> Option<bool> {
    match (env.mobile, kind) {
        (true, ConnectorKind::Injected) => None,
        (true, ConnectorKind::Extension) => Some(env.extension_detected),
        (false, ConnectorKind::Injected) => Some(env.injected),
        (_, _) => Some(true),
    }
}

/// A connector as presented in the connect menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorOption {
    pub connector: Connector,
    pub ready: bool,
}

/// Connectors to show, in provider order, with their readiness.
pub fn present_connectors(connectors: &[Connector], env: &Environment) -> Vec<ConnectorOption> {
    connectors
        .iter()
        .filter_map(|c| {
            readiness(c.kind, env).map(|ready| ConnectorOption {
                connector: c.clone(),
                ready,
            })
        })
        .collect()
}

/// Detect a mobile browser from its user agent string.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    use regex::Regex;
    use std::sync::LazyLock;

    static MOBILE_UA: LazyLock<Option<Regex>> = LazyLock::new(|| {
        Regex::new(r"android|webos|iphone|ipad|ipod|blackberry|iemobile|opera mini").ok()
    });

    MOBILE_UA
        .as_ref()
        .is_some_and(|re| re.is_match(&user_agent.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_connectors() -> Vec<Connector> {
        vec![
            Connector::new("injected", "Browser Wallet", ConnectorKind::Injected),
            Connector::new("metaMask", "MetaMask", ConnectorKind::Extension),
            Connector::new("walletConnect", "WalletConnect", ConnectorKind::RemotePairing),
        ]
    }

    #[test]
    fn test_desktop_injected_requires_wallet() {
        assert_eq!(readiness(ConnectorKind::Injected, &Environment::desktop(false)), Some(false));
        assert_eq!(readiness(ConnectorKind::Injected, &Environment::desktop(true)), Some(true));
    }

    #[test]
    fn test_desktop_other_kinds_always_ready() {
        let env = Environment::desktop(false);
        assert_eq!(readiness(ConnectorKind::Extension, &env), Some(true));
        assert_eq!(readiness(ConnectorKind::RemotePairing, &env), Some(true));
    }

    #[test]
    fn test_mobile_hides_injected() {
        assert_eq!(readiness(ConnectorKind::Injected, &Environment::mobile(true)), None);
        assert_eq!(readiness(ConnectorKind::Injected, &Environment::mobile(false)), None);
    }

    #[test]
    fn test_mobile_extension_depends_on_detection() {
        assert_eq!(readiness(ConnectorKind::Extension, &Environment::mobile(false)), Some(false));
        assert_eq!(readiness(ConnectorKind::Extension, &Environment::mobile(true)), Some(true));
        assert_eq!(readiness(ConnectorKind::RemotePairing, &Environment::mobile(false)), Some(true));
    }

    #[test]
    fn test_present_connectors_mobile() {
        let options = present_connectors(&all_connectors(), &Environment::mobile(false));
        let ids: Vec<_> = options.iter().map(|o| (o.connector.id.as_str(), o.ready)).collect();
        assert_eq!(ids, vec![("metaMask", false), ("walletConnect", true)]);
    }

    #[test]
    fn test_present_connectors_desktop_without_wallet() {
        let options = present_connectors(&all_connectors(), &Environment::desktop(false));
        assert_eq!(options.len(), 3);
        assert!(!options[0].ready);
    }

    #[test]
    fn test_mobile_user_agent() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; Android 14; Pixel 8)"));
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/126.0"
        ));
    }
}
