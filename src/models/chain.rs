//! Static network descriptions and the EIP-3085 payload built from them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// Native currency of a chain, as wallets display it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A network the dashboard can switch to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChainDescriptor {
    pub id: u64,
    pub name: String,
    pub native_currency: NativeCurrency,
    /// Ordered; wallets try the first entry first.
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub block_explorer_url: Option<String>,
}

impl ChainDescriptor {
    /// Chain id as the `0x`-prefixed hex quantity EIP-1193 methods expect.
    pub fn hex_id(&self) -> String {
        to_hex_chain_id(self.id)
    }

    /// Parameters for a `wallet_addEthereumChain` request.
    pub fn add_chain_params(&self) -> AddChainParams {
        AddChainParams {
            chain_id: self.hex_id(),
            chain_name: self.name.clone(),
            native_currency: self.native_currency.clone(),
            rpc_urls: self.rpc_urls.clone(),
            block_explorer_urls: self.block_explorer_url.clone().map(|url| vec![url]),
        }
    }
}

/// EIP-3085 `wallet_addEthereumChain` parameter object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_explorer_urls: Option<Vec<String>>,
}

/// Encode a chain id as a hex quantity (`137` -> `"0x89"`).
pub fn to_hex_chain_id(id: u64) -> String {
    format!("{:#x}", id)
}

/// Decode a hex quantity chain id (`"0x89"` -> `137`).
///
/// Some wallets report decimal strings; those are accepted too.
pub fn parse_chain_id(value: &str) -> Option<u64> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

// ============================================================================
// ChainRegistry
// ============================================================================

#[derive(Deserialize)]
struct RegistryFile {
    preferred_chain_id: u64,
    chains: Vec<ChainDescriptor>,
}

/// Ordered list of configured networks plus the preferred one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: Vec<ChainDescriptor>,
    preferred_chain_id: u64,
}

impl ChainRegistry {
    /// Build a registry, validating ids and endpoints.
    pub fn new(chains: Vec<ChainDescriptor>, preferred_chain_id: u64) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for chain in &chains {
            if !seen.insert(chain.id) {
                return Err(ConfigError::DuplicateChain(chain.id));
            }
            if chain.rpc_urls.is_empty() {
                return Err(ConfigError::MissingRpcUrl(chain.id));
            }
        }
        if !seen.contains(&preferred_chain_id) {
            return Err(ConfigError::UnknownPreferredChain(preferred_chain_id));
        }
        Ok(Self {
            chains,
            preferred_chain_id,
        })
    }

    /// Parse a registry from its TOML representation.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let file: RegistryFile =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.message().to_string()))?;
        Self::new(file.chains, file.preferred_chain_id)
    }

    pub fn chains(&self) -> &[ChainDescriptor] {
        &self.chains
    }

    pub fn get(&self, id: u64) -> Option<&ChainDescriptor> {
        self.chains.iter().find(|c| c.id == id)
    }

    pub fn preferred_chain_id(&self) -> u64 {
        self.preferred_chain_id
    }

    pub fn preferred(&self) -> &ChainDescriptor {
        // Presence is checked in `new`.
        self.get(self.preferred_chain_id)
            .unwrap_or(&self.chains[0])
    }

    /// Display name for a chain id, falling back to the raw id.
    pub fn name_of(&self, id: u64) -> String {
        self.get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Chain {}", id))
    }
}

#[cfg(test)]
pub(crate) fn test_chain(id: u64, name: &str) -> ChainDescriptor {
    ChainDescriptor {
        id,
        name: name.to_string(),
        native_currency: NativeCurrency {
            name: "Ether".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        },
        rpc_urls: vec![format!("https://rpc.{}.example", id)],
        block_explorer_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_chain_id() {
        assert_eq!(to_hex_chain_id(137), "0x89");
        assert_eq!(to_hex_chain_id(1), "0x1");
        assert_eq!(to_hex_chain_id(656476), "0xa045c");
    }

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id("0x89"), Some(137));
        assert_eq!(parse_chain_id("0xA045C"), Some(656476));
        assert_eq!(parse_chain_id("137"), Some(137));
        assert_eq!(parse_chain_id("0xzz"), None);
        assert_eq!(parse_chain_id(""), None);
    }

    #[test]
    fn test_add_chain_params_shape() {
        let mut chain = test_chain(137, "Polygon");
        chain.block_explorer_url = Some("https://polygonscan.com".to_string());

        let json = serde_json::to_value(chain.add_chain_params()).unwrap();
        assert_eq!(json["chainId"], "0x89");
        assert_eq!(json["chainName"], "Polygon");
        assert_eq!(json["nativeCurrency"]["decimals"], 18);
        assert_eq!(json["rpcUrls"][0], "https://rpc.137.example");
        assert_eq!(json["blockExplorerUrls"][0], "https://polygonscan.com");
    }

    #[test]
    fn test_add_chain_params_omit_missing_explorer() {
        let json = serde_json::to_value(test_chain(1, "Ethereum").add_chain_params()).unwrap();
        assert!(json.get("blockExplorerUrls").is_none());
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let chains = vec![test_chain(1, "a"), test_chain(1, "b")];
        assert_eq!(
            ChainRegistry::new(chains, 1),
            Err(ConfigError::DuplicateChain(1))
        );
    }

    #[test]
    fn test_registry_rejects_unknown_preferred() {
        let chains = vec![test_chain(1, "a")];
        assert_eq!(
            ChainRegistry::new(chains, 5),
            Err(ConfigError::UnknownPreferredChain(5))
        );
    }

    #[test]
    fn test_registry_rejects_missing_rpc() {
        let mut chain = test_chain(1, "a");
        chain.rpc_urls.clear();
        assert_eq!(
            ChainRegistry::new(vec![chain], 1),
            Err(ConfigError::MissingRpcUrl(1))
        );
    }

    #[test]
    fn test_registry_from_toml() {
        let source = r#"
            preferred_chain_id = 137

            [[chains]]
            id = 137
            name = "Polygon"
            rpc_urls = ["https://polygon-rpc.com"]

            [chains.native_currency]
            name = "POL"
            symbol = "POL"
            decimals = 18
        "#;
        let registry = ChainRegistry::from_toml(source).unwrap();
        assert_eq!(registry.preferred().name, "Polygon");
        assert_eq!(registry.name_of(137), "Polygon");
        assert_eq!(registry.name_of(5), "Chain 5");
    }

    #[test]
    fn test_registry_from_invalid_toml() {
        assert!(matches!(
            ChainRegistry::from_toml("chains = 3"),
            Err(ConfigError::Parse(_))
        ));
    }
}
