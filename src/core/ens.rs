//! ENS reverse resolution for display names.

use serde::Deserialize;

use crate::config::ENS_RESOLVE_URL;
use crate::utils::fetch_json;

/// ENS API response structure
#[derive(Deserialize)]
struct EnsResponse {
    name: Option<String>,
}

/// Resolve the primary ENS name of `address`, if any.
///
/// Best-effort: lookup failures are logged and yield `None`.
pub async fn resolve_ens(address: &str) -> Option<String> {
    let url = format!("{}{}", ENS_RESOLVE_URL, address);

    match fetch_json::<EnsResponse>(&url).await {
        Ok(response) => response.name.filter(|n| !n.is_empty()),
        Err(e) => {
            log::debug!("ENS lookup for {} failed: {}", address, e);
            None
        }
    }
}
