//! URL helpers for wallet deep links.

/// Build a wallet-app deep link that opens `page_url` in the app's
/// in-app browser.
///
/// Deep-link bases such as `https://metamask.app.link/dapp/` expect the
/// target without its scheme.
pub fn dapp_deep_link(base: &str, page_url: &str) -> String {
    let target = page_url
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    format!("{}{}", base, target)
}
