//! Centralized icon definitions.
//!
//! Icon theme is configured in `config.rs` via `ICON_THEME`.
//! This module maps semantic icon names to the selected theme's icons.

use icondata::Icon;

use crate::config::IconTheme;

// =============================================================================
// Theme Imports
// =============================================================================

mod lucide {
    pub use icondata::{
        LuCheck as Check, LuChevronDown as ChevronDown, LuGlobe as Network, LuLogOut as Logout,
        LuQrCode as Pairing, LuSmartphone as Mobile, LuTriangleAlert as Warning,
        LuWallet as Wallet,
    };
}

mod bootstrap {
    pub use icondata::{
        BsBoxArrowRight as Logout, BsCheck2 as Check, BsChevronDown as ChevronDown,
        BsExclamationTriangleFill as Warning, BsGlobe as Network, BsPhone as Mobile,
        BsQrCode as Pairing, BsWallet2 as Wallet,
    };
}

// =============================================================================
// Icon Constants (selected based on theme)
// =============================================================================

macro_rules! themed_icon {
    ($name:ident, $theme_name:ident) => {
        pub const $name: Icon = match crate::config::ICON_THEME {
            IconTheme::Lucide => lucide::$theme_name,
            IconTheme::Bootstrap => bootstrap::$theme_name,
        };
    };
}

themed_icon!(WALLET, Wallet);
themed_icon!(NETWORK, Network);
themed_icon!(CHEVRON_DOWN, ChevronDown);
themed_icon!(CHECK, Check);
themed_icon!(WARNING, Warning);
themed_icon!(LOGOUT, Logout);
themed_icon!(MOBILE, Mobile);
themed_icon!(PAIRING, Pairing);
