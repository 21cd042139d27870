//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use web_sys::{Element, Storage, Window};

use crate::core::overlay::Rect;

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get localStorage.
#[inline]
pub fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok()?
}

/// The browser's user agent string.
pub fn user_agent() -> Option<String> {
    window()?.navigator().user_agent().ok()
}

/// Full URL of the current page.
pub fn location_href() -> Option<String> {
    window()?.location().href().ok()
}

/// Navigate the current tab to `url` (used for wallet deep links).
pub fn navigate(url: &str) {
    if let Some(window) = window()
        && let Err(e) = window.location().set_href(url)
    {
        log::warn!("Navigation to {} failed: {:?}", url, e);
    }
}

/// Height of the layout viewport in CSS pixels.
pub fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

/// Viewport-relative bounding box of an element.
pub fn element_rect(element: &Element) -> Rect {
    let r = element.get_bounding_client_rect();
    Rect {
        left: r.left(),
        top: r.top(),
        width: r.width(),
        height: r.height(),
    }
}
