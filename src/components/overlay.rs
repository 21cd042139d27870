//! Dropdown placement and outside-click handling for DOM overlays.
//!
//! Measures the trigger and panel elements and defers every decision to
//! [`crate::core::overlay`]. Window listeners are removed on cleanup.

use leptos::ev;
use leptos::html::Div;
use leptos::prelude::*;

use crate::config::overlay::MARGIN;
use crate::core::overlay::{Placement, Rect, is_outside_click, place};
use crate::utils::dom;

/// Track where the overlay in `panel` should open and call `on_dismiss`
/// for mouse-downs outside both `trigger` and `panel` while `open`.
pub fn use_overlay(
    trigger: NodeRef<Div>,
    panel: NodeRef<Div>,
    open: Signal<bool>,
    on_dismiss: impl Fn() + 'static,
    expected_height: f64,
) -> ReadSignal<Placement> {
    let (placement, set_placement) = signal(Placement::Below);

    let measure = move || {
        let Some(trigger) = trigger.get_untracked() else {
            return;
        };
        let height = panel
            .get_untracked()
            .map(|p| dom::element_rect(&p).height)
            .filter(|h| *h > 0.0)
            .unwrap_or(expected_height);
        set_placement.set(place(
            &dom::element_rect(&trigger),
            height,
            dom::viewport_height(),
            MARGIN,
        ));
    };

    Effect::new(move |_| {
        if open.get() {
            measure();
        }
    });

    let resize = window_event_listener(ev::resize, move |_| {
        if open.get_untracked() {
            measure();
        }
    });

    let mousedown = window_event_listener(ev::mousedown, move |e| {
        if !open.get_untracked() {
            return;
        }
        let regions: Vec<Rect> = [trigger.get_untracked(), panel.get_untracked()]
            .into_iter()
            .flatten()
            .map(|el| dom::element_rect(&el))
            .collect();
        if is_outside_click(e.client_x() as f64, e.client_y() as f64, &regions) {
            on_dismiss();
        }
    });

    on_cleanup(move || {
        resize.remove();
        mousedown.remove();
    });

    placement
}
