//! Positionable overlay geometry.
//!
//! Dropdowns open below their trigger unless the viewport has more room
//! above. Clicks outside both the trigger and the overlay close it. The
//! DOM side only measures rectangles; all decisions are made here.

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// Where an overlay opens relative to its trigger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    #[default]
    Below,
    Above,
}

/// Free space above and below `trigger`, each reduced by `margin`.
pub fn available_space(trigger: &Rect, viewport_height: f64, margin: f64) -> (f64, f64) {
    let above = (trigger.top - margin).max(0.0);
    let below = (viewport_height - trigger.bottom() - margin).max(0.0);
    (above, below)
}

/// Choose a placement for an overlay of `overlay_height`.
pub fn place(trigger: &Rect, overlay_height: f64, viewport_height: f64, margin: f64) -> Placement {
    let (above, below) = available_space(trigger, viewport_height, margin);
    if below >= overlay_height || below >= above {
        Placement::Below
    } else {
        Placement::Above
    }
}

/// True when the point lies outside every one of `regions`.
pub fn is_outside_click(x: f64, y: f64, regions: &[Rect]) -> bool {
    !regions.iter().any(|r| r.contains(x, y))
}
