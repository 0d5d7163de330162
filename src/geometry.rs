//! Axis-aligned rectangles with inclusive corners.
//!
//! Every dirty region, sprite footprint and restore area in the crate is a
//! [`Rect`]. Corners are inclusive so a single pixel at `(x, y)` is
//! `Rect::new(x, y, x, y)`. A rectangle with `x1 > x2` or `y1 > y2` is empty;
//! [`Rect::EMPTY`] is the canonical empty value.

use crate::config::{MAX_X, MAX_Y, SCENE_BOTTOM};

/// Inclusive rectangle in screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
}

impl Rect {
    /// Canonical empty rectangle.
    pub const EMPTY: Self = Self {
        x1: 0,
        y1: 0,
        x2: -1,
        y2: -1,
    };

    /// The whole panel.
    pub const SCREEN: Self = Self {
        x1: 0,
        y1: 0,
        x2: MAX_X,
        y2: MAX_Y,
    };

    /// The animated scene region above the status widgets.
    pub const SCENE: Self = Self {
        x1: 0,
        y1: 0,
        x2: MAX_X,
        y2: SCENE_BOTTOM,
    };

    /// Build a rectangle from two corners in any order.
    pub const fn new(
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
    ) -> Self {
        let (x1, x2) = if x1 <= x2 { (x1, x2) } else { (x2, x1) };
        let (y1, y2) = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle centred on `(cx, cy)` extending `rx`/`ry` in each direction.
    pub const fn around(
        cx: i16,
        cy: i16,
        rx: i16,
        ry: i16,
    ) -> Self {
        Self::new(
            cx.saturating_sub(rx),
            cy.saturating_sub(ry),
            cx.saturating_add(rx),
            cy.saturating_add(ry),
        )
    }

    #[inline]
    pub const fn is_empty(&self) -> bool { self.x1 > self.x2 || self.y1 > self.y2 }

    #[inline]
    pub const fn width(&self) -> u16 { if self.is_empty() { 0 } else { (self.x2 - self.x1 + 1) as u16 } }

    #[inline]
    pub const fn height(&self) -> u16 { if self.is_empty() { 0 } else { (self.y2 - self.y1 + 1) as u16 } }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> u32 { self.width() as u32 * self.height() as u32 }

    #[inline]
    pub const fn contains(
        &self,
        x: i16,
        y: i16,
    ) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// True if both rectangles share at least one pixel.
    pub const fn intersects(
        &self,
        other: &Self,
    ) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x1 <= other.x2
            && other.x1 <= self.x2
            && self.y1 <= other.y2
            && other.y1 <= self.y2
    }

    /// Smallest rectangle covering both. Empty inputs are ignored.
    pub const fn union(
        &self,
        other: &Self,
    ) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            x1: min(self.x1, other.x1),
            y1: min(self.y1, other.y1),
            x2: max(self.x2, other.x2),
            y2: max(self.y2, other.y2),
        }
    }

    /// Shared area, or [`Rect::EMPTY`] if there is none.
    pub const fn intersection(
        &self,
        other: &Self,
    ) -> Self {
        if !self.intersects(other) {
            return Self::EMPTY;
        }
        Self {
            x1: max(self.x1, other.x1),
            y1: max(self.y1, other.y1),
            x2: min(self.x2, other.x2),
            y2: min(self.y2, other.y2),
        }
    }

    /// Clip to `bounds`. Alias of [`Rect::intersection`] that reads better at call sites.
    #[inline]
    pub const fn clamp_to(
        &self,
        bounds: &Self,
    ) -> Self {
        self.intersection(bounds)
    }
}

impl Default for Rect {
    fn default() -> Self { Self::EMPTY }
}

const fn min(
    a: i16,
    b: i16,
) -> i16 {
    if a < b { a } else { b }
}

const fn max(
    a: i16,
    b: i16,
) -> i16 {
    if a > b { a } else { b }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
