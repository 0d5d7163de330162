//! Background snapshot used to erase sprites.
//!
//! The snapshot is a full copy of the framebuffer taken once the static scene
//! (sky, ground, structures, event decorations) is painted and before any
//! sprite has been drawn. Restoring a rectangle from it reproduces the static
//! scene there, which is how a sprite's previous position is erased.
//!
//! Capturing late bakes a sprite into the snapshot; never capturing leaves
//! trails. [`BackgroundStore::is_saved`] exposes the state so callers can guard
//! sprite drawing on it.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;

use crate::config::{PIXEL_COUNT, SCREEN_WIDTH};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

/// Same-sized snapshot of the live buffer.
pub struct BackgroundStore<'a> {
    pixels: &'a mut [u16; PIXEL_COUNT],
    saved: bool,
}

impl<'a> BackgroundStore<'a> {
    /// Wrap snapshot memory. Nothing is considered saved yet.
    pub fn new(pixels: &'a mut [u16; PIXEL_COUNT]) -> Self { Self { pixels, saved: false } }

    /// Copy the entire live buffer into the snapshot.
    pub fn save_all(
        &mut self,
        fb: &Framebuffer<'_>,
    ) {
        self.pixels.copy_from_slice(fb.pixels());
        self.saved = true;
    }

    /// Whether the snapshot matches the current static scene.
    #[inline]
    pub const fn is_saved(&self) -> bool { self.saved }

    /// Read one snapshot pixel, `None` when out of range.
    pub fn get_pixel(
        &self,
        x: i16,
        y: i16,
    ) -> Option<Rgb565> {
        if !Rect::SCREEN.contains(x, y) {
            return None;
        }
        Some(Rgb565::from(RawU16::new(self.pixels[y as usize * SCREEN_WIDTH + x as usize])))
    }

    /// Mark the snapshot stale (the static scene underneath changed).
    #[inline]
    pub fn invalidate(&mut self) { self.saved = false; }

    /// Copy `area` (clamped to the screen) from the snapshot into the live
    /// buffer and mark it dirty. Returns the rectangle actually restored.
    pub fn restore_region(
        &self,
        fb: &mut Framebuffer<'_>,
        area: Rect,
    ) -> Rect {
        let area = area.clamp_to(&Rect::SCREEN);
        if area.is_empty() {
            return area;
        }

        let live = fb.pixels_mut();
        for y in area.y1..=area.y2 {
            let start = y as usize * SCREEN_WIDTH + area.x1 as usize;
            let end = start + area.width() as usize;
            live[start..end].copy_from_slice(&self.pixels[start..end]);
        }
        fb.mark_dirty(area);
        area
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
