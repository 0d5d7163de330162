//! Color model shared by the scene and the status widgets.
//!
//! Everything is specified as HSV with each channel in `0..=255` and converted
//! to packed RGB565 with an integer six-region algorithm. Driving both the
//! widgets and the scenery from one hue ("layer color") keeps them consistent.
//!
//! # Conversion
//!
//! ```text
//! region    = h * 6 / 255
//! remainder = (h * 2 - region * 85) * 3      (truncated to u8)
//! p = v * (255 - s) >> 8
//! q = v * (255 - (s * remainder >> 8)) >> 8
//! t = v * (255 - (s * (255 - remainder) >> 8)) >> 8
//! ```
//!
//! The inverse ([`color_to_hsv`]) is lossy: RGB565 keeps 5/6/5 bits, so a
//! round trip lands within a few steps of the input (see tests for bounds).

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::{IntoStorage, RgbColor};

// =============================================================================
// Layer Hues
// =============================================================================

/// Semantic hues for the keyboard layers.
pub mod hue {
    pub const TEAL: u8 = 128;
    pub const RED: u8 = 0;
    pub const GREEN: u8 = 85;
    pub const YELLOW: u8 = 43;
}

/// Hue used to tint the status widgets for a layer index.
pub const fn layer_hue(layer: u8) -> u8 {
    match layer {
        1 => hue::RED,
        2 => hue::GREEN,
        3 => hue::YELLOW,
        _ => hue::TEAL,
    }
}

pub const BLACK: Rgb565 = Rgb565::BLACK;
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// HSV
// =============================================================================

/// A color in 8-bit HSV.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(
        h: u8,
        s: u8,
        v: u8,
    ) -> Self {
        Self { h, s, v }
    }

    /// Grey of brightness `v`.
    #[inline]
    pub const fn grey(v: u8) -> Self { Self { h: 0, s: 0, v } }

    #[inline]
    pub const fn to_color(self) -> Rgb565 { hsv_to_color(self.h, self.s, self.v) }
}

/// Convert HSV to 8-bit RGB.
pub const fn hsv_to_rgb(
    h: u8,
    s: u8,
    v: u8,
) -> (u8, u8, u8) {
    if s == 0 {
        return (v, v, v);
    }

    let h = h as u16;
    let s = s as u16;
    let v = v as u16;

    let region = h * 6 / 255;
    let remainder = ((h * 2 - region * 85) * 3) as u8 as u16;

    let p = ((v * (255 - s)) >> 8) as u8;
    let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;
    let v = v as u8;

    match region {
        0 | 6 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Pack 8-bit RGB into RGB565.
#[inline]
pub const fn rgb888_to_color(
    r: u8,
    g: u8,
    b: u8,
) -> Rgb565 {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Convert HSV straight to the packed pixel format.
#[inline]
pub const fn hsv_to_color(
    h: u8,
    s: u8,
    v: u8,
) -> Rgb565 {
    let (r, g, b) = hsv_to_rgb(h, s, v);
    rgb888_to_color(r, g, b)
}

/// Expand RGB565 back to 8-bit channels (bit replication, so white stays 255).
pub fn color_to_rgb888(color: Rgb565) -> (u8, u8, u8) {
    let raw = color.into_storage();
    let r = ((raw >> 11) & 0x1F) as u8;
    let g = ((raw >> 5) & 0x3F) as u8;
    let b = (raw & 0x1F) as u8;
    ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
}

/// Convert 8-bit RGB to HSV on the same 0..=255 hue circle as [`hsv_to_rgb`].
pub fn rgb_to_hsv(
    r: u8,
    g: u8,
    b: u8,
) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == 0 {
        return Hsv::new(0, 0, 0);
    }

    let delta = i32::from(max - min);
    let s = ((255 * delta + i32::from(max) / 2) / i32::from(max)) as u8;
    if delta == 0 {
        return Hsv::new(0, 0, max);
    }

    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let h = if max as i32 == r {
        43 * (g - b) / delta
    } else if max as i32 == g {
        85 + 43 * (b - r) / delta
    } else {
        171 + 43 * (r - g) / delta
    };

    Hsv::new(h.rem_euclid(256) as u8, s, max)
}

/// Inverse of [`hsv_to_color`] (lossy).
#[inline]
pub fn color_to_hsv(color: Rgb565) -> Hsv {
    let (r, g, b) = color_to_rgb888(color);
    rgb_to_hsv(r, g, b)
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
