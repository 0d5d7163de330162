//! Snowflakes.
//!
//! Flakes fall 1 px per tick. A third drift right, a third drift left, the rest
//! fall straight; drifting flakes step sideways every fourth row.

use super::{Animate, Tick};
use crate::color::Hsv;
use crate::config::GROUND_Y;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::weather::{Intensity, MAX_SNOWFLAKES};

/// Flakes wrap horizontally inside `0..=MAX_FLAKE_X`.
const MAX_FLAKE_X: i16 = 130;

const COLOR: Hsv = Hsv::new(170, 80, 255);

/// Scattered starting positions, one per pool slot.
const INITIAL: [(i16, i16); MAX_SNOWFLAKES] = [
    (15, 50), (40, 70), (65, 90), (85, 60), (110, 80), (25, 100), (55, 120), (95, 110), (120, 65), (10, 45),
    (32, 85), (48, 105), (72, 55), (90, 75), (105, 95), (125, 115), (18, 130), (35, 62), (62, 88), (78, 108),
    (98, 72), (22, 95), (47, 68), (73, 122), (103, 58), (118, 87), (28, 114), (58, 77), (88, 102), (113, 71),
    (8, 125), (38, 83), (68, 96), (93, 64), (123, 106), (13, 79), (43, 118), (77, 81), (100, 91), (128, 99),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snowflake {
    pub x: i16,
    pub y: i16,
    slot: u8,
}

impl Snowflake {
    pub const fn new(slot: usize) -> Self {
        let (x, y) = INITIAL[slot % MAX_SNOWFLAKES];
        Self {
            x,
            y,
            slot: (slot % MAX_SNOWFLAKES) as u8,
        }
    }

    /// Sideways step applied on every fourth row.
    const fn drift(&self) -> i16 {
        match self.slot % 3 {
            0 => 1,
            1 => -1,
            _ => 0,
        }
    }

    fn respawn(&mut self) {
        let i = i16::from(self.slot);
        self.y = 45 + (i * 7) % 10;
        self.x = (5 + (i * 11 + (i / 5) * 13) % 125).clamp(0, MAX_FLAKE_X);
    }
}

/// Pool slots used at `intensity`: every fourth, every second, or all.
pub fn slots(intensity: Intensity) -> impl Iterator<Item = usize> {
    let stride = match intensity {
        Intensity::Light => 4,
        Intensity::Medium => 2,
        Intensity::Heavy => 1,
    };
    (0..MAX_SNOWFLAKES).step_by(stride)
}

impl Animate for Snowflake {
    fn update(
        &mut self,
        _tick: &Tick,
    ) {
        self.y += 1;
        if self.y % 4 == 0 {
            self.x = (self.x + self.drift()).rem_euclid(MAX_FLAKE_X + 1);
        }
        if self.y >= GROUND_Y {
            self.respawn();
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        let color = COLOR.to_color();
        let (cx, cy) = (self.x + 1, self.y + 1);
        fb.hline(cx - 2, cx + 2, cy, color);
        fb.vline(cx, cy - 2, cy + 2, color);
        for (dx, dy) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
            fb.set_pixel(cx + dx, cy + dy, color);
        }
    }

    fn bounds(&self) -> Rect { Rect::new(self.x - 2, self.y - 2, self.x + 4, self.y + 4) }

    fn z_order(&self) -> u8 { 6 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
