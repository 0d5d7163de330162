//! Raindrops.
//!
//! Each drop is a short streak falling 3 px per tick, pushed sideways by the
//! wind. Drops wrap horizontally and restart near the top once they reach the
//! ground line.

use super::{Animate, Tick};
use crate::color::Hsv;
use crate::config::{GROUND_Y, SCREEN_WIDTH};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::weather::{Intensity, MAX_RAINDROPS};

const FALL_SPEED: i16 = 3;
const WIDTH: i16 = 2;
const LENGTH: i16 = 4;

/// Drops wrap inside `0..WRAP_WIDTH` so a 2 px streak never straddles the edge.
const WRAP_WIDTH: i16 = SCREEN_WIDTH as i16 - WIDTH;

const COLOR: Hsv = Hsv::new(170, 150, 200);

/// Scattered starting positions, one per pool slot.
const INITIAL: [(i16, i16); MAX_RAINDROPS] = [
    (91, 86), (25, 128), (108, 61), (62, 101), (45, 74), (119, 139), (31, 52), (76, 118), (100, 93), (53, 67),
    (17, 131), (85, 79), (69, 105), (122, 49), (38, 123), (96, 84), (58, 58), (20, 143), (106, 71), (72, 113),
    (41, 96), (115, 54), (29, 136), (83, 88), (50, 109), (124, 63), (64, 121), (18, 76), (98, 99), (56, 56),
    (36, 140), (88, 82), (67, 115), (110, 69), (42, 127), (78, 91), (26, 59), (102, 103), (60, 77), (21, 133),
    (94, 94), (48, 66), (116, 51), (33, 119), (81, 87), (52, 106), (120, 73), (39, 137), (75, 98), (104, 62),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Raindrop {
    pub x: i16,
    pub y: i16,
    slot: u8,
}

impl Raindrop {
    /// Drop for pool slot `slot` at its fixed starting position.
    pub const fn new(slot: usize) -> Self {
        let (x, y) = INITIAL[slot % MAX_RAINDROPS];
        Self {
            x,
            y,
            slot: (slot % MAX_RAINDROPS) as u8,
        }
    }

    fn respawn(&mut self) {
        let i = i16::from(self.slot);
        self.y = 45 + (i * 7) % 10;
        self.x = 10 + (i * 13 + (i / 5) * 7) % 115;
    }
}

/// Pool slots used at `intensity`: every third, two of three, or all.
pub fn slots(intensity: Intensity) -> impl Iterator<Item = usize> {
    (0..MAX_RAINDROPS).filter(move |i| match intensity {
        Intensity::Light => i % 3 == 0 && *i < 48,
        Intensity::Medium => i % 3 != 2 && *i < 49,
        Intensity::Heavy => true,
    })
}

impl Animate for Raindrop {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        self.y += FALL_SPEED;
        self.x = (self.x + i16::from(tick.wind.rain_drift())).rem_euclid(WRAP_WIDTH);
        if self.y >= GROUND_Y {
            self.respawn();
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        fb.rect(self.x, self.y, self.x + WIDTH - 1, self.y + LENGTH - 1, COLOR.to_color(), true);
    }

    fn bounds(&self) -> Rect { Rect::new(self.x, self.y, self.x + WIDTH - 1, self.y + LENGTH - 1) }

    fn z_order(&self) -> u8 { 6 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
