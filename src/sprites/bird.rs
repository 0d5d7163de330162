//! Birds: spring songbirds and the autumn migration flock.
//!
//! A bird glides horizontally at a constant speed with a gentle sine bob and
//! flaps on a fixed cadence. Leaving one side of the screen brings it back in
//! on the other.

use micromath::F32;

use super::{Animate, Tick};
use crate::color::Hsv;
use crate::config::SCREEN_WIDTH;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

const WRAP_MARGIN: f32 = 10.0;
const BOB_AMPLITUDE: f32 = 2.0;
/// Bob phase advance in radians per millisecond.
const BOB_SPEED: f32 = 0.005;
const FLAP_INTERVAL_MS: u32 = 150;
const TAU: f32 = core::f32::consts::TAU;

/// Spring birds: (x, base_y, speed in px/ms).
pub const SPRING_LAYOUT: [(f32, i16, f32); 6] = [
    (25.0, 50, 0.015),
    (60.0, 40, 0.012),
    (90.0, 70, 0.018),
    (110.0, 45, 0.014),
    (40.0, 75, 0.016),
    (150.0, 65, 0.013),
];

/// Migrating flock in a V, heading right.
pub const FALL_FLOCK: [(f32, i16, f32); 5] = [
    (40.0, 35, 0.025),
    (31.0, 29, 0.025),
    (31.0, 41, 0.025),
    (22.0, 23, 0.025),
    (22.0, 47, 0.025),
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    pub x: f32,
    pub base_y: i16,
    /// Pixels per millisecond; negative flies left.
    pub speed: f32,
    bob_phase: f32,
    wings_up: bool,
    flap_ms: u32,
}

impl Bird {
    /// `seed` staggers the bob and flap so a flock does not move in lockstep.
    pub fn new(
        x: f32,
        base_y: i16,
        speed: f32,
        seed: u8,
    ) -> Self {
        Self {
            x,
            base_y,
            speed,
            bob_phase: f32::from(seed) * 0.9 % TAU,
            wings_up: seed % 2 == 0,
            flap_ms: u32::from(seed) * 37 % FLAP_INTERVAL_MS,
        }
    }

    /// Pixel position of the body.
    pub fn position(&self) -> (i16, i16) {
        let bob = F32(self.bob_phase).sin().0 * BOB_AMPLITUDE;
        (self.x as i16, self.base_y + F32(bob).round().0 as i16)
    }

    #[inline]
    pub const fn wings_up(&self) -> bool { self.wings_up }
}

impl Animate for Bird {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        let dt = tick.elapsed_ms as f32;
        let width = SCREEN_WIDTH as f32;

        self.x += self.speed * dt;
        if self.x > width + WRAP_MARGIN {
            self.x = -WRAP_MARGIN;
        } else if self.x < -WRAP_MARGIN {
            self.x = width + WRAP_MARGIN;
        }

        self.bob_phase = (self.bob_phase + BOB_SPEED * dt) % TAU;

        self.flap_ms += tick.elapsed_ms;
        while self.flap_ms >= FLAP_INTERVAL_MS {
            self.flap_ms -= FLAP_INTERVAL_MS;
            self.wings_up = !self.wings_up;
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        let (x, y) = self.position();
        let color = Hsv::grey(100).to_color();
        let tip_y = if self.wings_up { y - 3 } else { y + 2 };
        fb.line(x - 5, tip_y, x, y, color);
        fb.line(x, y, x + 5, tip_y, color);
    }

    fn bounds(&self) -> Rect {
        let (x, y) = self.position();
        Rect::new(x - 6, y - 3, x + 5, y + 3)
    }

    fn z_order(&self) -> u8 { 2 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
