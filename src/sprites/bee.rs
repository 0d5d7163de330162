//! Bees circling summer flowers.
//!
//! Position is the flower centre plus a slow elliptical orbit plus a small
//! high-frequency buzz on each axis. Wings toggle on their own timer.

use micromath::F32;

use super::{Animate, Tick};
use crate::color::{BLACK, Hsv};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

/// Orbit speed in radians per millisecond.
const ORBIT_SPEED: f32 = 0.002;
/// Vertical squash of the orbit.
const ORBIT_FLATTEN: f32 = 0.6;
const BUZZ_X_FREQ: f32 = 0.025;
const BUZZ_Y_FREQ: f32 = 0.030;
const BUZZ_AMPLITUDE: f32 = 1.5;
const WING_MS: u32 = 60;

const TAU: f32 = core::f32::consts::TAU;

const BODY: Hsv = Hsv::new(42, 255, 200);

/// Summer bees: (flower_x, flower_y, orbit radius, starting angle).
pub const LAYOUT: [(i16, i16, f32, f32); 3] = [(28, 128, 10.0, 0.0), (70, 122, 12.0, 2.1), (95, 132, 9.0, 4.2)];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bee {
    flower_x: i16,
    flower_y: i16,
    radius: f32,
    angle: f32,
    buzz_x_phase: f32,
    buzz_y_phase: f32,
    pub x: f32,
    pub y: f32,
    wings_up: bool,
    wing_ms: u32,
}

impl Bee {
    pub fn new(
        flower_x: i16,
        flower_y: i16,
        radius: f32,
        start_angle: f32,
    ) -> Self {
        let mut bee = Self {
            flower_x,
            flower_y,
            radius,
            angle: start_angle % TAU,
            buzz_x_phase: 0.0,
            buzz_y_phase: 0.0,
            x: 0.0,
            y: 0.0,
            wings_up: true,
            wing_ms: 0,
        };
        bee.place();
        bee
    }

    /// Flower this bee orbits.
    #[inline]
    pub const fn flower(&self) -> (i16, i16) { (self.flower_x, self.flower_y) }

    fn place(&mut self) {
        let buzz_x = F32(self.buzz_x_phase).sin().0 * BUZZ_AMPLITUDE;
        let buzz_y = F32(self.buzz_y_phase).sin().0 * BUZZ_AMPLITUDE;
        self.x = f32::from(self.flower_x) + F32(self.angle).cos().0 * self.radius + buzz_x;
        self.y = f32::from(self.flower_y) + F32(self.angle).sin().0 * self.radius * ORBIT_FLATTEN + buzz_y;
    }

    fn position(&self) -> (i16, i16) { (F32(self.x).round().0 as i16, F32(self.y).round().0 as i16) }
}

impl Animate for Bee {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        let dt = tick.elapsed_ms as f32;
        self.angle = (self.angle + ORBIT_SPEED * dt) % TAU;
        self.buzz_x_phase = (self.buzz_x_phase + BUZZ_X_FREQ * dt) % TAU;
        self.buzz_y_phase = (self.buzz_y_phase + BUZZ_Y_FREQ * dt) % TAU;
        self.place();

        self.wing_ms += tick.elapsed_ms;
        while self.wing_ms >= WING_MS {
            self.wing_ms -= WING_MS;
            self.wings_up = !self.wings_up;
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        let (x, y) = self.position();
        let (wing_y, wing_v) = if self.wings_up { (y - 3, 180) } else { (y - 2, 150) };
        let wing = Hsv::grey(wing_v).to_color();

        fb.circle(x - 2, wing_y, 2, wing, true);
        fb.circle(x + 2, wing_y, 2, wing, true);
        fb.ellipse(x, y, 3, 2, BODY.to_color(), true);
        fb.vline(x, y - 2, y + 2, BLACK);
    }

    fn bounds(&self) -> Rect {
        let (x, y) = self.position();
        Rect::around(x, y, 5, 5)
    }

    fn z_order(&self) -> u8 { 5 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
