//! Fireflies on summer nights.
//!
//! Each firefly drifts slowly around a home point and blinks: it stays lit for
//! 1.2 to 2.5 s, dark for 0.8 to 3 s, and fades in or out by a fixed step per
//! update instead of switching instantly.

use micromath::F32;

use super::{Animate, Tick, random_below};
use crate::color::Hsv;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

const DRIFT_X_FREQ: f32 = 0.0015;
const DRIFT_Y_FREQ: f32 = 0.002;
const DRIFT_X_RANGE: f32 = 8.0;
const DRIFT_Y_RANGE: f32 = 6.0;

const ON_MIN_MS: u32 = 1_200;
const ON_SPAN_MS: u32 = 1_301;
const OFF_MIN_MS: u32 = 800;
const OFF_SPAN_MS: u32 = 2_201;
const FADE_STEP: u8 = 8;

const HUE: u8 = 60;

const TAU: f32 = core::f32::consts::TAU;

/// Night fireflies: (home_x, home_y).
pub const LAYOUT: [(f32, f32); 5] = [(20.0, 95.0), (50.0, 80.0), (78.0, 110.0), (98.0, 88.0), (122.0, 105.0)];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Firefly {
    home_x: f32,
    home_y: f32,
    pub x: f32,
    pub y: f32,
    pub brightness: u8,
    drift_x_phase: f32,
    drift_y_phase: f32,
    lit: bool,
    /// Time spent in the current lit or dark state, and how long it lasts.
    held_ms: u32,
    hold_ms: u32,
    seed: u32,
}

impl Firefly {
    /// Fireflies start dark; `seed` staggers the first blink.
    pub fn new(
        home_x: f32,
        home_y: f32,
        seed: u32,
    ) -> Self {
        Self {
            home_x,
            home_y,
            x: home_x,
            y: home_y,
            brightness: 0,
            drift_x_phase: home_y % TAU,
            drift_y_phase: home_x % TAU,
            lit: false,
            held_ms: 0,
            hold_ms: OFF_MIN_MS + random_below(seed, 0, OFF_SPAN_MS),
            seed,
        }
    }

    #[inline]
    pub const fn is_lit(&self) -> bool { self.lit }

    fn position(&self) -> (i16, i16) { (F32(self.x).round().0 as i16, F32(self.y).round().0 as i16) }
}

impl Animate for Firefly {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        let dt = tick.elapsed_ms as f32;
        self.drift_x_phase = (self.drift_x_phase + DRIFT_X_FREQ * dt) % TAU;
        self.drift_y_phase = (self.drift_y_phase + DRIFT_Y_FREQ * dt) % TAU;
        self.x = self.home_x + F32(self.drift_x_phase).sin().0 * DRIFT_X_RANGE;
        self.y = self.home_y + F32(self.drift_y_phase).cos().0 * DRIFT_Y_RANGE;

        self.held_ms = self.held_ms.saturating_add(tick.elapsed_ms);
        if self.held_ms >= self.hold_ms {
            let now = tick.now_ms;
            self.lit = !self.lit;
            self.seed = self.seed.wrapping_add(1);
            self.held_ms = 0;
            self.hold_ms = if self.lit {
                ON_MIN_MS + random_below(self.seed, now, ON_SPAN_MS)
            } else {
                OFF_MIN_MS + random_below(self.seed, now, OFF_SPAN_MS)
            };
        }

        self.brightness =
            if self.lit { self.brightness.saturating_add(FADE_STEP) } else { self.brightness.saturating_sub(FADE_STEP) };
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        if self.brightness == 0 {
            return;
        }
        let (x, y) = self.position();
        fb.rect(x - 1, y - 1, x + 1, y + 1, Hsv::new(HUE, 255, self.brightness / 2).to_color(), true);
        fb.set_pixel(x, y, Hsv::new(HUE, 180, self.brightness).to_color());
    }

    fn bounds(&self) -> Rect {
        let (x, y) = self.position();
        Rect::around(x, y, 4, 4)
    }

    fn z_order(&self) -> u8 { 5 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::Wind;

    #[test]
    fn test_blink_durations_within_window() {
        let mut f = Firefly::new(60.0, 90.0, 9);
        let mut last_toggle = 0u32;
        let mut was_lit = f.is_lit();
        for step in 1..20_000u32 {
            let now = step * 10;
            f.update(&Tick::new(now, 10, Wind::CALM));
            if f.is_lit() != was_lit {
                let held = now - last_toggle;
                if last_toggle != 0 {
                    let (lo, hi) = if was_lit { (ON_MIN_MS, ON_MIN_MS + ON_SPAN_MS) } else { (OFF_MIN_MS, OFF_MIN_MS + OFF_SPAN_MS) };
                    assert!((lo..hi + 10).contains(&held), "held {held} while lit={was_lit}");
                }
                last_toggle = now;
                was_lit = f.is_lit();
            }
        }
    }

    #[test]
    fn test_fades_in_and_out() {
        let mut f = Firefly::new(60.0, 90.0, 9);
        let first = f.hold_ms;
        f.update(&Tick::new(first, first, Wind::CALM));
        assert!(f.is_lit());
        assert_eq!(f.brightness, FADE_STEP);
        for k in 1..40 {
            f.update(&Tick::new(first + k, 1, Wind::CALM));
        }
        assert_eq!(f.brightness, 255);
    }

    #[test]
    fn test_drift_stays_near_home() {
        let mut f = Firefly::new(60.0, 90.0, 2);
        for step in 0..5_000u32 {
            f.update(&Tick::new(step * 20, 20, Wind::CALM));
            assert!((f.x - 60.0).abs() <= DRIFT_X_RANGE + 0.05);
            assert!((f.y - 90.0).abs() <= DRIFT_Y_RANGE + 0.05);
        }
    }

    #[test]
    fn test_drift_ignores_uptime() {
        let mut early = Firefly::new(60.0, 90.0, 4);
        let mut late = Firefly::new(60.0, 90.0, 4);
        let late_start = 1u32 << 30;
        for step in 1..=100u32 {
            early.update(&Tick::new(step * 50, 50, Wind::CALM));
            late.update(&Tick::new(late_start + step * 50, 50, Wind::CALM));
            assert_eq!((early.x, early.y), (late.x, late.y), "step {step}");
        }
    }

    #[test]
    fn test_blinks_across_clock_wrap() {
        let mut f = Firefly::new(60.0, 90.0, 9);
        let start = u32::MAX - 2_000;
        let mut toggles = 0;
        let mut was_lit = f.is_lit();
        for step in 1..=1_000u32 {
            f.update(&Tick::new(start.wrapping_add(step * 10), 10, Wind::CALM));
            if f.is_lit() != was_lit {
                toggles += 1;
                was_lit = f.is_lit();
            }
        }
        // 10 s of blinking, each state lasts at most 3 s
        assert!(toggles >= 3, "{toggles} toggles");
    }
}
