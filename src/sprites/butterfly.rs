//! Butterflies.
//!
//! The baseline path is a figure eight around a home point (different sine
//! frequencies on each axis). Every 4 to 10 seconds a butterfly wanders: it
//! jumps to a pseudo-random offset for 3 seconds, then the offset decays back
//! toward home by 5% per update.

use micromath::F32;

use super::{Animate, Tick, random_below};
use crate::color::{BLACK, Hsv};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

const FLUTTER_X_FREQ: f32 = 0.004;
const FLUTTER_Y_FREQ: f32 = 0.006;
const FLUTTER_X_RANGE: f32 = 10.0;
const FLUTTER_Y_RANGE: f32 = 6.0;

const WANDER_RANGE: f32 = 15.0;
const WANDER_MS: u32 = 3_000;
const WANDER_GAP_MIN_MS: u32 = 4_000;
const WANDER_GAP_SPAN_MS: u32 = 6_001;
const WANDER_DECAY: f32 = 0.95;
const WANDER_SNAP: f32 = 0.1;

const FRAME_MS: u32 = 120;

const TAU: f32 = core::f32::consts::TAU;
/// Wing half-width per animation frame.
const WING_WIDTHS: [i16; 4] = [3, 2, 1, 2];

/// Spring butterflies: (home_x, home_y, hue).
pub const LAYOUT: [(f32, f32, u8); 3] = [(35.0, 105.0, 200), (75.0, 95.0, 20), (100.0, 115.0, 230)];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Butterfly {
    home_x: f32,
    home_y: f32,
    pub x: f32,
    pub y: f32,
    offset_x: f32,
    offset_y: f32,
    flutter_x_phase: f32,
    flutter_y_phase: f32,
    wandering: bool,
    /// Time since the last wander started or ended.
    wander_ms: u32,
    /// Idle time before the next wander.
    wander_gap_ms: u32,
    frame: u8,
    frame_ms: u32,
    hue: u8,
    seed: u32,
}

impl Butterfly {
    pub fn new(
        home_x: f32,
        home_y: f32,
        hue: u8,
        seed: u32,
    ) -> Self {
        Self {
            home_x,
            home_y,
            x: home_x,
            y: home_y,
            offset_x: 0.0,
            offset_y: 0.0,
            flutter_x_phase: 0.0,
            flutter_y_phase: 0.0,
            wandering: false,
            wander_ms: 0,
            wander_gap_ms: WANDER_GAP_MIN_MS + random_below(seed, 0, WANDER_GAP_SPAN_MS),
            frame: 0,
            frame_ms: 0,
            hue,
            seed,
        }
    }

    #[inline]
    pub const fn is_wandering(&self) -> bool { self.wandering }

    /// Current wander displacement from the flutter path.
    #[inline]
    pub const fn offset(&self) -> (f32, f32) { (self.offset_x, self.offset_y) }

    fn position(&self) -> (i16, i16) { (F32(self.x).round().0 as i16, F32(self.y).round().0 as i16) }

    fn step_wander(
        &mut self,
        now_ms: u32,
        elapsed_ms: u32,
    ) {
        self.wander_ms = self.wander_ms.saturating_add(elapsed_ms);
        if !self.wandering && self.wander_ms >= self.wander_gap_ms {
            self.wandering = true;
            self.wander_ms = 0;
            self.seed = self.seed.wrapping_add(1);
            let rx = random_below(self.seed, now_ms, 1_001) as f32 / 1_000.0;
            let ry = random_below(self.seed, now_ms.wrapping_add(1), 1_001) as f32 / 1_000.0;
            self.offset_x = (rx * 2.0 - 1.0) * WANDER_RANGE;
            self.offset_y = (ry * 2.0 - 1.0) * WANDER_RANGE;
        } else if self.wandering && self.wander_ms >= WANDER_MS {
            self.wandering = false;
            self.wander_ms = 0;
            self.wander_gap_ms = WANDER_GAP_MIN_MS + random_below(self.seed, now_ms, WANDER_GAP_SPAN_MS);
        }

        if !self.wandering {
            self.offset_x *= WANDER_DECAY;
            self.offset_y *= WANDER_DECAY;
            if F32(self.offset_x).abs().0 < WANDER_SNAP {
                self.offset_x = 0.0;
            }
            if F32(self.offset_y).abs().0 < WANDER_SNAP {
                self.offset_y = 0.0;
            }
        }
    }
}

impl Animate for Butterfly {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        self.step_wander(tick.now_ms, tick.elapsed_ms);

        let dt = tick.elapsed_ms as f32;
        self.flutter_x_phase = (self.flutter_x_phase + FLUTTER_X_FREQ * dt) % TAU;
        self.flutter_y_phase = (self.flutter_y_phase + FLUTTER_Y_FREQ * dt) % TAU;
        self.x = self.home_x + F32(self.flutter_x_phase).sin().0 * FLUTTER_X_RANGE + self.offset_x;
        self.y = self.home_y + F32(self.flutter_y_phase).sin().0 * FLUTTER_Y_RANGE + self.offset_y;

        self.frame_ms += tick.elapsed_ms;
        while self.frame_ms >= FRAME_MS {
            self.frame_ms -= FRAME_MS;
            self.frame = (self.frame + 1) % WING_WIDTHS.len() as u8;
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        let (x, y) = self.position();
        let wing = WING_WIDTHS[usize::from(self.frame)];
        let upper = Hsv::new(self.hue, 220, 230).to_color();
        let lower = Hsv::new(self.hue, 255, 170).to_color();

        fb.ellipse(x - 3, y - 2, wing, 3, upper, true);
        fb.ellipse(x + 3, y - 2, wing, 3, upper, true);
        fb.ellipse(x - 2, y + 3, wing.min(2), 2, lower, true);
        fb.ellipse(x + 2, y + 3, wing.min(2), 2, lower, true);
        fb.vline(x, y - 4, y + 4, BLACK);
    }

    fn bounds(&self) -> Rect {
        let (x, y) = self.position();
        Rect::around(x, y, 6, 6)
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

    fn run(
        b: &mut Butterfly,
        from_ms: u32,
        to_ms: u32,
    ) {
        let mut t = from_ms;
        while t < to_ms {
            t += 25;
            b.update(&Tick::new(t, 25, Wind::CALM));
        }
    }

    #[test]
    fn test_flutter_stays_near_home() {
        let mut b = Butterfly::new(60.0, 90.0, 200, 3);
        run(&mut b, 0, 3_000);
        assert!(!b.is_wandering());
        assert!((b.x - 60.0).abs() <= FLUTTER_X_RANGE + 0.01);
        assert!((b.y - 90.0).abs() <= FLUTTER_Y_RANGE + 0.01);
    }

    #[test]
    fn test_wander_starts_ends_and_decays() {
        let mut b = Butterfly::new(60.0, 90.0, 200, 3);
        let start = b.wander_gap_ms;
        assert!((4_000..=10_000).contains(&start));

        run(&mut b, 0, start + 25);
        assert!(b.is_wandering());
        let (ox, oy) = b.offset();
        assert!(ox.abs() <= WANDER_RANGE && oy.abs() <= WANDER_RANGE);

        run(&mut b, start + 25, start + WANDER_MS + 100);
        assert!(!b.is_wandering());
        let (ox2, oy2) = b.offset();
        assert!(ox2.abs() <= ox.abs() && oy2.abs() <= oy.abs());

        // 0.95^n drops any offset under the snap threshold within ~100 updates
        run(&mut b, start + WANDER_MS + 100, start + WANDER_MS + 3_900);
        assert_eq!(b.offset(), (0.0, 0.0));
    }

    #[test]
    fn test_flutter_ignores_uptime() {
        let mut early = Butterfly::new(60.0, 90.0, 200, 3);
        let mut late = Butterfly::new(60.0, 90.0, 200, 3);
        run(&mut early, 0, 3_000);
        run(&mut late, 1 << 30, (1 << 30) + 3_000);
        assert_eq!((early.x, early.y), (late.x, late.y));
        assert!(!early.is_wandering() && !late.is_wandering());
    }

    #[test]
    fn test_wanders_across_clock_wrap() {
        let mut b = Butterfly::new(60.0, 90.0, 200, 3);
        let start = u32::MAX - 1_000;
        let mut t = start;
        let mut wanders = 0;
        let mut was_wandering = false;
        for _ in 0..1_200 {
            t = t.wrapping_add(25);
            b.update(&Tick::new(t, 25, Wind::CALM));
            if b.is_wandering() && !was_wandering {
                wanders += 1;
            }
            was_wandering = b.is_wandering();
        }
        // 30 s covers at least two wander cycles of at most 13 s
        assert!(wanders >= 2, "{wanders} wanders");
    }

    #[test]
    fn test_wing_frames_cycle() {
        let mut b = Butterfly::new(60.0, 90.0, 200, 3);
        for expected in [1, 2, 3, 0] {
            b.update(&Tick::new(0, FRAME_MS, Wind::CALM));
            assert_eq!(b.frame, expected);
        }
    }
}
