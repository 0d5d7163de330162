//! New Year's Eve firework rockets.
//!
//! Each rocket cycles through a small state machine:
//!
//! ```text
//! Inactive (2 s) -> Launching (100 ms) -> Ascending (3 px/tick)
//!     -> Exploding (300 ms) -> Fading (700 ms) -> Inactive
//! ```
//!
//! The burst is six particles in 1/16 px fixed point. Gravity adds to the
//! vertical velocity every tick; while fading, friction scales both velocity
//! components by 13/16 and the particles dim.

use super::{Animate, Tick, random_below};
use crate::color::Hsv;
use crate::config::GROUND_Y;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

/// Rockets in the show.
pub const COUNT: usize = 5;

const INACTIVE_MS: u32 = 2_000;
const LAUNCH_MS: u32 = 100;
const EXPLODE_MS: u32 = 300;
const FADE_MS: u32 = 700;
/// Extra wait per rocket index before the first launch.
const STAGGER_MS: u32 = 400;

const ASCENT_SPEED: i16 = 3;
const GRAVITY: i16 = 1;
const FADE_STEP: u8 = 10;

const PARTICLES: usize = 6;
/// Burst directions, scaled by 16.
const DIR_COS: [i16; PARTICLES] = [16, 8, -8, -16, -8, 8];
const DIR_SIN: [i16; PARTICLES] = [0, -14, -14, 0, 14, 14];

const HUES: [u8; COUNT] = [0, 42, 85, 170, 200];
const BASE_X: [i16; COUNT] = [25, 45, 67, 90, 110];
const BASE_BURST_Y: [i16; COUNT] = [45, 55, 50, 60, 52];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Inactive,
    Launching,
    Ascending,
    Exploding,
    Fading,
}

/// Burst particle, all fields in 1/16 px.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Particle {
    x: i16,
    y: i16,
    vx: i16,
    vy: i16,
}

impl Particle {
    #[inline]
    const fn pixel(&self) -> (i16, i16) { (self.x >> 4, self.y >> 4) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rocket {
    index: u8,
    phase: Phase,
    phase_ms: u32,
    /// Wait before the next launch.
    wait_ms: u32,
    x: i16,
    y: i16,
    burst_y: i16,
    brightness: u8,
    particles: [Particle; PARTICLES],
}

impl Rocket {
    pub const fn new(index: usize) -> Self {
        let index = index % COUNT;
        Self {
            index: index as u8,
            phase: Phase::Inactive,
            phase_ms: 0,
            wait_ms: INACTIVE_MS + index as u32 * STAGGER_MS,
            x: BASE_X[index],
            y: GROUND_Y,
            burst_y: BASE_BURST_Y[index],
            brightness: 0,
            particles: [Particle { x: 0, y: 0, vx: 0, vy: 0 }; PARTICLES],
        }
    }

    #[inline]
    pub const fn phase(&self) -> Phase { self.phase }

    #[inline]
    const fn hue(&self) -> u8 { HUES[self.index as usize] }

    fn enter(
        &mut self,
        phase: Phase,
    ) {
        self.phase = phase;
        self.phase_ms = 0;
    }

    fn launch(
        &mut self,
        now_ms: u32,
    ) {
        let i = usize::from(self.index);
        let seed = now_ms.wrapping_add(u32::from(self.index) * 7);
        let jitter_x = random_below(seed, 1, 25) as i16 - 12;
        let jitter_y = random_below(seed, 2, 31) as i16 - 15;
        self.x = (BASE_X[i] + jitter_x).clamp(5, 130);
        self.burst_y = (BASE_BURST_Y[i] + jitter_y).clamp(30, 80);
        self.y = GROUND_Y - 2;
        self.enter(Phase::Launching);
    }

    fn explode(
        &mut self,
        now_ms: u32,
    ) {
        let speed = if random_below(now_ms, u32::from(self.index), 2) == 0 { 20 } else { 28 };
        let (x, y) = (self.x << 4, self.y << 4);
        for (k, p) in self.particles.iter_mut().enumerate() {
            *p = Particle {
                x,
                y,
                vx: (DIR_COS[k] * speed) >> 4,
                vy: (DIR_SIN[k] * speed) >> 4,
            };
        }
        self.brightness = 255;
        self.enter(Phase::Exploding);
    }

    fn move_particles(
        &mut self,
        friction: bool,
    ) {
        for p in &mut self.particles {
            if friction {
                p.vx = (p.vx * 13) >> 4;
                p.vy = (p.vy * 13) >> 4;
            }
            p.x += p.vx;
            p.y += p.vy;
            p.vy += GRAVITY;
        }
    }
}

impl Animate for Rocket {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        self.phase_ms += tick.elapsed_ms;
        match self.phase {
            Phase::Inactive => {
                if self.phase_ms >= self.wait_ms {
                    self.wait_ms = INACTIVE_MS;
                    self.launch(tick.now_ms);
                }
            }
            Phase::Launching => {
                if self.phase_ms >= LAUNCH_MS {
                    self.enter(Phase::Ascending);
                }
            }
            Phase::Ascending => {
                self.y -= ASCENT_SPEED;
                if self.y <= self.burst_y {
                    self.explode(tick.now_ms);
                }
            }
            Phase::Exploding => {
                self.move_particles(false);
                if self.phase_ms >= EXPLODE_MS {
                    self.enter(Phase::Fading);
                }
            }
            Phase::Fading => {
                self.move_particles(true);
                self.brightness = self.brightness.saturating_sub(FADE_STEP);
                if self.phase_ms >= FADE_MS || self.brightness == 0 {
                    self.brightness = 0;
                    self.enter(Phase::Inactive);
                }
            }
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        match self.phase {
            Phase::Inactive => {}
            Phase::Launching | Phase::Ascending => {
                fb.vline(self.x, self.y + 1, self.y + 3, Hsv::new(20, 200, 200).to_color());
                fb.set_pixel(self.x, self.y, Hsv::new(self.hue(), 60, 255).to_color());
            }
            Phase::Exploding | Phase::Fading => {
                let color = Hsv::new(self.hue(), 255, self.brightness).to_color();
                for p in &self.particles {
                    let (x, y) = p.pixel();
                    fb.rect(x, y, x + 1, y + 1, color, true);
                }
            }
        }
    }

    fn bounds(&self) -> Rect {
        match self.phase {
            Phase::Inactive => Rect::EMPTY,
            Phase::Launching | Phase::Ascending => Rect::new(self.x, self.y, self.x, self.y + 3),
            Phase::Exploding | Phase::Fading => self.particles.iter().fold(Rect::EMPTY, |acc, p| {
                let (x, y) = p.pixel();
                acc.union(&Rect::new(x, y, x + 1, y + 1))
            }),
        }
    }

    fn z_order(&self) -> u8 { 1 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::Wind;

    const STEP_MS: u32 = 120;

    fn step(
        r: &mut Rocket,
        now: &mut u32,
    ) {
        *now += STEP_MS;
        r.update(&Tick::new(*now, STEP_MS, Wind::CALM));
    }

    #[test]
    fn test_launches_are_staggered() {
        let (mut a, mut b) = (Rocket::new(0), Rocket::new(2));
        let mut now = 0;
        while now < INACTIVE_MS {
            assert_eq!(a.bounds(), Rect::EMPTY);
            a.update(&Tick::new(now + STEP_MS, STEP_MS, Wind::CALM));
            b.update(&Tick::new(now + STEP_MS, STEP_MS, Wind::CALM));
            now += STEP_MS;
        }
        assert_eq!(a.phase(), Phase::Launching);
        assert_eq!(b.phase(), Phase::Inactive);
    }

    #[test]
    fn test_full_cycle() {
        let mut r = Rocket::new(1);
        let mut now = 0;
        while r.phase() == Phase::Inactive {
            step(&mut r, &mut now);
        }
        assert!((5..=130).contains(&r.x));
        assert!((30..=80).contains(&r.burst_y));

        step(&mut r, &mut now);
        assert_eq!(r.phase(), Phase::Ascending);

        let mut last_y = r.y;
        while r.phase() == Phase::Ascending {
            step(&mut r, &mut now);
            assert!(r.y < last_y);
            last_y = r.y;
        }
        assert_eq!(r.phase(), Phase::Exploding);
        assert_eq!(r.brightness, 255);
        assert!(r.particles.iter().all(|p| p.pixel() == (r.x, r.y)));

        while r.phase() == Phase::Exploding {
            step(&mut r, &mut now);
        }
        assert_eq!(r.phase(), Phase::Fading);
        while r.phase() == Phase::Fading {
            step(&mut r, &mut now);
        }
        assert_eq!(r.phase(), Phase::Inactive);
        assert_eq!(r.bounds(), Rect::EMPTY);
    }

    #[test]
    fn test_gravity_pulls_particles_down() {
        let mut r = Rocket::new(0);
        r.x = 60;
        r.y = 50;
        r.explode(0);
        let vy0 = r.particles[0].vy;
        r.move_particles(false);
        assert_eq!(r.particles[0].vy, vy0 + GRAVITY);
        assert_eq!(r.particles[0].vx, 16 * 20 >> 4);
    }

    #[test]
    fn test_fading_friction() {
        let mut p = Particle { x: 0, y: 0, vx: 32, vy: -32 };
        let mut r = Rocket::new(0);
        r.particles = [p; PARTICLES];
        r.move_particles(true);
        p = r.particles[0];
        assert_eq!((p.vx, p.vy), (26, -26 + GRAVITY));
    }
}
