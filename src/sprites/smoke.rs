//! Chimney smoke particle pool.
//!
//! A fixed set of slots; a slot is active while its brightness is nonzero.
//! Spawning and dying are separate events:
//!
//! - **Spawn** is time driven. The scene calls [`spawn`] at intervals drawn
//!   from a configured window; it claims the first inactive slot or does
//!   nothing when the pool is full.
//! - **Death** is state driven. A particle deactivates when it has faded out,
//!   risen above the smoke ceiling, or drifted off the screen.
//!
//! Ages advance by 8 per tick and wrap, so the drift and shrink cadences are
//! expressed in age units rather than ticks.

use super::{Animate, Sprite, Tick};
use crate::color::Hsv;
use crate::config::layout::{CHIMNEY_TOP_Y, CHIMNEY_X, SMOKE_CEILING_Y};
use crate::config::MAX_X;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

/// Pool capacity.
pub const POOL_SIZE: usize = 12;

const AGE_STEP: u8 = 8;
const SPAWN_SIZE: u8 = 4;
const MIN_SIZE: u8 = 2;
const SPAWN_BRIGHTNESS: u8 = 180;
const FADE_STEP: u8 = 2;
/// Shrink by one pixel every this many age units.
const SHRINK_EVERY: u8 = 64;

/// Drift cadences (age units) for the slow, medium and fast tiers.
const DRIFT_FREQUENCIES: [u8; 3] = [48, 24, 12];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SmokeParticle {
    pub x: i16,
    pub y: i16,
    pub size: u8,
    pub brightness: u8,
    pub age: u8,
    pub drift_frequency: u8,
}

impl SmokeParticle {
    /// An empty slot.
    pub const INACTIVE: Self = Self {
        x: 0,
        y: 0,
        size: 0,
        brightness: 0,
        age: 0,
        drift_frequency: DRIFT_FREQUENCIES[0],
    };

    #[inline]
    pub const fn is_active(&self) -> bool { self.brightness != 0 }

    /// Start a fresh puff at the chimney top. `slot` and `now_ms` vary the
    /// jitter and drift tier between puffs.
    pub fn spawn(
        &mut self,
        slot: usize,
        now_ms: u32,
    ) {
        let jitter = (now_ms % 3) as i16 - 1;
        let tier = match now_ms.wrapping_add(slot as u32 * 17) % 10 {
            0..=2 => 0,
            3..=6 => 1,
            _ => 2,
        };
        *self = Self {
            x: CHIMNEY_X + jitter,
            y: CHIMNEY_TOP_Y,
            size: SPAWN_SIZE,
            brightness: SPAWN_BRIGHTNESS,
            age: 0,
            drift_frequency: DRIFT_FREQUENCIES[tier],
        };
    }
}

/// Claim the first inactive smoke slot in `pool` and return its index.
/// Returns `None` (and changes nothing) when every slot is busy.
pub fn spawn(
    pool: &mut [Sprite],
    now_ms: u32,
) -> Option<usize> {
    let free = pool.iter_mut().enumerate().find_map(|(slot, sprite)| match sprite {
        Sprite::Smoke(p) if !p.is_active() => Some((slot, p)),
        _ => None,
    });
    let (slot, particle) = free?;
    particle.spawn(slot, now_ms);
    Some(slot)
}

/// Number of live particles in `pool`.
pub fn active_count(pool: &[Sprite]) -> usize {
    pool.iter().filter(|s| matches!(s, Sprite::Smoke(p) if p.is_active())).count()
}

impl Animate for SmokeParticle {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        if !self.is_active() {
            return;
        }

        self.age = self.age.wrapping_add(AGE_STEP);
        self.y -= 1;
        if self.age % self.drift_frequency == 0 {
            self.x += i16::from(tick.wind.smoke_direction());
        }
        if self.size > MIN_SIZE && self.age % SHRINK_EVERY == 0 {
            self.size -= 1;
        }
        self.brightness = if self.brightness > 10 { self.brightness - FADE_STEP } else { 0 };

        if self.y < SMOKE_CEILING_Y || self.x < 0 || self.x > MAX_X + 1 {
            self.brightness = 0;
        }
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        if !self.is_active() {
            return;
        }
        fb.circle(self.x, self.y, i16::from(self.size), Hsv::grey(self.brightness).to_color(), true);
    }

    fn bounds(&self) -> Rect {
        if !self.is_active() {
            return Rect::EMPTY;
        }
        let r = i16::from(self.size);
        Rect::around(self.x, self.y, r, r)
    }

    fn z_order(&self) -> u8 { 3 }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::testing::blank_pixels;
    use crate::weather::{Wind, WindDirection, WindStrength};

    const TICK: Tick = Tick::new(0, 100, Wind::CALM);

    fn empty_pool() -> Vec<Sprite> { vec![Sprite::Smoke(SmokeParticle::INACTIVE); POOL_SIZE] }

    #[test]
    fn test_spawn_at_chimney() {
        let mut p = SmokeParticle::INACTIVE;
        assert!(!p.is_active());
        p.spawn(0, 1_000);
        assert!(p.is_active());
        assert_eq!((p.x, p.y), (CHIMNEY_X, CHIMNEY_TOP_Y));
        assert_eq!((p.size, p.brightness, p.age), (4, 180, 0));
        // (1000 + 0) % 10 == 0 selects the slow tier
        assert_eq!(p.drift_frequency, 48);
    }

    #[test]
    fn test_slow_tier_drifts_exactly_at_age_48() {
        let mut p = SmokeParticle::INACTIVE;
        p.spawn(0, 1_000);
        let x0 = p.x;
        for step in 1..=5 {
            p.update(&TICK);
            assert_eq!(p.x, x0, "moved early at step {step}");
        }
        p.update(&TICK);
        assert_eq!(p.age, 48);
        assert_eq!(p.x, x0 + 1);
        p.update(&TICK);
        assert_eq!(p.x, x0 + 1);
    }

    #[test]
    fn test_left_wind_pushes_smoke_left() {
        let tick = Tick::new(0, 100, Wind::new(WindStrength::Light, WindDirection::Left));
        let mut p = SmokeParticle::INACTIVE;
        p.spawn(1, 1_002);
        let x0 = p.x;
        for _ in 0..6 {
            p.update(&tick);
        }
        assert!(p.x < x0);
    }

    #[test]
    fn test_rises_shrinks_and_dies_at_ceiling() {
        let mut p = SmokeParticle::INACTIVE;
        p.spawn(0, 1_000);
        let mut ticks = 0;
        while p.is_active() {
            p.update(&TICK);
            ticks += 1;
            assert!(p.size >= MIN_SIZE);
        }
        // 116 -> 74 crosses the ceiling at 75 before the puff fades out
        assert_eq!(ticks, CHIMNEY_TOP_Y - SMOKE_CEILING_Y + 1);
        assert_eq!(p.size, 2);
        assert_eq!(p.bounds(), Rect::EMPTY);
    }

    #[test]
    fn test_fades_to_zero() {
        let mut p = SmokeParticle::INACTIVE;
        p.spawn(0, 1_000);
        p.y = 2_000;
        for _ in 0..85 {
            p.update(&TICK);
        }
        assert_eq!(p.brightness, 10);
        p.update(&TICK);
        assert!(!p.is_active());
    }

    #[test]
    fn test_puff_fills_its_bounds() {
        let mut pixels = blank_pixels();
        let mut fb = Framebuffer::new(&mut pixels);
        let mut p = SmokeParticle::INACTIVE;
        p.spawn(0, 1_000);
        p.draw(&mut fb);

        let bounds = p.bounds();
        let size = i16::from(p.size);
        assert_ne!(fb.get_pixel(p.x + size, p.y), Some(BLACK));
        assert_ne!(fb.get_pixel(p.x, p.y - size), Some(BLACK));
        for y in bounds.y1 - 2..=bounds.y2 + 2 {
            for x in bounds.x1 - 2..=bounds.x2 + 2 {
                if fb.get_pixel(x, y).is_some_and(|c| c != BLACK) {
                    assert!(bounds.contains(x, y), "({x}, {y}) outside {bounds:?}");
                }
            }
        }
    }

    #[test]
    fn test_pool_never_exceeds_capacity() {
        let mut pool = empty_pool();
        let mut spawned = 0;
        for t in 0..200u32 {
            if spawn(&mut pool, t * 37).is_some() {
                spawned += 1;
            }
            assert!(active_count(&pool) <= POOL_SIZE);
            if t % 3 == 0 {
                for s in &mut pool {
                    s.update(&TICK);
                }
            }
        }
        assert!(spawned > POOL_SIZE);

        let mut full = empty_pool();
        for t in 0..POOL_SIZE as u32 {
            assert_eq!(spawn(&mut full, t), Some(t as usize));
        }
        assert_eq!(spawn(&mut full, 99), None);
        assert_eq!(active_count(&full), POOL_SIZE);
    }
}
