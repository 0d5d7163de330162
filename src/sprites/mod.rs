//! Animated sprites and their motion models.
//!
//! Every sprite implements [`Animate`]: advance its motion model, draw itself
//! into the framebuffer, and report the rectangle it currently covers. The
//! [`Sprite`] sum type wraps all variants so a category's sprites can live in
//! one homogeneous collection and the animator never needs to know which kind
//! it is moving.
//!
//! # Motion Models
//!
//! | Variant     | Model                                          |
//! |-------------|------------------------------------------------|
//! | Cloud       | linear drift, respawn relative to siblings     |
//! | Raindrop    | linear fall with wind drift, reset at ground   |
//! | Snowflake   | slow fall with per-slot drift, reset at ground |
//! | Ghost       | bounce drift plus triangle-wave bob            |
//! | Smoke       | pooled particles: rise, drift, shrink, fade    |
//! | Bird        | drift with sine bob, horizontal wrap           |
//! | Butterfly   | figure-eight flutter plus decaying wander      |
//! | Bee         | orbit plus high-frequency buzz                 |
//! | Firefly     | slow drift with blink and fade                 |
//! | Rocket      | launch, ascend, burst into gravity particles   |
//!
//! A sprite whose footprint leaves the scene still updates (so periodic motion
//! stays in phase) but is never drawn; see [`is_visible`].

pub mod bee;
pub mod bird;
pub mod butterfly;
pub mod cloud;
pub mod firefly;
pub mod ghost;
pub mod raindrop;
pub mod rocket;
pub mod smoke;
pub mod snowflake;

pub use bee::Bee;
pub use bird::Bird;
pub use butterfly::Butterfly;
pub use cloud::{Cloud, CloudTone};
pub use firefly::Firefly;
pub use ghost::Ghost;
pub use raindrop::Raindrop;
pub use rocket::Rocket;
pub use smoke::SmokeParticle;
pub use snowflake::Snowflake;

use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::weather::Wind;

// =============================================================================
// Capability
// =============================================================================

/// Time and environment handed to one update step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Monotonic milliseconds since boot.
    pub now_ms: u32,
    /// Milliseconds since this sprite's category last updated.
    pub elapsed_ms: u32,
    pub wind: Wind,
}

impl Tick {
    pub const fn new(
        now_ms: u32,
        elapsed_ms: u32,
        wind: Wind,
    ) -> Self {
        Self {
            now_ms,
            elapsed_ms,
            wind,
        }
    }
}

/// Something the animator can move, paint and erase.
pub trait Animate {
    /// Advance the motion model by one step.
    fn update(
        &mut self,
        tick: &Tick,
    );

    /// Paint at the current position.
    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    );

    /// Rectangle covered by [`Animate::draw`] at the current position.
    ///
    /// Must contain every pixel `draw` can touch. Inactive sprites report
    /// [`Rect::EMPTY`].
    fn bounds(&self) -> Rect;

    /// Paint order, lower first.
    fn z_order(&self) -> u8 { 0 }
}

/// True if any part of `bounds` lies inside the animated scene.
#[inline]
pub const fn is_visible(bounds: &Rect) -> bool { bounds.intersects(&Rect::SCENE) }

/// Deterministic hash used wherever a sprite needs "random" variety.
///
/// Layouts must be reproducible, so every pseudo-random choice is a pure
/// function of a seed (usually the current time) and a slot index. Callers
/// should take the upper bits; the low bits of an LCG step are weak.
#[inline]
pub const fn pseudo_random(
    seed: u32,
    idx: u32,
) -> u32 {
    seed.wrapping_mul(1_103_515_245).wrapping_add(idx.wrapping_mul(12_345))
}

/// Upper bits of [`pseudo_random`] reduced to `0..n`.
#[inline]
pub const fn random_below(
    seed: u32,
    idx: u32,
    n: u32,
) -> u32 {
    if n == 0 { 0 } else { (pseudo_random(seed, idx) >> 16) % n }
}

// =============================================================================
// Sum Type
// =============================================================================

/// Any sprite in the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Sprite {
    Cloud(Cloud),
    Ghost(Ghost),
    Raindrop(Raindrop),
    Snowflake(Snowflake),
    Smoke(SmokeParticle),
    Bird(Bird),
    Butterfly(Butterfly),
    Bee(Bee),
    Firefly(Firefly),
    Rocket(Rocket),
}

macro_rules! dispatch {
    ($sprite:expr, $inner:ident => $body:expr) => {
        match $sprite {
            Sprite::Cloud($inner) => $body,
            Sprite::Ghost($inner) => $body,
            Sprite::Raindrop($inner) => $body,
            Sprite::Snowflake($inner) => $body,
            Sprite::Smoke($inner) => $body,
            Sprite::Bird($inner) => $body,
            Sprite::Butterfly($inner) => $body,
            Sprite::Bee($inner) => $body,
            Sprite::Firefly($inner) => $body,
            Sprite::Rocket($inner) => $body,
        }
    };
}

impl Animate for Sprite {
    fn update(
        &mut self,
        tick: &Tick,
    ) {
        dispatch!(self, s => s.update(tick))
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        dispatch!(self, s => s.draw(fb))
    }

    fn bounds(&self) -> Rect { dispatch!(self, s => s.bounds()) }

    /// Back to front: sky objects, then ground-level effects, then creatures,
    /// with precipitation on top of everything.
    fn z_order(&self) -> u8 {
        match self {
            Self::Cloud(_) => 0,
            Self::Rocket(_) => 1,
            Self::Bird(_) => 2,
            Self::Smoke(_) => 3,
            Self::Ghost(_) => 4,
            Self::Butterfly(_) | Self::Bee(_) | Self::Firefly(_) => 5,
            Self::Snowflake(_) | Self::Raindrop(_) => 6,
        }
    }
}

impl From<Cloud> for Sprite {
    fn from(c: Cloud) -> Self { Self::Cloud(c) }
}

impl From<Ghost> for Sprite {
    fn from(g: Ghost) -> Self { Self::Ghost(g) }
}

impl From<Raindrop> for Sprite {
    fn from(r: Raindrop) -> Self { Self::Raindrop(r) }
}

impl From<Snowflake> for Sprite {
    fn from(s: Snowflake) -> Self { Self::Snowflake(s) }
}

impl From<SmokeParticle> for Sprite {
    fn from(p: SmokeParticle) -> Self { Self::Smoke(p) }
}

impl From<Bird> for Sprite {
    fn from(b: Bird) -> Self { Self::Bird(b) }
}

impl From<Butterfly> for Sprite {
    fn from(b: Butterfly) -> Self { Self::Butterfly(b) }
}

impl From<Bee> for Sprite {
    fn from(b: Bee) -> Self { Self::Bee(b) }
}

impl From<Firefly> for Sprite {
    fn from(f: Firefly) -> Self { Self::Firefly(f) }
}

impl From<Rocket> for Sprite {
    fn from(r: Rocket) -> Self { Self::Rocket(r) }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::blank_pixels;

    #[test]
    fn test_pseudo_random_is_deterministic() {
        assert_eq!(pseudo_random(7, 3), pseudo_random(7, 3));
        assert_ne!(pseudo_random(7, 3), pseudo_random(7, 4));
        assert_eq!(pseudo_random(0, 0), 0);
        assert!((0..500).all(|i| random_below(1234, i, 25) < 25));
        assert_eq!(random_below(99, 1, 0), 0);
    }

    #[test]
    fn test_visibility_uses_scene_band() {
        assert!(is_visible(&Rect::new(-10, -10, 0, 0)));
        assert!(!is_visible(&Rect::new(-40, 10, -1, 20)));
        assert!(!is_visible(&Rect::new(10, 155, 20, 160)));
        assert!(!is_visible(&Rect::EMPTY));
    }

    #[test]
    fn test_z_order_puts_clouds_behind_precipitation() {
        let cloud = Sprite::from(Cloud::new(50, 30, -1, CloudTone::Light));
        let ghost = Sprite::from(Ghost::new(60, 50, -1, 40, 6));
        let drop = Sprite::from(Raindrop::new(0));
        assert!(cloud.z_order() < ghost.z_order());
        assert!(ghost.z_order() < drop.z_order());
    }

    #[test]
    fn test_every_variant_draws_inside_its_bounds() {
        let tick = Tick::new(5_000, 50, Wind::CALM);
        let mut rocket = Rocket::new(0);
        for step in 0..40 {
            rocket.update(&Tick::new(2_000 + step * 120, 120, Wind::CALM));
        }
        let mut smoke = SmokeParticle::INACTIVE;
        smoke.spawn(3, 1_000);

        let sprites = [
            Sprite::from(Cloud::new(60, 40, -1, CloudTone::DarkHeavy)),
            Sprite::from(Ghost::new(60, 80, 1, 20, 8)),
            Sprite::from(Raindrop::new(4)),
            Sprite::from(Snowflake::new(7)),
            Sprite::from(smoke),
            Sprite::from(Bird::new(50.0, 60, 0.02, 0)),
            Sprite::from(Butterfly::new(70.0, 100.0, 200, 1)),
            Sprite::from(Bee::new(40, 120, 12.0, 0.5)),
            Sprite::from(Firefly::new(90.0, 70.0, 2)),
            Sprite::from(rocket),
        ];

        for mut sprite in sprites {
            sprite.update(&tick);
            let mut px = blank_pixels();
            let mut fb = Framebuffer::new(&mut px);
            sprite.draw(&mut fb);
            if let Some(dirty) = fb.dirty() {
                let bounds = sprite.bounds().clamp_to(&Rect::SCREEN);
                assert_eq!(dirty.union(&bounds), bounds, "{sprite:?} drew {dirty:?} outside {bounds:?}");
            }
        }
    }
}
