//! Drifting clouds.
//!
//! Clouds move horizontally at a wind-driven velocity. When one leaves the
//! screen it respawns one spacing gap beyond the sibling furthest upwind, so
//! the set keeps an even rhythm and clouds never respawn on top of each other.

use super::{Animate, Sprite, Tick};
use crate::color::Hsv;
use crate::config::layout::{CULL_LEFT, CULL_RIGHT};
use crate::config::SCREEN_WIDTH;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::weather::{Intensity, Weather};

/// Horizontal gap between a respawned cloud and the sibling it follows.
pub const RESPAWN_GAP: i16 = 45;

/// A cloud that crossed this far past an edge respawns.
const WRAP_MARGIN: i16 = 20;

const TOP_Y: i16 = 25;

/// Cloud shade. Storm clouds darken with precipitation intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloudTone {
    Light,
    DarkLight,
    DarkMedium,
    DarkHeavy,
}

impl CloudTone {
    pub const fn for_weather(weather: Weather) -> Self {
        match weather {
            Weather::Rain(i) | Weather::Snow(i) => match i {
                Intensity::Light => Self::DarkLight,
                Intensity::Medium => Self::DarkMedium,
                Intensity::Heavy => Self::DarkHeavy,
            },
            _ => Self::Light,
        }
    }

    /// Grey values for the body and the lighter top puff.
    const fn values(self) -> (u8, u8) {
        match self {
            Self::Light => (160, 150),
            Self::DarkLight => (150, 140),
            Self::DarkMedium => (110, 100),
            Self::DarkHeavy => (70, 60),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cloud {
    pub x: i16,
    pub y: i16,
    pub vx: i8,
    pub tone: CloudTone,
}

impl Cloud {
    pub const fn new(
        x: i16,
        y: i16,
        vx: i8,
        tone: CloudTone,
    ) -> Self {
        Self { x, y, vx, tone }
    }
}

impl Animate for Cloud {
    fn update(
        &mut self,
        _tick: &Tick,
    ) {
        self.x += i16::from(self.vx);
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        if self.x < CULL_LEFT || self.x > CULL_RIGHT {
            return;
        }
        let (main, top) = self.tone.values();
        let main = Hsv::grey(main).to_color();
        let (x, y) = (self.x, self.y);

        fb.circle(x, y, 9, main, true);
        fb.circle(x + 10, y + 2, 7, main, true);
        fb.circle(x - 8, y + 2, 7, main, true);
        fb.circle(x + 5, y - 4, 6, Hsv::grey(top).to_color(), true);
    }

    fn bounds(&self) -> Rect { Rect::new(self.x - 16, self.y - 11, self.x + 18, self.y + 10) }
}

// =============================================================================
// Set Operations
// =============================================================================

/// Evenly spaced starting row for `count` clouds, centred on the screen.
pub fn layout(
    count: usize,
    vx: i8,
    tone: CloudTone,
) -> impl Iterator<Item = Cloud> {
    let spacing: i16 = match count {
        0 | 1 => 0,
        2 => 70,
        3 => 45,
        4 => 34,
        _ => 26,
    };
    let total = spacing * (count.saturating_sub(1) as i16);
    let start = ((SCREEN_WIDTH as i16 - total) / 2).min(117 - total).max(10);

    (0..count).map(move |i| {
        let i = i as i16;
        Cloud::new(start + i * spacing, TOP_Y + (i * 7) % 18, vx, tone)
    })
}

/// Respawn clouds that drifted off screen behind their furthest sibling.
///
/// Only [`Sprite::Cloud`] entries take part; other sprites in the slice are
/// ignored. Clouds are handled in slice order so a second wrapping cloud lines
/// up behind the first one's new position.
pub fn respawn_wrapped(sprites: &mut [Sprite]) {
    let right_edge = SCREEN_WIDTH as i16 + WRAP_MARGIN;

    for i in 0..sprites.len() {
        let Sprite::Cloud(cloud) = &sprites[i] else { continue };
        let (x, vx) = (cloud.x, cloud.vx);
        let leaving_left = vx <= 0 && x < -WRAP_MARGIN;
        let leaving_right = vx > 0 && x > right_edge;
        if !leaving_left && !leaving_right {
            continue;
        }

        let siblings = sprites.iter().enumerate().filter_map(|(j, s)| match s {
            Sprite::Cloud(c) if j != i => Some(c.x),
            _ => None,
        });
        let new_x = if leaving_left {
            siblings.max().map_or(SCREEN_WIDTH as i16, |m| m + RESPAWN_GAP)
        } else {
            siblings.min().map_or(0, |m| m - RESPAWN_GAP)
        };

        if let Sprite::Cloud(cloud) = &mut sprites[i] {
            cloud.x = new_x;
            cloud.y = TOP_Y + (i as i16 * 7) % 20;
        }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
