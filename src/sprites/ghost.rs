//! Halloween ghosts.
//!
//! Ghosts drift sideways and turn around near the screen edges. The vertical
//! bob is a triangle wave over a 160-step phase, built from four linear
//! quarter ramps so no trigonometry is needed.

use super::{Animate, Tick};
use crate::color::{BLACK, Hsv};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;

/// Steps in one full bob cycle.
const PHASE_STEPS: u8 = 160;
const QUARTER: i16 = (PHASE_STEPS / 4) as i16;

const LEFT_TURN_X: i16 = 8;
const RIGHT_TURN_X: i16 = 127;

/// Starting layouts: (x, base_y, direction, phase, amplitude).
pub const LAYOUT: [(i16, i16, i8, u8, i16); 3] = [(20, 90, 1, 0, 8), (60, 50, -1, 40, 6), (100, 70, 1, 80, 10)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub x: i16,
    pub base_y: i16,
    pub dir: i8,
    pub phase: u8,
    pub amplitude: i16,
}

impl Ghost {
    pub const fn new(
        x: i16,
        base_y: i16,
        dir: i8,
        phase: u8,
        amplitude: i16,
    ) -> Self {
        Self {
            x,
            base_y,
            dir,
            phase: phase % PHASE_STEPS,
            amplitude,
        }
    }

    /// Current vertical centre.
    #[inline]
    pub const fn y(&self) -> i16 { self.base_y + bob_offset(self.phase, self.amplitude) }
}

/// Triangle-wave approximation of `amplitude * sin(phase)`.
pub const fn bob_offset(
    phase: u8,
    amplitude: i16,
) -> i16 {
    let p = (phase % PHASE_STEPS) as i16;
    let a = amplitude;
    match p / QUARTER {
        0 => a * p / QUARTER,
        1 => a - a * (p - QUARTER) / QUARTER,
        2 => -a * (p - 2 * QUARTER) / QUARTER,
        _ => -a + a * (p - 3 * QUARTER) / QUARTER,
    }
}

impl Animate for Ghost {
    fn update(
        &mut self,
        _tick: &Tick,
    ) {
        self.x += i16::from(self.dir);
        if self.x <= LEFT_TURN_X {
            self.dir = 1;
        } else if self.x >= RIGHT_TURN_X {
            self.dir = -1;
        }
        self.phase = (self.phase + 1) % PHASE_STEPS;
    }

    fn draw(
        &self,
        fb: &mut Framebuffer<'_>,
    ) {
        let (x, y) = (self.x, self.y());
        let body = Hsv::new(170, 20, 235).to_color();

        // Head, sheet and ragged hem
        fb.circle(x, y, 7, body, true);
        fb.rect(x - 7, y, x + 7, y + 10, body, true);
        for hem_x in [x - 5, x, x + 5] {
            fb.circle(hem_x, y + 11, 2, body, true);
        }

        fb.circle(x - 3, y - 2, 1, BLACK, true);
        fb.circle(x + 3, y - 2, 1, BLACK, true);
        fb.ellipse(x, y + 4, 1, 2, BLACK, true);
    }

    fn bounds(&self) -> Rect {
        let y = self.y();
        Rect::new(self.x - 7, y - 7, self.x + 7, y + 13)
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
