//! Static scenery painted before the background snapshot.
//!
//! Nothing here moves. [`draw`] paints the sky, sun or moon, ground, trees,
//! cabin and the season's props; the `draw_*` helpers paint decorations owned
//! by a category (pumpkins, advent ornaments, summer flowers). All of it ends
//! up in the snapshot, so sprites can be erased over it.

use super::calendar::Season;
use crate::color::Hsv;
use crate::config::GROUND_Y;
use crate::config::layout::{CABIN_HEIGHT, CABIN_X, CHIMNEY_HEIGHT, CHIMNEY_WIDTH, ROOF_HEIGHT, SCENE_BOTTOM, TREE_X};
use crate::framebuffer::Framebuffer;
use crate::sprites::bee;
use crate::weather::Weather;

/// Sun and moon positions are quantised into this many slots across the sky.
pub const CELESTIAL_SLOTS: u8 = 8;

const STARS: [(i16, i16); 13] = [
    (20, 15),
    (50, 25),
    (90, 18),
    (110, 30),
    (65, 12),
    (100, 22),
    (80, 30),
    (120, 15),
    (10, 25),
    (28, 20),
    (85, 8),
    (70, 25),
    (60, 15),
];

const PUMPKINS: [(i16, i16, i16); 3] = [(25, 145, 8), (55, 143, 10), (90, 144, 9)];

/// Advent ornaments hang on two strings across the top of the sky.
const ADVENT_DAYS: u8 = 24;

const TRUNK: Hsv = Hsv::new(20, 200, 100);
const SNOW: Hsv = Hsv::new(170, 40, 255);

/// Inputs for the static scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scenery {
    pub season: Season,
    pub weather: Weather,
    pub daytime: bool,
    /// `0..CELESTIAL_SLOTS`, left to right.
    pub celestial_slot: u8,
    pub layer_hue: u8,
}

/// Slot for a day or night cycle progress (`0..=255`).
#[inline]
pub const fn celestial_slot(progress: u8) -> u8 { progress / (256 / CELESTIAL_SLOTS as u16) as u8 }

/// Centre of the sun or moon for `slot`: an arc that is highest mid-cycle.
pub const fn celestial_position(slot: u8) -> (i16, i16) {
    let slot = (if slot >= CELESTIAL_SLOTS { CELESTIAL_SLOTS - 1 } else { slot }) as i16;
    let d = 2 * slot - 7;
    (15 + slot * 15, 15 + d * d * 35 / 49)
}

/// Sky fill for the current light and weather.
pub const fn sky(
    daytime: bool,
    weather: Weather,
) -> Hsv {
    match (daytime, weather) {
        (false, _) => Hsv::new(170, 200, 25),
        (true, Weather::Rain(_) | Weather::Snow(_)) => Hsv::grey(70),
        (true, Weather::Overcast) => Hsv::grey(95),
        (true, _) => Hsv::new(145, 160, 120),
    }
}

/// Paint the whole static scene region.
pub fn draw(
    fb: &mut Framebuffer<'_>,
    scenery: &Scenery,
) {
    let sky = sky(scenery.daytime, scenery.weather);
    fb.rect(0, 0, crate::config::MAX_X, SCENE_BOTTOM, sky.to_color(), true);

    let (cx, cy) = celestial_position(scenery.celestial_slot);
    if scenery.daytime {
        draw_sun(fb, cx, cy, scenery.celestial_slot);
    } else {
        for (x, y) in STARS {
            fb.rect(x, y, x + 1, y + 1, Hsv::new(42, 50, 255).to_color(), true);
        }
        draw_moon(fb, cx, cy, sky);
    }

    draw_ground(fb, scenery.season);
    for x in TREE_X {
        draw_tree(fb, x, scenery.season, scenery.layer_hue);
    }
    draw_cabin(fb, scenery.season);

    match scenery.season {
        Season::Winter => draw_snowman(fb),
        Season::Spring => draw_meadow(fb, scenery.layer_hue),
        Season::Summer => {}
        Season::Fall => draw_fallen_leaves(fb),
    }
}

fn draw_sun(
    fb: &mut Framebuffer<'_>,
    x: i16,
    y: i16,
    slot: u8,
) {
    // Low sun near sunrise and sunset glows orange
    let hue = if slot == 0 || slot == CELESTIAL_SLOTS - 1 { 10 } else { 42 };
    fb.circle(x, y, 9, Hsv::new(hue, 255, 255).to_color(), true);

    let ray = Hsv::new(hue, 255, 200).to_color();
    for (dx, dy) in [(12, 0), (9, -9), (0, -12), (-9, -9), (-12, 0), (-9, 9), (0, 12), (9, 9)] {
        fb.rect(x + dx - 1, y + dy - 1, x + dx + 1, y + dy + 1, ray, true);
    }
}

fn draw_moon(
    fb: &mut Framebuffer<'_>,
    x: i16,
    y: i16,
    sky: Hsv,
) {
    fb.circle(x, y, 8, Hsv::new(42, 30, 235).to_color(), true);
    // Crescent: bite out of the right side in sky colour
    fb.circle(x + 4, y - 2, 7, sky.to_color(), true);
}

fn draw_ground(
    fb: &mut Framebuffer<'_>,
    season: Season,
) {
    let max_x = crate::config::MAX_X;
    if season == Season::Winter {
        fb.rect(0, GROUND_Y, max_x, SCENE_BOTTOM, SNOW.to_color(), true);
    } else {
        fb.rect(0, GROUND_Y, max_x, GROUND_Y + 1, Hsv::new(85, 180, 100).to_color(), true);
        fb.rect(0, GROUND_Y + 2, max_x, SCENE_BOTTOM, Hsv::new(20, 150, 60).to_color(), true);
    }
}

fn draw_tree(
    fb: &mut Framebuffer<'_>,
    x: i16,
    season: Season,
    layer_hue: u8,
) {
    let trunk_height = if season == Season::Spring { 28 } else { 22 };
    let top = GROUND_Y - trunk_height;
    fb.rect(x - 3, top, x + 3, GROUND_Y, TRUNK.to_color(), true);

    let crown_y = top - 7;
    match season {
        Season::Winter => {
            let branch = Hsv::new(20, 150, 80).to_color();
            fb.rect(x - 8, top - 10, x - 6, top - 2, branch, true);
            fb.rect(x - 12, top - 8, x - 8, top - 6, branch, true);
            fb.rect(x + 6, top - 10, x + 8, top - 2, branch, true);
            fb.rect(x + 8, top - 8, x + 12, top - 6, branch, true);
            fb.rect(x - 6, top - 6, x - 4, top + 2, branch, true);
            fb.rect(x + 4, top - 6, x + 6, top + 2, branch, true);
            let snow = SNOW.to_color();
            fb.rect(x - 9, top - 11, x - 5, top - 10, snow, true);
            fb.rect(x + 5, top - 11, x + 9, top - 10, snow, true);
            fb.rect(x - 13, top - 9, x - 7, top - 8, snow, true);
            fb.rect(x + 7, top - 9, x + 13, top - 8, snow, true);
        }
        Season::Spring => {
            fb.circle(x, crown_y, 15, Hsv::new(85, 220, 200).to_color(), true);
            let blossom = Hsv::new(layer_hue.wrapping_add(106), 200, 230).to_color();
            for i in 0..9i16 {
                if i != 4 {
                    fb.circle(x + (i % 3 - 1) * 7, crown_y + (i / 3 - 1) * 7, 2, blossom, true);
                }
            }
        }
        Season::Summer => {
            fb.circle(x, crown_y, 16, Hsv::new(85, 255, 200).to_color(), true);
            fb.circle(x - 9, crown_y + 3, 11, Hsv::new(85, 255, 180).to_color(), true);
            fb.circle(x + 9, crown_y + 3, 11, Hsv::new(85, 255, 180).to_color(), true);
            let fruit = Hsv::new(layer_hue, 255, 220).to_color();
            for (dx, dy) in [(-4, -14), (6, -12), (-9, -11), (0, -4), (-12, -5), (13, -6), (-8, 8), (4, 9), (10, 6)] {
                fb.circle(x + dx, crown_y + dy, 2, fruit, true);
            }
        }
        Season::Fall => {
            fb.circle(x, crown_y, 15, Hsv::new(20, 255, 200).to_color(), true);
            fb.circle(x - 8, crown_y + 3, 10, Hsv::new(10, 255, 220).to_color(), true);
            fb.circle(x + 8, crown_y + 3, 10, Hsv::new(30, 255, 200).to_color(), true);
        }
    }
}

fn draw_cabin(
    fb: &mut Framebuffer<'_>,
    season: Season,
) {
    const HALF_WIDTH: i16 = 12;
    let (x, base) = (CABIN_X, GROUND_Y);
    let wall_top = base - CABIN_HEIGHT;

    fb.rect(x - HALF_WIDTH, wall_top, x + HALF_WIDTH, base, Hsv::new(20, 200, 120).to_color(), true);

    let roof = Hsv::new(15, 180, 80).to_color();
    for i in 0..ROOF_HEIGHT {
        let y = wall_top - i;
        fb.hline(x - (HALF_WIDTH + ROOF_HEIGHT - i), x + (HALF_WIDTH + ROOF_HEIGHT - i), y, roof);
        if season == Season::Winter {
            fb.hline(x - (HALF_WIDTH + ROOF_HEIGHT - i), x - (HALF_WIDTH - i), y - 1, SNOW.to_color());
            fb.hline(x + (HALF_WIDTH - i), x + (HALF_WIDTH + ROOF_HEIGHT - i), y - 1, SNOW.to_color());
        }
    }

    fb.rect(x - 3, base - 10, x + 3, base, Hsv::new(15, 220, 60).to_color(), true);
    fb.rect(x + 5, wall_top + 5, x + 11, wall_top + 11, Hsv::new(42, 150, 255).to_color(), true);
    fb.vline(x + 8, wall_top + 5, wall_top + 11, TRUNK.to_color());
    fb.hline(x + 5, x + 11, wall_top + 8, TRUNK.to_color());

    let chimney_top = wall_top - ROOF_HEIGHT - CHIMNEY_HEIGHT + 2;
    fb.rect(
        x + 5,
        chimney_top,
        x + 5 + CHIMNEY_WIDTH,
        wall_top - ROOF_HEIGHT + 3,
        Hsv::new(10, 200, 100).to_color(),
        true,
    );
}

fn draw_snowman(fb: &mut Framebuffer<'_>) {
    let snow = SNOW.to_color();
    fb.circle(88, GROUND_Y - 5, 5, snow, true);
    fb.circle(88, GROUND_Y - 13, 4, snow, true);
    fb.circle(88, GROUND_Y - 19, 3, snow, true);
    fb.set_pixel(87, GROUND_Y - 20, crate::color::BLACK);
    fb.set_pixel(89, GROUND_Y - 20, crate::color::BLACK);
    fb.hline(89, 91, GROUND_Y - 19, Hsv::new(20, 255, 230).to_color());
}

fn draw_meadow(
    fb: &mut Framebuffer<'_>,
    layer_hue: u8,
) {
    for (i, x) in [10i16, 46, 52, 84, 125].into_iter().enumerate() {
        fb.vline(x, GROUND_Y - 5, GROUND_Y - 1, Hsv::new(85, 220, 150).to_color());
        let petal = Hsv::new(layer_hue.wrapping_add(i as u8 * 40), 200, 240).to_color();
        fb.circle(x, GROUND_Y - 6, 2, petal, true);
    }
}

fn draw_fallen_leaves(fb: &mut Framebuffer<'_>) {
    for (i, x) in [8i16, 19, 41, 50, 77, 84, 126].into_iter().enumerate() {
        let hue = [10u8, 20, 30][i % 3];
        fb.rect(x, GROUND_Y - 2, x + 2, GROUND_Y - 1, Hsv::new(hue, 255, 200).to_color(), true);
    }
}

// =============================================================================
// Category Decorations
// =============================================================================

/// Halloween pumpkins on the ground; faces glow at night.
pub fn draw_pumpkins(
    fb: &mut Framebuffer<'_>,
    daytime: bool,
) {
    for (x, y, size) in PUMPKINS {
        fb.ellipse(x, y, size, size * 3 / 4, Hsv::new(20, 255, 230).to_color(), true);
        fb.rect(x - 1, y - size * 3 / 4 - 3, x + 1, y - size * 3 / 4, Hsv::new(85, 200, 100).to_color(), true);

        let face = if daytime { Hsv::new(15, 255, 60) } else { Hsv::new(42, 255, 255) };
        let face = face.to_color();
        fb.rect(x - size / 2, y - 2, x - size / 2 + 1, y - 1, face, true);
        fb.rect(x + size / 2 - 1, y - 2, x + size / 2, y - 1, face, true);
        fb.hline(x - size / 3, x + size / 3, y + 2, face);
    }
}

/// Number of advent ornaments shown on December `day`.
#[inline]
pub const fn advent_count(day: u8) -> u8 { if day > ADVENT_DAYS { ADVENT_DAYS } else { day } }

/// Advent ornaments: one per December day up to the 24th.
pub fn draw_advent(
    fb: &mut Framebuffer<'_>,
    day: u8,
) {
    let string = Hsv::new(85, 200, 120).to_color();
    fb.hline(2, 132, 4, string);
    fb.hline(2, 132, 12, string);
    for i in 0..i16::from(advent_count(day)) {
        let x = 8 + (i % 12) * 11;
        let y = 7 + (i / 12) * 8;
        let hue = (i as u8).wrapping_mul(37);
        fb.circle(x, y, 2, Hsv::new(hue, 230, 255).to_color(), true);
    }
}

/// Flowers the summer bees orbit.
pub fn draw_flowers(fb: &mut Framebuffer<'_>) {
    for (i, (x, y, _, _)) in bee::LAYOUT.into_iter().enumerate() {
        fb.vline(x, y + 3, GROUND_Y - 1, Hsv::new(85, 220, 150).to_color());
        let petal = Hsv::new([0u8, 200, 230][i % 3], 200, 240).to_color();
        for (dx, dy) in [(-3, 0), (3, 0), (0, -3), (0, 3)] {
            fb.circle(x + dx, y + dy, 2, petal, true);
        }
        fb.circle(x, y, 1, Hsv::new(42, 255, 255).to_color(), true);
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
