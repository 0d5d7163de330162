//! Scene orchestration.
//!
//! [`Scene`] owns the framebuffer, the background snapshot and every active
//! category's sprites, and is driven by one call per main-loop iteration:
//!
//! ```text
//! housekeeping(now)
//!   |
//!   +-- scenery changed? --yes--> compose_static -> capture_background -> compose_dynamic
//!   |                               (full repaint, one snapshot, one full flush)
//!   no
//!   |
//!   +-- animator::tick over every due category (dirty rectangles only)
//!   +-- status bar repaint of changed bands
//!   +-- flush whatever is still dirty
//! ```
//!
//! A full repaint happens on startup, on request, and when the month, colour
//! layer, day/night state, sun or moon slot, weather or calendar event changes.
//! Wind is applied to the live clouds without repainting.

pub mod almanac;
pub mod backdrop;
pub mod calendar;
pub mod category;
mod compose;
pub mod status;

pub use almanac::{Almanac, DaylightCache, SunTimes, TableAlmanac};
pub use calendar::{ClockTime, Date, Season};
pub use category::{Category, CategoryState, Conditions, Lifecycle};
pub use compose::{DynamicPass, StaticPass};
pub use status::{StatusBar, StatusValues};

use heapless::Vec;

use self::backdrop::Scenery;
use crate::animator::{self, MAX_SPRITES, TickReport};
use crate::background::BackgroundStore;
use crate::color::layer_hue;
use crate::config::{PIXEL_COUNT, SceneConfig};
use crate::framebuffer::{FlushStats, Framebuffer, PanelSink};
use crate::sprites::{Animate, Sprite, Tick, cloud, smoke};
use crate::weather::{Weather, Wind};

/// Most events one housekeeping pass can report.
pub const MAX_EVENTS: usize = 24;

pub type SceneEvents = Vec<SceneEvent, MAX_EVENTS>;

/// What triggered a full repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum RedrawReason {
    Startup,
    Requested,
    Month,
    Layer,
    DayNight,
    /// The sun or moon moved to its next slot.
    Celestial,
    /// Weather or a calendar event changed.
    Scenery,
}

/// Lifecycle notifications, for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum SceneEvent {
    FullRedraw(RedrawReason),
    Activated(Category),
    Deactivated(Category),
    BackgroundCaptured,
}

/// External inputs, as last set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Inputs {
    date: Date,
    time: ClockTime,
    weather: Weather,
    wind: Wind,
    volume: u8,
    layer: u8,
}

/// Everything the static scene depends on. Any difference means a repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Composition {
    month: u8,
    layer: u8,
    scenery: Scenery,
    halloween: bool,
    /// Ornaments shown, 0 outside the advent season.
    advent: u8,
    new_years_eve: bool,
}

// =============================================================================
// Stage
// =============================================================================

/// All live sprites, sorted back to front, with the category owning each.
#[derive(Clone, Debug, Default)]
struct Stage {
    sprites: Vec<Sprite, MAX_SPRITES>,
    owners: Vec<Category, MAX_SPRITES>,
}

impl Stage {
    /// Insert after every sprite at the same or a lower z. Dropped when full.
    fn insert(
        &mut self,
        owner: Category,
        sprite: Sprite,
    ) {
        let z = sprite.z_order();
        let at = self.sprites.iter().position(|s| s.z_order() > z).unwrap_or(self.sprites.len());
        if self.sprites.insert(at, sprite).is_ok() {
            self.owners.insert(at, owner).ok();
        }
    }

    fn remove_owner(
        &mut self,
        owner: Category,
    ) {
        for i in (0..self.owners.len()).rev() {
            if self.owners[i] == owner {
                self.sprites.remove(i);
                self.owners.remove(i);
            }
        }
    }

    #[inline]
    fn is_empty(&self) -> bool { self.sprites.is_empty() }

    fn count(
        &self,
        owner: Category,
    ) -> usize {
        self.owners.iter().filter(|o| **o == owner).count()
    }
}

// =============================================================================
// Scene
// =============================================================================

/// The animated scene and everything it draws into.
pub struct Scene<'a, A: Almanac = TableAlmanac> {
    fb: Framebuffer<'a>,
    bg: BackgroundStore<'a>,
    config: SceneConfig,
    almanac: A,
    daylight: DaylightCache,
    inputs: Inputs,
    states: [CategoryState; Category::COUNT],
    stage: Stage,
    status: StatusBar,
    composed: Option<Composition>,
    redraw_requested: bool,
    needs_background: bool,
    /// When the last smoke puff spawned, and the gap before the next one.
    last_smoke_ms: u32,
    smoke_gap_ms: u32,
    last_tick: TickReport,
}

impl<'a> Scene<'a, TableAlmanac> {
    pub fn new(
        frame: &'a mut [u16; PIXEL_COUNT],
        snapshot: &'a mut [u16; PIXEL_COUNT],
        config: SceneConfig,
    ) -> Self {
        Self::with_almanac(frame, snapshot, config, TableAlmanac)
    }
}

impl<'a, A: Almanac> Scene<'a, A> {
    pub fn with_almanac(
        frame: &'a mut [u16; PIXEL_COUNT],
        snapshot: &'a mut [u16; PIXEL_COUNT],
        config: SceneConfig,
        almanac: A,
    ) -> Self {
        Self {
            fb: Framebuffer::new(frame),
            bg: BackgroundStore::new(snapshot),
            config,
            almanac,
            daylight: DaylightCache::new(),
            inputs: Inputs {
                date: Date::default(),
                time: ClockTime::default(),
                weather: Weather::Sunny,
                wind: Wind::CALM,
                volume: 0,
                layer: 0,
            },
            states: [CategoryState::INACTIVE; Category::COUNT],
            stage: Stage::default(),
            status: StatusBar::new(),
            composed: None,
            redraw_requested: false,
            needs_background: false,
            last_smoke_ms: 0,
            smoke_gap_ms: 0,
            last_tick: TickReport::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Inputs
    // -------------------------------------------------------------------------

    #[inline]
    pub fn set_date(
        &mut self,
        date: Date,
    ) {
        self.inputs.date = date;
    }

    #[inline]
    pub fn set_time(
        &mut self,
        time: ClockTime,
    ) {
        self.inputs.time = time;
    }

    #[inline]
    pub fn set_weather(
        &mut self,
        weather: Weather,
    ) {
        self.inputs.weather = weather;
    }

    /// New wind takes effect on the live clouds immediately, no repaint.
    pub fn set_wind(
        &mut self,
        wind: Wind,
    ) {
        self.inputs.wind = wind;
        let vx = wind.cloud_velocity();
        for sprite in &mut self.stage.sprites {
            if let Sprite::Cloud(c) = sprite {
                c.vx = vx;
            }
        }
    }

    /// Volume percentage, clamped to 100.
    #[inline]
    pub fn set_volume(
        &mut self,
        volume: u8,
    ) {
        self.inputs.volume = volume.min(100);
    }

    /// Colour layer `0..=3`; selects the widget and decoration hue.
    #[inline]
    pub fn set_layer(
        &mut self,
        layer: u8,
    ) {
        self.inputs.layer = layer;
    }

    #[inline]
    pub fn set_media_text(
        &mut self,
        text: &str,
    ) {
        self.status.set_media_text(text);
    }

    /// Repaint everything on the next housekeeping pass.
    #[inline]
    pub fn request_full_redraw(&mut self) { self.redraw_requested = true; }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[inline]
    pub fn framebuffer(&self) -> &Framebuffer<'a> { &self.fb }

    #[inline]
    pub fn background(&self) -> &BackgroundStore<'a> { &self.bg }

    #[inline]
    pub fn state(
        &self,
        category: Category,
    ) -> &CategoryState {
        &self.states[category.index()]
    }

    #[inline]
    pub fn lifecycle(
        &self,
        category: Category,
    ) -> Lifecycle {
        self.states[category.index()].lifecycle()
    }

    /// True while some active category still waits for the snapshot.
    #[inline]
    pub const fn needs_background(&self) -> bool { self.needs_background }

    /// Live sprites, back to front.
    #[inline]
    pub fn sprites(&self) -> &[Sprite] { &self.stage.sprites }

    /// Sprites owned by `category`.
    #[inline]
    pub fn sprite_count(
        &self,
        category: Category,
    ) -> usize {
        self.stage.count(category)
    }

    /// What the last animation tick did.
    #[inline]
    pub fn last_tick(&self) -> &TickReport { &self.last_tick }

    /// Transfer statistics since the last call.
    #[inline]
    pub fn take_stats(&mut self) -> FlushStats { self.fb.take_stats() }

    /// Sun times and day/night for the current inputs.
    pub fn conditions(&mut self) -> Conditions {
        let sun = self.daylight.get(&self.almanac, self.inputs.date);
        Conditions {
            date: self.inputs.date,
            weather: self.inputs.weather,
            daytime: sun.is_daytime(self.inputs.time),
        }
    }

    fn composition(&mut self) -> Composition {
        let Inputs {
            date,
            time,
            weather,
            layer,
            ..
        } = self.inputs;
        let sun = self.daylight.get(&self.almanac, date);
        Composition {
            month: date.month(),
            layer,
            scenery: Scenery {
                season: date.season(),
                weather,
                daytime: sun.is_daytime(time),
                celestial_slot: backdrop::celestial_slot(sun.cycle_progress(time)),
                layer_hue: layer_hue(layer),
            },
            halloween: date.is_halloween(),
            advent: if date.is_christmas() { backdrop::advent_count(date.day()) } else { 0 },
            new_years_eve: date.is_new_years_eve(),
        }
    }

    fn redraw_reason(
        &self,
        next: &Composition,
    ) -> Option<RedrawReason> {
        if self.redraw_requested {
            return Some(RedrawReason::Requested);
        }
        let Some(current) = &self.composed else {
            return Some(RedrawReason::Startup);
        };
        if current.month != next.month {
            Some(RedrawReason::Month)
        } else if current.layer != next.layer {
            Some(RedrawReason::Layer)
        } else if current.scenery.daytime != next.scenery.daytime {
            Some(RedrawReason::DayNight)
        } else if current.scenery.celestial_slot != next.scenery.celestial_slot {
            Some(RedrawReason::Celestial)
        } else if current != next {
            Some(RedrawReason::Scenery)
        } else {
            None
        }
    }

    fn status_values(&self) -> StatusValues {
        StatusValues {
            date: self.inputs.date,
            time: self.inputs.time,
            volume: self.inputs.volume,
            hue: layer_hue(self.inputs.layer),
        }
    }

    // -------------------------------------------------------------------------
    // Housekeeping
    // -------------------------------------------------------------------------

    /// One main-loop step: repaint everything if the scenery changed,
    /// otherwise advance every due category and flush what changed.
    pub fn housekeeping<S: PanelSink + ?Sized>(
        &mut self,
        now_ms: u32,
        sink: &mut S,
    ) -> SceneEvents {
        let next = self.composition();
        match self.redraw_reason(&next) {
            Some(reason) => self.compose_static(now_ms, reason).capture_background().compose_dynamic(sink),
            None => {
                self.animate(now_ms, sink);
                SceneEvents::new()
            }
        }
    }

    fn animate<S: PanelSink + ?Sized>(
        &mut self,
        now_ms: u32,
        sink: &mut S,
    ) {
        let values = self.status_values();
        let Self {
            fb,
            bg,
            config,
            inputs,
            states,
            stage,
            status,
            last_smoke_ms,
            smoke_gap_ms,
            last_tick,
            ..
        } = self;

        if !stage.is_empty() && bg.is_saved() {
            let Stage { sprites, owners } = stage;
            let wind = inputs.wind;
            *last_tick = animator::tick(fb, bg, sink, sprites.as_mut_slice(), |sprites, updated| {
                let mut clouds_moved = false;
                for category in Category::ALL {
                    let Some(elapsed) = states[category.index()].take_due(now_ms, category.tick_interval(config)) else {
                        continue;
                    };
                    let tick = Tick::new(now_ms, elapsed, wind);
                    for (i, sprite) in sprites.iter_mut().enumerate() {
                        if owners[i] == category {
                            sprite.update(&tick);
                            updated[i] = true;
                        }
                    }
                    clouds_moved |= category == Category::Clouds;
                }
                if clouds_moved {
                    cloud::respawn_wrapped(sprites);
                }

                let smoking = states[Category::Smoke.index()].lifecycle() == Lifecycle::Animating;
                if smoking && now_ms.wrapping_sub(*last_smoke_ms) >= *smoke_gap_ms {
                    if let Some(i) = smoke::spawn(sprites, now_ms) {
                        updated[i] = true;
                    }
                    *last_smoke_ms = now_ms;
                    *smoke_gap_ms = config.smoke_spawn_interval(now_ms);
                }
            });
        }

        status.render(fb, &values, now_ms, config.media_scroll_ms);
        fb.flush(sink);
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;
    use crate::config::layout::CHIMNEY_TOP_Y;
    use crate::geometry::Rect;
    use crate::testing::{RecordingSink, blank_pixels};
    use crate::weather::{Intensity, WindDirection, WindStrength};

    fn count(
        events: &[SceneEvent],
        wanted: SceneEvent,
    ) -> usize {
        events.iter().filter(|e| **e == wanted).count()
    }

    fn cloud_xs(scene: &Scene<'_>) -> std::vec::Vec<(i16, i8)> {
        scene
            .sprites()
            .iter()
            .filter_map(|s| match s {
                Sprite::Cloud(c) => Some((c.x, c.vx)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_winter_startup() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.set_date(Date::new(2025, 1, 10));

        let events = scene.housekeeping(0, &mut sink);
        assert_eq!(events[0], SceneEvent::FullRedraw(RedrawReason::Startup));
        assert_eq!(count(&events, SceneEvent::Activated(Category::Clouds)), 1);
        assert_eq!(count(&events, SceneEvent::Activated(Category::Smoke)), 1);
        assert_eq!(count(&events, SceneEvent::BackgroundCaptured), 1);
        assert_eq!(events.len(), 4);

        assert!(scene.background().is_saved());
        assert!(!scene.needs_background());
        assert_eq!(scene.lifecycle(Category::Clouds), Lifecycle::Animating);
        assert_eq!(scene.lifecycle(Category::Smoke), Lifecycle::Animating);
        assert_eq!(scene.lifecycle(Category::Snow), Lifecycle::Inactive);
        assert_eq!(scene.sprite_count(Category::Clouds), 3);
        assert_eq!(scene.sprite_count(Category::Smoke), smoke::POOL_SIZE);
        assert_eq!(sink.blits, [Rect::SCREEN]);
        assert_eq!(*sink.panel, *scene.framebuffer().pixels());
    }

    #[test]
    fn test_sprites_are_not_in_the_snapshot() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.housekeeping(0, &mut sink);

        let mut expected = blank_pixels();
        let mut reference = Framebuffer::new(&mut expected);
        reference.clear(BLACK);
        let composition = scene.composition();
        backdrop::draw(&mut reference, &composition.scenery);

        for y in 0..=Rect::SCENE.y2 {
            for x in 0..=Rect::SCENE.x2 {
                assert_eq!(scene.background().get_pixel(x, y), reference.get_pixel(x, y), "({x}, {y})");
            }
        }
        let fb = scene.framebuffer();
        let covered = (0..=Rect::SCENE.y2).any(|y| (0..=Rect::SCENE.x2).any(|x| fb.get_pixel(x, y) != reference.get_pixel(x, y)));
        assert!(covered, "clouds are drawn on top");
    }

    #[test]
    fn test_clouds_drift_on_their_interval() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.housekeeping(0, &mut sink);
        assert_eq!(cloud_xs(&scene), [(22, -1), (67, -1), (112, -1)]);

        assert!(scene.housekeeping(100, &mut sink).is_empty());
        assert_eq!(cloud_xs(&scene)[0].0, 22, "not due yet");

        assert!(scene.housekeeping(150, &mut sink).is_empty());
        assert_eq!(cloud_xs(&scene), [(21, -1), (66, -1), (111, -1)]);
        assert!(scene.last_tick().updated >= 3);
    }

    #[test]
    fn test_panel_tracks_framebuffer() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.set_date(Date::new(2025, 2, 3));
        scene.set_weather(Weather::Snow(Intensity::Medium));
        scene.set_media_text("A track title long enough to scroll across the panel");

        for now in (0..3_000).step_by(10) {
            scene.housekeeping(now, &mut sink);
        }
        assert_eq!(*sink.panel, *scene.framebuffer().pixels());
        assert!(scene.framebuffer().dirty().is_none());
    }

    #[test]
    fn test_smoke_spawns_from_the_pool() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        for now in (0..3_000).step_by(10) {
            scene.housekeeping(now, &mut sink);
        }
        let active = scene
            .sprites()
            .iter()
            .filter(|s| matches!(s, Sprite::Smoke(p) if p.is_active()))
            .count();
        assert!(active > 0);
        assert_eq!(scene.sprite_count(Category::Smoke), smoke::POOL_SIZE);
    }

    #[test]
    fn test_smoke_keeps_spawning_across_clock_wrap() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        let start = u32::MAX - 3_000;

        let mut spawns_after_wrap = 0;
        let mut was_fresh = false;
        for step in 0..600u32 {
            let now = start.wrapping_add(step * 10);
            scene.housekeeping(now, &mut sink);
            let fresh = scene
                .sprites()
                .iter()
                .any(|s| matches!(s, Sprite::Smoke(p) if p.is_active() && p.age == 0 && p.y == CHIMNEY_TOP_Y));
            if now < start && fresh && !was_fresh {
                spawns_after_wrap += 1;
            }
            was_fresh = fresh;
        }
        // 3 s past the wrap with a 0.7 to 1 s spawn gap
        assert!(spawns_after_wrap >= 2, "only {spawns_after_wrap} spawns after the wrap");
        assert_eq!(scene.lifecycle(Category::Smoke), Lifecycle::Animating);
    }

    #[test]
    fn test_month_change_repaints_without_rebuilding() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.set_date(Date::new(2025, 1, 31));
        scene.housekeeping(0, &mut sink);

        scene.set_date(Date::new(2025, 2, 1));
        let events = scene.housekeeping(10, &mut sink);
        assert_eq!(
            events.as_slice(),
            [SceneEvent::FullRedraw(RedrawReason::Month), SceneEvent::BackgroundCaptured]
        );
        assert_eq!(scene.lifecycle(Category::Clouds), Lifecycle::Animating);
    }

    #[test]
    fn test_season_change_swaps_categories() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.housekeeping(0, &mut sink);

        scene.set_date(Date::new(2025, 7, 4));
        let events = scene.housekeeping(10, &mut sink);
        assert_eq!(count(&events, SceneEvent::Deactivated(Category::Clouds)), 1);
        assert_eq!(count(&events, SceneEvent::Deactivated(Category::Smoke)), 1);
        assert_eq!(count(&events, SceneEvent::Activated(Category::SummerFauna)), 1);
        assert_eq!(scene.sprite_count(Category::Clouds), 0);
        assert_eq!(scene.sprite_count(Category::Smoke), 0);
        assert_eq!(scene.lifecycle(Category::Smoke), Lifecycle::Inactive);
        assert_eq!(scene.sprites().len(), scene.sprite_count(Category::SummerFauna));
    }

    #[test]
    fn test_weather_change_rebuilds_clouds() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.set_date(Date::new(2025, 10, 31));
        scene.set_weather(Weather::Cloudy);
        scene.housekeeping(0, &mut sink);
        assert_eq!(scene.sprite_count(Category::Clouds), 2);

        scene.set_weather(Weather::Rain(Intensity::Heavy));
        let events = scene.housekeeping(10, &mut sink);
        assert_eq!(events[0], SceneEvent::FullRedraw(RedrawReason::Scenery));
        assert_eq!(count(&events, SceneEvent::Activated(Category::Rain)), 1);
        assert_eq!(count(&events, SceneEvent::Deactivated(Category::Clouds)), 1);
        assert_eq!(count(&events, SceneEvent::Activated(Category::Clouds)), 1);
        assert_eq!(count(&events, SceneEvent::Activated(Category::Halloween)), 0, "kept");
        assert_eq!(count(&events, SceneEvent::BackgroundCaptured), 1);
        assert_eq!(scene.sprite_count(Category::Clouds), 5);

        let z: std::vec::Vec<u8> = scene.sprites().iter().map(Animate::z_order).collect();
        assert!(z.windows(2).all(|w| w[0] <= w[1]), "stage sorted back to front: {z:?}");
    }

    #[test]
    fn test_wind_applies_without_repaint() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.housekeeping(0, &mut sink);

        scene.set_wind(Wind::new(WindStrength::High, WindDirection::Right));
        assert!(cloud_xs(&scene).iter().all(|(_, vx)| *vx == 4));
        assert!(scene.housekeeping(150, &mut sink).is_empty());
        assert_eq!(cloud_xs(&scene)[0].0, 26);
    }

    #[test]
    fn test_layer_and_requested_redraws() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.housekeeping(0, &mut sink);

        scene.set_layer(2);
        assert_eq!(scene.housekeeping(10, &mut sink)[0], SceneEvent::FullRedraw(RedrawReason::Layer));
        assert!(scene.housekeeping(20, &mut sink).is_empty());

        scene.request_full_redraw();
        assert_eq!(scene.housekeeping(30, &mut sink)[0], SceneEvent::FullRedraw(RedrawReason::Requested));
        assert!(scene.housekeeping(40, &mut sink).is_empty());
    }

    #[test]
    fn test_nightfall_swaps_bees_for_fireflies() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.set_date(Date::new(2025, 7, 4));
        scene.housekeeping(0, &mut sink);
        assert!(scene.sprites().iter().all(|s| matches!(s, Sprite::Bee(_))));

        scene.set_time(ClockTime::new(23, 0));
        let events = scene.housekeeping(10, &mut sink);
        assert_eq!(events[0], SceneEvent::FullRedraw(RedrawReason::DayNight));
        assert_eq!(count(&events, SceneEvent::Deactivated(Category::SummerFauna)), 1);
        assert_eq!(count(&events, SceneEvent::Activated(Category::SummerFauna)), 1);
        assert!(scene.sprites().iter().all(|s| matches!(s, Sprite::Firefly(_))));
    }

    #[test]
    fn test_celestial_slot_change() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();
        scene.set_time(ClockTime::new(9, 0));
        scene.housekeeping(0, &mut sink);
        scene.set_time(ClockTime::new(9, 1));
        assert!(scene.housekeeping(10, &mut sink).is_empty());

        scene.set_time(ClockTime::new(14, 0));
        assert_eq!(scene.housekeeping(20, &mut sink)[0], SceneEvent::FullRedraw(RedrawReason::Celestial));
    }

    #[test]
    fn test_builder_phases_by_hand() {
        let (mut frame, mut snap) = (blank_pixels(), blank_pixels());
        let mut scene = Scene::new(&mut frame, &mut snap, SceneConfig::DEFAULT);
        let mut sink = RecordingSink::new();

        let pass = scene.compose_static(0, RedrawReason::Requested);
        let pass = pass.capture_background();
        let events = pass.compose_dynamic(&mut sink);
        assert_eq!(count(&events, SceneEvent::BackgroundCaptured), 1);

        assert!(scene.background().is_saved());
        assert!(scene.housekeeping(10, &mut sink).is_empty(), "composition recorded");
    }
}
