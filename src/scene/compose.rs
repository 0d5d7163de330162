//! Full scene composition as a two-phase builder.
//!
//! ```text
//! Scene::compose_static()  -> StaticPass    categories rebuilt, scenery painted
//!   .capture_background()  -> DynamicPass   one snapshot for every new category
//!   .compose_dynamic(sink) -> SceneEvents   sprites and widgets drawn, flushed
//! ```
//!
//! Each step consumes the previous one, so sprites cannot be drawn before the
//! snapshot exists and the snapshot cannot be taken twice in one repaint.

use super::backdrop;
use super::category::{Category, Conditions};
use super::{RedrawReason, Scene, SceneEvent, SceneEvents, Stage};
use crate::color::BLACK;
use crate::framebuffer::PanelSink;
use crate::scene::almanac::Almanac;
use crate::sprites::{self, Animate, Bee, Bird, Butterfly, Firefly, Ghost, Raindrop, Rocket, SmokeParticle, Snowflake};
use crate::sprites::{bee, bird, butterfly, cloud, firefly, ghost, raindrop, rocket, smoke, snowflake};
use crate::weather::{Intensity, Weather, Wind};

/// Static scenery painted, background not captured yet.
#[must_use = "the scene is half composed until the background is captured"]
pub struct StaticPass<'s, 'a, A: Almanac> {
    scene: &'s mut Scene<'a, A>,
    events: SceneEvents,
    now_ms: u32,
}

/// Background captured, sprites not drawn yet.
#[must_use = "sprites and widgets are drawn by compose_dynamic"]
pub struct DynamicPass<'s, 'a, A: Almanac> {
    scene: &'s mut Scene<'a, A>,
    events: SceneEvents,
    now_ms: u32,
}

impl<'a, A: Almanac> Scene<'a, A> {
    /// Phase one of a full repaint.
    ///
    /// Every category's background flag is cleared. Categories that no longer
    /// apply (or whose flavour changed) are torn down, newly wanted ones get
    /// their sprites at deterministic starting positions, and the whole static
    /// scene including category decorations is painted. No sprite is drawn.
    pub fn compose_static(
        &mut self,
        now_ms: u32,
        reason: RedrawReason,
    ) -> StaticPass<'_, 'a, A> {
        let mut events = SceneEvents::new();
        events.push(SceneEvent::FullRedraw(reason)).ok();

        self.redraw_requested = false;
        self.bg.invalidate();
        for state in &mut self.states {
            state.background_saved = false;
        }

        let conditions = self.conditions();
        let wind = self.inputs.wind;
        for category in Category::ALL {
            let state = &mut self.states[category.index()];
            let wanted = conditions.wants(category);
            let variant = conditions.variant(category);

            if state.initialized && (!wanted || state.variant != variant) {
                self.stage.remove_owner(category);
                state.deactivate();
                events.push(SceneEvent::Deactivated(category)).ok();
            }
            if wanted && !state.initialized {
                populate(&mut self.stage, category, &conditions, wind);
                if category == Category::Smoke {
                    self.last_smoke_ms = now_ms;
                    self.smoke_gap_ms = 0;
                }
                state.activate(variant, now_ms);
                events.push(SceneEvent::Activated(category)).ok();
            }
        }

        let composition = self.composition();
        self.fb.clear(BLACK);
        backdrop::draw(&mut self.fb, &composition.scenery);
        if self.states[Category::Halloween.index()].initialized {
            backdrop::draw_pumpkins(&mut self.fb, conditions.daytime);
        }
        if self.states[Category::Christmas.index()].initialized {
            backdrop::draw_advent(&mut self.fb, conditions.date.day());
        }
        if self.states[Category::SummerFauna.index()].initialized && conditions.daytime {
            backdrop::draw_flowers(&mut self.fb);
        }

        self.composed = Some(composition);
        self.needs_background = self.states.iter().any(|s| s.needs_background());
        StaticPass {
            scene: self,
            events,
            now_ms,
        }
    }
}

impl<'s, 'a, A: Almanac> StaticPass<'s, 'a, A> {
    /// Phase two: take the snapshot once if any active category still needs
    /// it, and mark all of them saved.
    pub fn capture_background(self) -> DynamicPass<'s, 'a, A> {
        let Self { scene, mut events, now_ms } = self;
        if scene.needs_background {
            scene.bg.save_all(&scene.fb);
            for state in scene.states.iter_mut().filter(|s| s.initialized) {
                state.background_saved = true;
            }
            scene.needs_background = false;
            events.push(SceneEvent::BackgroundCaptured).ok();
        }
        DynamicPass { scene, events, now_ms }
    }
}

impl<'s, 'a, A: Almanac> DynamicPass<'s, 'a, A> {
    /// Phase three: draw every visible sprite on top of the snapshot, repaint
    /// the widgets and push the whole frame to the panel.
    pub fn compose_dynamic<S: PanelSink + ?Sized>(
        self,
        sink: &mut S,
    ) -> SceneEvents {
        let Self { scene, events, now_ms } = self;
        debug_assert!(scene.stage.is_empty() || scene.bg.is_saved(), "sprites drawn before the background capture");

        for sprite in &scene.stage.sprites {
            if sprites::is_visible(&sprite.bounds()) {
                sprite.draw(&mut scene.fb);
            }
        }

        let values = scene.status_values();
        scene.status.invalidate();
        scene.status.render(&mut scene.fb, &values, now_ms, scene.config.media_scroll_ms);
        scene.fb.flush(sink);
        events
    }
}

// =============================================================================
// Sprite Sets
// =============================================================================

const fn intensity(weather: Weather) -> Intensity {
    match weather {
        Weather::Rain(i) | Weather::Snow(i) => i,
        _ => Intensity::Light,
    }
}

/// Add `category`'s sprites at their reproducible starting positions.
fn populate(
    stage: &mut Stage,
    category: Category,
    conditions: &Conditions,
    wind: Wind,
) {
    match category {
        Category::Clouds => {
            let tone = cloud::CloudTone::for_weather(conditions.weather);
            for c in cloud::layout(conditions.cloud_count(), wind.cloud_velocity(), tone) {
                stage.insert(category, c.into());
            }
        }
        Category::Rain => {
            for slot in raindrop::slots(intensity(conditions.weather)) {
                stage.insert(category, Raindrop::new(slot).into());
            }
        }
        Category::Snow => {
            for slot in snowflake::slots(intensity(conditions.weather)) {
                stage.insert(category, Snowflake::new(slot).into());
            }
        }
        Category::Smoke => {
            for _ in 0..smoke::POOL_SIZE {
                stage.insert(category, SmokeParticle::INACTIVE.into());
            }
        }
        Category::SpringFauna => {
            for (i, (x, y, speed)) in bird::SPRING_LAYOUT.into_iter().enumerate() {
                stage.insert(category, Bird::new(x, y, speed, i as u8).into());
            }
            for (i, (x, y, hue)) in butterfly::LAYOUT.into_iter().enumerate() {
                stage.insert(category, Butterfly::new(x, y, hue, i as u32 + 1).into());
            }
        }
        Category::SummerFauna => {
            if conditions.daytime {
                for (x, y, radius, angle) in bee::LAYOUT {
                    stage.insert(category, Bee::new(x, y, radius, angle).into());
                }
            } else {
                for (i, (x, y)) in firefly::LAYOUT.into_iter().enumerate() {
                    stage.insert(category, Firefly::new(x, y, i as u32 * 7 + 3).into());
                }
            }
        }
        Category::FallFauna => {
            for (i, (x, y, speed)) in bird::FALL_FLOCK.into_iter().enumerate() {
                stage.insert(category, Bird::new(x, y, speed, i as u8).into());
            }
        }
        Category::Halloween => {
            for (x, y, dir, phase, amplitude) in ghost::LAYOUT {
                stage.insert(category, Ghost::new(x, y, dir, phase, amplitude).into());
            }
        }
        Category::Christmas => {}
        Category::Fireworks => {
            for i in 0..rocket::COUNT {
                stage.insert(category, Rocket::new(i).into());
            }
        }
    }
}
