//! Overlap-aware sprite animation.
//!
//! One call to [`tick`] moves a z-sorted set of sprites and repaints exactly
//! what changed, without ever sending the whole screen to the panel.
//!
//! # Protocol
//!
//! ```text
//! 1. record every sprite's bounds
//! 2. run the update closure (it flags the sprites it advanced)
//! 3. compute redraw marks to a fixed point, before any pixel changes
//! 4. erase: restore each updated sprite's old bounds from the background
//!    and flush that rectangle immediately
//! 5. draw every marked sprite in z order and flush its new bounds
//! ```
//!
//! # Overlap Propagation
//!
//! Restoring a rectangle wipes whatever sprite pixels were there, including
//! sprites that did not move. A sprite is therefore marked for redraw when it
//! was updated, when its bounds touch any erased rectangle, or when they touch
//! the bounds of any other marked sprite (its neighbour will paint over it).
//! The last rule cascades, so marking repeats until nothing changes. Marking is
//! conservative: a lower sprite overlapping a marked one is redrawn as well,
//! which costs a few pixels and keeps the paint order correct.
//!
//! Sprites whose bounds fall outside [`Rect::SCENE`] are updated but never
//! erased or drawn.

use heapless::Vec;

use crate::background::BackgroundStore;
use crate::framebuffer::{Framebuffer, PanelSink};
use crate::geometry::Rect;
use crate::sprites::{Animate, is_visible};

/// Most sprites one tick can handle. Extra sprites are left untouched.
pub const MAX_SPRITES: usize = 128;

/// Why a sprite is (or is not) painted this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    Idle,
    /// Updated by its motion model.
    Moved,
    /// Stationary but overwritten by an erase or a neighbour.
    Forced,
}

/// What one tick did, for profiling and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub updated: usize,
    pub erased: usize,
    pub redrawn: usize,
    pub forced: usize,
    pub flushes: usize,
    marks: Vec<Mark, MAX_SPRITES>,
}

impl TickReport {
    /// True if sprite `i` was redrawn only because of an overlap.
    #[inline]
    pub fn was_forced(
        &self,
        i: usize,
    ) -> bool {
        self.marks.get(i) == Some(&Mark::Forced)
    }

    /// True if sprite `i` was painted this tick.
    #[inline]
    pub fn is_marked(
        &self,
        i: usize,
    ) -> bool {
        self.marks.get(i).is_some_and(|m| *m != Mark::Idle)
    }

    /// True if nothing was sent to the panel.
    #[inline]
    pub fn is_idle(&self) -> bool { self.flushes == 0 }
}

/// Compute redraw marks to a fixed point.
///
/// `erased` holds the rectangles about to be restored, `bounds` each sprite's
/// new bounds and `updated` which sprites advanced this tick. Only sprites with
/// visible bounds are ever marked.
pub fn propagate(
    erased: &[Rect],
    bounds: &[Rect],
    updated: &[bool],
) -> Vec<Mark, MAX_SPRITES> {
    let n = bounds.len().min(updated.len()).min(MAX_SPRITES);
    let mut marks: Vec<Mark, MAX_SPRITES> = Vec::new();
    for i in 0..n {
        let mark = if updated[i] && is_visible(&bounds[i]) { Mark::Moved } else { Mark::Idle };
        // n <= MAX_SPRITES so the push cannot fail
        marks.push(mark).ok();
    }

    loop {
        let mut changed = false;
        for i in 0..n {
            if marks[i] != Mark::Idle || !is_visible(&bounds[i]) {
                continue;
            }
            let under_erase = erased.iter().any(|e| e.intersects(&bounds[i]));
            let under_neighbour = (0..n).any(|j| j != i && marks[j] != Mark::Idle && bounds[j].intersects(&bounds[i]));
            if under_erase || under_neighbour {
                marks[i] = Mark::Forced;
                changed = true;
            }
        }
        if !changed {
            return marks;
        }
    }
}

/// Advance and repaint one set of sprites.
///
/// `sprites` must already be sorted back to front. `update` advances whichever
/// sprites are due and sets the matching flag in its second argument; sprites
/// it does not flag keep their pixels unless an overlap forces a redraw.
///
/// Dirty state accumulated before the call is preserved, and every pixel this
/// tick writes is flushed here, so a later [`Framebuffer::flush`] only carries
/// unrelated changes.
pub fn tick<A, S, F>(
    fb: &mut Framebuffer<'_>,
    bg: &BackgroundStore<'_>,
    sink: &mut S,
    sprites: &mut [A],
    update: F,
) -> TickReport
where
    A: Animate,
    S: PanelSink + ?Sized,
    F: FnOnce(&mut [A], &mut [bool]),
{
    debug_assert!(bg.is_saved(), "sprites animated before the background was captured");

    let n = sprites.len().min(MAX_SPRITES);
    let sprites = &mut sprites[..n];

    let old: Vec<Rect, MAX_SPRITES> = sprites.iter().map(Animate::bounds).collect();
    let mut updated = [false; MAX_SPRITES];
    update(sprites, &mut updated[..n]);
    let new: Vec<Rect, MAX_SPRITES> = sprites.iter().map(Animate::bounds).collect();

    let mut erased: Vec<Rect, MAX_SPRITES> = Vec::new();
    for i in 0..n {
        let area = old[i].clamp_to(&Rect::SCENE);
        if updated[i] && !area.is_empty() {
            erased.push(area).ok();
        }
    }
    let marks = propagate(&erased, &new, &updated[..n]);

    let carried = fb.take_dirty();
    let mut report = TickReport {
        updated: updated[..n].iter().filter(|u| **u).count(),
        ..TickReport::default()
    };

    for area in &erased {
        bg.restore_region(fb, *area);
        if fb.flush_region(sink, *area) {
            report.flushes += 1;
        }
        report.erased += 1;
    }

    for (i, sprite) in sprites.iter().enumerate() {
        if marks[i] == Mark::Idle {
            continue;
        }
        sprite.draw(fb);
        if fb.flush_region(sink, new[i].clamp_to(&Rect::SCENE)) {
            report.flushes += 1;
        }
        report.redrawn += 1;
        if marks[i] == Mark::Forced {
            report.forced += 1;
        }
    }

    fb.take_dirty();
    fb.mark_dirty(carried);
    report.marks = marks;
    report
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::hsv_to_color;
    use crate::config::SCREEN_WIDTH;
    use crate::sprites::Tick;
    use crate::testing::{RecordingSink, blank_pixels};
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::IntoStorage;

    /// Solid block that slides by `dx` per update.
    #[derive(Clone, Copy, Debug)]
    struct Block {
        rect: Rect,
        color: Rgb565,
        dx: i16,
    }

    impl Block {
        fn new(
            x: i16,
            y: i16,
            size: i16,
            hue: u8,
            dx: i16,
        ) -> Self {
            Self {
                rect: Rect::new(x, y, x + size - 1, y + size - 1),
                color: hsv_to_color(hue, 255, 255),
                dx,
            }
        }
    }

    impl Animate for Block {
        fn update(
            &mut self,
            _tick: &Tick,
        ) {
            self.rect.x1 += self.dx;
            self.rect.x2 += self.dx;
        }

        fn draw(
            &self,
            fb: &mut Framebuffer<'_>,
        ) {
            fb.rect(self.rect.x1, self.rect.y1, self.rect.x2, self.rect.y2, self.color, true);
        }

        fn bounds(&self) -> Rect { self.rect }
    }

    const TICK: Tick = Tick::new(0, 50, crate::weather::Wind::CALM);

    fn move_all(
        blocks: &mut [Block],
        updated: &mut [bool],
    ) {
        for (b, flag) in blocks.iter_mut().zip(updated.iter_mut()) {
            if b.dx != 0 {
                b.update(&TICK);
                *flag = true;
            }
        }
    }

    /// Paint a static scene, capture it, draw the sprites and sync the panel.
    fn setup<'a>(
        fb: &mut Framebuffer<'a>,
        bg: &mut BackgroundStore<'_>,
        sink: &mut RecordingSink,
        blocks: &[Block],
    ) {
        fb.clear(hsv_to_color(150, 100, 180));
        fb.rect(0, 140, 134, 154, hsv_to_color(85, 180, 100), true);
        bg.save_all(fb);
        for b in blocks {
            b.draw(fb);
        }
        fb.flush(sink);
        sink.blits.clear();
    }

    fn scene_matches_panel(
        fb: &Framebuffer<'_>,
        sink: &RecordingSink,
    ) -> bool {
        fb.pixels()
            .iter()
            .take(SCREEN_WIDTH * 155)
            .zip(sink.panel.iter())
            .all(|(a, b)| a == b)
    }

    #[test]
    fn test_propagate_without_overlap_marks_only_updated() {
        let bounds = [Rect::new(0, 0, 5, 5), Rect::new(50, 50, 55, 55)];
        let marks = propagate(&[Rect::new(1, 0, 6, 5)], &bounds, &[true, false]);
        assert_eq!(marks.as_slice(), &[Mark::Moved, Mark::Idle]);
    }

    #[test]
    fn test_propagate_reaches_fixed_point() {
        // Erase touches b0, b0 touches b1, b1 touches b2; b3 is isolated
        let bounds = [
            Rect::new(10, 10, 20, 20),
            Rect::new(18, 10, 30, 20),
            Rect::new(28, 10, 40, 20),
            Rect::new(90, 90, 95, 95),
        ];
        let marks = propagate(&[Rect::new(5, 5, 12, 12)], &bounds, &[false; 4]);
        assert_eq!(marks.as_slice(), &[Mark::Forced, Mark::Forced, Mark::Forced, Mark::Idle]);
    }

    #[test]
    fn test_propagate_ignores_invisible() {
        let bounds = [Rect::new(-30, 10, -10, 20), Rect::new(10, 160, 20, 170)];
        let marks = propagate(&[Rect::SCENE], &bounds, &[true, false]);
        assert_eq!(marks.as_slice(), &[Mark::Idle, Mark::Idle]);
    }

    #[test]
    fn test_moving_away_forces_stationary_neighbour() {
        let mut px = blank_pixels();
        let mut bg_px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bg = BackgroundStore::new(&mut bg_px);
        let mut sink = RecordingSink::new();

        // B (stationary, drawn on top) overlaps A's starting position
        let mut blocks = [Block::new(40, 40, 12, 0, 6), Block::new(46, 44, 10, 170, 0)];
        setup(&mut fb, &mut bg, &mut sink, &blocks);

        let report = tick(&mut fb, &bg, &mut sink, &mut blocks, move_all);

        assert_eq!(report.updated, 1);
        assert_eq!(report.erased, 1);
        assert!(report.was_forced(1), "B must redraw after A's erase");
        assert!(!report.was_forced(0));
        assert_eq!(report.redrawn, 2);
        assert_eq!(report.forced, 1);

        // B is intact on top, A's old left edge shows the background again
        let b_color = blocks[1].color.into_storage();
        assert_eq!(fb.get_pixel(50, 48).map(IntoStorage::into_storage), Some(b_color));
        assert_eq!(sink.pixel_at(50, 48), b_color);
        assert_eq!(fb.get_pixel(41, 41), bg.get_pixel(41, 41));
        assert!(scene_matches_panel(&fb, &sink));
    }

    #[test]
    fn test_idle_tick_sends_nothing() {
        let mut px = blank_pixels();
        let mut bg_px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bg = BackgroundStore::new(&mut bg_px);
        let mut sink = RecordingSink::new();
        let mut blocks = [Block::new(10, 10, 5, 0, 0), Block::new(60, 60, 5, 85, 0)];
        setup(&mut fb, &mut bg, &mut sink, &blocks);

        let report = tick(&mut fb, &bg, &mut sink, &mut blocks, |_, _| {});
        assert!(report.is_idle());
        assert!(sink.blits.is_empty());
        assert!(!report.is_marked(0) && !report.is_marked(1));
    }

    #[test]
    fn test_erase_flushes_before_draw() {
        let mut px = blank_pixels();
        let mut bg_px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bg = BackgroundStore::new(&mut bg_px);
        let mut sink = RecordingSink::new();
        let mut blocks = [Block::new(20, 20, 8, 0, 3)];
        setup(&mut fb, &mut bg, &mut sink, &blocks);

        tick(&mut fb, &bg, &mut sink, &mut blocks, move_all);
        assert_eq!(sink.blits, vec![Rect::new(20, 20, 27, 27), Rect::new(23, 20, 30, 27)]);
    }

    #[test]
    fn test_carried_dirty_survives_tick() {
        let mut px = blank_pixels();
        let mut bg_px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bg = BackgroundStore::new(&mut bg_px);
        let mut sink = RecordingSink::new();
        let mut blocks = [Block::new(20, 20, 8, 0, 3)];
        setup(&mut fb, &mut bg, &mut sink, &blocks);

        let clock = Rect::new(10, 180, 60, 200);
        fb.mark_dirty(clock);
        tick(&mut fb, &bg, &mut sink, &mut blocks, move_all);
        assert_eq!(fb.dirty(), Some(clock));
    }

    #[test]
    fn test_off_scene_sprite_updates_without_drawing() {
        let mut px = blank_pixels();
        let mut bg_px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bg = BackgroundStore::new(&mut bg_px);
        let mut sink = RecordingSink::new();
        let mut blocks = [Block::new(-40, 20, 8, 0, 2)];
        setup(&mut fb, &mut bg, &mut sink, &blocks);

        let report = tick(&mut fb, &bg, &mut sink, &mut blocks, move_all);
        assert_eq!(blocks[0].rect.x1, -38);
        assert_eq!(report.updated, 1);
        assert_eq!((report.erased, report.redrawn), (0, 0));
        assert!(sink.blits.is_empty());
    }

    #[test]
    fn test_long_run_keeps_panel_in_sync() {
        let mut px = blank_pixels();
        let mut bg_px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bg = BackgroundStore::new(&mut bg_px);
        let mut sink = RecordingSink::new();
        let mut blocks = [
            Block::new(0, 30, 14, 0, 2),
            Block::new(50, 34, 10, 40, 0),
            Block::new(120, 38, 12, 85, -3),
            Block::new(70, 40, 6, 170, 1),
        ];
        setup(&mut fb, &mut bg, &mut sink, &blocks);

        for _ in 0..40 {
            tick(&mut fb, &bg, &mut sink, &mut blocks, move_all);
            assert!(scene_matches_panel(&fb, &sink));
            for b in &blocks {
                let visible = b.rect.clamp_to(&Rect::SCENE);
                if !visible.is_empty() && blocks.iter().filter(|o| o.rect.intersects(&b.rect)).count() == 1 {
                    assert_eq!(fb.get_pixel(visible.x1, visible.y1), Some(b.color));
                }
            }
        }
    }
}
