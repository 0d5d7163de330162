//! Status widgets below the animated scene.
//!
//! Date line, large clock, scrolling media text and a volume bar, all tinted
//! with the layer hue. Each widget remembers what it last drew and only
//! repaints its own band when the value changes, so a quiet tick costs
//! nothing. Sprites never reach this region.

use core::fmt::Write;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};
use heapless::String;
use profont::{PROFONT_12_POINT, PROFONT_18_POINT};

use super::calendar::{ClockTime, Date};
use crate::color::{BLACK, Hsv};
use crate::config::layout::{
    CLOCK_Y,
    DATE_Y,
    MEDIA_HEIGHT,
    MEDIA_Y,
    VOLUME_FILL_WIDTH,
    VOLUME_X1,
    VOLUME_X2,
    VOLUME_Y1,
    VOLUME_Y2,
};
use crate::config::{MAX_X, SCREEN_WIDTH};
use crate::framebuffer::Framebuffer;

/// Longest media text kept (bytes).
pub const MEDIA_CAPACITY: usize = 64;

/// Pixels the media text moves per scroll step.
const SCROLL_STEP: i16 = 3;

/// Blank run between the end of the text and its next repetition.
const SCROLL_GAP: i16 = 30;

const TEXT_FONT: &MonoFont<'static> = &PROFONT_12_POINT;
const CLOCK_FONT: &MonoFont<'static> = &PROFONT_18_POINT;

const CENTERED_TOP: TextStyle = TextStyleBuilder::new().alignment(Alignment::Center).baseline(Baseline::Top).build();
const LEFT_TOP: TextStyle = TextStyleBuilder::new().alignment(Alignment::Left).baseline(Baseline::Top).build();

const CENTER_X: i32 = SCREEN_WIDTH as i32 / 2;

const DATE_BAND: (i16, i16) = (DATE_Y, CLOCK_Y - 1);
const CLOCK_BAND: (i16, i16) = (CLOCK_Y, MEDIA_Y - 1);
const MEDIA_BAND: (i16, i16) = (MEDIA_Y, MEDIA_Y + MEDIA_HEIGHT - 1);

const MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Values the widgets display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusValues {
    pub date: Date,
    pub time: ClockTime,
    /// 0..=100
    pub volume: u8,
    pub hue: u8,
}

/// Width of the volume fill for `volume` percent.
#[inline]
pub const fn volume_fill(volume: u8) -> i16 {
    let volume = if volume > 100 { 100 } else { volume };
    volume as i16 * VOLUME_FILL_WIDTH / 100
}

/// The widget strip and what each widget last showed.
#[derive(Clone, Debug)]
pub struct StatusBar {
    shown: Option<StatusValues>,
    media: String<MEDIA_CAPACITY>,
    media_dirty: bool,
    scroll: i16,
    last_scroll_ms: u32,
}

impl StatusBar {
    pub const fn new() -> Self {
        Self {
            shown: None,
            media: String::new(),
            media_dirty: true,
            scroll: 0,
            last_scroll_ms: 0,
        }
    }

    /// Replace the media text, truncated to [`MEDIA_CAPACITY`] on a char
    /// boundary. Scrolling restarts from the left.
    pub fn set_media_text(
        &mut self,
        text: &str,
    ) {
        let mut end = text.len().min(MEDIA_CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if self.media.as_str() == &text[..end] {
            return;
        }
        self.media.clear();
        // end <= capacity so this cannot fail
        self.media.push_str(&text[..end]).ok();
        self.scroll = 0;
        self.media_dirty = true;
    }

    #[inline]
    pub fn media_text(&self) -> &str { self.media.as_str() }

    /// Forget what is on screen; the next render repaints every widget.
    pub fn invalidate(&mut self) {
        self.shown = None;
        self.media_dirty = true;
    }

    /// Pixel width of the media text.
    fn media_width(&self) -> i16 {
        let advance = TEXT_FONT.character_size.width + TEXT_FONT.character_spacing;
        (self.media.chars().count() as u32 * advance) as i16
    }

    #[inline]
    fn scrolls(&self) -> bool { self.media_width() > SCREEN_WIDTH as i16 }

    /// Repaint whatever changed. Returns `true` if anything was drawn.
    pub fn render(
        &mut self,
        fb: &mut Framebuffer<'_>,
        values: &StatusValues,
        now_ms: u32,
        scroll_interval_ms: u32,
    ) -> bool {
        let previous = self.shown;
        let restyled = previous.is_none_or(|p| p.hue != values.hue);
        let mut drew = false;

        if restyled || previous.is_some_and(|p| p.date != values.date) {
            draw_date(fb, values);
            drew = true;
        }
        if restyled || previous.is_some_and(|p| p.time != values.time) {
            draw_clock(fb, values);
            drew = true;
        }
        if restyled || previous.is_some_and(|p| p.volume != values.volume) {
            draw_volume(fb, values);
            drew = true;
        }

        if self.scrolls() && now_ms.wrapping_sub(self.last_scroll_ms) >= scroll_interval_ms {
            self.last_scroll_ms = now_ms;
            self.scroll = (self.scroll + SCROLL_STEP) % (self.media_width() + SCROLL_GAP);
            self.media_dirty = true;
        }
        if restyled || self.media_dirty {
            self.draw_media(fb, values.hue);
            self.media_dirty = false;
            drew = true;
        }

        self.shown = Some(*values);
        drew
    }

    fn draw_media(
        &self,
        fb: &mut Framebuffer<'_>,
        hue: u8,
    ) {
        clear_band(fb, MEDIA_BAND);
        if self.media.is_empty() {
            return;
        }
        let style = MonoTextStyle::new(TEXT_FONT, text_color(hue));
        let top = i32::from(MEDIA_Y) + 4;

        if !self.scrolls() {
            Text::with_text_style(&self.media, Point::new(CENTER_X, top), style, CENTERED_TOP).draw(fb).ok();
            return;
        }

        let area = Rectangle::new(
            Point::new(0, i32::from(MEDIA_Y)),
            Size::new(SCREEN_WIDTH as u32, MEDIA_HEIGHT as u32),
        );
        let mut clipped = fb.clipped(&area);
        let x = -i32::from(self.scroll);
        let period = i32::from(self.media_width() + SCROLL_GAP);
        for start in [x, x + period] {
            Text::with_text_style(&self.media, Point::new(start, top), style, LEFT_TOP).draw(&mut clipped).ok();
        }
    }
}

#[inline]
fn text_color(hue: u8) -> Rgb565 { Hsv::new(hue, 200, 255).to_color() }

fn clear_band(
    fb: &mut Framebuffer<'_>,
    (y1, y2): (i16, i16),
) {
    fb.rect(0, y1, MAX_X, y2, BLACK, true);
}

fn draw_date(
    fb: &mut Framebuffer<'_>,
    values: &StatusValues,
) {
    clear_band(fb, DATE_BAND);
    let mut text: String<16> = String::new();
    let month = MONTHS[usize::from(values.date.month()) - 1];
    let _ = write!(text, "{:02} {} {}", values.date.day(), month, values.date.year());
    let style = MonoTextStyle::new(TEXT_FONT, text_color(values.hue));
    Text::with_text_style(&text, Point::new(CENTER_X, i32::from(DATE_Y) + 3), style, CENTERED_TOP).draw(fb).ok();
}

fn draw_clock(
    fb: &mut Framebuffer<'_>,
    values: &StatusValues,
) {
    clear_band(fb, CLOCK_BAND);
    let mut text: String<8> = String::new();
    let _ = write!(text, "{:02}:{:02}", values.time.hour, values.time.minute);
    let style = MonoTextStyle::new(CLOCK_FONT, text_color(values.hue));
    Text::with_text_style(&text, Point::new(CENTER_X, i32::from(CLOCK_Y) + 1), style, CENTERED_TOP).draw(fb).ok();
}

fn draw_volume(
    fb: &mut Framebuffer<'_>,
    values: &StatusValues,
) {
    let color = Hsv::new(values.hue, 255, 220).to_color();
    fb.rect(VOLUME_X1, VOLUME_Y1, VOLUME_X2, VOLUME_Y2, color, false);
    fb.rect(VOLUME_X1 + 1, VOLUME_Y1 + 1, VOLUME_X2 - 1, VOLUME_Y2 - 1, BLACK, true);
    let fill = volume_fill(values.volume);
    if fill > 0 {
        fb.rect(VOLUME_X1 + 1, VOLUME_Y1 + 1, VOLUME_X1 + fill, VOLUME_Y2 - 1, color, true);
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::testing::blank_pixels;

    fn values() -> StatusValues {
        StatusValues {
            date: Date::new(2025, 3, 4),
            time: ClockTime::new(9, 41),
            volume: 50,
            hue: 128,
        }
    }

    #[test]
    fn test_first_render_paints_everything_below_scene() {
        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bar = StatusBar::new();
        assert!(bar.render(&mut fb, &values(), 0, 150));
        let dirty = fb.take_dirty();
        assert_eq!(dirty.y1, DATE_Y);
        assert_eq!(dirty.y2, VOLUME_Y2);
    }

    #[test]
    fn test_unchanged_values_draw_nothing() {
        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bar = StatusBar::new();
        bar.render(&mut fb, &values(), 0, 150);
        fb.take_dirty();
        assert!(!bar.render(&mut fb, &values(), 1_000, 150));
        assert_eq!(fb.dirty(), None);
    }

    #[test]
    fn test_clock_change_touches_only_clock_band() {
        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bar = StatusBar::new();
        bar.render(&mut fb, &values(), 0, 150);
        fb.take_dirty();

        let later = StatusValues {
            time: ClockTime::new(9, 42),
            ..values()
        };
        assert!(bar.render(&mut fb, &later, 10, 150));
        assert_eq!(fb.take_dirty(), Rect::new(0, CLOCK_BAND.0, MAX_X, CLOCK_BAND.1));
    }

    #[test]
    fn test_volume_fill_width() {
        assert_eq!(volume_fill(0), 0);
        assert_eq!(volume_fill(50), 60);
        assert_eq!(volume_fill(100), 120);
        assert_eq!(volume_fill(250), 120);

        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bar = StatusBar::new();
        bar.render(&mut fb, &values(), 0, 150);
        let fill = Hsv::new(128, 255, 220).to_color();
        assert_eq!(fb.get_pixel(VOLUME_X1 + 60, VOLUME_Y1 + 2), Some(fill));
        assert_eq!(fb.get_pixel(VOLUME_X1 + 61, VOLUME_Y1 + 2), Some(BLACK));
    }

    #[test]
    fn test_long_media_text_scrolls() {
        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        let mut bar = StatusBar::new();
        bar.set_media_text("A very long track title - Some Artist (Live)");
        assert!(bar.scrolls());
        bar.render(&mut fb, &values(), 0, 150);
        let first = bar.scroll;

        fb.take_dirty();
        assert!(!bar.render(&mut fb, &values(), 100, 150) || bar.scroll == first);
        bar.render(&mut fb, &values(), 300, 150);
        assert_eq!(bar.scroll, first + SCROLL_STEP);
        let dirty = fb.take_dirty();
        assert!(dirty.y1 >= MEDIA_BAND.0 && dirty.y2 <= MEDIA_BAND.1);
    }

    #[test]
    fn test_scroll_wraps() {
        let mut bar = StatusBar::new();
        bar.set_media_text("A very long track title - Some Artist (Live)");
        let period = bar.media_width() + SCROLL_GAP;
        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        for step in 0..200u32 {
            bar.render(&mut fb, &values(), step * 150, 150);
            assert!((0..period).contains(&bar.scroll));
        }
    }

    #[test]
    fn test_short_media_text_is_static() {
        let mut bar = StatusBar::new();
        bar.set_media_text("Jazz");
        assert!(!bar.scrolls());
        let mut px = blank_pixels();
        let mut fb = Framebuffer::new(&mut px);
        bar.render(&mut fb, &values(), 0, 150);
        fb.take_dirty();
        assert!(!bar.render(&mut fb, &values(), 10_000, 150));
    }

    #[test]
    fn test_media_text_truncates_on_char_boundary() {
        let mut bar = StatusBar::new();
        let long: std::string::String = "é".repeat(40);
        bar.set_media_text(&long);
        assert_eq!(bar.media_text().len(), MEDIA_CAPACITY);
        assert!(bar.media_text().chars().all(|c| c == 'é'));
    }
}
