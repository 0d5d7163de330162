//! In-memory framebuffer with dirty-rectangle flushing.
//!
//! All drawing happens in RAM. The panel only sees pixels when [`Framebuffer::flush`]
//! or [`Framebuffer::flush_region`] hands a rectangle to a [`PanelSink`].
//!
//! # Dirty Tracking
//!
//! A single bounding rectangle accumulates every write since the last flush.
//! Shapes extend it by their whole bounding box rather than pixel by pixel:
//! transfer setup dominates flush cost on a serial panel, so a slightly larger
//! window is cheaper than tracking exact pixels. The invariant is soundness:
//! every mutated pixel lies inside the dirty rectangle.
//!
//! # Storage
//!
//! Pixels are native-endian RGB565 (`u16`), row-major. The buffer is borrowed so
//! the firmware can keep it in a static while tests keep it on the heap. Any
//! byte swapping for the wire happens in the panel driver.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::{PIXEL_COUNT, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::geometry::Rect;

// =============================================================================
// Panel Sink
// =============================================================================

/// Destination for flushed pixels (the physical panel, or a recorder in tests).
///
/// The framebuffer only ever calls [`PanelSink::blit`] with a non-empty
/// rectangle fully inside the screen.
pub trait PanelSink {
    /// Write `rows` into the panel window `area`.
    fn blit(
        &mut self,
        area: Rect,
        rows: Rows<'_>,
    );
}

/// Row-by-row view of a rectangle inside the framebuffer.
pub struct Rows<'a> {
    pixels: &'a [u16],
    area: Rect,
    next_y: i16,
}

impl<'a> Rows<'a> {
    fn new(
        pixels: &'a [u16],
        area: Rect,
    ) -> Self {
        Self {
            pixels,
            area,
            next_y: area.y1,
        }
    }

    /// Rectangle being streamed.
    #[inline]
    pub const fn area(&self) -> Rect { self.area }
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a [u16];

    fn next(&mut self) -> Option<Self::Item> {
        if self.area.is_empty() || self.next_y > self.area.y2 {
            return None;
        }
        let start = self.next_y as usize * SCREEN_WIDTH + self.area.x1 as usize;
        let end = start + self.area.width() as usize;
        self.next_y += 1;
        self.pixels.get(start..end)
    }
}

/// Transfer counters for profiling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Number of blits issued.
    pub blits: u32,
    /// Pixels pushed to the panel.
    pub pixels: u32,
}

// =============================================================================
// Framebuffer
// =============================================================================

/// The live pixel buffer for the whole panel.
pub struct Framebuffer<'a> {
    pixels: &'a mut [u16; PIXEL_COUNT],
    dirty: Rect,
    stats: FlushStats,
}

impl<'a> Framebuffer<'a> {
    /// Wrap pixel memory. Contents are left as-is and nothing is dirty.
    pub fn new(pixels: &'a mut [u16; PIXEL_COUNT]) -> Self {
        Self {
            pixels,
            dirty: Rect::EMPTY,
            stats: FlushStats::default(),
        }
    }

    /// Raw pixel storage.
    #[inline]
    pub fn pixels(&self) -> &[u16; PIXEL_COUNT] { &*self.pixels }

    /// Raw pixel storage for block copies. Callers must mark what they touch.
    #[inline]
    pub(crate) fn pixels_mut(&mut self) -> &mut [u16; PIXEL_COUNT] { &mut *self.pixels }

    /// Accumulated dirty rectangle, if any.
    #[inline]
    pub fn dirty(&self) -> Option<Rect> { if self.dirty.is_empty() { None } else { Some(self.dirty) } }

    /// Return the dirty rectangle and reset it to empty.
    #[inline]
    pub fn take_dirty(&mut self) -> Rect { core::mem::replace(&mut self.dirty, Rect::EMPTY) }

    /// Extend the dirty rectangle (clamped to the screen).
    #[inline]
    pub fn mark_dirty(
        &mut self,
        rect: Rect,
    ) {
        self.dirty = self.dirty.union(&rect.clamp_to(&Rect::SCREEN));
    }

    #[inline]
    pub const fn stats(&self) -> FlushStats { self.stats }

    /// Read and reset the transfer counters.
    #[inline]
    pub fn take_stats(&mut self) -> FlushStats { core::mem::take(&mut self.stats) }

    #[inline]
    const fn index(
        x: i16,
        y: i16,
    ) -> Option<usize> {
        if x >= 0 && (x as usize) < SCREEN_WIDTH && y >= 0 && (y as usize) < SCREEN_HEIGHT {
            Some(y as usize * SCREEN_WIDTH + x as usize)
        } else {
            None
        }
    }

    /// Bounds-checked write without dirty tracking.
    #[inline]
    fn put(
        &mut self,
        x: i16,
        y: i16,
        raw: u16,
    ) {
        if let Some(idx) = Self::index(x, y) {
            self.pixels[idx] = raw;
        }
    }

    /// Fill a clamped horizontal span without dirty tracking.
    fn span(
        &mut self,
        x1: i16,
        x2: i16,
        y: i16,
        raw: u16,
    ) {
        let span = Rect::new(x1, y, x2, y).clamp_to(&Rect::SCREEN);
        if span.is_empty() {
            return;
        }
        let row = span.y1 as usize * SCREEN_WIDTH;
        self.pixels[row + span.x1 as usize..=row + span.x2 as usize].fill(raw);
    }

    // =========================================================================
    // Pixels
    // =========================================================================

    /// Fill the whole buffer.
    pub fn clear(
        &mut self,
        color: Rgb565,
    ) {
        self.pixels.fill(color.into_storage());
        self.dirty = Rect::SCREEN;
    }

    /// Write one pixel. Out-of-range coordinates are dropped.
    pub fn set_pixel(
        &mut self,
        x: i16,
        y: i16,
        color: Rgb565,
    ) {
        if let Some(idx) = Self::index(x, y) {
            self.pixels[idx] = color.into_storage();
            self.dirty = self.dirty.union(&Rect::new(x, y, x, y));
        }
    }

    /// Read one pixel, `None` when out of range.
    pub fn get_pixel(
        &self,
        x: i16,
        y: i16,
    ) -> Option<Rgb565> {
        Self::index(x, y).map(|idx| Rgb565::from(RawU16::new(self.pixels[idx])))
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Horizontal line from `x1` to `x2` inclusive.
    pub fn hline(
        &mut self,
        x1: i16,
        x2: i16,
        y: i16,
        color: Rgb565,
    ) {
        self.span(x1, x2, y, color.into_storage());
        self.mark_dirty(Rect::new(x1, y, x2, y));
    }

    /// Vertical line from `y1` to `y2` inclusive.
    pub fn vline(
        &mut self,
        x: i16,
        y1: i16,
        y2: i16,
        color: Rgb565,
    ) {
        let area = Rect::new(x, y1, x, y2);
        let raw = color.into_storage();
        for y in area.y1..=area.y2 {
            self.put(x, y, raw);
        }
        self.mark_dirty(area);
    }

    /// Bresenham line.
    pub fn line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        color: Rgb565,
    ) {
        let raw = color.into_storage();
        let (mut x, mut y) = (i32::from(x0), i32::from(y0));
        let (tx, ty) = (i32::from(x1), i32::from(y1));
        let dx = (tx - x).abs();
        let dy = -(ty - y).abs();
        let sx = if x < tx { 1 } else { -1 };
        let sy = if y < ty { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x as i16, y as i16, raw);
            if x == tx && y == ty {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        self.mark_dirty(Rect::new(x0, y0, x1, y1));
    }

    /// Rectangle between two corners (any order), filled or outlined.
    pub fn rect(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: Rgb565,
        filled: bool,
    ) {
        let area = Rect::new(x1, y1, x2, y2);
        let raw = color.into_storage();
        if filled {
            let clipped = area.clamp_to(&Rect::SCREEN);
            if !clipped.is_empty() {
                for y in clipped.y1..=clipped.y2 {
                    self.span(clipped.x1, clipped.x2, y, raw);
                }
            }
        } else {
            self.span(area.x1, area.x2, area.y1, raw);
            self.span(area.x1, area.x2, area.y2, raw);
            for y in area.y1..=area.y2 {
                self.put(area.x1, y, raw);
                self.put(area.x2, y, raw);
            }
        }
        self.mark_dirty(area);
    }

    /// Midpoint circle. Filled circles are scan-filled with horizontal spans.
    pub fn circle(
        &mut self,
        cx: i16,
        cy: i16,
        radius: i16,
        color: Rgb565,
        filled: bool,
    ) {
        if radius < 0 {
            return;
        }
        let raw = color.into_storage();
        let mut x: i16 = 0;
        let mut y: i16 = radius;
        let mut d: i16 = 1 - radius;

        while x <= y {
            if filled {
                self.span(cx - x, cx + x, cy + y, raw);
                self.span(cx - x, cx + x, cy - y, raw);
                self.span(cx - y, cx + y, cy + x, raw);
                self.span(cx - y, cx + y, cy - x, raw);
            } else {
                for (px, py) in [(x, y), (y, x)] {
                    self.put(cx + px, cy + py, raw);
                    self.put(cx - px, cy + py, raw);
                    self.put(cx + px, cy - py, raw);
                    self.put(cx - px, cy - py, raw);
                }
            }

            x += 1;
            if d < 0 {
                d += 2 * x + 1;
            } else {
                y -= 1;
                d += 2 * (x - y) + 1;
            }
        }
        self.mark_dirty(Rect::around(cx, cy, radius, radius));
    }

    /// Axis-aligned ellipse with radii `rx`/`ry`.
    pub fn ellipse(
        &mut self,
        cx: i16,
        cy: i16,
        rx: i16,
        ry: i16,
        color: Rgb565,
        filled: bool,
    ) {
        if rx < 0 || ry < 0 {
            return;
        }
        let raw = color.into_storage();
        let (rx2, ry2) = (i32::from(rx) * i32::from(rx), i32::from(ry) * i32::from(ry));

        // Row pass: half-width for every row
        for dy in -ry..=ry {
            let half = if ry == 0 {
                rx
            } else {
                isqrt((rx2 * (ry2 - i32::from(dy) * i32::from(dy)) / ry2) as u32) as i16
            };
            if filled {
                self.span(cx - half, cx + half, cy + dy, raw);
            } else {
                self.put(cx - half, cy + dy, raw);
                self.put(cx + half, cy + dy, raw);
            }
        }

        // Column pass closes the gaps near the flat top and bottom of an outline
        if !filled {
            for dx in -rx..=rx {
                let half = if rx == 0 {
                    ry
                } else {
                    isqrt((ry2 * (rx2 - i32::from(dx) * i32::from(dx)) / rx2) as u32) as i16
                };
                self.put(cx + dx, cy - half, raw);
                self.put(cx + dx, cy + half, raw);
            }
        }
        self.mark_dirty(Rect::around(cx, cy, rx, ry));
    }

    // =========================================================================
    // Flushing
    // =========================================================================

    /// Send the dirty rectangle to the panel and reset it.
    ///
    /// Returns `false` (and touches nothing) when nothing is dirty.
    pub fn flush<S: PanelSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> bool {
        let area = self.take_dirty().clamp_to(&Rect::SCREEN);
        self.blit(sink, area)
    }

    /// Send an explicit rectangle, ignoring and keeping the dirty rectangle.
    pub fn flush_region<S: PanelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        area: Rect,
    ) -> bool {
        self.blit(sink, area.clamp_to(&Rect::SCREEN))
    }

    fn blit<S: PanelSink + ?Sized>(
        &mut self,
        sink: &mut S,
        area: Rect,
    ) -> bool {
        if area.is_empty() {
            return false;
        }
        self.stats.blits += 1;
        self.stats.pixels += area.area();
        sink.blit(area, Rows::new(&self.pixels[..], area));
        true
    }
}

/// Integer square root (floor).
const fn isqrt(n: u32) -> u32 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

// =============================================================================
// embedded-graphics Integration
// =============================================================================

impl OriginDimensions for Framebuffer<'_> {
    fn size(&self) -> Size { Size::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32) }
}

impl DrawTarget for Framebuffer<'_> {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(
        &mut self,
        pixels: I,
    ) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (i16::try_from(point.x), i16::try_from(point.y)) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> Result<(), Self::Error> {
        let drawable_area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = drawable_area.bottom_right() {
            let top_left = drawable_area.top_left;
            self.rect(
                top_left.x as i16,
                top_left.y as i16,
                bottom_right.x as i16,
                bottom_right.y as i16,
                color,
                true,
            );
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
