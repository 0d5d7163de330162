//! Test doubles shared by the unit tests.

use crate::config::{PIXEL_COUNT, SCREEN_WIDTH};
use crate::framebuffer::{PanelSink, Rows};
use crate::geometry::Rect;

/// Zeroed pixel memory on the heap (keeps 64 KB buffers off the test stack).
pub fn blank_pixels() -> Box<[u16; PIXEL_COUNT]> {
    match vec![0u16; PIXEL_COUNT].into_boxed_slice().try_into() {
        Ok(pixels) => pixels,
        Err(_) => unreachable!("length is PIXEL_COUNT"),
    }
}

/// Panel double that records every blit and mirrors the pixels it receives.
pub struct RecordingSink {
    /// Every rectangle blitted, in order.
    pub blits: Vec<Rect>,
    /// What the physical panel would show.
    pub panel: Box<[u16; PIXEL_COUNT]>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            blits: Vec::new(),
            panel: blank_pixels(),
        }
    }

    pub fn pixel_at(
        &self,
        x: i16,
        y: i16,
    ) -> u16 {
        self.panel[y as usize * SCREEN_WIDTH + x as usize]
    }

    /// Total pixels transferred.
    pub fn pixels_sent(&self) -> u32 { self.blits.iter().map(Rect::area).sum() }
}

impl PanelSink for RecordingSink {
    fn blit(
        &mut self,
        area: Rect,
        rows: Rows<'_>,
    ) {
        assert!(!area.is_empty(), "empty blit");
        assert_eq!(area, area.clamp_to(&Rect::SCREEN), "blit outside the screen");
        self.blits.push(area);
        for (dy, row) in rows.enumerate() {
            assert_eq!(row.len(), area.width() as usize);
            let start = (area.y1 as usize + dy) * SCREEN_WIDTH + area.x1 as usize;
            self.panel[start..start + row.len()].copy_from_slice(row);
        }
    }
}
