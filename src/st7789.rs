//! Blocking-blit ST7789 driver for the 135x240 panel on embassy-rp.
//!
//! The scene pushes small dirty rectangles rather than whole frames, so each
//! [`PanelSink::blit`] opens a RAM window around the rectangle and streams it
//! row by row. Rows are converted to big-endian bytes in a one-row scratch
//! buffer; no second framebuffer is needed.
//!
//! The 135x240 glass sits inside the controller's 240x320 RAM, hence the
//! column/row offsets applied to every window.
//!
//! Pin mapping (Pico Display Pack):
//! - DC: GPIO16
//! - CS: GPIO17
//! - CLK: GPIO18 (SPI0 CLK)
//! - MOSI: GPIO19 (SPI0 TX)
//! - Backlight: GPIO20

use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Async, Config as SpiConfig, Error, Spi};
use embassy_time::Timer;
use seasonal_panel::config::SCREEN_WIDTH;
use seasonal_panel::config::layout::{PANEL_X_OFFSET, PANEL_Y_OFFSET};
use seasonal_panel::framebuffer::{PanelSink, Rows};
use seasonal_panel::geometry::Rect;

// ST7789 Commands
const SWRESET: u8 = 0x01;
const SLPOUT: u8 = 0x11;
const NORON: u8 = 0x13;
const INVON: u8 = 0x21;
const DISPON: u8 = 0x29;
const CASET: u8 = 0x2A;
const RASET: u8 = 0x2B;
const RAMWR: u8 = 0x2C;
const MADCTL: u8 = 0x36;
const COLMOD: u8 = 0x3A;

/// Portrait, RGB order, no mirroring.
const MADCTL_PORTRAIT: u8 = 0x00;

/// SPI configuration for the ST7789 (62.5 MHz is the controller maximum).
pub fn spi_config() -> SpiConfig {
    let mut config = SpiConfig::default();
    config.frequency = 62_500_000;
    config
}

/// ST7789 panel - owns SPI and the control pins, receives dirty rectangles.
pub struct St7789Panel<'d> {
    spi: Spi<'d, SPI0, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
    /// One row of big-endian pixels.
    line: [u8; SCREEN_WIDTH * 2],
    /// SPI writes that failed inside a blit (they are otherwise ignored).
    write_errors: u32,
}

impl<'d> St7789Panel<'d> {
    pub fn new(
        spi: Spi<'d, SPI0, Async>,
        dc: Output<'d>,
        cs: Output<'d>,
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            line: [0; SCREEN_WIDTH * 2],
            write_errors: 0,
        }
    }

    /// Run the power-on sequence.
    pub async fn init(&mut self) -> Result<(), Error> {
        // Software reset
        self.command(SWRESET, &[])?;
        Timer::after_millis(150).await;

        // Exit sleep mode
        self.command(SLPOUT, &[])?;
        Timer::after_millis(10).await;

        // Pixel format RGB565 (16-bit)
        self.command(COLMOD, &[0x55])?;
        self.command(MADCTL, &[MADCTL_PORTRAIT])?;

        // The IPS glass needs inversion on
        self.command(INVON, &[])?;
        Timer::after_millis(10).await;

        self.command(NORON, &[])?;
        Timer::after_millis(10).await;

        self.command(DISPON, &[])?;
        Timer::after_millis(10).await;
        Ok(())
    }

    #[inline]
    pub const fn write_errors(&self) -> u32 { self.write_errors }

    /// Command byte (DC low) followed by optional parameters (DC high).
    fn command(
        &mut self,
        cmd: u8,
        params: &[u8],
    ) -> Result<(), Error> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.blocking_write(&[cmd]);
        if result.is_ok() && !params.is_empty() {
            self.dc.set_high();
            result = self.spi.blocking_write(params);
        }
        self.cs.set_high();
        result
    }

    /// Open a RAM window over `area` (screen coordinates).
    fn set_window(
        &mut self,
        area: Rect,
    ) -> Result<(), Error> {
        let x0 = (area.x1 as u16) + PANEL_X_OFFSET;
        let x1 = (area.x2 as u16) + PANEL_X_OFFSET;
        let y0 = (area.y1 as u16) + PANEL_Y_OFFSET;
        let y1 = (area.y2 as u16) + PANEL_Y_OFFSET;

        self.command(CASET, &[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8])?;
        self.command(RASET, &[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8])
    }

    fn write_rows(
        &mut self,
        area: Rect,
        rows: Rows<'_>,
    ) -> Result<(), Error> {
        self.set_window(area)?;

        // RAMWR then the pixel stream with CS held low
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.blocking_write(&[RAMWR]);
        self.dc.set_high();
        for row in rows {
            if result.is_err() {
                break;
            }
            let bytes = &mut self.line[..row.len() * 2];
            for (chunk, pixel) in bytes.chunks_exact_mut(2).zip(row) {
                chunk.copy_from_slice(&pixel.to_be_bytes());
            }
            result = self.spi.blocking_write(bytes);
        }
        self.cs.set_high();
        result
    }
}

impl PanelSink for St7789Panel<'_> {
    fn blit(
        &mut self,
        area: Rect,
        rows: Rows<'_>,
    ) {
        if self.write_rows(area, rows).is_err() {
            self.write_errors = self.write_errors.wrapping_add(1);
        }
    }
}
