//! Seasonal Scene Firmware for Raspberry Pi Pico 2 (RP2350)
//!
//! Animates a seasonal landscape on a 135x240 ST7789 panel (Pico Display Pack).
//!
//! # Architecture
//!
//! - Main task: calls [`Scene::housekeeping`] every 10 ms. A full repaint is
//!   pushed as one window; animation ticks push only the rectangles that changed.
//! - Demo inputs task (feature `demo-inputs`): simulates the host link by
//!   publishing clock, weather, wind, volume and media text over a `Watch`.
//!
//! Panel bring-up failure is logged and rendering stops; the rest of the
//! firmware (heartbeat LED, input task) keeps running.

#![no_std]
#![no_main]
// Crate-level lints (match lib.rs for consistency)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// Modules only used in the binary (not testable on host)
mod st7789;

use defmt::{debug, info, warn};
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::Watch;
use embassy_time::{Duration, Instant, Timer};
use seasonal_panel::config::{PIXEL_COUNT, SceneConfig};
use seasonal_panel::scene::{ClockTime, Date, Scene, SceneEvent};
use seasonal_panel::weather::{Weather, Wind};
use static_cell::ConstStaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::st7789::{St7789Panel, spi_config};

/// Housekeeping period.
const TICK: Duration = Duration::from_millis(10);

/// Profiling log period.
const PROFILE_PERIOD: Duration = Duration::from_secs(2);

// Pixel memory: the working frame and the static-scene snapshot (64,800 bytes each)
static FRAME: ConstStaticCell<[u16; PIXEL_COUNT]> = ConstStaticCell::new([0; PIXEL_COUNT]);
static SNAPSHOT: ConstStaticCell<[u16; PIXEL_COUNT]> = ConstStaticCell::new([0; PIXEL_COUNT]);

// =============================================================================
// Scene Inputs
// =============================================================================

/// Everything the host link would normally send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SceneInputs {
    date: Date,
    time: ClockTime,
    weather: Weather,
    wind: Wind,
    volume: u8,
    layer: u8,
    media: &'static str,
}

/// Latest inputs. The input task writes, the main task reads changes.
static INPUTS: Watch<CriticalSectionRawMutex, SceneInputs, 2> = Watch::new();

fn apply(
    scene: &mut Scene<'_>,
    inputs: &SceneInputs,
) {
    scene.set_date(inputs.date);
    scene.set_time(inputs.time);
    scene.set_weather(inputs.weather);
    scene.set_wind(inputs.wind);
    scene.set_volume(inputs.volume);
    scene.set_layer(inputs.layer);
    scene.set_media_text(inputs.media);
}

#[cfg(feature = "demo-inputs")]
mod demo {
    use seasonal_panel::weather::{Intensity, WindDirection, WindStrength};

    use super::*;

    /// Simulated minutes per real second.
    const MINUTES_PER_SECOND: u32 = 4;

    const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    const WEATHER: [Weather; 6] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rain(Intensity::Light),
        Weather::Overcast,
        Weather::Snow(Intensity::Medium),
        Weather::Rain(Intensity::Heavy),
    ];

    const WIND: [Wind; 4] = [
        Wind::CALM,
        Wind::new(WindStrength::Light, WindDirection::Right),
        Wind::new(WindStrength::Medium, WindDirection::Left),
        Wind::new(WindStrength::High, WindDirection::Right),
    ];

    const MEDIA: [&str; 3] = [
        "Vivaldi - The Four Seasons: Winter (Allegro non molto)",
        "Nocturne",
        "Tchaikovsky - The Seasons, Op. 37a: October (Autumn Song)",
    ];

    /// Advance a date by `days`, ignoring leap years.
    fn add_days(
        mut date: Date,
        days: u32,
    ) -> Date {
        for _ in 0..days {
            date = if date.day() < DAYS_IN_MONTH[usize::from(date.month() - 1)] {
                Date::new(date.year(), date.month(), date.day() + 1)
            } else if date.month() < 12 {
                Date::new(date.year(), date.month() + 1, 1)
            } else {
                Date::new(date.year() + 1, 1, 1)
            };
        }
        date
    }

    /// Publish simulated inputs: a fast clock starting before Halloween dusk,
    /// weather every six simulated hours, layer every simulated day.
    #[embassy_executor::task]
    pub async fn demo_inputs_task(
        sender: embassy_sync::watch::DynSender<'static, SceneInputs>,
        start_time: Instant,
    ) {
        info!("Demo inputs task started");
        let start_date = Date::new(2025, 10, 29);
        let start_minute = 16 * 60;

        loop {
            let elapsed_ms = start_time.elapsed().as_millis() as u32;
            let sim_minutes = start_minute + elapsed_ms / 1000 * MINUTES_PER_SECOND;
            let days = sim_minutes / (24 * 60);
            let minute_of_day = sim_minutes % (24 * 60);
            let quarter = (sim_minutes / (6 * 60)) as usize;

            // Volume breathes between 20 and 100 percent
            let t = elapsed_ms as f32 / 1000.0;
            let volume = 60.0 + 40.0 * micromath::F32(t * 0.2).sin().0;

            sender.send(SceneInputs {
                date: add_days(start_date, days),
                time: ClockTime::new((minute_of_day / 60) as u8, (minute_of_day % 60) as u8),
                weather: WEATHER[quarter % WEATHER.len()],
                wind: WIND[(quarter / 2) % WIND.len()],
                volume: volume as u8,
                layer: (days % 4) as u8,
                media: MEDIA[(quarter / 3) % MEDIA.len()],
            });

            Timer::after_millis(250).await;
        }
    }
}

// Program metadata for `picotool info`
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"seasonal-panel"),
    embassy_rp::binary_info::rp_program_description!(c"Animated seasonal scene on a 135x240 ST7789 panel"),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Seasonal panel starting...");
    let p = embassy_rp::init(Default::default());

    // Heartbeat LED (active-low: Low = ON). Display Pack: Red=6, Green=7, Blue=8
    let mut _led_r = Output::new(p.PIN_6, Level::High);
    let mut _led_g = Output::new(p.PIN_7, Level::High);
    let mut led_b = Output::new(p.PIN_8, Level::High);

    // Display pins: CS=17, DC=16, CLK=18, MOSI=19, Backlight=20
    let cs = Output::new(p.PIN_17, Level::High);
    let dc = Output::new(p.PIN_16, Level::Low);
    let mut _backlight = Output::new(p.PIN_20, Level::High);

    // TX-only SPI, the panel has no MISO
    let spi = Spi::new_txonly(p.SPI0, p.PIN_18, p.PIN_19, p.DMA_CH0, spi_config());
    let mut panel = St7789Panel::new(spi, dc, cs);
    let panel_ok = match panel.init().await {
        Ok(()) => {
            info!("Display initialized");
            true
        }
        Err(e) => {
            warn!("Display init failed ({}), rendering disabled", defmt::Debug2Format(&e));
            false
        }
    };

    let mut scene = Scene::new(FRAME.take(), SNAPSHOT.take(), SceneConfig::DEFAULT);

    // Get sender/receiver from static Watch channel (initialized at compile time)
    let Some(mut inputs) = INPUTS.dyn_receiver() else {
        warn!("No input receiver available");
        return;
    };

    #[cfg(feature = "demo-inputs")]
    {
        if spawner.spawn(demo::demo_inputs_task(INPUTS.dyn_sender(), Instant::now())).is_ok() {
            info!("Demo inputs task spawned");
        } else {
            warn!("Demo inputs task could not be spawned");
        }
    }
    #[cfg(not(feature = "demo-inputs"))]
    let _ = spawner;

    // Profiling
    let boot = Instant::now();
    let mut last_profile_log = Instant::now();
    let mut ticks = 0u32;
    let mut busy_us = 0u64;
    let mut worst_us = 0u32;
    let mut redraws = 0u32;

    info!("Main loop starting");

    loop {
        let tick_start = Instant::now();
        let now_ms = boot.elapsed().as_millis() as u32;

        if let Some(latest) = inputs.try_changed() {
            apply(&mut scene, &latest);
        }

        if panel_ok {
            for event in scene.housekeeping(now_ms, &mut panel) {
                match event {
                    SceneEvent::FullRedraw(reason) => {
                        redraws += 1;
                        info!("Full redraw: {}", reason);
                    }
                    other => debug!("Scene: {}", other),
                }
            }
        }

        let elapsed_us = tick_start.elapsed().as_micros() as u32;
        ticks += 1;
        busy_us += u64::from(elapsed_us);
        worst_us = worst_us.max(elapsed_us);

        // Log profiling data every 2 seconds
        if last_profile_log.elapsed() >= PROFILE_PERIOD {
            let stats = scene.take_stats();
            let report = scene.last_tick();
            info!(
                "PROFILE: ticks={} avg={}us worst={}us redraws={} blits={} px={} last(upd={} redrawn={} forced={}) spi_errors={}",
                ticks,
                busy_us / u64::from(ticks.max(1)),
                worst_us,
                redraws,
                stats.blits,
                stats.pixels,
                report.updated,
                report.redrawn,
                report.forced,
                panel.write_errors()
            );
            last_profile_log = Instant::now();
            ticks = 0;
            busy_us = 0;
            worst_us = 0;
            redraws = 0;
        }

        // Toggle blue LED every second to show loop is running (time-based)
        if (now_ms / 1000).is_multiple_of(2) {
            led_b.set_low(); // ON
        } else {
            led_b.set_high(); // OFF
        }

        Timer::after(TICK).await;
    }
}
