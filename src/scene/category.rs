//! Scene categories and their lifecycle.
//!
//! A category is a season, weather condition or calendar event that owns a
//! sprite set (and possibly static decorations). Each one moves through
//!
//! ```text
//! Inactive -> Initialized (background not saved) -> Animating (background saved)
//! ```
//!
//! and animates on its own interval. [`Conditions`] decides which categories
//! should exist for the current date, weather and time of day.

use super::calendar::{Date, Season};
use crate::config::SceneConfig;
use crate::weather::{Intensity, Weather};

/// Cloud count for a clear winter sky.
const WINTER_CLOUDS: usize = 3;

/// Everything that owns sprites or decorations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Category {
    Clouds,
    Rain,
    Snow,
    /// Chimney smoke, every season except summer.
    Smoke,
    /// Birds and butterflies.
    SpringFauna,
    /// Bees by day, fireflies at night.
    SummerFauna,
    /// Migrating flock.
    FallFauna,
    /// Ghosts and pumpkins.
    Halloween,
    /// Advent ornaments (static only).
    Christmas,
    /// New Year's Eve rockets.
    Fireworks,
}

impl Category {
    pub const COUNT: usize = 10;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Clouds,
        Self::Rain,
        Self::Snow,
        Self::Smoke,
        Self::SpringFauna,
        Self::SummerFauna,
        Self::FallFauna,
        Self::Halloween,
        Self::Christmas,
        Self::Fireworks,
    ];

    #[inline]
    pub const fn index(self) -> usize { self as usize }

    /// Milliseconds between two updates of this category's sprites.
    pub const fn tick_interval(
        self,
        config: &SceneConfig,
    ) -> u32 {
        match self {
            Self::Clouds => config.cloud_tick_ms,
            Self::Rain => config.rain_tick_ms,
            Self::Snow => config.snow_tick_ms,
            Self::Smoke => config.smoke_tick_ms,
            Self::SpringFauna | Self::SummerFauna | Self::FallFauna => config.fauna_tick_ms,
            Self::Halloween | Self::Christmas => config.ghost_tick_ms,
            Self::Fireworks => config.firework_tick_ms,
        }
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Lifecycle {
    Inactive,
    /// Sprites exist but the background has not been captured yet.
    Initialized,
    Animating,
}

/// Per-category flags and cadence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryState {
    pub initialized: bool,
    pub background_saved: bool,
    /// Which flavour of the category was built (see [`Conditions::variant`]).
    pub variant: u8,
    last_tick_ms: u32,
}

impl CategoryState {
    pub const INACTIVE: Self = Self {
        initialized: false,
        background_saved: false,
        variant: 0,
        last_tick_ms: 0,
    };

    pub const fn lifecycle(&self) -> Lifecycle {
        match (self.initialized, self.background_saved) {
            (false, _) => Lifecycle::Inactive,
            (true, false) => Lifecycle::Initialized,
            (true, true) => Lifecycle::Animating,
        }
    }

    #[inline]
    pub const fn needs_background(&self) -> bool { self.initialized && !self.background_saved }

    pub fn activate(
        &mut self,
        variant: u8,
        now_ms: u32,
    ) {
        *self = Self {
            initialized: true,
            background_saved: false,
            variant,
            last_tick_ms: now_ms,
        };
    }

    #[inline]
    pub fn deactivate(&mut self) { *self = Self::INACTIVE; }

    /// If the category is animating and its interval has passed, consume the
    /// interval and return the elapsed time.
    pub fn take_due(
        &mut self,
        now_ms: u32,
        interval_ms: u32,
    ) -> Option<u32> {
        if self.lifecycle() != Lifecycle::Animating {
            return None;
        }
        let elapsed = now_ms.wrapping_sub(self.last_tick_ms);
        if elapsed < interval_ms {
            return None;
        }
        self.last_tick_ms = now_ms;
        Some(elapsed)
    }
}

// =============================================================================
// Active Set
// =============================================================================

/// Inputs that decide which categories exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conditions {
    pub date: Date,
    pub weather: Weather,
    pub daytime: bool,
}

impl Conditions {
    #[inline]
    pub const fn season(&self) -> Season { self.date.season() }

    /// Clouds shown: the weather's count, or a few white ones in a clear winter sky.
    pub const fn cloud_count(&self) -> usize {
        match (self.weather.cloud_count(), self.season()) {
            (0, Season::Winter) => WINTER_CLOUDS,
            (n, _) => n,
        }
    }

    pub const fn wants(
        &self,
        category: Category,
    ) -> bool {
        let season = self.season();
        match category {
            Category::Clouds => self.cloud_count() > 0,
            Category::Rain => matches!(self.weather, Weather::Rain(_)),
            Category::Snow => matches!(self.weather, Weather::Snow(_)),
            Category::Smoke => !matches!(season, Season::Summer),
            Category::SpringFauna => matches!(season, Season::Spring) && self.daytime,
            Category::SummerFauna => matches!(season, Season::Summer),
            Category::FallFauna => matches!(season, Season::Fall) && self.daytime,
            Category::Halloween => self.date.is_halloween(),
            Category::Christmas => self.date.is_christmas(),
            Category::Fireworks => self.date.is_new_years_eve() && !self.daytime,
        }
    }

    /// Flavour of an active category. A change rebuilds its sprite set.
    pub const fn variant(
        &self,
        category: Category,
    ) -> u8 {
        const fn level(i: Intensity) -> u8 {
            match i {
                Intensity::Light => 1,
                Intensity::Medium => 2,
                Intensity::Heavy => 3,
            }
        }
        match category {
            Category::Clouds => {
                let tone = match self.weather {
                    Weather::Rain(i) | Weather::Snow(i) => level(i),
                    _ => 0,
                };
                self.cloud_count() as u8 * 4 + tone
            }
            Category::Rain | Category::Snow => match self.weather {
                Weather::Rain(i) | Weather::Snow(i) => level(i),
                _ => 0,
            },
            Category::SummerFauna => self.daytime as u8,
            // Advent ornaments grow with the date
            Category::Christmas => self.date.day(),
            _ => 0,
        }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
