//! Sunrise and sunset.
//!
//! The scene asks an [`Almanac`] for the sun times of the current date and
//! derives day/night and the sun or moon position from them. The stock
//! [`TableAlmanac`] interpolates a 24-entry table (the 1st and 15th of every
//! month). [`DaylightCache`] keeps one answer per calendar day.

use super::calendar::{ClockTime, Date};

const MINUTES_PER_DAY: u16 = 24 * 60;

/// Sunrise and sunset for one day, in minutes after midnight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct SunTimes {
    pub sunrise: u16,
    pub sunset: u16,
}

impl SunTimes {
    pub const fn new(
        sunrise: u16,
        sunset: u16,
    ) -> Self {
        Self { sunrise, sunset }
    }

    /// Daytime is `sunrise <= now < sunset`.
    #[inline]
    pub const fn is_daytime(
        &self,
        time: ClockTime,
    ) -> bool {
        let now = time.minutes();
        now >= self.sunrise && now < self.sunset
    }

    /// How far through the current day or night we are, `0..=255`.
    ///
    /// Day runs from sunrise (0) to sunset (255); night from sunset (0) to the
    /// next sunrise (255), wrapping past midnight.
    pub const fn cycle_progress(
        &self,
        time: ClockTime,
    ) -> u8 {
        let now = time.minutes();
        let (elapsed, span) = if self.is_daytime(time) {
            (now - self.sunrise, self.sunset.saturating_sub(self.sunrise))
        } else {
            let since_sunset = if now >= self.sunset { now - self.sunset } else { MINUTES_PER_DAY - self.sunset + now };
            (since_sunset, MINUTES_PER_DAY - self.sunset.saturating_sub(self.sunrise))
        };
        if span == 0 {
            return 128;
        }
        let progress = elapsed as u32 * 255 / span as u32;
        if progress > 255 { 255 } else { progress as u8 }
    }
}

/// Source of sun times for a date.
pub trait Almanac {
    fn sun_times(
        &self,
        date: Date,
    ) -> SunTimes;
}

// =============================================================================
// Table Almanac
// =============================================================================

/// Sunrise/sunset in minutes for the 1st and 15th of each month.
const TABLE: [(u16, u16); 24] = [
    (508, 1000),
    (500, 1025),
    (480, 1060),
    (445, 1095),
    (400, 1125),
    (345, 1160),
    (290, 1200),
    (245, 1235),
    (210, 1270),
    (185, 1300),
    (175, 1315),
    (175, 1320),
    (180, 1315),
    (200, 1295),
    (230, 1260),
    (265, 1215),
    (300, 1165),
    (340, 1110),
    (375, 1060),
    (415, 1010),
    (455, 970),
    (490, 950),
    (510, 945),
    (515, 950),
];

const DAYS_TO_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DAYS_PER_YEAR: u16 = 365;

/// Day of year of table entry `i`.
#[inline]
const fn anchor_day(i: usize) -> u16 { DAYS_TO_MONTH[i / 2] + if i % 2 == 0 { 1 } else { 15 } }

const fn interpolate(
    x: u16,
    x0: u16,
    x1: u16,
    y0: u16,
    y1: u16,
) -> u16 {
    if x <= x0 {
        return y0;
    }
    if x >= x1 {
        return y1;
    }
    let delta = (y1 as i32 - y0 as i32) * (x - x0) as i32 / (x1 - x0) as i32;
    (y0 as i32 + delta) as u16
}

/// Linear interpolation over a fixed northern-latitude table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TableAlmanac;

impl Almanac for TableAlmanac {
    fn sun_times(
        &self,
        date: Date,
    ) -> SunTimes {
        let doy = date.day_of_year();

        let mut index = 0;
        while index + 1 < TABLE.len() && anchor_day(index + 1) <= doy {
            index += 1;
        }
        let next = (index + 1) % TABLE.len();

        let from = anchor_day(index);
        let mut to = anchor_day(next);
        if to < from {
            to += DAYS_PER_YEAR;
        }

        let (rise0, set0) = TABLE[index];
        let (rise1, set1) = TABLE[next];
        SunTimes::new(interpolate(doy, from, to, rise0, rise1), interpolate(doy, from, to, set0, set1))
    }
}

// =============================================================================
// Cache
// =============================================================================

/// Remembers the sun times of the last calendar day asked for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DaylightCache {
    entry: Option<((u8, u8), SunTimes)>,
}

impl DaylightCache {
    pub const fn new() -> Self { Self { entry: None } }

    /// Sun times for `date`, asking `almanac` only when the day changed.
    pub fn get<A: Almanac + ?Sized>(
        &mut self,
        almanac: &A,
        date: Date,
    ) -> SunTimes {
        let key = (date.month(), date.day());
        match self.entry {
            Some((cached, times)) if cached == key => times,
            _ => {
                let times = almanac.sun_times(date);
                self.entry = Some((key, times));
                times
            }
        }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_table_anchors_are_exact() {
        let almanac = TableAlmanac;
        assert_eq!(almanac.sun_times(Date::new(2025, 1, 1)), SunTimes::new(508, 1000));
        assert_eq!(almanac.sun_times(Date::new(2025, 6, 15)), SunTimes::new(175, 1320));
        assert_eq!(almanac.sun_times(Date::new(2025, 12, 15)), SunTimes::new(515, 950));
    }

    #[test]
    fn test_interpolates_between_anchors() {
        let almanac = TableAlmanac;
        // Jan 8 sits halfway between Jan 1 and Jan 15
        assert_eq!(almanac.sun_times(Date::new(2025, 1, 8)), SunTimes::new(504, 1012));
        // Late December interpolates toward next January 1
        assert_eq!(almanac.sun_times(Date::new(2025, 12, 25)), SunTimes::new(511, 979));
    }

    #[test]
    fn test_daytime_window() {
        let times = SunTimes::new(360, 1080);
        assert!(!times.is_daytime(ClockTime::new(5, 59)));
        assert!(times.is_daytime(ClockTime::new(6, 0)));
        assert!(times.is_daytime(ClockTime::new(17, 59)));
        assert!(!times.is_daytime(ClockTime::new(18, 0)));
    }

    #[test]
    fn test_cycle_progress() {
        let times = SunTimes::new(360, 1080);
        assert_eq!(times.cycle_progress(ClockTime::new(6, 0)), 0);
        assert_eq!(times.cycle_progress(ClockTime::new(12, 0)), 127);
        assert_eq!(times.cycle_progress(ClockTime::new(18, 0)), 0);
        assert_eq!(times.cycle_progress(ClockTime::new(0, 0)), 127);
        assert_eq!(times.cycle_progress(ClockTime::new(5, 59)), 254);
    }

    struct Counting {
        calls: Cell<u32>,
    }

    impl Almanac for Counting {
        fn sun_times(
            &self,
            date: Date,
        ) -> SunTimes {
            self.calls.set(self.calls.get() + 1);
            SunTimes::new(u16::from(date.day()), 1_000)
        }
    }

    #[test]
    fn test_cache_asks_once_per_day() {
        let almanac = Counting { calls: Cell::new(0) };
        let mut cache = DaylightCache::new();
        let day = Date::new(2025, 3, 4);
        assert_eq!(cache.get(&almanac, day).sunrise, 4);
        assert_eq!(cache.get(&almanac, day).sunrise, 4);
        assert_eq!(almanac.calls.get(), 1);
        assert_eq!(cache.get(&almanac, Date::new(2025, 3, 5)).sunrise, 5);
        assert_eq!(almanac.calls.get(), 2);
    }
}
