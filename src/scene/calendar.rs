//! Calendar state: date, wall clock, seasons and event windows.
//!
//! The host pushes date and time as plain values. Everything seasonal is a
//! pure function of them, so the scene can recompute categories on every
//! tick without caching.

/// Meteorological season.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// December to February is winter, then three months per season.
    pub const fn from_month(month: u8) -> Self {
        match month {
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            9..=11 => Self::Fall,
            _ => Self::Winter,
        }
    }
}

const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendar date as sent by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Date {
    year: u16,
    month: u8,
    day: u8,
}

impl Date {
    /// Build a date, clamping month and day into range.
    pub const fn new(
        year: u16,
        month: u8,
        day: u8,
    ) -> Self {
        let month = if month < 1 {
            1
        } else if month > 12 {
            12
        } else {
            month
        };
        let max_day = DAYS_IN_MONTH[month as usize - 1];
        let day = if day < 1 {
            1
        } else if day > max_day && !(month == 2 && day == 29) {
            max_day
        } else {
            day
        };
        Self { year, month, day }
    }

    #[inline]
    pub const fn year(&self) -> u16 { self.year }

    /// 1..=12
    #[inline]
    pub const fn month(&self) -> u8 { self.month }

    /// 1..=31
    #[inline]
    pub const fn day(&self) -> u8 { self.day }

    #[inline]
    pub const fn season(&self) -> Season { Season::from_month(self.month) }

    /// October 28 through November 3.
    pub const fn is_halloween(&self) -> bool {
        (self.month == 10 && self.day >= 28) || (self.month == 11 && self.day <= 3)
    }

    /// December, except New Year's Eve.
    #[inline]
    pub const fn is_christmas(&self) -> bool { self.month == 12 && self.day != 31 }

    #[inline]
    pub const fn is_new_years_eve(&self) -> bool { self.month == 12 && self.day == 31 }

    /// Day of the year, 1..=365 (February 29 counts as February 28).
    pub const fn day_of_year(&self) -> u16 {
        let mut days: u16 = 0;
        let mut m = 0;
        while m + 1 < self.month as usize {
            days += DAYS_IN_MONTH[m] as u16;
            m += 1;
        }
        let max_day = DAYS_IN_MONTH[self.month as usize - 1];
        let day = if self.day > max_day { max_day } else { self.day };
        days + day as u16
    }
}

impl Default for Date {
    fn default() -> Self { Self::new(2025, 1, 1) }
}

/// Wall clock time, minute resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    /// Build a time, wrapping hours past 23 and clamping minutes to 59.
    pub const fn new(
        hour: u8,
        minute: u8,
    ) -> Self {
        Self {
            hour: hour % 24,
            minute: if minute > 59 { 59 } else { minute },
        }
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minutes(&self) -> u16 { self.hour as u16 * 60 + self.minute as u16 }
}

impl Default for ClockTime {
    fn default() -> Self { Self::new(12, 0) }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
