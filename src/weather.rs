//! Weather and wind state supplied by the host.
//!
//! Weather decides which precipitation and cloud sets exist and how dense they
//! are. Wind only changes velocities (clouds, rain drift, smoke direction) and
//! never forces a scene repaint.

/// Precipitation strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
}

/// Sky condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum Weather {
    #[default]
    Sunny,
    /// Two white clouds.
    Cloudy,
    /// Full cover of white clouds.
    Overcast,
    Rain(Intensity),
    Snow(Intensity),
}

/// Raindrop pool size at heavy intensity.
pub const MAX_RAINDROPS: usize = 50;

/// Snowflake pool size at heavy intensity.
pub const MAX_SNOWFLAKES: usize = 40;

/// Cloud count when the sky is fully covered.
pub const MAX_CLOUDS: usize = 5;

impl Weather {
    /// Number of clouds this condition draws.
    pub const fn cloud_count(self) -> usize {
        match self {
            Self::Sunny => 0,
            Self::Cloudy => 2,
            Self::Overcast => MAX_CLOUDS,
            Self::Rain(i) | Self::Snow(i) => match i {
                Intensity::Light => 3,
                Intensity::Medium => 4,
                Intensity::Heavy => MAX_CLOUDS,
            },
        }
    }
}

// =============================================================================
// Wind
// =============================================================================

/// Wind strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum WindStrength {
    #[default]
    Calm,
    Light,
    Medium,
    High,
}

/// Direction the wind blows towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum WindDirection {
    Left,
    #[default]
    Right,
}

/// Current wind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Wind {
    pub strength: WindStrength,
    pub direction: WindDirection,
}

impl Wind {
    pub const CALM: Self = Self {
        strength: WindStrength::Calm,
        direction: WindDirection::Right,
    };

    pub const fn new(
        strength: WindStrength,
        direction: WindDirection,
    ) -> Self {
        Self { strength, direction }
    }

    #[inline]
    const fn sign(self) -> i8 {
        match self.direction {
            WindDirection::Left => -1,
            WindDirection::Right => 1,
        }
    }

    /// Cloud velocity in px per tick. Calm air still drifts slowly left.
    pub const fn cloud_velocity(self) -> i8 {
        match self.strength {
            WindStrength::Calm => -1,
            WindStrength::Light => 2 * self.sign(),
            WindStrength::Medium => 3 * self.sign(),
            WindStrength::High => 4 * self.sign(),
        }
    }

    /// Sideways raindrop drift in px per tick.
    pub const fn rain_drift(self) -> i8 {
        match self.strength {
            WindStrength::Calm => 0,
            WindStrength::Light => self.sign(),
            WindStrength::Medium => 2 * self.sign(),
            WindStrength::High => 3 * self.sign(),
        }
    }

    /// Direction smoke leans: the chimney draught carries it right unless the
    /// wind pushes left.
    pub const fn smoke_direction(self) -> i8 {
        match (self.strength, self.direction) {
            (WindStrength::Calm, _) | (_, WindDirection::Right) => 1,
            (_, WindDirection::Left) => -1,
        }
    }
}

// =============================================================================
// Unit Tests (run on host with: cargo test --lib --target <host-triple>)
// =============================================================================
