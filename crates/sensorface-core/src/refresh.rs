//! Tiered display refresh.
//!
//! The RTC register orders fields from seconds (LSB) to year (MSB), so
//! "nothing above the seconds changed" is one shift and one compare. Each
//! tick only redraws from the coarsest field that actually moved.

use crate::datetime::{HOUR_SHIFT, MINUTE_SHIFT, PackedDateTime};

/// LCD position of the first seconds digit.
pub const SECONDS_POSITION: u8 = 8;
/// LCD position of the first minute digit.
pub const MINUTES_POSITION: u8 = 6;
/// Resample the thermistor every this many seconds on seconds-only ticks.
pub const TEMPERATURE_PERIOD_SECONDS: u8 = 10;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshTier {
    /// Only the seconds moved.
    Seconds,
    /// Minutes moved, hour and above did not.
    Minutes,
    /// Hour or anything above changed, or nothing was drawn yet.
    Full,
}

impl RefreshTier {
    /// A low-energy wake may have skipped ticks, so it always redraws fully.
    pub fn classify(previous: PackedDateTime, current: PackedDateTime, low_energy: bool) -> Self {
        if low_energy {
            return Self::Full;
        }
        if current.same_above(previous, MINUTE_SHIFT) {
            Self::Seconds
        } else if current.same_above(previous, HOUR_SHIFT) {
            Self::Minutes
        } else {
            Self::Full
        }
    }

    /// Whether the thermistor should be read on this tick.
    pub const fn samples_temperature(self, second: u8) -> bool {
        match self {
            Self::Seconds => second % TEMPERATURE_PERIOD_SECONDS == 0,
            Self::Minutes | Self::Full => true,
        }
    }

    /// First LCD position rewritten on this tier.
    pub const fn redraw_start(self) -> u8 {
        match self {
            Self::Seconds => SECONDS_POSITION,
            Self::Minutes => MINUTES_POSITION,
            Self::Full => 0,
        }
    }
}
