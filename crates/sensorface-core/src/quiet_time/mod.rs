//! Weekly quiet-time window: the hours during which the hourly chime stays
//! silent.

mod store;

pub use store::{QUIET_TIME_FILE, QuietTimeStore, RECORD_LEN};

use crate::datetime::PackedDateTime;

pub const DEFAULT_START_HOUR: u8 = 2;
pub const DEFAULT_END_HOUR: u8 = 8;

const QUARTERS_PER_HOUR: u8 = 4;
const MINUTES_PER_QUARTER: u8 = 15;

/// Time of day at quarter-hour resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QuietTime {
    /// 0-23
    pub hour: u8,
    /// 0:00, 1:15, 2:30, 3:45
    pub quarter: u8,
}

impl QuietTime {
    pub const fn new(hour: u8, quarter: u8) -> Self {
        Self { hour, quarter }
    }

    pub const fn is_valid(self) -> bool {
        self.hour <= 23 && self.quarter < QUARTERS_PER_HOUR
    }

    /// Replaces an out-of-range time with `{default_hour}:00`.
    pub fn sanitized(self, default_hour: u8) -> Self {
        if self.is_valid() {
            return self;
        }
        log::warn!(
            "quiet time {}:{} out of range, resetting to {:02}:00",
            self.hour,
            self.quarter,
            default_hour
        );
        Self::new(default_hour, 0)
    }

    /// One quarter forward, carrying into the hour and wrapping at midnight.
    pub fn increment(&mut self) {
        if self.quarter >= QUARTERS_PER_HOUR - 1 {
            self.quarter = 0;
            self.hour = if self.hour >= 23 { 0 } else { self.hour + 1 };
        } else {
            self.quarter += 1;
        }
    }

    pub const fn minutes(self) -> u8 {
        self.quarter * MINUTES_PER_QUARTER
    }
}

/// Seven weekday bits plus one reserved bit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DayMask(pub u8);

impl DayMask {
    pub const SUNDAY: Self = Self(1 << 0);
    pub const MONDAY: Self = Self(1 << 1);
    pub const TUESDAY: Self = Self(1 << 2);
    pub const WEDNESDAY: Self = Self(1 << 3);
    pub const THURSDAY: Self = Self(1 << 4);
    pub const FRIDAY: Self = Self(1 << 5);
    pub const SATURDAY: Self = Self(1 << 6);

    pub const NONE: Self = Self(0);
    pub const WEEKDAYS: Self = Self(
        Self::MONDAY.0 | Self::TUESDAY.0 | Self::WEDNESDAY.0 | Self::THURSDAY.0 | Self::FRIDAY.0,
    );
    pub const WEEKEND: Self = Self(Self::SATURDAY.0 | Self::SUNDAY.0);
    pub const ALL: Self = Self(Self::WEEKDAYS.0 | Self::WEEKEND.0);

    /// Bit for an ISO weekday (Monday = 1 .. Sunday = 7).
    pub const fn from_iso_weekday(weekday: u8) -> Self {
        match weekday {
            1 => Self::MONDAY,
            2 => Self::TUESDAY,
            3 => Self::WEDNESDAY,
            4 => Self::THURSDAY,
            5 => Self::FRIDAY,
            6 => Self::SATURDAY,
            7 => Self::SUNDAY,
            _ => Self::NONE,
        }
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The editor only offers four presets; any other mask restarts at ALL.
    pub const fn next_preset(self) -> Self {
        match self {
            Self::ALL => Self::WEEKDAYS,
            Self::WEEKDAYS => Self::WEEKEND,
            Self::WEEKEND => Self::NONE,
            _ => Self::ALL,
        }
    }

    /// Six-character LCD label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ALL => "ALL   ",
            Self::WEEKDAYS => "nn-F  ",
            Self::WEEKEND => "S-S   ",
            _ => "NONE  ",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct QuietTimeWindow {
    pub start: QuietTime,
    pub end: QuietTime,
    pub days: DayMask,
}

impl Default for QuietTimeWindow {
    fn default() -> Self {
        Self {
            start: QuietTime::new(DEFAULT_START_HOUR, 0),
            end: QuietTime::new(DEFAULT_END_HOUR, 0),
            days: DayMask::ALL,
        }
    }
}

impl QuietTimeWindow {
    pub const fn new(start: QuietTime, end: QuietTime, days: DayMask) -> Self {
        Self { start, end, days }
    }

    /// Resets out-of-range start/end independently of each other.
    pub fn sanitized(self) -> Self {
        Self {
            start: self.start.sanitized(DEFAULT_START_HOUR),
            end: self.end.sanitized(DEFAULT_END_HOUR),
            days: self.days,
        }
    }

    /// Whether `moment` falls inside the window.
    ///
    /// Windows that cross midnight (`end.hour < start.hour`) are not
    /// supported and match only the start hour. In the end hour the minute
    /// is compared against the *start* quarter, not the end quarter.
    pub fn is_quiet(&self, moment: PackedDateTime) -> bool {
        let today = DayMask::from_iso_weekday(moment.iso_weekday());
        if !self.days.contains(today) {
            return false;
        }

        let hour = moment.hour();
        let quarter = moment.minute() / MINUTES_PER_QUARTER;

        if hour == self.start.hour {
            return quarter >= self.start.quarter;
        }
        // TODO: compare against end.quarter once the intended closing rule
        // for the end hour is confirmed.
        if hour == self.end.hour {
            return quarter < self.start.quarter;
        }

        self.start.hour <= hour && hour < self.end.hour
    }
}
