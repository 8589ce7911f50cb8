//! Packed calendar register as produced by the RTC.
//!
//! ```txt
//!  31      26 25   22 21   17 16   12 11     6 5      0
//! | year-2020 | month |  day  | hour  | minute | second |
//! ```

/// Year stored as zero in the register.
pub const REFERENCE_YEAR: u16 = 2020;

pub const SECOND_SHIFT: u32 = 0;
pub const MINUTE_SHIFT: u32 = 6;
pub const HOUR_SHIFT: u32 = 12;
pub const DAY_SHIFT: u32 = 17;
pub const MONTH_SHIFT: u32 = 22;
pub const YEAR_SHIFT: u32 = 26;

const SECOND_MASK: u32 = 0x3F;
const MINUTE_MASK: u32 = 0x3F;
const HOUR_MASK: u32 = 0x1F;
const DAY_MASK: u32 = 0x1F;
const MONTH_MASK: u32 = 0x0F;
const YEAR_MASK: u32 = 0x3F;

/// Raw RTC date/time register.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PackedDateTime(u32);

impl PackedDateTime {
    /// All bits set. No real calendar value packs to this, so a comparison
    /// against it never matches at any tier.
    pub const SENTINEL: Self = Self(u32::MAX);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn from_fields(fields: DateTimeFields) -> Self {
        let year = fields.year.saturating_sub(REFERENCE_YEAR) as u32;
        Self(
            ((fields.second as u32 & SECOND_MASK) << SECOND_SHIFT)
                | ((fields.minute as u32 & MINUTE_MASK) << MINUTE_SHIFT)
                | ((fields.hour as u32 & HOUR_MASK) << HOUR_SHIFT)
                | ((fields.day as u32 & DAY_MASK) << DAY_SHIFT)
                | ((fields.month as u32 & MONTH_MASK) << MONTH_SHIFT)
                | ((year & YEAR_MASK) << YEAR_SHIFT),
        )
    }

    pub const fn second(self) -> u8 {
        ((self.0 >> SECOND_SHIFT) & SECOND_MASK) as u8
    }

    pub const fn minute(self) -> u8 {
        ((self.0 >> MINUTE_SHIFT) & MINUTE_MASK) as u8
    }

    pub const fn hour(self) -> u8 {
        ((self.0 >> HOUR_SHIFT) & HOUR_MASK) as u8
    }

    pub const fn day(self) -> u8 {
        ((self.0 >> DAY_SHIFT) & DAY_MASK) as u8
    }

    pub const fn month(self) -> u8 {
        ((self.0 >> MONTH_SHIFT) & MONTH_MASK) as u8
    }

    pub const fn year(self) -> u16 {
        ((self.0 >> YEAR_SHIFT) & YEAR_MASK) as u16 + REFERENCE_YEAR
    }

    pub fn fields(self) -> DateTimeFields {
        DateTimeFields {
            year: self.year(),
            month: self.month(),
            day: self.day(),
            hour: self.hour(),
            minute: self.minute(),
            second: self.second(),
        }
    }

    /// True when every field from `shift` upwards is identical.
    pub const fn same_above(self, other: Self, shift: u32) -> bool {
        (self.0 >> shift) == (other.0 >> shift)
    }

    /// ISO-8601 weekday, Monday = 1 .. Sunday = 7.
    pub fn iso_weekday(self) -> u8 {
        iso_weekday(self.year(), self.month(), self.day())
    }

    /// Two-letter weekday label for the LCD's first two positions.
    pub fn weekday_label(self) -> &'static str {
        match self.iso_weekday() {
            1 => "MO",
            2 => "TU",
            3 => "WE",
            4 => "TH",
            5 => "FR",
            6 => "SA",
            _ => "SU",
        }
    }
}

/// Field view of a [`PackedDateTime`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DateTimeFields {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTimeFields {
    pub const fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    pub fn pack(self) -> PackedDateTime {
        PackedDateTime::from_fields(self)
    }
}

impl From<DateTimeFields> for PackedDateTime {
    fn from(fields: DateTimeFields) -> Self {
        Self::from_fields(fields)
    }
}

/// Sakamoto's day-of-week method, remapped so Monday = 1 and Sunday = 7.
///
/// Out-of-range months are clamped so a garbage register still yields a
/// weekday instead of indexing past the table.
pub fn iso_weekday(year: u16, month: u8, day: u8) -> u8 {
    const OFFSETS: [u32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];

    let month = month.clamp(1, 12);
    let mut y = year as u32;
    if month < 3 {
        y = y.saturating_sub(1);
    }

    let dow = (y + y / 4 - y / 100 + y / 400 + OFFSETS[(month - 1) as usize] + day as u32) % 7;
    if dow == 0 { 7 } else { dow as u8 }
}
