use sensorface_core::{DateTimeFields, PackedDateTime};

/// Wall clock that only moves when told to.
pub(super) struct SimClock {
    fields: DateTimeFields,
}

impl SimClock {
    pub(super) fn new(start: DateTimeFields) -> Self {
        Self { fields: start }
    }

    pub(super) fn now(&self) -> PackedDateTime {
        self.fields.pack()
    }

    pub(super) fn advance_one_second(&mut self) {
        let f = &mut self.fields;
        f.second += 1;
        if f.second < 60 {
            return;
        }
        f.second = 0;
        f.minute += 1;
        if f.minute < 60 {
            return;
        }
        f.minute = 0;
        f.hour += 1;
        if f.hour < 24 {
            return;
        }
        f.hour = 0;
        f.day += 1;
        if f.day <= days_in_month(f.year, f.month) {
            return;
        }
        f.day = 1;
        f.month += 1;
        if f.month <= 12 {
            return;
        }
        f.month = 1;
        f.year += 1;
    }
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// `YYYY-MM-DDTHH:MM:SS`
pub(super) fn parse_start(value: &str) -> Result<DateTimeFields, String> {
    let (date, time) = value
        .split_once('T')
        .ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM:SS, got {value:?}"))?;

    let mut date_parts = date.split('-');
    let mut time_parts = time.split(':');
    let year = field(&mut date_parts, "year")?;
    let month = field(&mut date_parts, "month")?;
    let day = field(&mut date_parts, "day")?;
    let hour = field(&mut time_parts, "hour")?;
    let minute = field(&mut time_parts, "minute")?;
    let second = field(&mut time_parts, "second")?;

    if !(2020..=2083).contains(&year) {
        return Err(format!("year {year} outside 2020-2083"));
    }
    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month as u8) as u16 {
        return Err(format!("no such date {year}-{month}-{day}"));
    }
    if hour > 23 || minute > 59 || second > 59 {
        return Err(format!("no such time {hour}:{minute}:{second}"));
    }

    Ok(DateTimeFields::new(
        year,
        month as u8,
        day as u8,
        hour as u8,
        minute as u8,
        second as u8,
    ))
}

fn field<'a>(parts: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<u16, String> {
    parts
        .next()
        .ok_or_else(|| format!("missing {what}"))?
        .parse::<u16>()
        .map_err(|err| format!("bad {what}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolls_over_year_end() {
        let mut clock = SimClock::new(DateTimeFields::new(2024, 12, 31, 23, 59, 59));
        clock.advance_one_second();
        assert_eq!(clock.now().fields(), DateTimeFields::new(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn honours_leap_february() {
        let mut clock = SimClock::new(DateTimeFields::new(2024, 2, 28, 23, 59, 59));
        clock.advance_one_second();
        assert_eq!(clock.now().day(), 29);

        let mut clock = SimClock::new(DateTimeFields::new(2023, 2, 28, 23, 59, 59));
        clock.advance_one_second();
        assert_eq!(clock.now().month(), 3);
    }

    #[test]
    fn parses_start_argument() {
        assert_eq!(
            parse_start("2024-03-04T01:59:50"),
            Ok(DateTimeFields::new(2024, 3, 4, 1, 59, 50))
        );
        assert!(parse_start("2024-02-30T00:00:00").is_err());
        assert!(parse_start("2019-01-01T00:00:00").is_err());
        assert!(parse_start("2024-03-04 01:59:50").is_err());
    }
}
