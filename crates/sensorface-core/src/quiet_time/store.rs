use log::{debug, warn};

use super::{DayMask, QuietTime, QuietTimeWindow};
use crate::files::FileStore;

pub const QUIET_TIME_FILE: &str = "quiet_time.bin";
/// start, end, days: one byte each.
pub const RECORD_LEN: usize = 3;

const HOUR_BITS: u8 = 0x1F;
const QUARTER_SHIFT: u8 = 5;
const QUARTER_BITS: u8 = 0x03;

/// Loads and saves the quiet-time record, healing it to defaults when the
/// stored bytes are missing or the wrong size.
///
/// Storage errors never reach the caller. A failed read yields the default
/// window without touching the stored record, and a failed write leaves the
/// previous record in place.
pub struct QuietTimeStore<'a, F: FileStore + ?Sized> {
    files: &'a mut F,
}

/// What a record lookup found.
enum Stored {
    Record([u8; RECORD_LEN]),
    /// Absent or the wrong size: safe to overwrite.
    Missing,
    /// The store failed; the record may still be intact.
    Unreadable,
}

impl<'a, F: FileStore + ?Sized> QuietTimeStore<'a, F> {
    pub fn new(files: &'a mut F) -> Self {
        Self { files }
    }

    pub fn load(&mut self) -> QuietTimeWindow {
        match self.read_record() {
            Stored::Record(record) => {
                let window = decode(record);
                debug!(
                    "quiet time loaded {:02}:{:02}-{:02}:{:02} days={:#04x}",
                    window.start.hour,
                    window.start.minutes(),
                    window.end.hour,
                    window.end.minutes(),
                    window.days.0
                );
                window
            }
            Stored::Missing => {
                let window = QuietTimeWindow::default();
                warn!(
                    "quiet time record missing or malformed, defaulting to {:02}:00-{:02}:00",
                    window.start.hour, window.end.hour
                );
                self.save(&window);
                window
            }
            Stored::Unreadable => {
                let window = QuietTimeWindow::default();
                warn!(
                    "quiet time unreadable, using {:02}:00-{:02}:00 without saving",
                    window.start.hour, window.end.hour
                );
                window
            }
        }
    }

    /// Writes `window` verbatim. Callers validate before saving.
    pub fn save(&mut self, window: &QuietTimeWindow) {
        if let Err(err) = self.files.write_file(QUIET_TIME_FILE, &encode(window)) {
            warn!("quiet time save failed: {:?}", err);
        }
    }

    fn read_record(&mut self) -> Stored {
        match self.files.file_size(QUIET_TIME_FILE) {
            Ok(Some(RECORD_LEN)) => {}
            Ok(Some(size)) => {
                warn!("quiet time record is {} bytes, expected {}", size, RECORD_LEN);
                return Stored::Missing;
            }
            Ok(None) => return Stored::Missing,
            Err(err) => {
                warn!("quiet time size query failed: {:?}", err);
                return Stored::Unreadable;
            }
        }

        let mut record = [0u8; RECORD_LEN];
        match self.files.read_file(QUIET_TIME_FILE, &mut record) {
            Ok(()) => Stored::Record(record),
            Err(err) => {
                warn!("quiet time read failed: {:?}", err);
                Stored::Unreadable
            }
        }
    }
}

fn encode_time(time: QuietTime) -> u8 {
    (time.hour & HOUR_BITS) | ((time.quarter & QUARTER_BITS) << QUARTER_SHIFT)
}

fn decode_time(byte: u8) -> QuietTime {
    QuietTime::new(byte & HOUR_BITS, (byte >> QUARTER_SHIFT) & QUARTER_BITS)
}

fn encode(window: &QuietTimeWindow) -> [u8; RECORD_LEN] {
    [
        encode_time(window.start),
        encode_time(window.end),
        window.days.0,
    ]
}

fn decode(record: [u8; RECORD_LEN]) -> QuietTimeWindow {
    QuietTimeWindow {
        start: decode_time(record[0]),
        end: decode_time(record[1]),
        days: DayMask(record[2]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::{MemoryFileStore, MemoryStoreError};

    /// Fails the next size query or read once, then behaves normally.
    #[derive(Default)]
    struct FlakyFiles {
        inner: MemoryFileStore,
        fail_next_size: bool,
        fail_next_read: bool,
    }

    impl FileStore for FlakyFiles {
        type Error = MemoryStoreError;

        fn file_size(&mut self, name: &str) -> Result<Option<usize>, Self::Error> {
            if core::mem::take(&mut self.fail_next_size) {
                return Err(MemoryStoreError::NotFound);
            }
            self.inner.file_size(name)
        }

        fn read_file(&mut self, name: &str, buf: &mut [u8]) -> Result<(), Self::Error> {
            if core::mem::take(&mut self.fail_next_read) {
                return Err(MemoryStoreError::ShortRecord);
            }
            self.inner.read_file(name, buf)
        }

        fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), Self::Error> {
            self.inner.write_file(name, data)
        }
    }

    fn late_weekend() -> QuietTimeWindow {
        QuietTimeWindow::new(QuietTime::new(22, 2), QuietTime::new(23, 1), DayMask::WEEKEND)
    }

    #[test]
    fn missing_record_is_defaulted_and_persisted() {
        let mut files = MemoryFileStore::new();

        let window = QuietTimeStore::new(&mut files).load();

        assert_eq!(window, QuietTimeWindow::default());
        assert_eq!(files.contents(QUIET_TIME_FILE), Some(&[0x02, 0x08, 0x7F][..]));
    }

    #[test]
    fn wrong_size_record_heals_idempotently() {
        for bad in [&[][..], &[0x02][..], &[0x02, 0x08, 0x7F, 0x00][..]] {
            let mut files = MemoryFileStore::new();
            files.write_file(QUIET_TIME_FILE, bad).unwrap();

            let first = QuietTimeStore::new(&mut files).load();
            let second = QuietTimeStore::new(&mut files).load();

            assert_eq!(first, QuietTimeWindow::default());
            assert_eq!(second, first);
            assert_eq!(files.file_size(QUIET_TIME_FILE).unwrap(), Some(RECORD_LEN));
        }
    }

    #[test]
    fn saved_window_loads_back() {
        let mut files = MemoryFileStore::new();
        let window = QuietTimeWindow::new(
            QuietTime::new(22, 3),
            QuietTime::new(23, 1),
            DayMask::WEEKEND,
        );

        QuietTimeStore::new(&mut files).save(&window);
        let writes = files.write_count();
        let loaded = QuietTimeStore::new(&mut files).load();

        assert_eq!(loaded, window);
        assert_eq!(files.write_count(), writes);
    }

    #[test]
    fn out_of_range_hour_survives_load_for_the_editor_to_fix() {
        let mut files = MemoryFileStore::new();
        // Start hour 31, end 09:45, weekdays.
        files
            .write_file(QUIET_TIME_FILE, &[0x1F, 0x09 | (3 << 5), DayMask::WEEKDAYS.0])
            .unwrap();

        let loaded = QuietTimeStore::new(&mut files).load();
        assert_eq!(loaded.start.hour, 31);

        let fixed = loaded.sanitized();
        assert_eq!(fixed.start, QuietTime::new(2, 0));
        assert_eq!(fixed.end, QuietTime::new(9, 3));
        assert_eq!(fixed.days, DayMask::WEEKDAYS);
    }

    #[test]
    fn failed_size_query_keeps_saved_window() {
        let mut files = FlakyFiles::default();
        QuietTimeStore::new(&mut files).save(&late_weekend());
        let writes = files.inner.write_count();

        files.fail_next_size = true;
        let during = QuietTimeStore::new(&mut files).load();
        let after = QuietTimeStore::new(&mut files).load();

        assert_eq!(during, QuietTimeWindow::default());
        assert_eq!(files.inner.write_count(), writes);
        assert_eq!(after, late_weekend());
    }

    #[test]
    fn failed_read_keeps_saved_window() {
        let mut files = FlakyFiles::default();
        QuietTimeStore::new(&mut files).save(&late_weekend());
        let writes = files.inner.write_count();

        files.fail_next_read = true;
        let during = QuietTimeStore::new(&mut files).load();
        let after = QuietTimeStore::new(&mut files).load();

        assert_eq!(during, QuietTimeWindow::default());
        assert_eq!(files.inner.write_count(), writes);
        assert_eq!(after, late_weekend());
    }
}
