//! Editor for the weekly quiet-time window.

use core::fmt::Write;

use heapless::String;
use log::debug;

use super::FaceOutcome;
use crate::{
    event::Event,
    hardware::Hardware,
    quiet_time::{QuietTime, QuietTimeStore, QuietTimeWindow},
    render::{Frame, Indicator},
    settings::WatchSettings,
};

const TITLE_POSITION: u8 = 0;
const FIELD_LABEL_POSITION: u8 = 3;
const VALUE_POSITION: u8 = 4;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditField {
    Start,
    End,
    Days,
}

impl EditField {
    pub const fn next(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Days,
            Self::Days => Self::Start,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Start => "S",
            Self::End => "E",
            Self::Days => "D",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuietTimeFace {
    field: EditField,
    window: QuietTimeWindow,
}

impl QuietTimeFace {
    pub fn setup<H: Hardware>(hw: &mut H) -> Self {
        Self {
            field: EditField::Start,
            window: QuietTimeStore::new(hw.files()).load().sanitized(),
        }
    }

    pub fn activate(&mut self, settings: &WatchSettings) -> Frame {
        self.render(settings)
    }

    pub fn handle(&mut self, event: Event, settings: &WatchSettings) -> FaceOutcome {
        match event {
            Event::Activate | Event::Tick => FaceOutcome::unchanged(),
            Event::LightButtonDown => {
                match self.field {
                    EditField::Start => self.window.start.increment(),
                    EditField::End => self.window.end.increment(),
                    EditField::Days => self.window.days = self.window.days.next_preset(),
                }
                FaceOutcome::redraw(self.render(settings))
            }
            Event::AlarmButtonUp => {
                self.field = self.field.next();
                debug!("editing {:?}", self.field);
                FaceOutcome::redraw(self.render(settings))
            }
            Event::Timeout => FaceOutcome::move_to(0),
            _ => FaceOutcome::delegate(),
        }
    }

    /// Persists the window whether or not it was edited.
    pub fn resign<H: Hardware>(&mut self, hw: &mut H) {
        QuietTimeStore::new(hw.files()).save(&self.window);
    }

    pub fn field(&self) -> EditField {
        self.field
    }

    pub fn window(&self) -> &QuietTimeWindow {
        &self.window
    }

    fn render(&self, settings: &WatchSettings) -> Frame {
        let mut frame = Frame::new();
        frame.text(TITLE_POSITION, "Qt");
        frame.text(FIELD_LABEL_POSITION, self.field.label());

        match self.field {
            EditField::Start | EditField::End => {
                let time = if self.field == EditField::Start {
                    self.window.start
                } else {
                    self.window.end
                };
                let (value, pm) = format_time(time, settings.clock_mode_24h);
                frame.text(VALUE_POSITION, &value);
                frame.set(Indicator::Colon);
                frame.set_to(Indicator::Pm, pm);
            }
            EditField::Days => {
                frame.text(VALUE_POSITION, self.window.days.label());
                frame.clear(Indicator::Colon);
                frame.clear(Indicator::Pm);
            }
        }
        frame
    }
}

/// `HHMM` plus whether the PM lamp belongs on. Noon stays `12` without PM.
fn format_time(time: QuietTime, clock_mode_24h: bool) -> (String<4>, bool) {
    let (hour, pm) = if clock_mode_24h || time.hour <= 12 {
        (time.hour, false)
    } else {
        (time.hour - 12, true)
    };

    let mut text = String::new();
    let _ = write!(text, "{:02}{:02}", hour, time.minutes());
    (text, pm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        quiet_time::{DayMask, QUIET_TIME_FILE},
        testing::FakeBoard,
    };

    const SETTINGS_24H: WatchSettings = WatchSettings::new(true, false);
    const SETTINGS_12H: WatchSettings = WatchSettings::new(false, false);

    fn press(face: &mut QuietTimeFace, hw: &mut FakeBoard, event: Event, settings: &WatchSettings) {
        face.handle(event, settings).frame.apply(&mut hw.display);
    }

    #[test]
    fn setup_loads_default_window_and_starts_on_start_field() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        let mut face = QuietTimeFace::setup(&mut hw);
        face.activate(&SETTINGS_24H).apply(&mut hw.display);

        assert_eq!(face.field(), EditField::Start);
        assert_eq!(*face.window(), QuietTimeWindow::default());
        assert_eq!(hw.display.text().as_str(), "Qt S0200  ");
        assert!(hw.display.is_lit(Indicator::Colon));
        assert!(hw.files.contents(QUIET_TIME_FILE).is_some());
    }

    #[test]
    fn setup_resets_out_of_range_times() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        QuietTimeStore::new(&mut hw.files).save(&QuietTimeWindow::new(
            QuietTime::new(30, 1),
            QuietTime::new(6, 2),
            DayMask::WEEKEND,
        ));

        let face = QuietTimeFace::setup(&mut hw);

        assert_eq!(face.window().start, QuietTime::new(2, 0));
        assert_eq!(face.window().end, QuietTime::new(6, 2));
        assert_eq!(face.window().days, DayMask::WEEKEND);
    }

    #[test]
    fn alarm_button_cycles_fields() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        let mut face = QuietTimeFace::setup(&mut hw);
        face.activate(&SETTINGS_24H).apply(&mut hw.display);

        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_24H);
        assert_eq!(face.field(), EditField::End);
        assert_eq!(hw.display.text().as_str(), "Qt E0800  ");

        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_24H);
        assert_eq!(face.field(), EditField::Days);
        assert_eq!(hw.display.text().as_str(), "Qt DALL   ");
        assert!(!hw.display.is_lit(Indicator::Colon));

        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_24H);
        assert_eq!(face.field(), EditField::Start);
    }

    #[test]
    fn light_button_increments_selected_field() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        let mut face = QuietTimeFace::setup(&mut hw);
        face.activate(&SETTINGS_24H).apply(&mut hw.display);

        for _ in 0..5 {
            press(&mut face, &mut hw, Event::LightButtonDown, &SETTINGS_24H);
        }
        assert_eq!(face.window().start, QuietTime::new(3, 1));
        assert_eq!(hw.display.text().as_str(), "Qt S0315  ");

        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_24H);
        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_24H);
        press(&mut face, &mut hw, Event::LightButtonDown, &SETTINGS_24H);
        assert_eq!(face.window().days, DayMask::WEEKDAYS);
        assert_eq!(hw.display.text().as_str(), "Qt Dnn-F  ");

        press(&mut face, &mut hw, Event::LightButtonDown, &SETTINGS_24H);
        press(&mut face, &mut hw, Event::LightButtonDown, &SETTINGS_24H);
        assert_eq!(face.window().days, DayMask::NONE);
        assert_eq!(hw.display.text().as_str(), "Qt DNONE  ");
    }

    #[test]
    fn twelve_hour_mode_subtracts_after_noon() {
        assert_eq!(format_time(QuietTime::new(22, 3), false).0.as_str(), "1045");
        assert!(format_time(QuietTime::new(22, 3), false).1);
        assert_eq!(format_time(QuietTime::new(12, 0), false).0.as_str(), "1200");
        assert!(!format_time(QuietTime::new(12, 0), false).1);
        assert_eq!(format_time(QuietTime::new(22, 3), true).0.as_str(), "2245");
        assert!(!format_time(QuietTime::new(22, 3), true).1);
    }

    #[test]
    fn pm_lamp_follows_displayed_field() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        QuietTimeStore::new(&mut hw.files).save(&QuietTimeWindow::new(
            QuietTime::new(22, 0),
            QuietTime::new(23, 0),
            DayMask::ALL,
        ));
        let mut face = QuietTimeFace::setup(&mut hw);
        face.activate(&SETTINGS_12H).apply(&mut hw.display);
        assert!(hw.display.is_lit(Indicator::Pm));

        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_12H);
        press(&mut face, &mut hw, Event::AlarmButtonUp, &SETTINGS_12H);
        assert!(!hw.display.is_lit(Indicator::Pm));
    }

    #[test]
    fn timeout_returns_to_first_face() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        let mut face = QuietTimeFace::setup(&mut hw);

        assert_eq!(face.handle(Event::Timeout, &SETTINGS_24H).move_to, Some(0));
        assert_eq!(face.handle(Event::Tick, &SETTINGS_24H), FaceOutcome::unchanged());
        assert!(face.handle(Event::ModeButtonUp, &SETTINGS_24H).delegate);
    }

    #[test]
    fn resign_saves_even_without_edits() {
        let mut hw = FakeBoard::monday(12, 0, 0);
        let mut face = QuietTimeFace::setup(&mut hw);
        let writes = hw.files.write_count();

        face.resign(&mut hw);
        assert_eq!(hw.files.write_count(), writes + 1);

        face.handle(Event::LightButtonDown, &SETTINGS_24H);
        face.resign(&mut hw);
        assert_eq!(
            QuietTimeStore::new(&mut hw.files).load().start,
            QuietTime::new(2, 1)
        );
    }
}
