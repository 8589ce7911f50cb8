//! Clock face with the thermistor reading overlaid on the seconds digits.

use core::fmt::Write;

use heapless::String;
use log::{debug, warn};

use super::FaceOutcome;
use crate::{
    datetime::PackedDateTime,
    event::Event,
    hardware::Hardware,
    quiet_time::{QuietTimeStore, QuietTimeWindow},
    refresh::{MINUTES_POSITION, RefreshTier, SECONDS_POSITION},
    render::{DISPLAY_WIDTH, Frame, Indicator},
    sensors::{FoldedTemperature, battery_is_low, sample_fahrenheit},
    settings::WatchSettings,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ClockFace {
    previous: PackedDateTime,
    last_battery_check: Option<u8>,
    battery_low: bool,
    temperature: FoldedTemperature,
    show_seconds: bool,
    signal_enabled: bool,
    alarm_enabled: bool,
    in_quiet_time: bool,
    quiet_time: QuietTimeWindow,
}

impl ClockFace {
    /// Runs once, the first time the host allocates this face.
    pub fn setup<H: Hardware>(hw: &mut H) -> Self {
        Self {
            previous: PackedDateTime::SENTINEL,
            last_battery_check: None,
            battery_low: false,
            temperature: sample_fahrenheit(hw.thermistor()),
            show_seconds: false,
            signal_enabled: false,
            alarm_enabled: false,
            in_quiet_time: false,
            quiet_time: QuietTimeStore::new(hw.files()).load(),
        }
    }

    pub fn activate<H: Hardware>(&mut self, settings: &WatchSettings, hw: &mut H) -> Frame {
        let mut frame = Frame::new();
        if settings.clock_mode_24h {
            frame.set(Indicator::TwentyFourHour);
        }
        frame.set_to(Indicator::Bell, self.signal_enabled);
        self.sync_alarm_indicator(settings, &mut frame);
        frame.set(Indicator::Colon);

        self.previous = PackedDateTime::SENTINEL;
        // The quiet-time editor may have changed the window since last time.
        self.quiet_time = QuietTimeStore::new(hw.files()).load();
        frame
    }

    pub fn handle<H: Hardware>(
        &mut self,
        event: Event,
        settings: &WatchSettings,
        hw: &mut H,
    ) -> FaceOutcome {
        match event {
            Event::Activate | Event::Tick => self.refresh(false, settings, hw),
            Event::LowEnergyTick => self.refresh(true, settings, hw),
            Event::AlarmButtonDown => {
                self.show_seconds = !self.show_seconds;
                let now = hw.now();
                let mut frame = Frame::new();
                frame.digits(SECONDS_POSITION, self.seconds_value(now));
                FaceOutcome::redraw(frame)
            }
            Event::AlarmLongPress => {
                self.signal_enabled = !self.signal_enabled;
                debug!("hourly signal {}", if self.signal_enabled { "on" } else { "off" });
                let mut frame = Frame::new();
                frame.set_to(Indicator::Bell, self.signal_enabled);
                FaceOutcome::redraw(frame)
            }
            Event::BackgroundTask => {
                // Delivered even when another face is showing.
                self.in_quiet_time = self.quiet_time.is_quiet(hw.now());
                let mut outcome = FaceOutcome::unchanged();
                outcome.play_signal = self.signal_enabled && !self.in_quiet_time;
                if self.signal_enabled && self.in_quiet_time {
                    debug!("hourly signal suppressed by quiet time");
                }
                outcome
            }
            _ => FaceOutcome::delegate(),
        }
    }

    pub fn resign(&mut self) {}

    /// One wake per hour, on the hour, while the signal is enabled.
    pub fn wants_background_task<H: Hardware>(&self, hw: &mut H) -> bool {
        self.signal_enabled && hw.now().minute() == 0
    }

    pub fn signal_enabled(&self) -> bool {
        self.signal_enabled
    }

    pub fn in_quiet_time(&self) -> bool {
        self.in_quiet_time
    }

    pub fn temperature(&self) -> FoldedTemperature {
        self.temperature
    }

    fn refresh<H: Hardware>(
        &mut self,
        low_energy: bool,
        settings: &WatchSettings,
        hw: &mut H,
    ) -> FaceOutcome {
        let now = hw.now();
        let previous = core::mem::replace(&mut self.previous, now);
        let mut frame = Frame::new();

        if self.last_battery_check != Some(now.day()) {
            self.last_battery_check = Some(now.day());
            self.battery_low = battery_is_low(hw.battery());
            if self.battery_low {
                warn!("battery low");
            }
        }
        if self.battery_low {
            frame.set(Indicator::Lap);
        }

        let tier = RefreshTier::classify(previous, now, low_energy);
        self.in_quiet_time = self.quiet_time.is_quiet(now);

        match tier {
            RefreshTier::Seconds => {
                if self.show_seconds {
                    frame.digits(tier.redraw_start(), now.second());
                } else if tier.samples_temperature(now.second()) {
                    self.sample_temperature(hw, &mut frame);
                    frame.digits(tier.redraw_start(), self.temperature.magnitude);
                }
            }
            RefreshTier::Minutes => {
                self.sample_temperature(hw, &mut frame);
                let mut text: String<4> = String::new();
                let _ = write!(
                    text,
                    "{:02}{:02}",
                    now.minute(),
                    self.seconds_value(now) % 100
                );
                frame.text(MINUTES_POSITION, &text);
            }
            RefreshTier::Full => {
                self.sample_temperature(hw, &mut frame);
                let mut hour = now.hour();
                if !settings.clock_mode_24h {
                    frame.set_to(Indicator::Pm, hour >= 12);
                    hour %= 12;
                    if hour == 0 {
                        hour = 12;
                    }
                }

                let mut text: String<DISPLAY_WIDTH> = String::new();
                let _ = write!(
                    text,
                    "{}{:2}{:2}{:02}{:02}",
                    now.weekday_label(),
                    now.day(),
                    hour,
                    now.minute(),
                    self.seconds_value(now) % 100
                );
                frame.text(tier.redraw_start(), &text);
            }
        }

        if self.alarm_enabled != settings.alarm_enabled {
            self.sync_alarm_indicator(settings, &mut frame);
        }

        FaceOutcome::redraw(frame)
    }

    fn sample_temperature<H: Hardware>(&mut self, hw: &mut H, frame: &mut Frame) {
        self.temperature = sample_fahrenheit(hw.thermistor());
        frame.indicators.merge(self.temperature.indicators());
    }

    fn sync_alarm_indicator(&mut self, settings: &WatchSettings, frame: &mut Frame) {
        self.alarm_enabled = settings.alarm_enabled;
        frame.set_to(Indicator::Signal, self.alarm_enabled);
    }

    /// Value shown on the two seconds-position digits.
    fn seconds_value(&self, now: PackedDateTime) -> u8 {
        if self.show_seconds {
            now.second()
        } else {
            self.temperature.magnitude
        }
    }
}
