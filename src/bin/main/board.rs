use log::info;
use sensorface_core::{
    Hardware, PackedDateTime,
    files::FileStore,
    sensors::{BatteryMonitor, TemperatureSensor},
};

use crate::{console_display::ConsoleDisplay, sim_clock::SimClock};

/// Thermistor that drifts by a fixed step on every read.
pub(super) struct SimThermistor {
    celsius: f32,
    drift_per_read: f32,
    powered: bool,
}

impl SimThermistor {
    pub(super) fn new(celsius: f32, drift_per_read: f32) -> Self {
        Self {
            celsius,
            drift_per_read,
            powered: false,
        }
    }
}

impl TemperatureSensor for SimThermistor {
    fn enable(&mut self) {
        self.powered = true;
    }

    fn read_celsius(&mut self) -> f32 {
        if !self.powered {
            log::warn!("thermistor read while powered down");
        }
        let reading = self.celsius;
        self.celsius += self.drift_per_read;
        reading
    }

    fn disable(&mut self) {
        self.powered = false;
    }
}

pub(super) struct SimBattery {
    millivolts: u16,
}

impl SimBattery {
    pub(super) fn new(millivolts: u16) -> Self {
        Self { millivolts }
    }
}

impl BatteryMonitor for SimBattery {
    fn enable_adc(&mut self) {}

    fn read_vcc_millivolts(&mut self) -> u16 {
        self.millivolts
    }

    fn disable_adc(&mut self) {}
}

pub(super) struct SimBoard<F: FileStore> {
    pub(super) clock: SimClock,
    pub(super) thermistor: SimThermistor,
    pub(super) battery: SimBattery,
    pub(super) files: F,
    pub(super) display: ConsoleDisplay,
    pub(super) chimes: u32,
}

impl<F: FileStore> Hardware for SimBoard<F> {
    type Thermistor = SimThermistor;
    type Battery = SimBattery;
    type Files = F;
    type Display = ConsoleDisplay;

    fn now(&mut self) -> PackedDateTime {
        self.clock.now()
    }

    fn thermistor(&mut self) -> &mut Self::Thermistor {
        &mut self.thermistor
    }

    fn battery(&mut self) -> &mut Self::Battery {
        &mut self.battery
    }

    fn files(&mut self) -> &mut Self::Files {
        &mut self.files
    }

    fn display(&mut self) -> &mut Self::Display {
        &mut self.display
    }

    fn play_signal(&mut self) {
        self.chimes = self.chimes.saturating_add(1);
        let now = self.clock.now();
        info!(
            "chime at {:02}:{:02}:{:02}",
            now.hour(),
            now.minute(),
            now.second()
        );
    }
}
