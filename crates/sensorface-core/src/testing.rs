//! Scriptable board used by face and host tests.

use crate::{
    datetime::{DateTimeFields, PackedDateTime},
    files::MemoryFileStore,
    hardware::Hardware,
    render::ShadowDisplay,
    sensors::{BatteryMonitor, TemperatureSensor},
};

pub struct FakeThermistor {
    pub celsius: f32,
    pub enabled: bool,
    pub reads: u32,
}

impl TemperatureSensor for FakeThermistor {
    fn enable(&mut self) {
        self.enabled = true;
    }

    fn read_celsius(&mut self) -> f32 {
        assert!(self.enabled, "thermistor read while powered down");
        self.reads += 1;
        self.celsius
    }

    fn disable(&mut self) {
        self.enabled = false;
    }
}

pub struct FakeBattery {
    pub millivolts: u16,
    pub enabled: bool,
    pub reads: u32,
}

impl BatteryMonitor for FakeBattery {
    fn enable_adc(&mut self) {
        self.enabled = true;
    }

    fn read_vcc_millivolts(&mut self) -> u16 {
        assert!(self.enabled, "vcc read with adc off");
        self.reads += 1;
        self.millivolts
    }

    fn disable_adc(&mut self) {
        self.enabled = false;
    }
}

pub struct FakeBoard {
    pub now: PackedDateTime,
    pub thermistor: FakeThermistor,
    pub battery: FakeBattery,
    pub files: MemoryFileStore,
    pub display: ShadowDisplay,
    pub chimes: u32,
}

impl FakeBoard {
    /// Monday 2024-03-04 at the given time, 20 °C, healthy battery.
    pub fn monday(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            now: DateTimeFields::new(2024, 3, 4, hour, minute, second).pack(),
            thermistor: FakeThermistor {
                celsius: 20.0,
                enabled: false,
                reads: 0,
            },
            battery: FakeBattery {
                millivolts: 2900,
                enabled: false,
                reads: 0,
            },
            files: MemoryFileStore::new(),
            display: ShadowDisplay::new(),
            chimes: 0,
        }
    }

    pub fn set_time(&mut self, day: u8, hour: u8, minute: u8, second: u8) {
        self.now = DateTimeFields::new(2024, 3, day, hour, minute, second).pack();
    }
}

impl Hardware for FakeBoard {
    type Thermistor = FakeThermistor;
    type Battery = FakeBattery;
    type Files = MemoryFileStore;
    type Display = ShadowDisplay;

    fn now(&mut self) -> PackedDateTime {
        self.now
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
        self.chimes += 1;
    }
}
