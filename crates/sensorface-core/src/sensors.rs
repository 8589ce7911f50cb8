//! Thermistor and battery sampling.
//!
//! Both sensors are powered only for the duration of a single read. The
//! enable/disable pairing lives here so callers cannot leave a driver on.

use crate::render::{Indicator, IndicatorChanges};

/// Below this the cell has roughly 5-10% left.
pub const LOW_BATTERY_MILLIVOLTS: u16 = 2200;

pub trait TemperatureSensor {
    fn enable(&mut self);
    fn read_celsius(&mut self) -> f32;
    fn disable(&mut self);
}

pub trait BatteryMonitor {
    fn enable_adc(&mut self);
    fn read_vcc_millivolts(&mut self) -> u16;
    fn disable_adc(&mut self);
}

/// A temperature squeezed into two digits plus two flags.
///
/// The LCD has no minus sign or hundreds digit next to the seconds, so the
/// sign is carried by the 24H lamp and the hundreds by the signal lamp.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FoldedTemperature {
    pub magnitude: u8,
    pub negative: bool,
    pub overflow: bool,
}

/// Largest value the two temperature digits show.
pub const MAX_MAGNITUDE: u8 = 99;

impl FoldedTemperature {
    pub fn fold(fahrenheit: f32) -> Self {
        let mut value = fahrenheit;
        let negative = value < 0.0;
        if negative {
            value = -value;
        }
        let overflow = value >= 100.0;
        if overflow {
            value -= 100.0;
        }

        Self {
            // Truncated, and pinned to what two digits can show.
            magnitude: (value as u8).min(MAX_MAGNITUDE),
            negative,
            overflow,
        }
    }

    pub fn indicators(self) -> IndicatorChanges {
        let mut changes = IndicatorChanges::new();
        changes.set_to(Indicator::TwentyFourHour, self.negative);
        changes.set_to(Indicator::Signal, self.overflow);
        changes
    }
}

pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 1.8 + 32.0
}

pub fn read_fahrenheit<T: TemperatureSensor + ?Sized>(sensor: &mut T) -> f32 {
    sensor.enable();
    let celsius = sensor.read_celsius();
    sensor.disable();
    celsius_to_fahrenheit(celsius)
}

pub fn sample_fahrenheit<T: TemperatureSensor + ?Sized>(sensor: &mut T) -> FoldedTemperature {
    FoldedTemperature::fold(read_fahrenheit(sensor))
}

pub fn battery_is_low<B: BatteryMonitor + ?Sized>(monitor: &mut B) -> bool {
    monitor.enable_adc();
    let millivolts = monitor.read_vcc_millivolts();
    monitor.disable_adc();
    millivolts < LOW_BATTERY_MILLIVOLTS
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedThermistor {
        celsius: f32,
        enabled: bool,
        reads_while_disabled: u32,
        cycles: u32,
    }

    impl TemperatureSensor for FixedThermistor {
        fn enable(&mut self) {
            self.enabled = true;
        }

        fn read_celsius(&mut self) -> f32 {
            if !self.enabled {
                self.reads_while_disabled += 1;
            }
            self.celsius
        }

        fn disable(&mut self) {
            self.enabled = false;
            self.cycles += 1;
        }
    }

    #[test]
    fn folds_sign_and_hundreds() {
        assert_eq!(
            FoldedTemperature::fold(-5.0),
            FoldedTemperature {
                magnitude: 5,
                negative: true,
                overflow: false
            }
        );
        assert_eq!(
            FoldedTemperature::fold(105.0),
            FoldedTemperature {
                magnitude: 5,
                negative: false,
                overflow: true
            }
        );
        assert_eq!(
            FoldedTemperature::fold(-105.0),
            FoldedTemperature {
                magnitude: 5,
                negative: true,
                overflow: true
            }
        );
        assert_eq!(FoldedTemperature::fold(72.9).magnitude, 72);
    }

    #[test]
    fn readings_past_two_hundred_pin_at_ninety_nine() {
        assert_eq!(
            FoldedTemperature::fold(250.0),
            FoldedTemperature {
                magnitude: 99,
                negative: false,
                overflow: true
            }
        );
        assert_eq!(
            FoldedTemperature::fold(-250.0),
            FoldedTemperature {
                magnitude: 99,
                negative: true,
                overflow: true
            }
        );
        assert_eq!(FoldedTemperature::fold(199.9).magnitude, 99);
    }

    #[test]
    fn folded_flags_map_to_reused_lamps() {
        let changes = FoldedTemperature::fold(-105.0).indicators();
        assert_eq!(changes.state(Indicator::TwentyFourHour), Some(true));
        assert_eq!(changes.state(Indicator::Signal), Some(true));

        let changes = FoldedTemperature::fold(50.0).indicators();
        assert_eq!(changes.state(Indicator::TwentyFourHour), Some(false));
        assert_eq!(changes.state(Indicator::Signal), Some(false));
    }

    #[test]
    fn sampling_powers_thermistor_for_one_read() {
        let mut thermistor = FixedThermistor {
            celsius: 20.0,
            enabled: false,
            reads_while_disabled: 0,
            cycles: 0,
        };

        let folded = sample_fahrenheit(&mut thermistor);

        assert_eq!(folded.magnitude, 68);
        assert!(!thermistor.enabled);
        assert_eq!(thermistor.cycles, 1);
        assert_eq!(thermistor.reads_while_disabled, 0);
    }
}
