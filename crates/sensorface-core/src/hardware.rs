//! Board collaborators the faces and the host talk to.

use crate::{
    datetime::PackedDateTime,
    files::FileStore,
    render::DisplaySink,
    sensors::{BatteryMonitor, TemperatureSensor},
};

/// Everything outside the core: RTC, sensors, storage, LCD and buzzer.
pub trait Hardware {
    type Thermistor: TemperatureSensor;
    type Battery: BatteryMonitor;
    type Files: FileStore;
    type Display: DisplaySink;

    /// Current RTC register.
    fn now(&mut self) -> PackedDateTime;
    fn thermistor(&mut self) -> &mut Self::Thermistor;
    fn battery(&mut self) -> &mut Self::Battery;
    fn files(&mut self) -> &mut Self::Files;
    fn display(&mut self) -> &mut Self::Display;
    /// Short chime on the piezo. Blocks until played.
    fn play_signal(&mut self);
}
