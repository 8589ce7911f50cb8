#![cfg_attr(not(test), no_std)]

//! Board-agnostic logic for the sensorface watch: packed RTC registers, the
//! weekly quiet-time schedule, tiered display refresh and the face
//! controllers that drive a segment LCD.

pub mod datetime;
pub mod event;
pub mod faces;
pub mod files;
pub mod hardware;
pub mod host;
pub mod quiet_time;
pub mod refresh;
pub mod render;
pub mod sensors;
pub mod settings;

#[cfg(test)]
mod testing;

pub use datetime::{DateTimeFields, PackedDateTime};
pub use event::Event;
pub use hardware::Hardware;
pub use host::{FaceHost, FaceHostError, FaceKind};
pub use quiet_time::{DayMask, QuietTime, QuietTimeWindow};
pub use refresh::RefreshTier;
pub use render::{DisplaySink, Frame, Indicator};
pub use settings::WatchSettings;
