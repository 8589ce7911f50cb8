//! Host-wide user preferences shared by every face.

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WatchSettings {
    pub clock_mode_24h: bool,
    /// An alarm face has an alarm armed; mirrored on the signal lamp.
    pub alarm_enabled: bool,
}

impl WatchSettings {
    pub const fn new(clock_mode_24h: bool, alarm_enabled: bool) -> Self {
        Self {
            clock_mode_24h,
            alarm_enabled,
        }
    }
}
