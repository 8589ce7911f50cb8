//! Discrete events delivered by the host, one at a time.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Event {
    /// First event after a face gains focus.
    Activate,
    /// Once-per-second wake while the face is in the foreground.
    Tick,
    /// Once-per-minute wake in low-energy mode; intermediate ticks were not
    /// observed.
    LowEnergyTick,
    LightButtonDown,
    LightButtonUp,
    LightLongPress,
    AlarmButtonDown,
    AlarmButtonUp,
    AlarmLongPress,
    ModeButtonUp,
    ModeLongPress,
    /// The host's idle timer expired.
    Timeout,
    /// Delivered to a face that answered yes to `wants_background_task`.
    BackgroundTask,
}

impl Event {
    /// Events that require re-reading the clock.
    pub const fn is_refresh(self) -> bool {
        matches!(self, Self::Activate | Self::Tick | Self::LowEnergyTick)
    }
}
