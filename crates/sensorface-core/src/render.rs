//! Display frames: what a face wants on the LCD, applied by the host.

use heapless::{String, Vec};

/// Character positions on the segment LCD.
pub const DISPLAY_WIDTH: usize = 10;
/// Text runs a single frame can carry.
pub const MAX_RUNS: usize = 3;

/// Named lamps on the LCD.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Indicator {
    TwentyFourHour,
    Pm,
    Bell,
    Signal,
    Lap,
    Colon,
}

impl Indicator {
    pub const ALL: [Self; 6] = [
        Self::TwentyFourHour,
        Self::Pm,
        Self::Bell,
        Self::Signal,
        Self::Lap,
        Self::Colon,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::TwentyFourHour => 1 << 0,
            Self::Pm => 1 << 1,
            Self::Bell => 1 << 2,
            Self::Signal => 1 << 3,
            Self::Lap => 1 << 4,
            Self::Colon => 1 << 5,
        }
    }
}

/// Pending lamp changes. A later call for the same lamp wins, so applying
/// the result equals applying every call in order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IndicatorChanges {
    set: u8,
    clear: u8,
}

impl IndicatorChanges {
    pub const fn new() -> Self {
        Self { set: 0, clear: 0 }
    }

    pub fn set(&mut self, indicator: Indicator) {
        self.set |= indicator.bit();
        self.clear &= !indicator.bit();
    }

    pub fn clear(&mut self, indicator: Indicator) {
        self.clear |= indicator.bit();
        self.set &= !indicator.bit();
    }

    pub fn set_to(&mut self, indicator: Indicator, on: bool) {
        if on {
            self.set(indicator);
        } else {
            self.clear(indicator);
        }
    }

    pub fn merge(&mut self, later: IndicatorChanges) {
        for indicator in Indicator::ALL {
            match later.state(indicator) {
                Some(true) => self.set(indicator),
                Some(false) => self.clear(indicator),
                None => {}
            }
        }
    }

    /// `Some(on)` when the lamp is touched by these changes.
    pub fn state(&self, indicator: Indicator) -> Option<bool> {
        if self.set & indicator.bit() != 0 {
            Some(true)
        } else if self.clear & indicator.bit() != 0 {
            Some(false)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.set == 0 && self.clear == 0
    }
}

/// Text written starting at a 0-indexed LCD position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextRun {
    pub position: u8,
    pub text: String<DISPLAY_WIDTH>,
}

/// Everything a face wants changed on the display for one event.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Frame {
    pub runs: Vec<TextRun, MAX_RUNS>,
    pub indicators: IndicatorChanges,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `text` at `position`, truncated to the display width.
    pub fn text(&mut self, position: u8, text: &str) {
        let mut run = String::new();
        for ch in text.chars() {
            if run.push(ch).is_err() {
                break;
            }
        }
        if self.runs.push(TextRun { position, text: run }).is_err() {
            log::warn!("frame run capacity exceeded, dropping text at {}", position);
        }
    }

    /// Two decimal digits, zero padded.
    pub fn digits(&mut self, position: u8, value: u8) {
        let pair = [b'0' + (value / 10) % 10, b'0' + value % 10];
        // Both bytes are ASCII digits.
        let text = core::str::from_utf8(&pair).unwrap_or("??");
        self.text(position, text);
    }

    pub fn set(&mut self, indicator: Indicator) {
        self.indicators.set(indicator);
    }

    pub fn clear(&mut self, indicator: Indicator) {
        self.indicators.clear(indicator);
    }

    pub fn set_to(&mut self, indicator: Indicator, on: bool) {
        self.indicators.set_to(indicator, on);
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.indicators.is_empty()
    }

    /// Writes the frame to a sink: text first, then lamps.
    pub fn apply<D: DisplaySink + ?Sized>(&self, sink: &mut D) {
        for run in &self.runs {
            sink.display_string(&run.text, run.position);
        }
        for indicator in Indicator::ALL {
            match self.indicators.state(indicator) {
                Some(true) => sink.set_indicator(indicator),
                Some(false) => sink.clear_indicator(indicator),
                None => {}
            }
        }
    }
}

/// Position-addressed character display with named lamps.
pub trait DisplaySink {
    fn display_string(&mut self, text: &str, position: u8);
    fn set_indicator(&mut self, indicator: Indicator);
    fn clear_indicator(&mut self, indicator: Indicator);
}

/// Display double that keeps the last written characters and lamps.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShadowDisplay {
    pub chars: [char; DISPLAY_WIDTH],
    lamps: u8,
    pub writes: usize,
}

impl Default for ShadowDisplay {
    fn default() -> Self {
        Self {
            chars: [' '; DISPLAY_WIDTH],
            lamps: 0,
            writes: 0,
        }
    }
}

impl ShadowDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self, indicator: Indicator) -> bool {
        self.lamps & indicator.bit() != 0
    }

    pub fn text(&self) -> String<DISPLAY_WIDTH> {
        let mut out = String::new();
        for ch in self.chars {
            let _ = out.push(ch);
        }
        out
    }
}

impl DisplaySink for ShadowDisplay {
    fn display_string(&mut self, text: &str, position: u8) {
        for (offset, ch) in text.chars().enumerate() {
            let index = position as usize + offset;
            if index >= DISPLAY_WIDTH {
                break;
            }
            self.chars[index] = ch;
        }
        self.writes = self.writes.saturating_add(1);
    }

    fn set_indicator(&mut self, indicator: Indicator) {
        self.lamps |= indicator.bit();
    }

    fn clear_indicator(&mut self, indicator: Indicator) {
        self.lamps &= !indicator.bit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_lamp_change_wins() {
        let mut changes = IndicatorChanges::new();
        changes.set(Indicator::Signal);
        changes.clear(Indicator::Signal);
        assert_eq!(changes.state(Indicator::Signal), Some(false));

        let mut later = IndicatorChanges::new();
        later.set(Indicator::Signal);
        changes.merge(later);
        assert_eq!(changes.state(Indicator::Signal), Some(true));
        assert_eq!(changes.state(Indicator::Bell), None);
    }

    #[test]
    fn frame_applies_runs_at_positions() {
        let mut frame = Frame::new();
        frame.text(0, "MO 4");
        frame.digits(8, 7);
        frame.set(Indicator::Colon);

        let mut display = ShadowDisplay::new();
        frame.apply(&mut display);

        assert_eq!(display.text().as_str(), "MO 4    07");
        assert!(display.is_lit(Indicator::Colon));
        assert!(!display.is_lit(Indicator::Pm));
    }
}
