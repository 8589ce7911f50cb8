use sensorface_core::{DisplaySink, Indicator, render::DISPLAY_WIDTH};

/// Segment LCD stand-in: ten character cells plus the named lamps.
pub(super) struct ConsoleDisplay {
    cells: [char; DISPLAY_WIDTH],
    lamps: [bool; Indicator::ALL.len()],
}

impl ConsoleDisplay {
    pub(super) fn new() -> Self {
        Self {
            cells: [' '; DISPLAY_WIDTH],
            lamps: [false; Indicator::ALL.len()],
        }
    }

    /// `|MO 4140568| 24H COLON`
    pub(super) fn line(&self) -> String {
        let mut line = String::with_capacity(48);
        line.push('|');
        line.extend(self.cells.iter());
        line.push('|');
        for (indicator, lit) in Indicator::ALL.iter().zip(self.lamps) {
            if lit {
                line.push(' ');
                line.push_str(lamp_label(*indicator));
            }
        }
        line
    }
}

fn lamp_label(indicator: Indicator) -> &'static str {
    match indicator {
        Indicator::TwentyFourHour => "24H",
        Indicator::Pm => "PM",
        Indicator::Bell => "BELL",
        Indicator::Signal => "SIGNAL",
        Indicator::Lap => "LAP",
        Indicator::Colon => "COLON",
    }
}

fn lamp_index(indicator: Indicator) -> usize {
    Indicator::ALL
        .iter()
        .position(|candidate| *candidate == indicator)
        .unwrap_or(0)
}

impl DisplaySink for ConsoleDisplay {
    fn display_string(&mut self, text: &str, position: u8) {
        let cells = self.cells.iter_mut().skip(position as usize);
        for (cell, ch) in cells.zip(text.chars()) {
            *cell = ch;
        }
    }

    fn set_indicator(&mut self, indicator: Indicator) {
        self.lamps[lamp_index(indicator)] = true;
    }

    fn clear_indicator(&mut self, indicator: Indicator) {
        self.lamps[lamp_index(indicator)] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_cells_and_lit_lamps() {
        let mut display = ConsoleDisplay::new();
        display.display_string("MO 4140568", 0);
        display.display_string("99", 8);
        display.set_indicator(Indicator::Colon);
        display.set_indicator(Indicator::Pm);
        display.clear_indicator(Indicator::Pm);

        assert_eq!(display.line(), "|MO 4140599| COLON");
    }

    #[test]
    fn clips_text_at_the_last_cell() {
        let mut display = ConsoleDisplay::new();
        display.display_string("ABCD", 8);
        assert_eq!(display.line(), "|        AB|");
    }
}
