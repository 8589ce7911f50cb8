//! Watch faces: event-driven controllers owning their own runtime state.

mod clock;
mod quiet_time;

pub use clock::ClockFace;
pub use quiet_time::{EditField, QuietTimeFace};

use crate::render::Frame;

/// What a face asks of the host after handling one event.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FaceOutcome {
    pub frame: Frame,
    /// The LCD content changed.
    pub display_changed: bool,
    /// Sound the chime before returning to the host loop.
    pub play_signal: bool,
    /// Hand focus to another face.
    pub move_to: Option<usize>,
    /// The face ignored the event; run the host's default handler.
    pub delegate: bool,
}

impl FaceOutcome {
    pub fn redraw(frame: Frame) -> Self {
        Self {
            display_changed: !frame.is_empty(),
            frame,
            ..Self::default()
        }
    }

    pub fn unchanged() -> Self {
        Self::default()
    }

    pub fn delegate() -> Self {
        Self {
            delegate: true,
            ..Self::default()
        }
    }

    pub fn move_to(face: usize) -> Self {
        Self {
            move_to: Some(face),
            ..Self::default()
        }
    }
}
