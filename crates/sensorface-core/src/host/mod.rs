//! Face host: owns the board, the face table and every face's state.
//!
//! Faces never see each other. The host delivers one event at a time to the
//! active face, applies the frame it returns, plays the chime when asked and
//! performs face switches.

use heapless::Vec;
use log::{debug, info, warn};

use crate::{
    event::Event,
    faces::{ClockFace, FaceOutcome, QuietTimeFace},
    hardware::Hardware,
    render::Frame,
    settings::WatchSettings,
};

/// Faces a single host can hold.
pub const MAX_FACES: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceKind {
    Clock,
    QuietTime,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceHostError {
    NoFaces,
    TooManyFaces,
}

#[derive(Clone, Debug, PartialEq)]
enum FaceState {
    Clock(ClockFace),
    QuietTime(QuietTimeFace),
}

struct Slot {
    kind: FaceKind,
    /// Allocated on first activation, then kept for the host's lifetime.
    state: Option<FaceState>,
}

pub struct FaceHost<H: Hardware> {
    hardware: H,
    settings: WatchSettings,
    slots: Vec<Slot, MAX_FACES>,
    current: usize,
}

impl<H: Hardware> FaceHost<H> {
    /// Builds the face table and activates the first face.
    pub fn new(
        hardware: H,
        settings: WatchSettings,
        faces: &[FaceKind],
    ) -> Result<Self, FaceHostError> {
        if faces.is_empty() {
            return Err(FaceHostError::NoFaces);
        }

        let mut slots = Vec::new();
        for &kind in faces {
            slots
                .push(Slot { kind, state: None })
                .map_err(|_| FaceHostError::TooManyFaces)?;
        }

        let mut host = Self {
            hardware,
            settings,
            slots,
            current: 0,
        };
        host.activate(0);
        Ok(host)
    }

    /// Delivers `event` to the active face. Returns whether the display
    /// changed.
    pub fn dispatch(&mut self, event: Event) -> bool {
        if !event.is_refresh() {
            debug!("{:?} -> face {}", event, self.current);
        }
        let outcome = self.deliver(self.current, event);
        self.present(&outcome.frame);
        if outcome.play_signal {
            self.hardware.play_signal();
        }

        let target = if outcome.delegate {
            self.default_target(event)
        } else {
            outcome.move_to
        };

        let mut changed = outcome.display_changed;
        if let Some(index) = target {
            changed |= self.move_to_face(index);
        }
        changed
    }

    /// Resigns the active face and activates face `index`.
    pub fn move_to_face(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            warn!("no face at index {}", index);
            return false;
        }

        self.resign(self.current);
        debug!("face {} -> {}", self.current, index);
        self.current = index;
        self.activate(index)
    }

    /// Offers a background task to every allocated face. Returns how many
    /// took it.
    pub fn run_background_tasks(&mut self) -> usize {
        let mut delivered = 0;
        for index in 0..self.slots.len() {
            let wants = match self.slots[index].state.as_ref() {
                Some(FaceState::Clock(face)) => face.wants_background_task(&mut self.hardware),
                Some(FaceState::QuietTime(_)) | None => false,
            };
            if !wants {
                continue;
            }

            let outcome = self.deliver(index, Event::BackgroundTask);
            if index == self.current {
                self.present(&outcome.frame);
            }
            if outcome.play_signal {
                self.hardware.play_signal();
            }
            delivered += 1;
        }
        delivered
    }

    pub fn current_face(&self) -> usize {
        self.current
    }

    pub fn current_kind(&self) -> FaceKind {
        self.slots[self.current].kind
    }

    pub fn is_allocated(&self, index: usize) -> bool {
        self.slots
            .get(index)
            .is_some_and(|slot| slot.state.is_some())
    }

    pub fn settings(&self) -> &WatchSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut WatchSettings {
        &mut self.settings
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    fn default_target(&self, event: Event) -> Option<usize> {
        match event {
            Event::ModeButtonUp => Some((self.current + 1) % self.slots.len()),
            Event::ModeLongPress => Some(0),
            _ => None,
        }
    }

    fn ensure_allocated(&mut self, index: usize) {
        let Self { hardware, slots, .. } = self;
        let Some(slot) = slots.get_mut(index) else {
            return;
        };
        if slot.state.is_some() {
            return;
        }

        info!("setting up {:?} face at {}", slot.kind, index);
        slot.state = Some(match slot.kind {
            FaceKind::Clock => FaceState::Clock(ClockFace::setup(hardware)),
            FaceKind::QuietTime => FaceState::QuietTime(QuietTimeFace::setup(hardware)),
        });
    }

    fn activate(&mut self, index: usize) -> bool {
        self.ensure_allocated(index);

        let Self {
            hardware,
            settings,
            slots,
            ..
        } = self;
        let frame = match slots.get_mut(index).and_then(|slot| slot.state.as_mut()) {
            Some(FaceState::Clock(face)) => face.activate(settings, hardware),
            Some(FaceState::QuietTime(face)) => face.activate(settings),
            None => Frame::new(),
        };
        self.present(&frame);

        let outcome = self.deliver(index, Event::Activate);
        self.present(&outcome.frame);
        if outcome.play_signal {
            self.hardware.play_signal();
        }
        if outcome.move_to.is_some() {
            warn!("face {} requested a move while activating, ignored", index);
        }

        !frame.is_empty() || outcome.display_changed
    }

    fn resign(&mut self, index: usize) {
        let Self { hardware, slots, .. } = self;
        match slots.get_mut(index).and_then(|slot| slot.state.as_mut()) {
            Some(FaceState::Clock(face)) => face.resign(),
            Some(FaceState::QuietTime(face)) => face.resign(hardware),
            None => {}
        }
    }

    fn deliver(&mut self, index: usize, event: Event) -> FaceOutcome {
        let Self {
            hardware,
            settings,
            slots,
            ..
        } = self;
        match slots.get_mut(index).and_then(|slot| slot.state.as_mut()) {
            Some(FaceState::Clock(face)) => face.handle(event, settings, hardware),
            Some(FaceState::QuietTime(face)) => face.handle(event, settings),
            None => {
                warn!("event {:?} for unallocated face {}", event, index);
                FaceOutcome::unchanged()
            }
        }
    }

    fn present(&mut self, frame: &Frame) {
        if !frame.is_empty() {
            frame.apply(self.hardware.display());
        }
    }
}
