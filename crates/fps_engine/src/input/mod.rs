//! Player input intents
//!
//! Device handling lives outside the core. The host translates keys and mouse
//! buttons into [`MoveIntents`] and trigger presses, and hands the simulation
//! one [`FrameInput`] per rendered frame.

use std::time::Duration;

use bitflags::bitflags;

use crate::foundation::time::Stopwatch;

bitflags! {
    /// Movement keys held during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveIntents: u8 {
        /// Walk along the view direction
        const FORWARD = 1 << 0;
        /// Walk against the view direction
        const BACKWARD = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Jump when standing on a walkable surface
        const JUMP = 1 << 4;
    }
}

impl MoveIntents {
    /// True when a jump is requested
    pub fn wants_jump(self) -> bool {
        self.contains(Self::JUMP)
    }
}

/// Everything the simulation reads from input for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Held movement keys
    pub intents: MoveIntents,
    /// A released trigger this frame, with how long it was held
    pub fire: Option<Duration>,
}

impl FrameInput {
    /// Input with movement only
    pub fn new(intents: MoveIntents) -> Self {
        Self {
            intents,
            fire: None,
        }
    }

    /// Add a fire request charged for `charge`
    pub fn with_fire(mut self, charge: Duration) -> Self {
        self.fire = Some(charge);
        self
    }
}

/// Accumulates device events between frames
///
/// Movement keys are level-triggered and persist until released. A fire
/// request is edge-triggered: it is queued when the trigger goes up and
/// handed out by exactly one [`InputState::take_frame`].
#[derive(Default)]
pub struct InputState {
    held: MoveIntents,
    trigger: Stopwatch,
    pending_fire: Option<Duration>,
}

impl InputState {
    /// Create an input state with nothing held
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark keys as held
    pub fn press(&mut self, intents: MoveIntents) {
        self.held.insert(intents);
    }

    /// Mark keys as released
    pub fn release(&mut self, intents: MoveIntents) {
        self.held.remove(intents);
    }

    /// Currently held movement keys
    pub fn held(&self) -> MoveIntents {
        self.held
    }

    /// The trigger went down; start timing the charge
    pub fn trigger_down(&mut self) {
        self.trigger.restart();
    }

    /// The trigger went up; queue a fire request with the measured hold time
    ///
    /// Returns the queued charge, or `None` if the trigger was never pressed.
    pub fn trigger_up(&mut self) -> Option<Duration> {
        if !self.trigger.is_running() {
            return None;
        }
        let charge = self.trigger.stop();
        self.trigger.reset();
        self.queue_fire(charge);
        Some(charge)
    }

    /// Queue a fire request with an explicit charge time
    pub fn queue_fire(&mut self, charge: Duration) {
        self.pending_fire = Some(charge);
    }

    /// Snapshot for the coming frame; consumes any queued fire request
    pub fn take_frame(&mut self) -> FrameInput {
        FrameInput {
            intents: self.held,
            fire: self.pending_fire.take(),
        }
    }
}
