//! Input-driven termination state.
//!
//! - [`ExitInput`] holds the pointer position recorded at startup and the
//!   travel threshold; it decides which [`InputEvent`]s end the run.
//! - [`PendingInput`] is the per-frame inbox the display layer fills.
//! - [`ExitState`] records that, and why, the run was asked to end.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;

use crate::events::input::{ExitReason, InputEvent};

/// Exit rules: every event ends the run except small pointer motion.
#[derive(Resource, Debug, Clone, Copy)]
pub struct ExitInput {
    /// Pointer position when the run started.
    pub origin: Vector2,
    /// Per-axis travel in pixels the pointer may make without ending the run.
    pub threshold: f32,
}

impl ExitInput {
    pub fn new(origin: Vector2, threshold: f32) -> Self {
        Self { origin, threshold }
    }

    /// The exit reason for `event`, or `None` if it should be ignored.
    ///
    /// Motion counts only once it moves more than `threshold` away from the
    /// origin on either axis.
    pub fn exit_reason(&self, event: &InputEvent) -> Option<ExitReason> {
        match event {
            InputEvent::Quit => Some(ExitReason::Quit),
            InputEvent::KeyDown => Some(ExitReason::KeyDown),
            InputEvent::MouseButtonDown => Some(ExitReason::MouseButtonDown),
            InputEvent::MouseMove { position } => {
                let dx = (position.x - self.origin.x).abs();
                let dy = (position.y - self.origin.y).abs();
                (dx > self.threshold || dy > self.threshold).then_some(ExitReason::MouseMoved)
            }
        }
    }
}

/// Input events collected since the last frame.
#[derive(Resource, Debug, Default)]
pub struct PendingInput {
    pub events: Vec<InputEvent>,
}

/// Set once the run has been asked to end.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ExitState {
    /// First reason received; later requests do not overwrite it.
    pub reason: Option<ExitReason>,
}

impl ExitState {
    pub fn is_requested(&self) -> bool {
        self.reason.is_some()
    }
}
