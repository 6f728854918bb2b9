//! Raw input events delivered to the coordinator.
//!
//! The display layer polls the window once per frame and turns whatever
//! happened into [`InputEvent`]s. The coordinator only cares whether an event
//! should end the run; see
//! [`ExitInput::exit_reason`](crate::resources::input::ExitInput::exit_reason).

use raylib::prelude::Vector2;

/// One discrete input occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The window was asked to close.
    Quit,
    /// Any key went down.
    KeyDown,
    /// Any mouse button went down.
    MouseButtonDown,
    /// The pointer moved to `position` (window coordinates).
    MouseMove { position: Vector2 },
}

/// Why the run is ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    KeyDown,
    MouseButtonDown,
    MouseMoved,
    /// A timed run reached its duration.
    Timer,
}
