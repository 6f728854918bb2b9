//! Input systems.
//!
//! - [`poll_input_events`] reads the window's input once per frame and turns
//!   it into [`InputEvent`]s. It runs outside the ECS world because it needs
//!   the raylib handle.
//! - [`process_exit_input`] consumes the events queued in
//!   [`PendingInput`] and triggers an
//!   [`ExitRequestedEvent`](crate::events::exit::ExitRequestedEvent) for the
//!   first one that should end the run.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

use crate::events::exit::ExitRequestedEvent;
use crate::events::input::InputEvent;
use crate::resources::input::{ExitInput, PendingInput};

const MOUSE_BUTTONS: [MouseButton; 7] = [
    MouseButton::MOUSE_BUTTON_LEFT,
    MouseButton::MOUSE_BUTTON_RIGHT,
    MouseButton::MOUSE_BUTTON_MIDDLE,
    MouseButton::MOUSE_BUTTON_SIDE,
    MouseButton::MOUSE_BUTTON_EXTRA,
    MouseButton::MOUSE_BUTTON_FORWARD,
    MouseButton::MOUSE_BUTTON_BACK,
];

/// Poll raylib for this frame's input.
///
/// `last_mouse` holds the pointer position seen on the previous poll; a
/// [`InputEvent::MouseMove`] is produced only when it changes.
pub fn poll_input_events(rl: &mut RaylibHandle, last_mouse: &mut Vector2) -> Vec<InputEvent> {
    let mut events = Vec::new();

    if rl.window_should_close() {
        events.push(InputEvent::Quit);
    }
    if rl.get_key_pressed().is_some() {
        events.push(InputEvent::KeyDown);
    }
    if MOUSE_BUTTONS
        .iter()
        .any(|button| rl.is_mouse_button_pressed(*button))
    {
        events.push(InputEvent::MouseButtonDown);
    }

    let position = rl.get_mouse_position();
    if position.x != last_mouse.x || position.y != last_mouse.y {
        *last_mouse = position;
        events.push(InputEvent::MouseMove { position });
    }

    events
}

/// Turn queued input into an exit request.
pub fn process_exit_input(
    mut pending: ResMut<PendingInput>,
    exit_input: Res<ExitInput>,
    mut commands: Commands,
) {
    let reason = pending
        .events
        .drain(..)
        .find_map(|event| exit_input.exit_reason(&event));

    if let Some(reason) = reason {
        commands.trigger(ExitRequestedEvent { reason });
    }
}
