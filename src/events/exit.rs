//! Exit request event and observer.
//!
//! Triggering [`ExitRequestedEvent`] records the reason in
//! [`ExitState`] and sets the simulators' shutdown signal. The render loop
//! checks [`ExitState`] after each frame and stops.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::info;

use crate::events::input::ExitReason;
use crate::resources::input::ExitState;
use crate::resources::simbridge::SimulationBridge;

/// Request to end the run.
#[derive(Event, Debug, Clone, Copy)]
pub struct ExitRequestedEvent {
    pub reason: ExitReason,
}

/// Observer that handles [`ExitRequestedEvent`].
///
/// The first request wins; later ones only set the (already set) shutdown
/// signal again, which is harmless.
pub fn exit_requested_observer(
    trigger: On<ExitRequestedEvent>,
    mut exit: ResMut<ExitState>,
    bridge: Option<Res<SimulationBridge>>,
) {
    let reason = trigger.event().reason;
    if exit.reason.is_none() {
        info!("exit requested: {:?}", reason);
        exit.reason = Some(reason);
    }
    if let Some(bridge) = bridge {
        bridge.shutdown_signal().set();
    }
}
