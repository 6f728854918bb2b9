//! Snapshot draining system.
//!
//! Once per frame, [`drain_snapshots`] takes every snapshot queued in the
//! state channel and writes it into [`DisplayState`]. Snapshots are applied
//! in arrival order, so the newest one drained for a shape wins. A frame
//! with nothing queued leaves the display untouched.

use bevy_ecs::prelude::*;

use crate::resources::displaystate::DisplayState;
use crate::resources::framestats::FrameStats;
use crate::resources::simbridge::SimulationBridge;

/// Drain the channel into the display cache without blocking.
pub fn drain_snapshots(
    bridge: Option<Res<SimulationBridge>>,
    mut display: ResMut<DisplayState>,
    mut stats: ResMut<FrameStats>,
) {
    stats.frames += 1;
    let Some(bridge) = bridge else {
        stats.drained_last_frame = 0;
        return;
    };

    let drained = bridge.receiver().try_receive_all();
    stats.drained_last_frame = drained.len();
    stats.drained_total += drained.len() as u64;
    for snapshot in drained {
        display.apply(snapshot);
    }
}
