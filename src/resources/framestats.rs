//! Per-run frame counters kept by the coordinator.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

#[derive(Resource, Debug, Default, Clone, Copy, Serialize)]
pub struct FrameStats {
    /// Frames run by the coordinator.
    pub frames: u64,
    /// Snapshots drained during the most recent frame.
    pub drained_last_frame: usize,
    /// Snapshots drained since the start.
    pub drained_total: u64,
}
