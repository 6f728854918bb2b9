//! Coordinator-owned cache of the latest snapshot per shape.
//!
//! Entries appear when a shape's first snapshot is drained and are only ever
//! overwritten afterwards, never removed. A shape that publishes nothing for
//! a while keeps showing its last known snapshot.

use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;

use crate::simulation::shape::{ShapeId, Snapshot};

/// Latest known snapshot of every shape seen so far.
///
/// Only the snapshot-draining system writes to it; everything else gets a
/// shared reference.
#[derive(Resource, Debug, Default)]
pub struct DisplayState {
    shapes: FxHashMap<ShapeId, Snapshot>,
}

impl DisplayState {
    /// Replace the entry for the snapshot's shape.
    pub(crate) fn apply(&mut self, snapshot: Snapshot) {
        self.shapes.insert(snapshot.shape_id, snapshot);
    }

    /// Last known snapshot of `shape_id`, or `None` before the first one.
    pub fn get(&self, shape_id: ShapeId) -> Option<&Snapshot> {
        self.shapes.get(&shape_id)
    }

    pub fn contains(&self, shape_id: ShapeId) -> bool {
        self.shapes.contains_key(&shape_id)
    }

    /// Number of shapes with a known snapshot.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Known snapshots ordered by shape id, the order shapes are drawn in.
    pub fn ordered(&self) -> Vec<&Snapshot> {
        let mut shapes: Vec<&Snapshot> = self.shapes.values().collect();
        shapes.sort_by_key(|s| s.shape_id);
        shapes
    }
}
