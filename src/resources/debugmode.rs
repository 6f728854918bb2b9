//! Debug overlay toggle resource.
//!
//! The mere presence of this resource makes the renderer draw the
//! diagnostics overlay (FPS, frame and snapshot counters).

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, the renderer draws the overlay.
#[derive(Resource, Clone, Copy)]
pub struct DebugMode {}
