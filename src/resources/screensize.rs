//! Screen size resource.
//!
//! Stores the drawable area in pixels, fixed for the whole run. It is both
//! the simulators' bounce area and the size of the trail canvas.

use bevy_ecs::prelude::Resource;

use crate::simulation::shape::Bounds;

/// Drawable area in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    /// Bounce area matching the screen.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.w as f32, self.h as f32)
    }
}
