//! Mystify library.
//!
//! Exposes the simulation, the render coordinator and its ECS resources,
//! systems and events for integration tests and the headless mode.

pub mod coordinator;
pub mod events;
pub mod headless;
pub mod resources;
pub mod simulation;
pub mod systems;
