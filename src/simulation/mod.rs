//! Concurrent shape simulation.
//!
//! This module has no display dependency beyond the `Vector2` math type and
//! can be driven from tests or the headless mode.
//!
//! Submodules overview
//! - [`shape`] – shape state, bounce reflection, color cycling, snapshots
//! - [`channel`] – bounded lossy snapshot channel (many producers, one consumer)
//! - [`shutdown`] – run-wide set-once shutdown flag with interruptible waits
//! - [`simulator`] – the paced per-shape loop
//! - [`workers`] – simulator threads and bounded-timeout shutdown

pub mod channel;
pub mod shape;
pub mod shutdown;
pub mod simulator;
pub mod workers;
