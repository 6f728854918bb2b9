//! Coordinator systems.
//!
//! Submodules overview
//! - [`input`] – poll window input and turn it into exit requests
//! - [`render`] – draw the display state with the trail effect and overlays
//! - [`snapshots`] – drain the snapshot channel into the display state

pub mod input;
pub mod render;
pub mod snapshots;
