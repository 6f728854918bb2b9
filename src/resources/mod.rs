//! ECS resources owned by the render coordinator.
//!
//! Overview
//! - `config` – compiled-in tunables with command-line overrides
//! - `debugmode` – presence toggles the diagnostics overlay
//! - `displaystate` – latest snapshot per shape, the only thing drawn
//! - `framestats` – frame and snapshot counters
//! - `input` – exit rules, pending input events, exit state
//! - `palette` – shape line colors
//! - `screensize` – drawable area and bounce bounds
//! - `simbridge` – snapshot receiver plus the simulator threads
//! - `trailcanvas` – off-screen texture for the fade effect (main thread only)
pub mod config;
pub mod debugmode;
pub mod displaystate;
pub mod framestats;
pub mod input;
pub mod palette;
pub mod screensize;
pub mod simbridge;
pub mod trailcanvas;
