//! Event types exchanged inside the coordinator.
//!
//! - [`input`] – raw input events and exit reasons
//! - [`exit`] – exit request event and its observer

pub mod exit;
pub mod input;
