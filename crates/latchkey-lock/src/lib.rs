//! Lock state controller and its feedback surfaces.
//!
//! This crate owns the single source of truth for the lock position and the
//! side effects of changing it: the bolt actuator, the indicator lamp, the
//! audible cue patterns, and the transient status display.

pub mod controller;
pub mod cues;
pub mod display;

pub use controller::LockController;
pub use cues::{Cue, play};
pub use display::StatusDisplay;
