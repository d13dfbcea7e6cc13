//! Application module: the player controller and its display state.
//!
//! The `Controller` owns the playlist, the grouping view and the single
//! playback session; the runtime drives it from key presses and ticks.

mod display;
mod error;
mod model;

pub use display::*;
pub use error::ControllerError;
pub use model::*;
