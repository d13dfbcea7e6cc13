//! Playback: the engine seam, the rodio-backed engine and the session that
//! owns at most one live engine handle.

mod engine;
mod network;
mod rodio_engine;
mod session;
mod types;

pub use engine::{EngineHandle, PlaybackEngine};
pub use rodio_engine::RodioEngine;
pub use session::PlaybackSession;
pub use types::*;

#[cfg(test)]
pub(crate) mod testing;
