use std::time::Duration;

use crate::library::TrackRef;

use super::types::{EngineError, Volume};

/// Something that can turn a track reference into a playable handle.
///
/// Opening must not start playback; callers decide when to call
/// [`EngineHandle::play`]. Dropping a handle releases its audio resources.
pub trait PlaybackEngine {
    type Handle: EngineHandle;

    fn open(&mut self, track: &TrackRef) -> Result<Self::Handle, EngineError>;

    /// Check that `track` is reachable without creating a handle, so it can
    /// be called while another handle is live.
    fn check(&mut self, track: &TrackRef) -> Result<(), EngineError>;
}

/// One opened track inside the engine.
pub trait EngineHandle {
    fn play(&mut self);
    fn stop(&mut self);
    fn set_volume(&mut self, volume: Volume);
    fn elapsed(&self) -> Duration;
    /// Total length, `None` when unknown (always the case for streams).
    fn duration(&self) -> Option<Duration>;
    fn set_position(&mut self, position: Duration) -> Result<(), EngineError>;
}
