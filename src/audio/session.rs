//! The playback session: at most one engine handle, replaced atomically.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::library::{PlaybackMode, TrackRef};

use super::engine::{EngineHandle, PlaybackEngine};
use super::types::{EngineError, PlaybackReading, SessionState, Volume};

struct Active<H> {
    track: TrackRef,
    handle: H,
}

pub struct PlaybackSession<E: PlaybackEngine> {
    engine: E,
    active: Option<Active<E::Handle>>,
    state: SessionState,
    volume: Volume,
}

impl<E: PlaybackEngine> PlaybackSession<E> {
    pub fn new(engine: E, volume: Volume) -> Self {
        Self {
            engine,
            active: None,
            state: SessionState::Idle,
            volume,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    /// Track the current handle is bound to, if any.
    pub fn track(&self) -> Option<&TrackRef> {
        self.active.as_ref().map(|a| &a.track)
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Check that `track` can be reached before committing to it.
    ///
    /// The current handle, if any, is left alone and no second one is created.
    pub fn check_reachable(&mut self, track: &TrackRef) -> Result<(), EngineError> {
        self.engine.check(track)
    }

    /// Tear down the current handle (if any), then open and play `track`.
    ///
    /// On failure the session is left `Idle` with no handle.
    pub fn start(&mut self, track: TrackRef) -> Result<(), EngineError> {
        self.teardown();

        let mut handle = self.engine.open(&track).inspect_err(|e| {
            warn!(track = %track, error = %e, "could not open track");
        })?;
        handle.set_volume(self.volume);
        handle.play();

        info!(track = %track, volume = self.volume.level(), "playback started");
        self.active = Some(Active { track, handle });
        self.state = SessionState::Playing;
        Ok(())
    }

    /// Halt playback. Elapsed time reads as zero afterwards.
    pub fn stop(&mut self) {
        if self.state != SessionState::Playing {
            return;
        }
        if let Some(active) = self.active.as_mut() {
            active.handle.stop();
            debug!(track = %active.track, "playback stopped");
        }
        self.state = SessionState::Stopped;
    }

    /// Stop and drop the current handle, returning to `Idle`.
    pub fn teardown(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.handle.stop();
            debug!(track = %active.track, "released engine handle");
        }
        self.state = SessionState::Idle;
    }

    /// Jump to `fraction` (0.0-1.0) of the track length.
    ///
    /// Only applies to a playing local track with a known positive duration;
    /// otherwise nothing happens. Returns whether a seek was issued.
    pub fn seek(&mut self, fraction: f64) -> bool {
        if self.state != SessionState::Playing {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.track.mode() == PlaybackMode::Stream {
            return false;
        }
        let Some(duration) = active.handle.duration().filter(|d| !d.is_zero()) else {
            return false;
        };

        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let target = duration.mul_f64(fraction);
        if let Err(e) = active.handle.set_position(target) {
            warn!(track = %active.track, error = %e, "seek failed");
            return false;
        }
        debug!(track = %active.track, position_ms = target.as_millis() as u64, "seeked");
        true
    }

    /// Remember `volume` and apply it to the live handle, if any.
    pub fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        if let Some(active) = self.active.as_mut() {
            active.handle.set_volume(volume);
        }
    }

    /// Sample the current position. Never fails; idle reads as zero/unknown.
    pub fn poll(&self) -> PlaybackReading {
        let Some(active) = self.active.as_ref() else {
            return PlaybackReading::idle();
        };

        let duration = match active.track.mode() {
            PlaybackMode::Local => active.handle.duration().filter(|d| !d.is_zero()),
            PlaybackMode::Stream => None,
        };
        let elapsed = match self.state {
            SessionState::Playing => active.handle.elapsed(),
            SessionState::Idle | SessionState::Stopped => Duration::ZERO,
        };

        PlaybackReading {
            elapsed,
            duration,
            remaining: duration.map(|d| d.saturating_sub(elapsed)),
        }
    }
}
