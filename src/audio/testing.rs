//! In-memory engine for session and controller tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::library::TrackRef;

use super::engine::{EngineHandle, PlaybackEngine};
use super::types::{EngineError, Volume};

/// Everything the scripted engine observed, shared with its handles.
#[derive(Debug, Default)]
pub struct EngineLog {
    pub opened: Vec<TrackRef>,
    /// Tracks passed to `check`, which never creates a handle.
    pub checked: Vec<TrackRef>,
    pub live_handles: usize,
    pub max_live_handles: usize,
    pub plays: usize,
    pub stops: usize,
    pub volumes: Vec<Volume>,
    pub seeks: Vec<Duration>,
    /// Elapsed time reported by every handle.
    pub elapsed: Duration,
}

#[derive(Clone)]
pub struct ScriptedEngine {
    pub log: Rc<RefCell<EngineLog>>,
    /// Length reported for local tracks.
    pub local_duration: Option<Duration>,
    /// Tracks whose open fails.
    pub failing: Vec<TrackRef>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(EngineLog::default())),
            local_duration: Some(Duration::from_secs(200)),
            failing: Vec::new(),
        }
    }

    pub fn with_local_duration(mut self, duration: Option<Duration>) -> Self {
        self.local_duration = duration;
        self
    }

    pub fn failing_on(mut self, track: TrackRef) -> Self {
        self.failing.push(track);
        self
    }

    pub fn set_elapsed(&self, elapsed: Duration) {
        self.log.borrow_mut().elapsed = elapsed;
    }

    fn fail_if_scripted(&self, track: &TrackRef) -> Result<(), EngineError> {
        if self.failing.contains(track) {
            return Err(EngineError::Network {
                url: track.to_string(),
                reason: "scripted failure".to_string(),
            });
        }
        Ok(())
    }
}

impl PlaybackEngine for ScriptedEngine {
    type Handle = ScriptedHandle;

    fn open(&mut self, track: &TrackRef) -> Result<ScriptedHandle, EngineError> {
        self.fail_if_scripted(track)?;

        let mut log = self.log.borrow_mut();
        log.opened.push(track.clone());
        log.live_handles += 1;
        log.max_live_handles = log.max_live_handles.max(log.live_handles);

        let duration = match track {
            TrackRef::Local(_) => self.local_duration,
            TrackRef::Stream(_) => None,
        };
        Ok(ScriptedHandle {
            log: self.log.clone(),
            duration,
        })
    }

    fn check(&mut self, track: &TrackRef) -> Result<(), EngineError> {
        self.fail_if_scripted(track)?;
        self.log.borrow_mut().checked.push(track.clone());
        Ok(())
    }
}

pub struct ScriptedHandle {
    log: Rc<RefCell<EngineLog>>,
    duration: Option<Duration>,
}

impl EngineHandle for ScriptedHandle {
    fn play(&mut self) {
        self.log.borrow_mut().plays += 1;
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stops += 1;
    }

    fn set_volume(&mut self, volume: Volume) {
        self.log.borrow_mut().volumes.push(volume);
    }

    fn elapsed(&self) -> Duration {
        self.log.borrow().elapsed
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_position(&mut self, position: Duration) -> Result<(), EngineError> {
        self.log.borrow_mut().seeks.push(position);
        Ok(())
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.log.borrow_mut().live_handles -= 1;
    }
}
