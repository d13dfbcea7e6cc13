//! Audio-related small types.
//!
//! Volume levels, session state, position readings and the engine error type.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Output volume on the 0-100 scale the controls use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    /// Build a volume, clamping anything above 100.
    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Shift the level by `delta`, staying within 0-100.
    pub fn offset(self, delta: i16) -> Self {
        let level = (i16::from(self.0) + delta).clamp(0, i16::from(Self::MAX));
        Self(level as u8)
    }

    /// Linear gain for the mixer, 0.0 to 1.0.
    pub fn gain(self) -> f32 {
        f32::from(self.0) / f32::from(Self::MAX)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(80)
    }
}

/// Lifecycle of the playback session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No engine handle exists.
    #[default]
    Idle,
    Playing,
    /// A handle exists but playback was halted; position reads as zero.
    Stopped,
}

/// A position sample taken by [`super::PlaybackSession::poll`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlaybackReading {
    pub elapsed: Duration,
    /// Known only for local tracks with a positive length.
    pub duration: Option<Duration>,
    /// `duration - elapsed`; `None` whenever the duration is unknown.
    pub remaining: Option<Duration>,
}

impl PlaybackReading {
    /// Neutral reading reported when nothing is loaded.
    pub fn idle() -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: None,
            remaining: None,
        }
    }

    /// Fraction of the track already played, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        let total = self.duration.filter(|d| !d.is_zero())?;
        Some((self.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {location}: {reason}")]
    Decode { location: String, reason: String },
    #[error("could not reach stream {url}: {reason}")]
    Network { url: String, reason: String },
    #[error("could not set up the HTTP client: {0}")]
    HttpClient(String),
    #[error("seek failed: {0}")]
    Seek(String),
    #[error("no audio output available: {0}")]
    Output(String),
}
