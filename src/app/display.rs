use std::time::Duration;

use crate::library::{CoverArt, TrackMetadata};

/// Shown instead of a remaining time when the track length is unknown.
pub const UNKNOWN_REMAINING: &str = "--:--";

/// Format a `Duration` as `m:ss`.
pub fn format_time(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Progress text and bar position refreshed on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDisplay {
    pub elapsed: String,
    pub remaining: String,
    /// 0.0 to 1.0.
    pub ratio: f64,
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self {
            elapsed: "0:00".to_string(),
            remaining: "-0:00".to_string(),
            ratio: 0.0,
        }
    }
}

/// Metadata and art of the current playlist entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub metadata: Option<TrackMetadata>,
    pub art: Option<CoverArt>,
}
