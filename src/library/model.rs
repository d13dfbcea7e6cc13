use std::fmt;
use std::path::{Path, PathBuf};

/// Placeholder used for artist/album when a local file carries no tag.
pub const UNKNOWN_FIELD: &str = "-";

pub const STREAM_TITLE: &str = "Streaming Audio";
pub const STREAM_ARTIST: &str = "Live Stream";
pub const STREAM_ALBUM: &str = "Network Stream";

/// Identifies one playable item: a file on disk or a network stream URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackRef {
    Local(PathBuf),
    Stream(String),
}

impl TrackRef {
    pub fn mode(&self) -> PlaybackMode {
        match self {
            TrackRef::Local(_) => PlaybackMode::Local,
            TrackRef::Stream(_) => PlaybackMode::Stream,
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            TrackRef::Local(p) => Some(p.as_path()),
            TrackRef::Stream(_) => None,
        }
    }
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackRef::Local(p) => write!(f, "{}", p.display()),
            TrackRef::Stream(url) => f.write_str(url),
        }
    }
}

/// Whether the loaded playlist is made of local files or a single stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Local,
    Stream,
}

/// Display metadata for one track. Built once by [`super::extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub track_number: u32,
}

impl TrackMetadata {
    /// Fallback record for a local file whose tags could not be read.
    pub fn for_untagged(path: &Path) -> Self {
        Self {
            title: file_name(path),
            artist: UNKNOWN_FIELD.to_string(),
            album: UNKNOWN_FIELD.to_string(),
            track_number: 0,
        }
    }

    /// The fixed record shown for a network stream.
    pub fn for_stream() -> Self {
        Self {
            title: STREAM_TITLE.to_string(),
            artist: STREAM_ARTIST.to_string(),
            album: STREAM_ALBUM.to_string(),
            track_number: 1,
        }
    }
}

/// Embedded cover art, kept as the raw encoded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub track: TrackRef,
    pub metadata: TrackMetadata,
}

pub(super) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
