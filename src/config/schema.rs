use std::path::PathBuf;

use serde::Deserialize;

use crate::view::GroupingMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/trackdeck/config.toml` or `~/.config/trackdeck/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TRACKDECK__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub stream: StreamSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume (0-100) applied to the first track played.
    pub initial_volume: u8,
    /// How often playback position is polled and the display refreshed (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 80,
            tick_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Give up connecting to a stream after this many seconds.
    pub connect_timeout_secs: u64,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Volume change per `+` / `-` key press.
    pub volume_step: u8,
    /// Seek distance per `H` / `L` key press, as a percentage of the track.
    pub seek_step_percent: u8,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            volume_step: 5,
            seek_step_percent: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Grouping used for the playlist tree on startup.
    pub grouping: GroupingSetting,
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            grouping: GroupingSetting::Flat,
            header_text: " ~ local files & radio streams ~ ".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingSetting {
    #[serde(alias = "all", alias = "all-songs")]
    Flat,
    #[serde(alias = "artist-album", alias = "by-artist-and-album")]
    ArtistAlbum,
    #[serde(alias = "by-album")]
    Album,
    #[serde(alias = "by-artist")]
    Artist,
}

impl From<GroupingSetting> for GroupingMode {
    fn from(value: GroupingSetting) -> Self {
        match value {
            GroupingSetting::Flat => GroupingMode::Flat,
            GroupingSetting::ArtistAlbum => GroupingMode::ByArtistAndAlbum,
            GroupingSetting::Album => GroupingMode::ByAlbum,
            GroupingSetting::Artist => GroupingMode::ByArtist,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio when walking directories (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Defaults to the XDG state dir.
    pub directory: Option<PathBuf>,
}
