//! The player controller.
//!
//! All playlist and session mutation happens through `Controller`, on the
//! thread that handles input and ticks. The periodic [`Controller::tick`]
//! only refreshes display state.

use std::path::PathBuf;

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::audio::{PlaybackEngine, PlaybackSession, SessionState, Volume};
use crate::library::{self, PlaybackMode, PlaylistEntry, TrackMetadata, TrackRef};
use crate::view::{GroupingMode, ViewTree, build_view};

use super::display::{NowPlaying, ProgressDisplay, UNKNOWN_REMAINING, format_time};
use super::error::ControllerError;

pub const NO_FILE_SELECTED: &str = "No file selected";

pub struct Controller<E: PlaybackEngine> {
    playlist: Vec<PlaylistEntry>,
    current: Option<usize>,
    mode: PlaybackMode,
    grouping: GroupingMode,
    view: ViewTree,
    session: PlaybackSession<E>,
    progress: ProgressDisplay,
    now_playing: NowPlaying,
    status: String,
}

impl<E: PlaybackEngine> Controller<E> {
    /// Create an empty controller around `engine`.
    pub fn new(engine: E, volume: Volume, grouping: GroupingMode) -> Self {
        Self {
            playlist: Vec::new(),
            current: None,
            mode: PlaybackMode::Local,
            grouping,
            view: ViewTree::default(),
            session: PlaybackSession::new(engine, volume),
            progress: ProgressDisplay::default(),
            now_playing: NowPlaying::default(),
            status: NO_FILE_SELECTED.to_string(),
        }
    }

    pub fn playlist(&self) -> &[PlaylistEntry] {
        &self.playlist
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_entry(&self) -> Option<&PlaylistEntry> {
        self.current.and_then(|i| self.playlist.get(i))
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn grouping(&self) -> GroupingMode {
        self.grouping
    }

    pub fn view(&self) -> &ViewTree {
        &self.view
    }

    pub fn progress(&self) -> &ProgressDisplay {
        &self.progress
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    pub fn volume(&self) -> Volume {
        self.session.volume()
    }

    /// Replace the playlist with local files. Does not start playback.
    pub fn load_local(&mut self, paths: Vec<PathBuf>) -> Result<(), ControllerError> {
        if paths.is_empty() {
            self.status = ControllerError::EmptySelection.to_string();
            return Err(ControllerError::EmptySelection);
        }

        self.playlist = paths
            .into_iter()
            .map(|path| {
                let track = TrackRef::Local(path);
                let metadata = library::extract(&track);
                PlaylistEntry { track, metadata }
            })
            .collect();
        self.mode = PlaybackMode::Local;
        info!(tracks = self.playlist.len(), "loaded local files");

        self.reset_to_first_entry();
        Ok(())
    }

    /// Replace the playlist with a single network stream, if it is reachable.
    ///
    /// The URL must be http(s) and the engine must be able to reach it. The
    /// check creates no handle and does not start playback. On failure nothing
    /// changes.
    pub fn connect_stream(&mut self, url: &str) -> Result<(), ControllerError> {
        let result = self.try_connect(url.trim());
        if let Err(e) = &result {
            warn!(url = url.trim(), error = %e, "stream connection failed");
            self.status = format!("Failed to connect to stream: {e}");
        }
        result
    }

    fn try_connect(&mut self, url: &str) -> Result<(), ControllerError> {
        if url.is_empty() {
            return Err(ControllerError::EmptyUrl);
        }
        validate_stream_url(url)?;

        let track = TrackRef::Stream(url.to_string());
        self.session.check_reachable(&track)?;

        self.playlist = vec![PlaylistEntry {
            track,
            metadata: TrackMetadata::for_stream(),
        }];
        self.mode = PlaybackMode::Stream;
        info!(url, "connected to stream");

        self.reset_to_first_entry();
        self.status = format!("Connected to: {url}");
        Ok(())
    }

    fn reset_to_first_entry(&mut self) {
        self.current = if self.playlist.is_empty() { None } else { Some(0) };
        self.rebuild_view();
        self.progress = ProgressDisplay::default();
        self.refresh_now_playing();
        self.status = self
            .current_entry()
            .map(|e| e.track.to_string())
            .unwrap_or_else(|| NO_FILE_SELECTED.to_string());
    }

    /// Make playlist entry `index` current and play it. Invalid indices are ignored.
    pub fn select(&mut self, index: usize) -> Result<(), ControllerError> {
        if index >= self.playlist.len() {
            debug!(index, "ignoring selection outside the playlist");
            return Ok(());
        }
        self.current = Some(index);
        self.start_current()
    }

    /// Select whatever the given view row refers to. Group rows are ignored.
    pub fn select_row(&mut self, row: usize) -> Result<(), ControllerError> {
        match self.view.rows().get(row).and_then(|r| r.index) {
            Some(index) => self.select(index),
            None => Ok(()),
        }
    }

    /// (Re)start the current track from the beginning.
    pub fn play(&mut self) -> Result<(), ControllerError> {
        if self.current.is_none() {
            return Ok(());
        }
        self.start_current()
    }

    pub fn stop(&mut self) {
        self.session.stop();
        self.progress = ProgressDisplay::default();
    }

    pub fn next(&mut self) -> Result<(), ControllerError> {
        if !self.can_next() {
            return Ok(());
        }
        self.current = self.current.map(|i| i + 1);
        self.start_current()
    }

    pub fn previous(&mut self) -> Result<(), ControllerError> {
        if !self.can_previous() {
            return Ok(());
        }
        self.current = self.current.map(|i| i - 1);
        self.start_current()
    }

    fn start_current(&mut self) -> Result<(), ControllerError> {
        let Some(track) = self.current_entry().map(|e| e.track.clone()) else {
            return Ok(());
        };

        self.progress = ProgressDisplay::default();
        self.refresh_now_playing();

        match self.session.start(track.clone()) {
            Ok(()) => {
                self.status = track.to_string();
                Ok(())
            }
            Err(e) => {
                self.status = format!("Could not play {track}: {e}");
                Err(e.into())
            }
        }
    }

    /// Seek to `fraction` of the current track. No-op when not seekable.
    pub fn seek(&mut self, fraction: f64) {
        if self.mode != PlaybackMode::Local {
            return;
        }
        if self.session.seek(fraction) {
            self.tick();
        }
    }

    /// Seek relative to the current position by `delta` (fraction of the track).
    pub fn seek_by(&mut self, delta: f64) {
        if self.mode != PlaybackMode::Local {
            return;
        }
        if let Some(now) = self.session.poll().progress() {
            self.seek(now + delta);
        }
    }

    pub fn set_volume(&mut self, volume: Volume) {
        self.session.set_volume(volume);
    }

    pub fn adjust_volume(&mut self, delta: i16) {
        let volume = self.session.volume().offset(delta);
        self.session.set_volume(volume);
    }

    pub fn set_grouping(&mut self, grouping: GroupingMode) {
        self.grouping = grouping;
        self.rebuild_view();
    }

    pub fn cycle_grouping(&mut self) {
        self.set_grouping(self.grouping.cycle());
    }

    fn rebuild_view(&mut self) {
        self.view = build_view(&self.playlist, self.grouping);
    }

    fn refresh_now_playing(&mut self) {
        self.now_playing = match self.current_entry() {
            Some(entry) => NowPlaying {
                metadata: Some(entry.metadata.clone()),
                art: library::extract_cover_art(&entry.track),
            },
            None => NowPlaying::default(),
        };
    }

    /// Poll the session and refresh the progress display.
    pub fn tick(&mut self) {
        if self.session.track().is_none() {
            self.progress = ProgressDisplay::default();
            return;
        }

        let reading = self.session.poll();
        match self.mode {
            PlaybackMode::Stream => {
                self.progress = ProgressDisplay {
                    elapsed: format_time(reading.elapsed),
                    remaining: UNKNOWN_REMAINING.to_string(),
                    ratio: 0.0,
                };
            }
            PlaybackMode::Local => {
                // Unknown length: leave the last display in place.
                if let (Some(remaining), Some(ratio)) = (reading.remaining, reading.progress()) {
                    self.progress = ProgressDisplay {
                        elapsed: format_time(reading.elapsed),
                        remaining: format!("-{}", format_time(remaining)),
                        ratio,
                    };
                }
            }
        }
    }

    pub fn can_play(&self) -> bool {
        self.current.is_some()
    }

    pub fn can_stop(&self) -> bool {
        self.session.is_playing()
    }

    pub fn can_next(&self) -> bool {
        self.mode == PlaybackMode::Local
            && self.current.is_some_and(|i| i + 1 < self.playlist.len())
    }

    pub fn can_previous(&self) -> bool {
        self.mode == PlaybackMode::Local && self.current.is_some_and(|i| i > 0)
    }

    pub fn can_seek(&self) -> bool {
        self.mode == PlaybackMode::Local
            && self.session.is_playing()
            && self.session.track().map(TrackRef::mode) == Some(PlaybackMode::Local)
            && self.session.poll().duration.is_some()
    }
}

fn validate_stream_url(url: &str) -> Result<(), ControllerError> {
    let invalid = |reason: String| ControllerError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}
