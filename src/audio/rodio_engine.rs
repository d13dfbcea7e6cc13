//! `rodio` implementation of the playback engine.
//!
//! Every handle gets its own `Sink` on the shared output mixer. Sinks are
//! created paused with the decoded source already queued.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::prelude::AudioFile;
use reqwest::blocking::Client;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::config::StreamSettings;
use crate::library::TrackRef;

use super::engine::{EngineHandle, PlaybackEngine};
use super::network::{self, NetworkSource};
use super::types::{EngineError, Volume};

pub struct RodioEngine {
    stream: OutputStream,
    client: Client,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn open_default(settings: &StreamSettings) -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped, which would
        // scribble over the terminal UI.
        stream.log_on_drop(false);

        let client = network::client(settings)?;
        Ok(Self { stream, client })
    }

    fn open_local(&self, path: &Path) -> Result<RodioHandle, EngineError> {
        let file = File::open(path).map_err(|source| EngineError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let byte_len = file.metadata().map(|m| m.len()).ok();

        let mut builder = Decoder::builder()
            .with_data(BufReader::new(file))
            .with_seekable(true);
        if let Some(len) = byte_len {
            builder = builder.with_byte_len(len);
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            builder = builder.with_hint(ext);
        }
        let source = builder.build().map_err(|e| EngineError::Decode {
            location: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let duration = source
            .total_duration()
            .or_else(|| tagged_duration(path))
            .filter(|d| !d.is_zero());
        debug!(path = %path.display(), ?duration, "opened local track");

        Ok(self.paused_sink(source, duration))
    }

    fn open_stream(&self, url: &str) -> Result<RodioHandle, EngineError> {
        let body = NetworkSource::connect(&self.client, url)?;
        let source = Decoder::builder()
            .with_data(body)
            .with_seekable(false)
            .build()
            .map_err(|e| EngineError::Decode {
                location: url.to_string(),
                reason: e.to_string(),
            })?;
        debug!(url, "opened stream");

        Ok(self.paused_sink(source, None))
    }

    fn paused_sink(
        &self,
        source: impl Source + Send + 'static,
        duration: Option<Duration>,
    ) -> RodioHandle {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(source);
        RodioHandle { sink, duration }
    }
}

impl PlaybackEngine for RodioEngine {
    type Handle = RodioHandle;

    fn open(&mut self, track: &TrackRef) -> Result<RodioHandle, EngineError> {
        match track {
            TrackRef::Local(path) => self.open_local(path),
            TrackRef::Stream(url) => self.open_stream(url),
        }
    }

    fn check(&mut self, track: &TrackRef) -> Result<(), EngineError> {
        match track {
            TrackRef::Local(path) => {
                File::open(path).map_err(|source| EngineError::Open {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(())
            }
            TrackRef::Stream(url) => network::check(&self.client, url),
        }
    }
}

/// Fall back to the container's own length when the decoder cannot tell.
fn tagged_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}

pub struct RodioHandle {
    sink: Sink,
    duration: Option<Duration>,
}

impl EngineHandle for RodioHandle {
    fn play(&mut self) {
        self.sink.play();
    }

    fn stop(&mut self) {
        self.sink.stop();
    }

    fn set_volume(&mut self, volume: Volume) {
        self.sink.set_volume(volume.gain());
    }

    fn elapsed(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_position(&mut self, position: Duration) -> Result<(), EngineError> {
        self.sink
            .try_seek(position)
            .map_err(|e| EngineError::Seek(e.to_string()))
    }
}
