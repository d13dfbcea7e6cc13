//! HTTP body reader for network streams.
//!
//! The response body is copied by a background thread into a bounded channel;
//! [`NetworkSource`] drains that channel as a forward-only reader the decoder
//! can consume. Dropping the source closes the channel, which ends the thread
//! on its next send.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use tracing::{debug, info, warn};

use crate::config::StreamSettings;

use super::types::EngineError;

const CHUNK_SIZE: usize = 16 * 1024;
const BUFFERED_CHUNKS: usize = 64;

type Chunk = io::Result<Vec<u8>>;

/// Build the blocking client used for stream requests.
///
/// Only the connect phase is bounded; the body of a live stream never ends.
pub fn client(settings: &StreamSettings) -> Result<Client, EngineError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .timeout(None::<Duration>)
        .build()
        .map_err(|e| EngineError::HttpClient(e.to_string()))
}

fn request(client: &Client, url: &str) -> Result<Response, EngineError> {
    client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| EngineError::Network {
            url: url.to_string(),
            reason: e.to_string(),
        })
}

/// Issue the request and drop the response once the status line is in.
pub fn check(client: &Client, url: &str) -> Result<(), EngineError> {
    let response = request(client, url)?;
    debug!(url, status = %response.status(), "stream reachable");
    Ok(())
}

pub struct NetworkSource {
    chunks: Mutex<Receiver<Chunk>>,
    current: Vec<u8>,
    offset: usize,
    position: u64,
    finished: bool,
}

impl NetworkSource {
    /// Issue the request and start pumping the body in the background.
    pub fn connect(client: &Client, url: &str) -> Result<Self, EngineError> {
        let response = request(client, url)?;
        info!(url, status = %response.status(), "connected to stream");

        let (tx, rx) = mpsc::sync_channel::<Chunk>(BUFFERED_CHUNKS);
        thread::Builder::new()
            .name("stream-fetch".to_string())
            .spawn(move || pump(response, tx))
            .map_err(|e| EngineError::Network {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self::from_receiver(rx))
    }

    pub(super) fn from_receiver(rx: Receiver<Chunk>) -> Self {
        Self {
            chunks: Mutex::new(rx),
            current: Vec::new(),
            offset: 0,
            position: 0,
            finished: false,
        }
    }
}

/// Copy `body` into `tx` chunk by chunk until EOF, an error, or the reader
/// side going away.
pub(super) fn pump(mut body: impl Read, tx: SyncSender<Chunk>) {
    loop {
        let mut buf = vec![0u8; CHUNK_SIZE];
        match body.read(&mut buf) {
            Ok(0) => {
                debug!("stream body ended");
                break;
            }
            Ok(n) => {
                buf.truncate(n);
                if tx.send(Ok(buf)).is_err() {
                    debug!("stream reader dropped, stopping fetch");
                    break;
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "stream read failed");
                // The reader may already be gone; nothing left to report to.
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}

impl Read for NetworkSource {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        while self.offset >= self.current.len() {
            if self.finished {
                return Ok(0);
            }
            let next = self
                .chunks
                .lock()
                .map_err(|_| io::Error::other("stream channel poisoned"))?
                .recv();
            match next {
                Ok(Ok(chunk)) => {
                    self.current = chunk;
                    self.offset = 0;
                }
                Ok(Err(e)) => {
                    self.finished = true;
                    return Err(e);
                }
                Err(_) => self.finished = true,
            }
        }

        let available = &self.current[self.offset..];
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.offset += n;
        self.position += n as u64;
        Ok(n)
    }
}

impl Seek for NetworkSource {
    /// Only position queries are supported; the body cannot be rewound.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match pos {
            SeekFrom::Current(0) => Ok(self.position),
            _ => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "network streams are not seekable",
            )),
        }
    }
}
