use thiserror::Error;

use crate::audio::EngineError;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no files to open")]
    EmptySelection,
    #[error("please enter a stream URL")]
    EmptyUrl,
    #[error("{url} is not a valid stream URL: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
