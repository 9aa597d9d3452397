//! Error types for the playback session.
//!
//! Everything here is recoverable: the session translates these into
//! transport changes plus an observable error slot instead of propagating
//! them out of the event loop.

use thiserror::Error;

use crate::track::TrackId;

/// Errors surfaced by session operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// The track (or raw url) resolves to no usable audio source.
    #[error(
        "no playable audio source for track {}",
        .0.as_ref().map_or("<unknown>", TrackId::as_str)
    )]
    NoPlayableSource(Option<TrackId>),

    /// A queue index mutation fell outside the queue bounds.
    #[error("queue index {index} is out of range (queue length {len})")]
    OutOfRange { index: usize, len: usize },

    /// The audio device failed while loading or rendering the current track.
    #[error("audio device error: {0}")]
    Device(#[from] DeviceError),
}

/// Failures reported by the audio output adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error("no audio output device: {0}")]
    Unavailable(String),

    #[error("failed to fetch source: {0}")]
    Fetch(String),

    #[error("failed to read source: {0}")]
    Io(String),

    #[error("failed to decode source: {0}")]
    Decode(String),
}

/// Errors raised while ingesting catalog documents.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog document contains no track list")]
    NoTrackList,

    #[error("track record is missing required field `{0}`")]
    MissingField(&'static str),
}
