use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CatalogError, PlaybackError};

use super::raw::RawTrack;
use super::resolve::normalize;

/// Opaque track identity. Numeric upstream ids are kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One candidate audio URL. `tier` is the bitrate in kbps when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCandidate {
    pub tier: Option<u32>,
    pub url: String,
}

/// One candidate artwork URL. `tier` is the edge size in pixels when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkCandidate {
    pub tier: Option<u32>,
    pub url: String,
}

/// A normalized playable-item description.
///
/// `sources` and `artwork` are stored in resolution order: the first entry is
/// the one playback and display will use.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRecord {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub sources: Vec<SourceCandidate>,
    pub artwork: Vec<ArtworkCandidate>,
}

impl TrackRecord {
    /// Normalize one catalog JSON object into a `TrackRecord`.
    ///
    /// Only a missing id is fatal; every other field degrades to a default.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CatalogError> {
        let raw = RawTrack::deserialize(value)?;
        normalize(raw)
    }

    /// The audio URL playback should load.
    pub fn audio_url(&self) -> Result<&str, PlaybackError> {
        self.sources
            .first()
            .map(|s| s.url.as_str())
            .ok_or_else(|| PlaybackError::NoPlayableSource(Some(self.id.clone())))
    }

    /// A track with no resolvable audio URL is inert and is never made active.
    pub fn is_playable(&self) -> bool {
        !self.sources.is_empty()
    }

    /// The artwork URL to show, or `placeholder` when the record has none.
    pub fn artwork_url<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.artwork
            .first()
            .map(|a| a.url.as_str())
            .unwrap_or(placeholder)
    }

    /// "Artist - Title", or just the title when no artist is known.
    pub fn display(&self) -> String {
        if self.artist.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{} - {}", self.artist, self.title)
        }
    }
}
