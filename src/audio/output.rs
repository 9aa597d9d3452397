use std::time::Duration;

use crate::error::PlaybackError;

use super::types::{Generation, TaggedEvent};

/// Imperative control over one audio rendering primitive.
///
/// Calls are fire-and-forget; outcomes arrive later through `poll_event`,
/// tagged with the generation of the latest `load` or `set_seek`.
pub trait AudioOutput {
    /// Begin loading `url`. An empty url is refused up front.
    fn load(&mut self, url: &str, generation: Generation) -> Result<(), PlaybackError>;

    /// Idempotent.
    fn set_playing(&mut self, playing: bool);

    /// Applied immediately; never reloads.
    fn set_volume(&mut self, volume: f32);

    /// Restart the loaded source at `position`. Events produced after the
    /// seek carry `generation`, even when nothing is loaded yet.
    fn set_seek(&mut self, position: Duration, generation: Generation);

    fn poll_event(&mut self) -> Option<TaggedEvent>;

    /// Stop output, fading out over `fade_out`.
    fn shutdown(&mut self, fade_out: Duration) {
        let _ = fade_out;
        self.set_playing(false);
    }
}

/// Reject urls that can never be loaded.
pub(crate) fn require_url(url: &str) -> Result<&str, PlaybackError> {
    let url = url.trim();
    if url.is_empty() {
        Err(PlaybackError::NoPlayableSource(None))
    } else {
        Ok(url)
    }
}
