use std::sync::Arc;
use std::time::Duration;

use crate::error::PlaybackError;
use crate::track::{TrackId, TrackRecord};

use super::transport::RepeatMode;

/// Track records are shared between screens and the queue, never edited in
/// place.
pub type SharedTrack = Arc<TrackRecord>;

/// An ordered sequence of tracks plus the active position.
///
/// `active` is `None` only for the empty queue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<SharedTrack>,
    active: Option<usize>,
}

/// Where `next` should go.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NextStep {
    /// Replay the active track from the start.
    Restart,
    MoveTo(usize),
    /// No playable track after the active one; the end-of-queue policy decides.
    EndOfQueue,
}

/// Where `previous` should go.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PreviousStep {
    Restart,
    MoveTo(usize),
    /// Already at the first playable track.
    Stay,
}

impl Queue {
    /// Activate `track` within `candidate`.
    ///
    /// If a track with the same id is already present, its first occurrence
    /// becomes active and `candidate` is reused unchanged. Otherwise `track`
    /// is appended and becomes active.
    pub fn resume_or_enqueue(track: SharedTrack, candidate: Vec<SharedTrack>) -> Self {
        let mut queue = Self {
            tracks: candidate,
            active: None,
        };
        queue.active = match queue.position_of(&track.id) {
            Some(index) => Some(index),
            None => {
                queue.tracks.push(track);
                Some(queue.tracks.len() - 1)
            }
        };
        queue
    }

    /// The same queue with `index` active, or `OutOfRange`.
    pub fn with_active(&self, index: usize) -> Result<Self, PlaybackError> {
        if index >= self.tracks.len() {
            return Err(PlaybackError::OutOfRange {
                index,
                len: self.tracks.len(),
            });
        }
        Ok(Self {
            tracks: self.tracks.clone(),
            active: Some(index),
        })
    }

    /// The same queue with `more` appended; the active position is kept.
    pub fn extended(&self, more: Vec<SharedTrack>) -> Self {
        let mut tracks = self.tracks.clone();
        tracks.extend(more);
        Self {
            tracks,
            active: self.active,
        }
    }

    pub fn tracks(&self) -> &[SharedTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&SharedTrack> {
        self.active.and_then(|i| self.tracks.get(i))
    }

    pub fn active_id(&self) -> Option<&TrackId> {
        self.active().map(|t| &t.id)
    }

    /// Position of the first track with `id`.
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    pub fn first_playable(&self) -> Option<usize> {
        self.tracks.iter().position(|t| t.is_playable())
    }

    pub fn first_playable_from(&self, start: usize) -> Option<usize> {
        self.tracks
            .iter()
            .enumerate()
            .skip(start)
            .find(|(_, t)| t.is_playable())
            .map(|(i, _)| i)
    }

    fn last_playable_before(&self, end: usize) -> Option<usize> {
        self.tracks[..end.min(self.tracks.len())]
            .iter()
            .rposition(|t| t.is_playable())
    }

    /// Decide what `next` does. Inert tracks are skipped. `None` when nothing
    /// is active.
    pub fn next_step(&self, repeat: RepeatMode) -> Option<NextStep> {
        let active = self.active?;
        if repeat == RepeatMode::LoopCurrent {
            return Some(NextStep::Restart);
        }
        Some(match self.first_playable_from(active + 1) {
            Some(i) => NextStep::MoveTo(i),
            None => NextStep::EndOfQueue,
        })
    }

    /// Decide what `previous` does: step back while the track has only just
    /// started, otherwise restart it.
    pub fn previous_step(&self, position: Duration, threshold: Duration) -> Option<PreviousStep> {
        let active = self.active?;
        if position >= threshold {
            return Some(PreviousStep::Restart);
        }
        Some(match self.last_playable_before(active) {
            Some(i) => PreviousStep::MoveTo(i),
            None => PreviousStep::Stay,
        })
    }
}
