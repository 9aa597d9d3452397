//! Shared fixtures for unit tests: track builders and in-memory adapters.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::{AudioOutput, DeviceEvent, Generation, TaggedEvent};
use crate::error::PlaybackError;
use crate::media::{ActionHandler, MediaAction, MediaControls, MediaMetadata, PlaybackStatus};
use crate::queue::SharedTrack;
use crate::track::{SourceCandidate, TrackId, TrackRecord};

/// A playable track whose source url is derived from its id.
pub fn track(id: &str) -> SharedTrack {
    Arc::new(TrackRecord {
        id: TrackId::from(id),
        title: format!("Title {id}"),
        artist: format!("Artist {id}"),
        album: None,
        duration: Some(Duration::from_secs(180)),
        sources: vec![SourceCandidate {
            tier: Some(320),
            url: format!("https://cdn.example/{id}.mp4"),
        }],
        artwork: Vec::new(),
    })
}

/// A track with no audio source.
pub fn inert(id: &str) -> SharedTrack {
    let mut t = (*track(id)).clone();
    t.sources.clear();
    Arc::new(t)
}

pub fn tracks(ids: &[&str]) -> Vec<SharedTrack> {
    ids.iter().map(|id| track(id)).collect()
}

/// Device calls recorded by `FakeOutput`.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    Load(String, Generation),
    SetPlaying(bool),
    SetVolume(f32),
    Seek(Duration, Generation),
    Shutdown,
}

/// In-memory audio output. Events are injected by the test through
/// `FakeOutputHandle`.
#[derive(Default)]
pub struct FakeOutput {
    pub calls: Vec<DeviceCall>,
    events: Arc<Mutex<VecDeque<TaggedEvent>>>,
}

#[derive(Clone)]
pub struct FakeOutputHandle {
    events: Arc<Mutex<VecDeque<TaggedEvent>>>,
}

impl FakeOutputHandle {
    pub fn emit(&self, generation: Generation, event: DeviceEvent) {
        self.events
            .lock()
            .unwrap()
            .push_back(TaggedEvent { generation, event });
    }
}

impl FakeOutput {
    pub fn new() -> (Self, FakeOutputHandle) {
        let out = Self::default();
        let handle = FakeOutputHandle {
            events: out.events.clone(),
        };
        (out, handle)
    }

    pub fn loads(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Load(url, _) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Generation of the latest load or seek, the one live events carry.
    pub fn last_generation(&self) -> Option<Generation> {
        self.calls.iter().rev().find_map(|c| match c {
            DeviceCall::Load(_, g) | DeviceCall::Seek(_, g) => Some(*g),
            _ => None,
        })
    }
}

impl AudioOutput for FakeOutput {
    fn load(&mut self, url: &str, generation: Generation) -> Result<(), PlaybackError> {
        if url.trim().is_empty() {
            return Err(PlaybackError::NoPlayableSource(None));
        }
        self.calls.push(DeviceCall::Load(url.to_string(), generation));
        Ok(())
    }

    fn set_playing(&mut self, playing: bool) {
        self.calls.push(DeviceCall::SetPlaying(playing));
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(DeviceCall::SetVolume(volume));
    }

    fn set_seek(&mut self, position: Duration, generation: Generation) {
        self.calls.push(DeviceCall::Seek(position, generation));
    }

    fn poll_event(&mut self) -> Option<TaggedEvent> {
        self.events.lock().unwrap().pop_front()
    }

    fn shutdown(&mut self, _fade_out: Duration) {
        self.calls.push(DeviceCall::Shutdown);
    }
}

/// What a fake media surface currently holds, shared with the test.
#[derive(Default)]
pub struct SurfaceState {
    pub metadata: Option<MediaMetadata>,
    pub status: Option<PlaybackStatus>,
    pub handlers: [Option<ActionHandler>; MediaAction::COUNT],
    pub clears: usize,
    pub installs: usize,
}

#[derive(Clone, Default)]
pub struct FakeSurface {
    pub state: Arc<Mutex<SurfaceState>>,
}

impl FakeSurface {
    /// Invoke the handler currently installed for `action`, like a press of
    /// a hardware key would.
    pub fn press(&self, action: MediaAction) -> bool {
        let state = self.state.lock().unwrap();
        match &state.handlers[action.index()] {
            Some(handler) => {
                handler();
                true
            }
            None => false,
        }
    }

    /// Remove the installed handler for `action`, keeping it callable after a
    /// newer registration replaced it.
    pub fn take_handler(&self, action: MediaAction) -> Option<ActionHandler> {
        self.state.lock().unwrap().handlers[action.index()].take()
    }

    pub fn title(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .metadata
            .as_ref()
            .map(|m| m.title.clone())
    }

    pub fn installed(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .handlers
            .iter()
            .filter(|h| h.is_some())
            .count()
    }
}

impl MediaControls for FakeSurface {
    fn set_metadata(&mut self, metadata: Option<MediaMetadata>) {
        self.state.lock().unwrap().metadata = metadata;
    }

    fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>) {
        let mut state = self.state.lock().unwrap();
        if handler.is_some() {
            state.installs += 1;
        } else {
            state.clears += 1;
        }
        state.handlers[action.index()] = handler;
    }

    fn set_playback_status(&mut self, status: PlaybackStatus) {
        self.state.lock().unwrap().status = Some(status);
    }
}
