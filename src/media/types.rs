use std::time::Duration;

use crate::track::{TrackId, TrackRecord};

/// Transport actions a media surface can trigger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MediaAction {
    Play,
    Pause,
    Previous,
    Next,
    SeekBackward,
    SeekForward,
}

impl MediaAction {
    pub const COUNT: usize = 6;

    pub const ALL: [MediaAction; Self::COUNT] = [
        MediaAction::Play,
        MediaAction::Pause,
        MediaAction::Previous,
        MediaAction::Next,
        MediaAction::SeekBackward,
        MediaAction::SeekForward,
    ];

    /// Stable slot for per-action tables.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Playback status mirrored to the surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlaybackStatus::Stopped => "Stopped",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub src: String,
    pub sizes: String,
    pub mime: String,
}

/// Surface-side description of the active track.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaMetadata {
    pub track_id: TrackId,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub artwork: Vec<Artwork>,
    pub length: Option<Duration>,
}

/// Fill-ins used when a record lacks album or artwork data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataDefaults {
    pub fallback_album: String,
    pub placeholder_artwork: String,
    pub artwork_sizes: String,
    pub artwork_type: String,
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            fallback_album: "AutoMix".to_string(),
            placeholder_artwork: "assets/beatbox-logo.svg".to_string(),
            artwork_sizes: "500x500".to_string(),
            artwork_type: "image/png".to_string(),
        }
    }
}

impl MediaMetadata {
    pub fn for_track(track: &TrackRecord, defaults: &MetadataDefaults) -> Self {
        let album = match track.album.as_deref() {
            Some(a) if !a.trim().is_empty() => a.to_string(),
            _ => defaults.fallback_album.clone(),
        };
        Self {
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album,
            artwork: vec![Artwork {
                src: track.artwork_url(&defaults.placeholder_artwork).to_string(),
                sizes: defaults.artwork_sizes.clone(),
                mime: defaults.artwork_type.clone(),
            }],
            length: track.duration,
        }
    }
}

/// Callback installed on a surface. Invoked from whatever thread the host
/// integration runs on.
pub type ActionHandler = Box<dyn Fn() + Send>;

/// The host's "now playing" integration.
pub trait MediaControls {
    fn set_metadata(&mut self, metadata: Option<MediaMetadata>);

    /// Install or (with `None`) clear the handler for `action`.
    fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>);

    fn set_playback_status(&mut self, status: PlaybackStatus);

    fn clear_action_handlers(&mut self) {
        for action in MediaAction::ALL {
            self.set_action_handler(action, None);
        }
    }
}

impl<T: MediaControls + ?Sized> MediaControls for Box<T> {
    fn set_metadata(&mut self, metadata: Option<MediaMetadata>) {
        (**self).set_metadata(metadata);
    }

    fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>) {
        (**self).set_action_handler(action, handler);
    }

    fn set_playback_status(&mut self, status: PlaybackStatus) {
        (**self).set_playback_status(status);
    }

    fn clear_action_handlers(&mut self) {
        (**self).clear_action_handlers();
    }
}

/// Surface used when the host has no media-control capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMediaControls;

impl MediaControls for NoMediaControls {
    fn set_metadata(&mut self, _metadata: Option<MediaMetadata>) {}

    fn set_action_handler(&mut self, _action: MediaAction, _handler: Option<ActionHandler>) {}

    fn set_playback_status(&mut self, _status: PlaybackStatus) {}
}
