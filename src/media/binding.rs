use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::debug;

use crate::track::TrackId;

use super::types::{ActionHandler, MediaAction, MediaControls, MediaMetadata, PlaybackStatus};

/// Identifies one registration: the active track plus a version bumped on
/// every re-registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub track: TrackId,
    pub version: u64,
}

/// What an installed handler sends when the surface invokes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCommand {
    pub key: BindingKey,
    pub action: MediaAction,
}

/// Owns a media surface and keeps exactly one registration alive on it.
///
/// Handlers never touch session state directly. They send a `MediaCommand`
/// tagged with the key they were installed under, and `poll` drops any
/// command whose key is no longer current.
pub struct MediaBinding<M: MediaControls> {
    surface: M,
    tx: Sender<MediaCommand>,
    rx: Receiver<MediaCommand>,
    current: Option<BindingKey>,
    version: u64,
}

impl<M: MediaControls> MediaBinding<M> {
    pub fn new(surface: M) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            surface,
            tx,
            rx,
            current: None,
            version: 0,
        }
    }

    /// Re-register metadata and handlers for the active track, or release the
    /// surface when there is none.
    pub fn reconcile(&mut self, metadata: Option<MediaMetadata>) -> Option<&BindingKey> {
        let Some(metadata) = metadata else {
            self.release();
            return None;
        };

        self.version += 1;
        let key = BindingKey {
            track: metadata.track_id.clone(),
            version: self.version,
        };
        // Invalidate before touching the surface so nothing queued under the
        // previous key survives the swap.
        self.current = None;

        let handlers = MediaAction::ALL.map(|action| (action, self.handler_for(&key, action)));
        let mut registration = Registration::begin(&mut self.surface);
        registration.set_metadata(metadata);
        for (action, handler) in handlers {
            registration.install(action, handler);
        }
        registration.commit();

        debug!(track = %key.track, version = key.version, "media controls registered");
        self.current = Some(key);
        self.current.as_ref()
    }

    pub fn set_status(&mut self, status: PlaybackStatus) {
        self.surface.set_playback_status(status);
    }

    /// Next command issued under the current registration. Stale commands are
    /// drained and dropped.
    pub fn poll(&mut self) -> Option<MediaAction> {
        loop {
            let cmd = match self.rx.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            };
            if self.current.as_ref() == Some(&cmd.key) {
                return Some(cmd.action);
            }
            debug!(
                track = %cmd.key.track,
                version = cmd.key.version,
                action = ?cmd.action,
                "discarding stale media command"
            );
        }
    }

    /// Clear every handler and the metadata.
    pub fn release(&mut self) {
        self.current = None;
        self.surface.clear_action_handlers();
        self.surface.set_metadata(None);
        self.surface.set_playback_status(PlaybackStatus::Stopped);
    }

    fn handler_for(&self, key: &BindingKey, action: MediaAction) -> ActionHandler {
        let tx = self.tx.clone();
        let key = key.clone();
        Box::new(move || {
            let _ = tx.send(MediaCommand {
                key: key.clone(),
                action,
            });
        })
    }
}

impl<M: MediaControls> Drop for MediaBinding<M> {
    fn drop(&mut self) {
        if self.current.is_some() {
            self.release();
        }
    }
}

/// Scoped registration on a surface: handlers are cleared on entry, and
/// cleared again on drop unless the registration was committed.
pub struct Registration<'a, M: MediaControls + ?Sized> {
    surface: &'a mut M,
    committed: bool,
}

impl<'a, M: MediaControls + ?Sized> Registration<'a, M> {
    pub fn begin(surface: &'a mut M) -> Self {
        surface.clear_action_handlers();
        Self {
            surface,
            committed: false,
        }
    }

    pub fn set_metadata(&mut self, metadata: MediaMetadata) {
        self.surface.set_metadata(Some(metadata));
    }

    pub fn install(&mut self, action: MediaAction, handler: ActionHandler) {
        self.surface.set_action_handler(action, Some(handler));
    }

    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<M: MediaControls + ?Sized> Drop for Registration<'_, M> {
    fn drop(&mut self) {
        if !self.committed {
            self.surface.clear_action_handlers();
        }
    }
}
