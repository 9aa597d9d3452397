//! MPRIS media-control surface on the D-Bus session bus.
//!
//! `MprisControls` is what the session holds; it only stores metadata,
//! status and handlers in shared state. A background thread owns the bus
//! connection, serves that state through the MPRIS interfaces and emits
//! `PropertiesChanged` whenever the session touches it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use tracing::{debug, info, warn};
use zbus::object_server::InterfaceRef;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::media::{ActionHandler, MediaAction, MediaControls, MediaMetadata, PlaybackStatus};

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const NOTIFY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Default)]
struct SharedState {
    status: PlaybackStatus,
    metadata: Option<MediaMetadata>,
    handlers: [Option<ActionHandler>; MediaAction::COUNT],
}

impl SharedState {
    fn invoke(&self, action: MediaAction) {
        match &self.handlers[action.index()] {
            Some(handler) => handler(),
            None => debug!(?action, "MPRIS: no handler installed"),
        }
    }
}

/// The session-side half of the MPRIS surface.
pub struct MprisControls {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisControls {
    fn changed(&self) {
        let _ = self.notify.send(());
    }
}

impl MediaControls for MprisControls {
    fn set_metadata(&mut self, metadata: Option<MediaMetadata>) {
        if let Ok(mut s) = self.state.lock() {
            s.metadata = metadata;
        }
        self.changed();
    }

    fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>) {
        if let Ok(mut s) = self.state.lock() {
            s.handlers[action.index()] = handler;
        }
    }

    fn set_playback_status(&mut self, status: PlaybackStatus) {
        let changed = match self.state.lock() {
            Ok(mut s) if s.status != status => {
                s.status = status;
                true
            }
            _ => false,
        };
        if changed {
            self.changed();
        }
    }
}

/// Object path for a track id; MPRIS only allows `[A-Za-z0-9_]` segments.
fn track_object_path(id: &str) -> Option<ObjectPath<'static>> {
    let mut segment: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if segment.is_empty() {
        segment.push('_');
    }
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{segment}")).ok()
}

fn owned<'a>(value: impl Into<Value<'a>>) -> Option<OwnedValue> {
    OwnedValue::try_from(value.into()).ok()
}

struct RootIface {
    identity: String,
    quit: Arc<AtomicBool>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        &self.identity
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    state: Arc<Mutex<SharedState>>,
}

impl PlayerIface {
    fn invoke(&self, action: MediaAction) {
        if let Ok(s) = self.state.lock() {
            s.invoke(action);
        }
    }

    fn status(&self) -> PlaybackStatus {
        self.state.lock().map(|s| s.status).unwrap_or_default()
    }
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        self.invoke(MediaAction::Next);
    }

    fn previous(&self) {
        self.invoke(MediaAction::Previous);
    }

    fn play(&self) {
        self.invoke(MediaAction::Play);
    }

    fn pause(&self) {
        self.invoke(MediaAction::Pause);
    }

    fn play_pause(&self) {
        match self.status() {
            PlaybackStatus::Playing => self.invoke(MediaAction::Pause),
            PlaybackStatus::Paused | PlaybackStatus::Stopped => self.invoke(MediaAction::Play),
        }
    }

    fn stop(&self) {
        self.invoke(MediaAction::Pause);
    }

    /// Only the direction of `offset` is used; the step is the session's.
    fn seek(&self, offset: i64) {
        if offset > 0 {
            self.invoke(MediaAction::SeekForward);
        } else if offset < 0 {
            self.invoke(MediaAction::SeekBackward);
        }
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        self.status().as_str()
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };
        let Some(meta) = s.metadata.as_ref() else {
            return map;
        };

        let mut put = |key: &str, value: Option<OwnedValue>| {
            if let Some(v) = value {
                map.insert(key.to_string(), v);
            }
        };
        put(
            "mpris:trackid",
            track_object_path(meta.track_id.as_str()).and_then(|p| owned(p)),
        );
        put("xesam:title", owned(meta.title.clone()));
        if !meta.artist.is_empty() {
            put("xesam:artist", owned(vec![meta.artist.clone()]));
        }
        put("xesam:album", owned(meta.album.clone()));
        if let Some(art) = meta.artwork.first() {
            put("mpris:artUrl", owned(art.src.clone()));
        }
        if let Some(length) = meta.length {
            put("mpris:length", owned(length.as_micros() as i64));
        }
        map
    }
}

/// Start the MPRIS service for `identity`. The returned surface works even
/// when the bus is unreachable; it just has no listener.
pub fn spawn_mpris(identity: String, quit: Arc<AtomicBool>) -> MprisControls {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            if let Err(e) = serve(identity, quit, state_for_thread, notify_rx).await {
                warn!("MPRIS unavailable: {e}");
            }
        });
    });

    MprisControls { state, notify }
}

async fn serve(
    identity: String,
    quit: Arc<AtomicBool>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<()>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    let bus_name = format!("org.mpris.MediaPlayer2.{identity}");
    connection.request_name(bus_name.as_str()).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { identity, quit })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { state })
        .await?;
    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;
    info!(%bus_name, "MPRIS service registered");

    loop {
        Timer::after(NOTIFY_INTERVAL).await;
        let mut changed = false;
        loop {
            match notify.try_recv() {
                Ok(()) => changed = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if !changed {
            continue;
        }
        if let Err(e) = emit_changed(&player).await {
            debug!("MPRIS: failed to emit PropertiesChanged: {e}");
        }
    }
}

async fn emit_changed(player: &InterfaceRef<PlayerIface>) -> zbus::Result<()> {
    let emitter = player.signal_emitter();
    let iface = player.get().await;
    iface.playback_status_changed(emitter).await?;
    iface.metadata_changed(emitter).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
