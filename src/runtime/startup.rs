use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::info;

use crate::audio::AudioPlayer;
use crate::config::Settings;
use crate::media::{MediaControls, NoMediaControls};
use crate::mpris::spawn_mpris;
use crate::session::{PlaybackSession, SessionOptions};

pub type Session = PlaybackSession<AudioPlayer, Box<dyn MediaControls>>;

/// Pick the media surface: MPRIS when enabled, otherwise a no-op. A quit
/// request from the surface raises `quit`.
fn media_surface(settings: &Settings, quit: Arc<AtomicBool>) -> Box<dyn MediaControls> {
    if settings.media.enabled {
        Box::new(spawn_mpris(settings.media.identity.clone(), quit))
    } else {
        info!("media controls disabled");
        Box::new(NoMediaControls)
    }
}

/// Build the playback session with its audio thread and media surface.
pub fn build_session(settings: &Settings, quit: Arc<AtomicBool>) -> Session {
    let audio = AudioPlayer::new(settings.audio.clone());
    let surface = media_surface(settings, quit);
    let mut session = PlaybackSession::new(audio, surface, SessionOptions::from(settings));
    session.set_end_of_queue_policy(settings.playback.end_of_queue.into());
    session
}
