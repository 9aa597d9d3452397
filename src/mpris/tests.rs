use super::*;
use crate::media::{Artwork, MediaBinding};
use crate::track::TrackId;
use std::sync::mpsc;
use std::time::Duration;

fn controls() -> (MprisControls, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();
    let controls = MprisControls {
        state: state.clone(),
        notify,
    };
    (controls, state, notify_rx)
}

fn make_metadata() -> MediaMetadata {
    MediaMetadata {
        track_id: TrackId::from("a1-b2"),
        title: "Test Title".to_string(),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        artwork: vec![Artwork {
            src: "https://img/500".to_string(),
            sizes: "500x500".to_string(),
            mime: "image/png".to_string(),
        }],
        length: Some(Duration::from_micros(1_234_567)),
    }
}

#[test]
fn set_metadata_sets_and_clears_shared_state_and_notifies() {
    let (mut controls, state, notify_rx) = controls();

    controls.set_metadata(Some(make_metadata()));
    assert_eq!(
        state.lock().unwrap().metadata.as_ref().map(|m| m.title.as_str()),
        Some("Test Title")
    );
    assert!(notify_rx.try_recv().is_ok());

    controls.set_metadata(None);
    assert!(state.lock().unwrap().metadata.is_none());
    assert!(notify_rx.try_recv().is_ok());
}

#[test]
fn unchanged_status_does_not_notify() {
    let (mut controls, _state, notify_rx) = controls();
    controls.set_playback_status(PlaybackStatus::Stopped);
    assert!(notify_rx.try_recv().is_err());
    controls.set_playback_status(PlaybackStatus::Playing);
    assert!(notify_rx.try_recv().is_ok());
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let (mut controls, state, _rx) = controls();
    let iface = PlayerIface { state };

    assert_eq!(iface.playback_status(), "Stopped");
    controls.set_playback_status(PlaybackStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    controls.set_playback_status(PlaybackStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (mut controls, state, _rx) = controls();
    let iface = PlayerIface { state };
    assert!(iface.metadata().is_empty());

    controls.set_metadata(Some(make_metadata()));
    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn track_object_path_sanitizes_ids() {
    assert_eq!(
        track_object_path("a1-b2").unwrap().as_str(),
        "/org/mpris/MediaPlayer2/track/a1_b2"
    );
    assert_eq!(
        track_object_path("").unwrap().as_str(),
        "/org/mpris/MediaPlayer2/track/_"
    );
}

#[test]
fn player_methods_route_through_installed_handlers() {
    let (controls, state, _rx) = controls();
    let iface = PlayerIface {
        state: state.clone(),
    };
    let mut binding = MediaBinding::new(controls);
    binding.reconcile(Some(make_metadata()));

    iface.next();
    iface.seek(-5_000_000);
    iface.seek(5_000_000);
    iface.seek(0);
    iface.stop();
    assert_eq!(binding.poll(), Some(MediaAction::Next));
    assert_eq!(binding.poll(), Some(MediaAction::SeekBackward));
    assert_eq!(binding.poll(), Some(MediaAction::SeekForward));
    assert_eq!(binding.poll(), Some(MediaAction::Pause));
    assert_eq!(binding.poll(), None);

    binding.set_status(PlaybackStatus::Playing);
    iface.play_pause();
    binding.set_status(PlaybackStatus::Paused);
    iface.play_pause();
    assert_eq!(binding.poll(), Some(MediaAction::Pause));
    assert_eq!(binding.poll(), Some(MediaAction::Play));

    drop(binding);
    assert!(state.lock().unwrap().handlers.iter().all(Option::is_none));
    iface.next();
}

#[test]
fn root_quit_raises_the_quit_flag() {
    let quit = Arc::new(AtomicBool::new(false));
    let root = RootIface {
        identity: "beatbox".to_string(),
        quit: quit.clone(),
    };
    assert_eq!(root.identity(), "beatbox");
    root.quit();
    assert!(quit.load(Ordering::SeqCst));
}
