use super::*;
use crate::test_support::{FakeSurface, track};
use crate::track::{ArtworkCandidate, TrackId};

fn metadata_for(id: &str) -> MediaMetadata {
    MediaMetadata::for_track(&track(id), &MetadataDefaults::default())
}

#[test]
fn metadata_falls_back_to_automix_album_and_placeholder_artwork() {
    let defaults = MetadataDefaults::default();
    let meta = MediaMetadata::for_track(&track("a"), &defaults);

    assert_eq!(meta.title, "Title a");
    assert_eq!(meta.artist, "Artist a");
    assert_eq!(meta.album, "AutoMix");
    assert_eq!(
        meta.artwork,
        vec![Artwork {
            src: defaults.placeholder_artwork.clone(),
            sizes: "500x500".to_string(),
            mime: "image/png".to_string(),
        }]
    );
}

#[test]
fn metadata_uses_album_and_best_artwork_when_present() {
    let mut t = (*track("a")).clone();
    t.album = Some("Greatest".to_string());
    t.artwork = vec![ArtworkCandidate {
        tier: Some(500),
        url: "https://img/500".to_string(),
    }];
    let meta = MediaMetadata::for_track(&t, &MetadataDefaults::default());
    assert_eq!(meta.album, "Greatest");
    assert_eq!(meta.artwork.len(), 1);
    assert_eq!(meta.artwork[0].src, "https://img/500");
}

#[test]
fn reconcile_clears_before_installing_every_action() {
    let surface = FakeSurface::default();
    let mut binding = MediaBinding::new(surface.clone());

    let key = binding.reconcile(Some(metadata_for("a"))).cloned().unwrap();
    assert_eq!(key.track, TrackId::from("a"));
    assert_eq!(surface.installed(), MediaAction::COUNT);
    assert_eq!(surface.title().as_deref(), Some("Title a"));
    {
        let state = surface.state.lock().unwrap();
        assert_eq!(state.clears, MediaAction::COUNT);
        assert_eq!(state.installs, MediaAction::COUNT);
    }

    binding.reconcile(Some(metadata_for("b")));
    let state = surface.state.lock().unwrap();
    assert_eq!(state.clears, 2 * MediaAction::COUNT);
    assert_eq!(state.installs, 2 * MediaAction::COUNT);
}

#[test]
fn current_handlers_reach_poll() {
    let surface = FakeSurface::default();
    let mut binding = MediaBinding::new(surface.clone());
    binding.reconcile(Some(metadata_for("a")));

    assert!(surface.press(MediaAction::Next));
    assert!(surface.press(MediaAction::SeekBackward));
    assert_eq!(binding.poll(), Some(MediaAction::Next));
    assert_eq!(binding.poll(), Some(MediaAction::SeekBackward));
    assert_eq!(binding.poll(), None);
}

#[test]
fn handlers_from_an_older_registration_are_discarded() {
    let surface = FakeSurface::default();
    let mut binding = MediaBinding::new(surface.clone());
    binding.reconcile(Some(metadata_for("a")));
    let stale_next = surface.take_handler(MediaAction::Next).unwrap();

    binding.reconcile(Some(metadata_for("b")));
    stale_next();
    assert_eq!(binding.poll(), None);

    assert!(surface.press(MediaAction::Pause));
    assert_eq!(binding.poll(), Some(MediaAction::Pause));
}

#[test]
fn re_registering_the_same_track_still_bumps_the_version() {
    let surface = FakeSurface::default();
    let mut binding = MediaBinding::new(surface.clone());
    let first = binding.reconcile(Some(metadata_for("a"))).cloned().unwrap();
    let stale = surface.take_handler(MediaAction::Play).unwrap();

    let second = binding.reconcile(Some(metadata_for("a"))).cloned().unwrap();
    assert_eq!(first.track, second.track);
    assert!(second.version > first.version);

    stale();
    assert_eq!(binding.poll(), None);
}

#[test]
fn reconcile_without_metadata_releases_the_surface() {
    let surface = FakeSurface::default();
    let mut binding = MediaBinding::new(surface.clone());
    binding.reconcile(Some(metadata_for("a")));
    let stale = surface.take_handler(MediaAction::Play).unwrap();

    assert!(binding.reconcile(None).is_none());
    assert_eq!(surface.installed(), 0);
    assert_eq!(surface.title(), None);
    assert_eq!(
        surface.state.lock().unwrap().status,
        Some(PlaybackStatus::Stopped)
    );
    stale();
    assert_eq!(binding.poll(), None);
}

#[test]
fn dropping_the_binding_clears_all_handlers() {
    let surface = FakeSurface::default();
    {
        let mut binding = MediaBinding::new(surface.clone());
        binding.reconcile(Some(metadata_for("a")));
        assert_eq!(surface.installed(), MediaAction::COUNT);
    }
    assert_eq!(surface.installed(), 0);
    assert_eq!(surface.title(), None);
}

#[test]
fn uncommitted_registration_clears_on_drop() {
    let mut surface = FakeSurface::default();
    let probe = surface.clone();
    {
        let mut registration = Registration::begin(&mut surface);
        registration.install(MediaAction::Play, Box::new(|| {}));
        assert_eq!(probe.installed(), 1);
    }
    assert_eq!(probe.installed(), 0);
}

#[test]
fn boxed_and_absent_surfaces_are_accepted() {
    let mut boxed: Box<dyn MediaControls> = Box::new(NoMediaControls);
    boxed.set_metadata(Some(metadata_for("a")));
    boxed.set_playback_status(PlaybackStatus::Playing);

    let mut binding = MediaBinding::new(boxed);
    assert!(binding.reconcile(Some(metadata_for("a"))).is_some());
    assert_eq!(binding.poll(), None);
}

#[test]
fn action_slots_are_distinct() {
    let mut seen = [false; MediaAction::COUNT];
    for action in MediaAction::ALL {
        assert!(!seen[action.index()]);
        seen[action.index()] = true;
    }
    assert_eq!(PlaybackStatus::Paused.as_str(), "Paused");
}
