use super::*;
use crate::error::PlaybackError;
use crate::test_support::{inert, track, tracks};
use crate::track::TrackId;
use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

const THRESHOLD: Duration = Duration::from_secs(3);

/// Queue over `list` with position `active` active.
fn queue(list: Vec<SharedTrack>, active: usize) -> Queue {
    Queue::resume_or_enqueue(list[active].clone(), list)
}

fn ids(q: &Queue) -> Vec<&str> {
    q.tracks().iter().map(|t| t.id.as_str()).collect()
}

#[test]
fn resume_or_enqueue_reuses_candidate_when_id_present() {
    let candidate = tracks(&["a", "b", "c"]);
    let q = Queue::resume_or_enqueue(track("b"), candidate);
    assert_eq!(ids(&q), vec!["a", "b", "c"]);
    assert_eq!(q.active_index(), Some(1));
}

#[test]
fn resume_or_enqueue_appends_when_id_absent() {
    let q = Queue::resume_or_enqueue(track("d"), tracks(&["a", "b"]));
    assert_eq!(ids(&q), vec!["a", "b", "d"]);
    assert_eq!(q.active_index(), Some(2));
}

#[test]
fn resume_or_enqueue_on_empty_candidate_yields_single_track() {
    let q = Queue::resume_or_enqueue(track("a"), Vec::new());
    assert_eq!(ids(&q), vec!["a"]);
    assert_eq!(q.active_index(), Some(0));
}

#[test]
fn resume_or_enqueue_picks_first_duplicate() {
    let q = Queue::resume_or_enqueue(track("b"), tracks(&["a", "b", "c", "b"]));
    assert_eq!(q.active_index(), Some(1));
    assert_eq!(q.len(), 4);
}

#[test]
fn with_active_round_trips_and_rejects_out_of_range() {
    let q = queue(tracks(&["a", "b", "c"]), 0);
    for i in 0..3 {
        assert_eq!(q.with_active(i).unwrap().active_index(), Some(i));
    }
    assert_eq!(
        q.with_active(3),
        Err(PlaybackError::OutOfRange { index: 3, len: 3 })
    );
    // The original is untouched.
    assert_eq!(q.active_index(), Some(0));
}

#[test]
fn empty_queue_has_nothing_to_navigate() {
    let q = Queue::default();
    assert_eq!(q.active(), None);
    assert_eq!(q.next_step(RepeatMode::Off), None);
    assert_eq!(q.previous_step(Duration::ZERO, THRESHOLD), None);
}

#[test]
fn next_step_advances_and_reports_end_of_queue() {
    let q = queue(tracks(&["a", "b"]), 0);
    assert_eq!(q.next_step(RepeatMode::Off), Some(NextStep::MoveTo(1)));

    let last = q.with_active(1).unwrap();
    assert_eq!(last.next_step(RepeatMode::Off), Some(NextStep::EndOfQueue));
}

#[test]
fn next_step_restarts_under_loop_current() {
    let q = queue(tracks(&["a", "b"]), 0);
    assert_eq!(q.next_step(RepeatMode::LoopCurrent), Some(NextStep::Restart));
    let last = q.with_active(1).unwrap();
    assert_eq!(
        last.next_step(RepeatMode::LoopCurrent),
        Some(NextStep::Restart)
    );
}

#[test]
fn next_step_skips_inert_tracks() {
    let q = queue(vec![track("a"), inert("x"), track("b"), inert("y")], 0);
    assert_eq!(q.next_step(RepeatMode::Off), Some(NextStep::MoveTo(2)));
    let at_b = q.with_active(2).unwrap();
    assert_eq!(at_b.next_step(RepeatMode::Off), Some(NextStep::EndOfQueue));
}

#[test]
fn previous_step_steps_back_early_and_restarts_late() {
    let q = queue(tracks(&["a", "b", "c"]), 2);
    assert_eq!(
        q.previous_step(Duration::from_secs(1), THRESHOLD),
        Some(PreviousStep::MoveTo(1))
    );
    assert_eq!(
        q.previous_step(Duration::ZERO, THRESHOLD),
        Some(PreviousStep::MoveTo(1))
    );
    assert_eq!(
        q.previous_step(Duration::from_secs(10), THRESHOLD),
        Some(PreviousStep::Restart)
    );
}

#[test]
fn previous_step_restarts_exactly_at_the_threshold() {
    let q = queue(tracks(&["a", "b"]), 1);
    assert_eq!(
        q.previous_step(THRESHOLD - Duration::from_millis(1), THRESHOLD),
        Some(PreviousStep::MoveTo(0))
    );
    assert_eq!(
        q.previous_step(THRESHOLD, THRESHOLD),
        Some(PreviousStep::Restart)
    );
}

#[test]
fn previous_step_stays_at_queue_start() {
    let q = queue(vec![inert("x"), track("a"), track("b")], 1);
    assert_eq!(
        q.previous_step(Duration::from_secs(1), THRESHOLD),
        Some(PreviousStep::Stay)
    );
}

#[test]
fn extended_keeps_active_position() {
    let q = queue(tracks(&["a", "b"]), 1);
    let more = q.extended(tracks(&["c"]));
    assert_eq!(ids(&more), vec!["a", "b", "c"]);
    assert_eq!(more.active_index(), Some(1));
    assert_eq!(more.position_of(&TrackId::from("c")), Some(2));
}

#[test]
fn repeat_mode_cycles_between_two_states() {
    assert_eq!(RepeatMode::Off.cycle(), RepeatMode::LoopCurrent);
    assert_eq!(RepeatMode::LoopCurrent.cycle(), RepeatMode::Off);
}

#[test]
fn clamp_volume_bounds_and_nan() {
    assert_eq!(clamp_volume(-0.5), 0.0);
    assert_eq!(clamp_volume(1.7), 1.0);
    assert_eq!(clamp_volume(0.25), 0.25);
    assert_eq!(clamp_volume(f32::NAN), 0.0);
}

#[test]
fn transport_clamps_seek_only_when_duration_known() {
    let mut t = TransportState::default();
    assert_eq!(
        t.clamp_seek(Duration::from_secs(999)),
        Duration::from_secs(999)
    );
    t.duration = Some(Duration::from_secs(100));
    assert_eq!(
        t.clamp_seek(Duration::from_secs(999)),
        Duration::from_secs(100)
    );
}

fn id_strategy() -> impl Strategy<Value = String> {
    "[a-e]"
}

proptest! {
    #[test]
    fn resume_or_enqueue_never_adds_duplicates_and_points_at_track(
        candidate_ids in prop::collection::vec(id_strategy(), 0..12),
        clicked in id_strategy(),
    ) {
        let candidate: Vec<_> = candidate_ids.iter().map(|id| track(id)).collect();
        let before: HashMap<String, usize> = candidate_ids.iter().fold(HashMap::new(), |mut m, id| {
            *m.entry(id.clone()).or_default() += 1;
            m
        });

        let q = Queue::resume_or_enqueue(track(&clicked), candidate);

        let active = q.active().expect("active track");
        prop_assert_eq!(active.id.as_str(), clicked.as_str());

        let mut after: HashMap<String, usize> = HashMap::new();
        for t in q.tracks() {
            *after.entry(t.id.as_str().to_string()).or_default() += 1;
        }
        for (id, count) in &after {
            let prior = before.get(id).copied().unwrap_or(0);
            prop_assert!(*count <= prior.max(1));
        }
    }

    #[test]
    fn clamp_volume_always_lands_in_unit_range(v in proptest::num::f32::ANY) {
        let c = clamp_volume(v);
        prop_assert!((0.0..=1.0).contains(&c));
        prop_assert_eq!(clamp_volume(c), c);
    }
}
