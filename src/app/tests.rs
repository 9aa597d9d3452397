use super::*;
use crate::test_support::{track, tracks};

fn named(id: &str, title: &str) -> crate::queue::SharedTrack {
    let mut t = (*track(id)).clone();
    t.title = title.into();
    t.artist = String::new();
    std::sync::Arc::new(t)
}

fn catalog() -> App {
    App::new(vec![
        named("1", "Alpha"),
        named("2", "Beta"),
        named("3", "Gamma"),
        named("4", "Delta"),
    ])
}

#[test]
fn fuzzy_positions_match_in_order() {
    assert_eq!(fuzzy_positions("hello world", "hw"), Some(vec![0, 6]));
    assert!(fuzzy_positions("hello world", "ello").is_some());
    assert!(fuzzy_positions("hello world", "wh").is_none());
    assert_eq!(fuzzy_positions("anything", ""), Some(vec![]));
}

#[test]
fn filter_is_fuzzy_and_case_insensitive() {
    let mut app = App::new(vec![
        named("1", "Metallica - Blackened"),
        named("2", "Black Sabbath - Paranoid"),
    ]);
    app.filter_query = "MTBK".into();
    assert_eq!(app.display_indices(), vec![0]);

    app.filter_query = "   ".into();
    assert_eq!(app.display_indices(), vec![0, 1]);
}

#[test]
fn typing_moves_cursor_onto_visible_row() {
    let mut app = catalog();
    app.catalog_selected = 0;
    app.enter_filter_mode();
    app.push_filter_char('e');
    app.push_filter_char('t');
    // Beta and Delta remain.
    assert_eq!(app.display_indices(), vec![1, 3]);
    assert_eq!(app.catalog_selected, 1);

    app.pop_filter_char();
    app.pop_filter_char();
    assert_eq!(app.catalog_selected, 1);
}

#[test]
fn cursor_wraps_within_filtered_view() {
    let mut app = catalog();
    app.filter_query = "et".into();
    app.catalog_selected = 1;
    app.next();
    assert_eq!(app.catalog_selected, 3);
    app.next();
    assert_eq!(app.catalog_selected, 1);
    app.prev();
    assert_eq!(app.catalog_selected, 3);
}

#[test]
fn visible_tracks_follow_filter() {
    let mut app = catalog();
    assert_eq!(app.visible_tracks().len(), 4);
    app.filter_query = "amm".into();
    let ids: Vec<_> = app
        .visible_tracks()
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(ids, vec!["3"]);
}

#[test]
fn clear_filter_leaves_filter_mode() {
    let mut app = catalog();
    app.enter_filter_mode();
    app.push_filter_char('z');
    assert!(!app.has_tracks());
    app.clear_filter();
    assert!(!app.filter_mode);
    assert!(app.has_tracks());
}

#[test]
fn queue_cursor_follows_active_until_moved() {
    let mut app = App::new(tracks(&["a", "b", "c"]));
    app.sync_queue_cursor(3, Some(2));
    assert_eq!(app.queue_selected, 2);

    app.queue_next(3);
    assert_eq!(app.queue_selected, 0);
    assert!(!app.follow_playback);
    app.sync_queue_cursor(3, Some(1));
    assert_eq!(app.queue_selected, 0);

    app.queue_prev(3);
    assert_eq!(app.queue_selected, 2);
}

#[test]
fn queue_cursor_clamps_to_shorter_queue() {
    let mut app = App::new(Vec::new());
    app.follow_playback = false;
    app.queue_selected = 5;
    app.sync_queue_cursor(2, None);
    assert_eq!(app.queue_selected, 1);
    app.sync_queue_cursor(0, None);
    assert_eq!(app.queue_selected, 0);
}

#[test]
fn focus_toggles_between_lists() {
    let mut app = catalog();
    assert_eq!(app.focus, Focus::Catalog);
    app.toggle_focus();
    assert_eq!(app.focus, Focus::Queue);
    app.enter_filter_mode();
    assert_eq!(app.focus, Focus::Catalog);
}
