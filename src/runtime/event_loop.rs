use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::app::{App, Focus};
use crate::config;
use crate::ui::{self, SessionView};

use super::startup::Session;

const INPUT_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: drains the session, draws, and routes keys.
/// Returns `Ok(())` when the user or the media surface asks to quit.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session,
    quit: &Arc<AtomicBool>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        session.pump();
        if quit.load(Ordering::SeqCst) {
            info!("quit requested by media controls");
            return Ok(());
        }

        let queue = session.queue();
        app.sync_queue_cursor(queue.len(), queue.active_index());

        let view = SessionView {
            queue: session.queue(),
            transport: session.transport(),
            status: session.status(),
            error: session.last_error(),
        };
        terminal.draw(|f| ui::draw(f, app, &view, &settings.controls))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, session, state) {
                    return Ok(());
                }
            }
        }
    }
}

fn handle_filter_key(key: KeyEvent, app: &mut App, session: &mut Session) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Char('j' | 'n') if key.modifiers.contains(KeyModifiers::CONTROL) => app.next(),
        KeyCode::Char('k' | 'p') if key.modifiers.contains(KeyModifiers::CONTROL) => app.prev(),
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        KeyCode::Enter => {
            if !app.has_tracks() {
                return;
            }
            app.exit_filter_mode();
            play_selected(app, session, false);
        }
        _ => {}
    }
}

/// Play the catalog row under the cursor. With `replace`, the visible
/// catalog becomes the queue; otherwise the track is resumed in, or appended
/// to, the current queue.
fn play_selected(app: &mut App, session: &mut Session, replace: bool) {
    let Some(track) = app.selected_track() else {
        return;
    };
    let hint = if replace {
        app.visible_tracks()
    } else {
        session.queue().tracks().to_vec()
    };
    app.follow_playback = true;
    // Failures land in the session's error slot.
    let _ = session.play_track(track, hint);
}

/// Returns `true` when the loop should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    session: &mut Session,
    state: &mut EventLoopState,
) -> bool {
    if app.filter_mode {
        state.pending_gg = false;
        handle_filter_key(key, app, session);
        return false;
    }

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    let queue_len = session.queue().len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            Focus::Catalog => app.next(),
            Focus::Queue => app.queue_next(queue_len),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            Focus::Catalog => app.prev(),
            Focus::Queue => app.queue_prev(queue_len),
        },
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                jump(app, queue_len, true);
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => jump(app, queue_len, false),
        KeyCode::Enter => match app.focus {
            Focus::Catalog => play_selected(app, session, false),
            Focus::Queue => {
                app.follow_playback = true;
                let _ = session.set_active_by_index(app.queue_selected);
            }
        },
        KeyCode::Char('a') => play_selected(app, session, true),
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = session.toggle_play_pause();
        }
        KeyCode::Char('l') => {
            app.follow_playback = true;
            let _ = session.next();
        }
        KeyCode::Char('h') => {
            app.follow_playback = true;
            let _ = session.previous();
        }
        KeyCode::Char('L') => session.seek_by(settings.controls.seek_step().as_secs_f64()),
        KeyCode::Char('H') => session.seek_by(-settings.controls.seek_step().as_secs_f64()),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = session.transport().volume + settings.controls.volume_step;
            session.set_volume(v);
        }
        KeyCode::Char('-') => {
            let v = session.transport().volume - settings.controls.volume_step;
            session.set_volume(v);
        }
        KeyCode::Char('r') => {
            let mode = session.cycle_repeat();
            debug!(?mode, "repeat mode");
        }
        KeyCode::Char('c') => session.clear_error(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        _ => {}
    }

    false
}

/// `gg` / `G` on whichever list has focus.
fn jump(app: &mut App, queue_len: usize, top: bool) {
    match app.focus {
        Focus::Catalog => {
            let view = app.display_indices();
            let target = if top { view.first() } else { view.last() };
            if let Some(&i) = target {
                app.catalog_selected = i;
            }
        }
        Focus::Queue if queue_len > 0 => {
            app.follow_playback = false;
            app.queue_selected = if top { 0 } else { queue_len - 1 };
        }
        Focus::Queue => {}
    }
}
