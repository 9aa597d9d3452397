//! UI rendering for the terminal user interface.
//!
//! Drawing only reads state: the `App` cursors and a `SessionView` snapshot
//! taken from the playback session for this frame.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::config::ControlsSettings;
use crate::error::PlaybackError;
use crate::media::PlaybackStatus;
use crate::queue::{Queue, RepeatMode, TransportState};

/// What the screen shows of the playback session.
pub struct SessionView<'a> {
    pub queue: &'a Queue,
    pub transport: &'a TransportState,
    pub status: PlaybackStatus,
    pub error: Option<&'a PlaybackError>,
}

const LEFT_PAD: Padding = Padding {
    left: 1,
    right: 0,
    top: 0,
    bottom: 0,
};

fn controls_text(controls: &ControlsSettings) -> String {
    let seek = controls.seek_step_secs;
    let vol = (controls.volume_step * 100.0).round();
    [
        "[j/k] up/down".to_string(),
        "[tab] catalog/queue".to_string(),
        "[enter] play selected".to_string(),
        "[a] play all visible".to_string(),
        "[space/p] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] seek -/+{seek}s"),
        format!("[-/+] volume {vol}%"),
        "[r] repeat".to_string(),
        "[/] filter".to_string(),
        "[K] details".to_string(),
        "[c] clear error".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn repeat_text(repeat: RepeatMode) -> &'static str {
    match repeat {
        RepeatMode::Off => "REPEAT: Off",
        RepeatMode::LoopCurrent => "REPEAT: Track",
    }
}

fn status_text(app: &App, view: &SessionView<'_>) -> String {
    let t = view.transport;
    let mut parts: Vec<String> = Vec::new();

    match view.queue.active() {
        Some(track) => {
            let time = match t.duration {
                Some(total) => format!("{}/{}", format_mmss(t.position), format_mmss(total)),
                None => format_mmss(t.position),
            };
            parts.push(format!(" Song: {} [{}]", track.display(), time));
        }
        None => parts.push(" No song".to_string()),
    }
    parts.push(view.status.as_str().to_string());
    parts.push(format!("VOL: {:.0}%", t.volume * 100.0));
    parts.push(repeat_text(t.repeat).to_string());

    let q = app.filter_query.trim();
    if app.filter_mode || !q.is_empty() {
        parts.push(format!("FILTER: {q}"));
    }
    if let Some(source) = &app.source {
        parts.push(format!("Catalog: {source}"));
    }

    parts.join(" • ")
}

/// Start, end and cursor offset of a window of `height` rows that keeps the
/// cursor centered when possible.
fn visible_window(total: usize, height: usize, cursor: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, cursor);
    }
    let mut start = cursor.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, cursor - start)
}

fn highlighted(name: &str, positions: &[usize]) -> String {
    name.chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let upper = positions.contains(&i);
            let chars: Vec<char> = if upper {
                c.to_uppercase().collect()
            } else {
                vec![c]
            };
            chars
        })
        .collect()
}

fn list_block(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        block
    }
}

fn draw_catalog(frame: &mut Frame, app: &App, area: Rect) {
    let display = app.display_indices();
    let total = display.len();
    let cursor = display
        .iter()
        .position(|&i| i == app.catalog_selected)
        .unwrap_or(0);
    let (start, end, offset) = visible_window(total, area.height.saturating_sub(2) as usize, cursor);
    let filtering = !app.filter_query.trim().is_empty();

    let items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.catalog[i];
            let mut name = track.display();
            if filtering {
                if let Some(positions) = app.match_positions(i) {
                    name = highlighted(&name, &positions);
                }
            }
            let item = ListItem::new(name);
            if track.is_playable() {
                item
            } else {
                item.style(Style::default().add_modifier(Modifier::DIM))
            }
        })
        .collect();

    let list = List::new(items)
        .block(list_block(" catalog ", app.focus == Focus::Catalog))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(offset));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_queue(frame: &mut Frame, app: &App, view: &SessionView<'_>, area: Rect) {
    let tracks = view.queue.tracks();
    let active = view.queue.active_index();
    let (start, end, offset) = visible_window(
        tracks.len(),
        area.height.saturating_sub(2) as usize,
        app.queue_selected.min(tracks.len().saturating_sub(1)),
    );

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if Some(start + i) == active { "♪ " } else { "  " };
            let item = ListItem::new(format!("{marker}{}", track.display()));
            if track.is_playable() {
                item
            } else {
                item.style(Style::default().add_modifier(Modifier::DIM))
            }
        })
        .collect();

    let list = List::new(items)
        .block(list_block(" queue ", app.focus == Focus::Queue))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !tracks.is_empty() && app.focus == Focus::Queue {
        state.select(Some(offset));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width.saturating_sub(2)).max(10);
    let height = height.min(r.height.saturating_sub(2)).max(5);
    Rect {
        x: r.x + r.width.saturating_sub(width) / 2,
        y: r.y + r.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn draw_details(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect_sized(80, 10, area);
    frame.render_widget(Clear, popup);

    let text = match app.selected_track() {
        Some(track) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nSource: {}\nArtwork: {}",
            track.title,
            if track.artist.is_empty() { "-" } else { track.artist.as_str() },
            track.album.as_deref().unwrap_or("-"),
            track.duration.map_or_else(|| "-".to_string(), format_mmss),
            track.audio_url().unwrap_or("none (not playable)"),
            track.artwork_url("-"),
        ),
        None => "No track selected".to_string(),
    };
    let details = Paragraph::new(text)
        .block(
            Block::default()
                .padding(LEFT_PAD)
                .borders(Borders::ALL)
                .title(" details (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(details, popup);
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, view: &SessionView<'_>, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(format!("{} tracks in catalog", app.catalog.len()))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" beatbox ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, view))
        .block(Block::bordered().padding(LEFT_PAD).title(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    draw_catalog(frame, app, lists[0]);
    draw_queue(frame, app, view, lists[1]);

    if app.metadata_window {
        draw_details(frame, app, chunks[2]);
    }

    let error = match view.error {
        Some(e) => Paragraph::new(e.to_string()).slow_blink(),
        None => Paragraph::new("-"),
    };
    frame.render_widget(
        error.block(Block::bordered().padding(LEFT_PAD).title(" error (c clears) ")),
        chunks[3],
    );

    let footer = Paragraph::new(controls_text(controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(LEFT_PAD),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
