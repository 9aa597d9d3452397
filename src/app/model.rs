use crate::queue::SharedTrack;

/// Which list the cursor keys act on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Catalog,
    Queue,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Focus::Catalog => Focus::Queue,
            Focus::Queue => Focus::Catalog,
        }
    }
}

/// Presentation state for the TUI: cursors, focus and the catalog filter.
///
/// Playback state is not kept here; the runtime reads it from the session
/// each frame.
pub struct App {
    /// Every track loaded from the catalog file, inert ones included.
    pub catalog: Vec<SharedTrack>,
    /// Lowercased display names, parallel to `catalog`.
    lower_names: Vec<String>,
    /// Catalog index under the cursor.
    pub catalog_selected: usize,
    /// Queue index under the cursor.
    pub queue_selected: usize,
    pub focus: Focus,
    /// The queue cursor snaps to the active track while this is set.
    pub follow_playback: bool,
    pub filter_mode: bool,
    pub filter_query: String,
    /// Details popup for the track under the catalog cursor.
    pub metadata_window: bool,
    /// Where the catalog came from, shown in the status box.
    pub source: Option<String>,
}

impl App {
    pub fn new(catalog: Vec<SharedTrack>) -> Self {
        let lower_names = catalog
            .iter()
            .map(|t| t.display().to_lowercase())
            .collect();
        Self {
            catalog,
            lower_names,
            catalog_selected: 0,
            queue_selected: 0,
            focus: Focus::Catalog,
            follow_playback: true,
            filter_mode: false,
            filter_query: String::new(),
            metadata_window: false,
            source: None,
        }
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    pub fn has_tracks(&self) -> bool {
        !self.display_indices().is_empty()
    }

    /// Catalog indices visible under the current filter, in catalog order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_lowercase();
        if query.is_empty() {
            return (0..self.catalog.len()).collect();
        }
        self.lower_names
            .iter()
            .enumerate()
            .filter(|(_, name)| fuzzy_positions(name, &query).is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Character positions of `query` in the display name of catalog entry
    /// `index`, for highlighting.
    pub fn match_positions(&self, index: usize) -> Option<Vec<usize>> {
        let query = self.filter_query.trim().to_lowercase();
        let name = self.lower_names.get(index)?;
        fuzzy_positions(name, &query)
    }

    pub fn selected_track(&self) -> Option<SharedTrack> {
        self.catalog.get(self.catalog_selected).cloned()
    }

    /// The visible catalog as a queue, the way a listing screen hands its
    /// rows to playback.
    pub fn visible_tracks(&self) -> Vec<SharedTrack> {
        self.display_indices()
            .into_iter()
            .map(|i| self.catalog[i].clone())
            .collect()
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    /// Move the catalog cursor down within the filtered view, wrapping.
    pub fn next(&mut self) {
        let view = self.display_indices();
        if let Some(i) = step_in_view(&view, self.catalog_selected, true) {
            self.catalog_selected = i;
        }
    }

    pub fn prev(&mut self) {
        let view = self.display_indices();
        if let Some(i) = step_in_view(&view, self.catalog_selected, false) {
            self.catalog_selected = i;
        }
    }

    /// Move the queue cursor; leaves follow mode.
    pub fn queue_next(&mut self, len: usize) {
        self.follow_playback = false;
        if len > 0 {
            self.queue_selected = (self.queue_selected + 1) % len;
        }
    }

    pub fn queue_prev(&mut self, len: usize) {
        self.follow_playback = false;
        if len > 0 {
            self.queue_selected = (self.queue_selected + len - 1) % len;
        }
    }

    /// Keep the queue cursor valid for a queue of `len` entries, snapping it
    /// to `active` in follow mode.
    pub fn sync_queue_cursor(&mut self, len: usize, active: Option<usize>) {
        if self.follow_playback {
            if let Some(i) = active {
                self.queue_selected = i;
            }
        }
        if len == 0 {
            self.queue_selected = 0;
        } else if self.queue_selected >= len {
            self.queue_selected = len - 1;
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.focus = Focus::Catalog;
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_mode = false;
        self.filter_query.clear();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let view = self.display_indices();
        if !view.contains(&self.catalog_selected) {
            if let Some(&first) = view.first() {
                self.catalog_selected = first;
            }
        }
    }
}

/// Positions of each `query` char, in order, within `name`. Both sides are
/// expected lowercased; an empty query matches everything.
pub fn fuzzy_positions(name: &str, query: &str) -> Option<Vec<usize>> {
    let mut chars = name.chars().enumerate();
    query
        .chars()
        .map(|qc| chars.find(|&(_, c)| c == qc).map(|(i, _)| i))
        .collect()
}

fn step_in_view(view: &[usize], current: usize, forward: bool) -> Option<usize> {
    if view.is_empty() {
        return None;
    }
    let pos = match view.iter().position(|&i| i == current) {
        Some(p) if forward => (p + 1) % view.len(),
        Some(p) => (p + view.len() - 1) % view.len(),
        None => 0,
    };
    Some(view[pos])
}
