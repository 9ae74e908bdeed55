//! Shared application state, types, and state-mutation methods.
//!
//! The UI thread is the only writer. Search results come back from worker
//! threads as [`SearchEvent`]s and are applied through
//! [`AppState::apply_search_event`], which drops events from superseded
//! searches.

use crate::app_core::workflow::{
    NOT_FOUND_MESSAGE, REFRESH_PENDING_MESSAGE, REQUIRED_FIELD_MESSAGE, SearchOutcome,
    SearchProgress,
};
use crate::model::{Player, VehicleRecord};
use crate::theme::ThemeConfig;
use ratatui::layout::Rect;
use tracing::debug;
use tui_scrollview::ScrollViewState;

pub const NOTHING_TO_EXPORT_NOTE: &str = "Nothing to export yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    /// Name input; printable keys edit the name.
    Form,
    /// Vehicle grid; printable keys are shortcuts.
    Results,
}

/// Lifecycle of the most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Searching,
    Success,
    NotFound,
    RefreshPending,
    Failed,
}

/// Work the runtime must perform after the reducer returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Submit { name: String, generation: u64 },
    Copy,
    Screenshot,
}

/// Message from a search worker, tagged with the generation it was started for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Progress {
        generation: u64,
        progress: SearchProgress,
    },
    Completed {
        generation: u64,
        outcome: SearchOutcome,
    },
}

impl SearchEvent {
    pub fn generation(&self) -> u64 {
        match self {
            SearchEvent::Progress { generation, .. } | SearchEvent::Completed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// Name input text
    pub name_input: String,
    /// Cursor position in the name input, in chars
    pub name_cursor: usize,
    /// Inline validation message for the name field
    pub field_error: Option<String>,
    /// Shared error banner
    pub error_message: Option<String>,
    /// Transient feedback from export actions
    pub status_note: Option<String>,
    pub phase: SearchPhase,
    /// Player of the current search, once resolved
    pub player: Option<Player>,
    /// Normalized result list of the current search
    pub vehicles: Vec<VehicleRecord>,
    /// Generation of the most recent submission; older events are stale
    pub generation: u64,
    pub focused_pane: FocusPane,
    pub theme: ThemeConfig,
    pub app_version: String,
    pub results_scroll_state: ScrollViewState,
    /// Screen region of the form (set during render)
    pub form_area: Option<Rect>,
    /// Screen region of the name input text (inside borders)
    pub input_area: Option<Rect>,
    pub search_button_area: Option<Rect>,
    pub copy_button_area: Option<Rect>,
    pub screenshot_button_area: Option<Rect>,
    /// Screen region of the results pane (including borders)
    pub results_area: Option<Rect>,
    /// Width of the card grid at the last render, reused by the screenshot
    pub results_grid_width: u16,
    pub should_quit: bool,
    pub show_help: bool,
    /// Pending action to execute after input handling
    pub pending_action: Option<AppAction>,
}

impl AppState {
    pub fn new(theme: ThemeConfig, app_version: String) -> Self {
        Self {
            name_input: String::new(),
            name_cursor: 0,
            field_error: None,
            error_message: None,
            status_note: None,
            phase: SearchPhase::Idle,
            player: None,
            vehicles: Vec::new(),
            generation: 0,
            focused_pane: FocusPane::Form,
            theme,
            app_version,
            results_scroll_state: ScrollViewState::default(),
            form_area: None,
            input_area: None,
            search_button_area: None,
            copy_button_area: None,
            screenshot_button_area: None,
            results_area: None,
            results_grid_width: 0,
            should_quit: false,
            show_help: false,
            pending_action: None,
        }
    }

    pub fn has_results(&self) -> bool {
        !self.vehicles.is_empty()
    }

    pub fn is_searching(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    /// Validates the name and, when valid, starts a new search generation.
    ///
    /// A blank name only sets the inline field message; no action is queued.
    pub fn submit(&mut self) {
        // Surrounding whitespace is dropped, so an all-space name counts as blank.
        let name = self.name_input.trim();
        if name.is_empty() {
            self.field_error = Some(REQUIRED_FIELD_MESSAGE.to_string());
            return;
        }
        let name = name.to_string();

        self.field_error = None;
        self.error_message = None;
        self.status_note = None;
        self.player = None;
        self.vehicles.clear();
        self.results_scroll_state = ScrollViewState::default();
        self.generation += 1;
        self.phase = SearchPhase::Searching;
        self.pending_action = Some(AppAction::Submit {
            name,
            generation: self.generation,
        });
    }

    /// Applies a worker event. Returns `false` when the event belongs to a
    /// superseded search and was discarded.
    pub fn apply_search_event(&mut self, event: SearchEvent) -> bool {
        if event.generation() != self.generation {
            debug!(
                event_generation = event.generation(),
                current_generation = self.generation,
                "discarding stale search event"
            );
            return false;
        }

        match event {
            SearchEvent::Progress {
                progress: SearchProgress::PlayerResolved(player),
                ..
            } => {
                self.player = Some(player);
            }
            SearchEvent::Completed { outcome, .. } => self.finish_search(outcome),
        }
        true
    }

    fn finish_search(&mut self, outcome: SearchOutcome) {
        match outcome {
            SearchOutcome::Found(vehicles) => {
                self.vehicles = vehicles;
                self.phase = SearchPhase::Success;
            }
            SearchOutcome::NotFound => {
                self.error_message = Some(NOT_FOUND_MESSAGE.to_string());
                self.phase = SearchPhase::NotFound;
            }
            SearchOutcome::RefreshPending => {
                self.error_message = Some(REFRESH_PENDING_MESSAGE.to_string());
                self.phase = SearchPhase::RefreshPending;
            }
            SearchOutcome::Failed(message) => {
                self.error_message = Some(message);
                self.phase = SearchPhase::Failed;
            }
        }
    }

    /// Queues a clipboard export. Without results only a status note is left.
    pub fn request_copy(&mut self) {
        self.request_export(AppAction::Copy);
    }

    /// Queues a screenshot export. Without results only a status note is left.
    pub fn request_screenshot(&mut self) {
        self.request_export(AppAction::Screenshot);
    }

    fn request_export(&mut self, action: AppAction) {
        if self.has_results() {
            self.pending_action = Some(action);
        } else {
            self.set_status(NOTHING_TO_EXPORT_NOTE);
        }
    }

    pub fn set_status(&mut self, note: impl Into<String>) {
        self.status_note = Some(note.into());
    }

    /// Any edit of the name clears the banner, like the site's change handler.
    fn name_changed(&mut self) {
        self.error_message = None;
        if !self.name_input.trim().is_empty() {
            self.field_error = None;
        }
    }

    pub fn name_add_char(&mut self, c: char) {
        let byte_idx = self
            .name_input
            .char_indices()
            .nth(self.name_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.name_input.len());
        self.name_input.insert(byte_idx, c);
        self.name_cursor += 1;
        self.name_changed();
    }

    pub fn name_backspace(&mut self) {
        if self.name_cursor > 0 {
            self.name_cursor -= 1;
            if let Some((byte_idx, _)) = self.name_input.char_indices().nth(self.name_cursor) {
                self.name_input.remove(byte_idx);
            }
            self.name_changed();
        }
    }

    pub fn name_delete(&mut self) {
        let char_count = self.name_input.chars().count();
        if self.name_cursor < char_count
            && let Some((byte_idx, _)) = self.name_input.char_indices().nth(self.name_cursor)
        {
            self.name_input.remove(byte_idx);
            self.name_changed();
        }
    }

    pub fn name_move_cursor_left(&mut self) {
        self.name_cursor = self.name_cursor.saturating_sub(1);
    }

    pub fn name_move_cursor_right(&mut self) {
        if self.name_cursor < self.name_input.chars().count() {
            self.name_cursor += 1;
        }
    }

    pub fn name_move_to_start(&mut self) {
        self.name_cursor = 0;
    }

    pub fn name_move_to_end(&mut self) {
        self.name_cursor = self.name_input.chars().count();
    }

    pub fn name_clear(&mut self) {
        if !self.name_input.is_empty() {
            self.name_input.clear();
            self.name_cursor = 0;
            self.name_changed();
        }
    }

    pub fn name_delete_word(&mut self) {
        if self.name_cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.name_input.chars().collect();
        let mut i = self.name_cursor;

        // Trailing whitespace, then the word itself
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }

        let byte_start = self
            .name_input
            .char_indices()
            .nth(i)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let byte_end = self
            .name_input
            .char_indices()
            .nth(self.name_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.name_input.len());

        self.name_input.replace_range(byte_start..byte_end, "");
        self.name_cursor = i;
        self.name_changed();
    }

    /// Replaces the whole name, e.g. from the `--name` flag.
    pub fn set_name(&mut self, name: &str) {
        self.name_input = name.to_string();
        self.name_cursor = self.name_input.chars().count();
        self.name_changed();
    }

    pub fn focus_pane(&mut self, pane: FocusPane) {
        self.focused_pane = pane;
    }

    pub fn toggle_focus(&mut self) {
        let next = match self.focused_pane {
            FocusPane::Form => FocusPane::Results,
            FocusPane::Results => FocusPane::Form,
        };
        self.focus_pane(next);
    }

    pub fn scroll_results_by_lines(&mut self, lines: u16, down: bool) {
        for _ in 0..lines {
            if down {
                self.results_scroll_state.scroll_down();
            } else {
                self.results_scroll_state.scroll_up();
            }
        }
    }
}
