//! Shared event reducer: handlers for key and mouse events.
//!
//! The native runtime calls these functions after converting crossterm events
//! to [`AppKeyEvent`] / [`AppMouseEvent`]. Handlers only mutate [`AppState`];
//! network and export work is requested through `app.pending_action`.

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, FocusPane};
use crate::ui;
use ratatui::layout::Rect;

pub const SCROLL_LINES: u16 = 1;

/// Clickable controls recorded during render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Search,
    Copy,
    Screenshot,
}

fn contains(area: Option<Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|area| area.contains((column, row).into()))
}

/// Returns the pane that contains the given cell coordinates, if any.
pub fn pane_at(app: &AppState, column: u16, row: u16) -> Option<FocusPane> {
    if contains(app.form_area, column, row) {
        return Some(FocusPane::Form);
    }
    if contains(app.results_area, column, row) {
        return Some(FocusPane::Results);
    }
    None
}

/// Returns the button under the given cell coordinates, if any.
pub fn button_at(app: &AppState, column: u16, row: u16) -> Option<Button> {
    if contains(app.search_button_area, column, row) {
        return Some(Button::Search);
    }
    if contains(app.copy_button_area, column, row) {
        return Some(Button::Copy);
    }
    if contains(app.screenshot_button_area, column, row) {
        return Some(Button::Screenshot);
    }
    None
}

fn press(app: &mut AppState, button: Button) {
    match button {
        // A search started while another is in flight supersedes it.
        Button::Search => app.submit(),
        Button::Copy => app.request_copy(),
        Button::Screenshot => app.request_screenshot(),
    }
}

/// Handle a runtime-agnostic key event, mutating `app` in place.
///
/// May set `app.pending_action`; the runtime is responsible for acting on it
/// after this function returns.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    if event.is_release {
        return;
    }

    let code = event.code;
    let ctrl = event.ctrl;
    let alt = event.alt;

    if ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.show_help {
        if matches!(code, AppKeyCode::Char('?') | AppKeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if ctrl && code == AppKeyCode::Char('y') {
        press(app, Button::Copy);
        return;
    }
    if ctrl && code == AppKeyCode::Char('s') {
        press(app, Button::Screenshot);
        return;
    }

    if matches!(code, AppKeyCode::Tab | AppKeyCode::BackTab) {
        app.toggle_focus();
        return;
    }

    match app.focused_pane {
        FocusPane::Results => match code {
            AppKeyCode::Char('q') => app.should_quit = true,
            AppKeyCode::Char('?') => app.show_help = true,
            AppKeyCode::Char('c') => press(app, Button::Copy),
            AppKeyCode::Char('s') => press(app, Button::Screenshot),
            AppKeyCode::Char('/') | AppKeyCode::Esc => app.focus_pane(FocusPane::Form),
            AppKeyCode::Up => app.results_scroll_state.scroll_up(),
            AppKeyCode::Down => app.results_scroll_state.scroll_down(),
            AppKeyCode::PageUp => app.results_scroll_state.scroll_page_up(),
            AppKeyCode::PageDown => app.results_scroll_state.scroll_page_down(),
            AppKeyCode::Home => app.results_scroll_state.scroll_to_top(),
            AppKeyCode::End => app.results_scroll_state.scroll_to_bottom(),
            _ => {}
        },
        FocusPane::Form => match code {
            AppKeyCode::Enter => press(app, Button::Search),
            AppKeyCode::Esc => {
                if app.has_results() {
                    app.focus_pane(FocusPane::Results);
                }
            }
            AppKeyCode::Char('u') if ctrl => app.name_clear(),
            AppKeyCode::Char('w') if ctrl => app.name_delete_word(),
            AppKeyCode::Char('a') if ctrl => app.name_move_to_start(),
            AppKeyCode::Char('e') if ctrl => app.name_move_to_end(),
            AppKeyCode::Char(c) if !ctrl && !alt => app.name_add_char(c),
            AppKeyCode::Backspace => app.name_backspace(),
            AppKeyCode::Delete => app.name_delete(),
            AppKeyCode::Left => app.name_move_cursor_left(),
            AppKeyCode::Right => app.name_move_cursor_right(),
            AppKeyCode::Home => app.name_move_to_start(),
            AppKeyCode::End => app.name_move_to_end(),
            _ => {}
        },
    }
}

/// Handle a runtime-agnostic mouse event.
///
/// `event.column` and `event.row` must already be in terminal cell coordinates.
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let column = event.column;
    let row = event.row;
    let hovered_pane = pane_at(app, column, row);

    match event.kind {
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => {
            if hovered_pane == Some(FocusPane::Results) && app.has_results() {
                let down = event.kind == AppMouseKind::ScrollDown;
                app.scroll_results_by_lines(SCROLL_LINES, down);
                return true;
            }
            false
        }
        AppMouseKind::LeftDown => {
            if app.show_help {
                app.show_help = false;
                return true;
            }

            let mut transitioned = false;
            if let Some(pane) = hovered_pane
                && app.focused_pane != pane
            {
                app.focus_pane(pane);
                transitioned = true;
            }

            if let Some(button) = button_at(app, column, row) {
                press(app, button);
                return true;
            }

            if let Some(input_area) = app.input_area
                && input_area.contains((column, row).into())
            {
                let horizontal_scroll =
                    ui::name_horizontal_scroll(&app.name_input, app.name_cursor, input_area.width);
                let local_x = column.saturating_sub(input_area.x);
                let new_cursor =
                    ui::name_cursor_for_column(&app.name_input, horizontal_scroll + local_x);
                if new_cursor != app.name_cursor {
                    app.name_cursor = new_cursor;
                    transitioned = true;
                }
            }

            transitioned
        }
    }
}
