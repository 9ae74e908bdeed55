use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect, Size},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::UnicodeWidthChar;

use crate::app_core::state::{AppState, FocusPane, SearchPhase};
use crate::model::VehicleRecord;
use crate::theme::ThemeConfig;

/// Rows per vehicle card, borders included.
pub const CARD_HEIGHT: u16 = 7;
/// Rows of the image slot at the top of a card.
pub const THUMB_ROWS: u16 = 3;

const FORM_HEIGHT: u16 = 5;
const SEARCH_LABEL: &str = " Search ";
const SEARCHING_LABEL: &str = " Searching… ";
const COPY_LABEL: &str = " Copy names ";
const SCREENSHOT_LABEL: &str = " Screenshot ";

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let banner_height = if app.error_message.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORM_HEIGHT),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(Block::default().style(app.theme.text), f.area());

    app.form_area = Some(chunks[0]);
    app.results_area = Some(chunks[2]);

    render_form(f, app, chunks[0]);
    render_error_banner(f, app, chunks[1]);
    render_results(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    if app.show_help {
        render_help_overlay(f, app);
    }
}

fn pane_block<'a>(app: &AppState, pane: FocusPane, title: String) -> Block<'a> {
    let is_focused = app.focused_pane == pane;
    Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            app.theme.border_selected
        } else {
            app.theme.border
        })
        .style(app.theme.text)
        .title(title)
        .title_style(app.theme.title)
}

fn render_form(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focused_pane == FocusPane::Form;
    let block = pane_block(app, FocusPane::Form, " Player lookup ".to_string()).title_bottom(
        if is_focused {
            Line::from(" Enter search • Tab results • ? help ").right_aligned()
        } else {
            Line::from("")
        },
    );
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let search_label = if app.is_searching() {
        SEARCHING_LABEL
    } else {
        SEARCH_LABEL
    };
    let input_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(label_width(search_label)),
        ])
        .split(rows[0]);

    f.render_widget(Paragraph::new("Name: ").style(app.theme.dim), input_row[0]);
    render_name_input(f, app, input_row[1]);

    let search_style = if app.is_searching() {
        app.theme.button_busy
    } else {
        app.theme.button
    };
    app.search_button_area = Some(input_row[3]);
    f.render_widget(Paragraph::new(search_label).style(search_style), input_row[3]);

    let hint = match &app.field_error {
        Some(message) => Line::from(Span::styled(message.clone(), app.theme.error)),
        None => Line::from(Span::styled(
            "In-game nickname, e.g. the name shown on your profile",
            app.theme.dim.add_modifier(Modifier::ITALIC),
        )),
    };
    f.render_widget(Paragraph::new(hint), rows[1]);

    let export_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(label_width(COPY_LABEL)),
            Constraint::Length(1),
            Constraint::Length(label_width(SCREENSHOT_LABEL)),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(rows[2]);

    if app.has_results() {
        app.copy_button_area = Some(export_row[0]);
        app.screenshot_button_area = Some(export_row[2]);
        f.render_widget(Paragraph::new(COPY_LABEL).style(app.theme.button), export_row[0]);
        f.render_widget(
            Paragraph::new(SCREENSHOT_LABEL).style(app.theme.button),
            export_row[2],
        );
    } else {
        app.copy_button_area = None;
        app.screenshot_button_area = None;
    }

    if let Some(player) = &app.player {
        let line = Line::from(vec![
            Span::styled("Player ", app.theme.dim),
            Span::styled(player.name.clone(), app.theme.title),
            Span::styled(format!(" #{}", player.user_id), app.theme.dim),
        ]);
        f.render_widget(Paragraph::new(line), export_row[4]);
    }
}

fn label_width(label: &str) -> u16 {
    label
        .chars()
        .filter_map(|c| c.width())
        .map(|w| w as u16)
        .sum()
}

fn render_name_input(f: &mut Frame, app: &mut AppState, area: Rect) {
    app.input_area = Some(area);
    let horizontal_scroll = name_horizontal_scroll(&app.name_input, app.name_cursor, area.width);

    let content = if app.name_input.is_empty() && app.focused_pane != FocusPane::Form {
        Text::from(Line::from(Span::styled(
            "player name",
            app.theme.dim.add_modifier(Modifier::ITALIC),
        )))
    } else {
        Text::from(app.name_input.as_str())
    };

    f.render_widget(
        Paragraph::new(content)
            .style(app.theme.text.add_modifier(Modifier::UNDERLINED))
            .scroll((0, horizontal_scroll)),
        area,
    );

    if app.focused_pane == FocusPane::Form && !app.show_help && area.width > 0 && area.height > 0 {
        let cursor_offset = name_cursor_offset(&app.name_input, app.name_cursor);
        let max_x = area.width.saturating_sub(1);
        let visible_cursor_offset = cursor_offset.saturating_sub(horizontal_scroll);
        f.set_cursor_position((area.x + visible_cursor_offset.min(max_x), area.y));
    }
}

fn render_error_banner(f: &mut Frame, app: &mut AppState, area: Rect) {
    if let Some(message) = &app.error_message
        && area.height > 0
    {
        let line = Line::from(vec![
            Span::styled(" ✖ ", app.theme.error),
            Span::styled(message.clone(), app.theme.error),
        ]);
        f.render_widget(Paragraph::new(line).style(app.theme.text), area);
    }
}

fn render_results(f: &mut Frame, app: &mut AppState, area: Rect) {
    let is_focused = app.focused_pane == FocusPane::Results;
    let title = match &app.player {
        Some(player) if app.has_results() => {
            format!(" Vehicles ({}) · {} ", app.vehicles.len(), player.name)
        }
        _ => " Vehicles ".to_string(),
    };
    let block = pane_block(app, FocusPane::Results, title).title_bottom(if is_focused {
        Line::from(" ↑/↓ scroll • c copy • s screenshot • Esc back ").right_aligned()
    } else {
        Line::from("")
    });

    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.width < 3 || inner.height == 0 {
        return;
    }

    if !app.has_results() {
        let message = match app.phase {
            SearchPhase::Searching => "Searching…",
            SearchPhase::Idle => "Enter a player name and press Enter.",
            _ => "No vehicles to show.",
        };
        f.render_widget(
            Paragraph::new(message)
                .style(app.theme.dim)
                .alignment(Alignment::Center),
            Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1),
        );
        return;
    }

    // One column of padding on each side, the right one shared with the scrollbar.
    let horizontal_padding = 1;
    let content_width = inner.width.saturating_sub(horizontal_padding * 2);
    app.results_grid_width = content_width;
    let content_height = grid_height(content_width, app.vehicles.len());

    let mut scroll_view = ScrollView::new(Size::new(content_width, content_height))
        .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
    let grid_area = scroll_view.area();
    render_grid(scroll_view.buf_mut(), grid_area, &app.vehicles, &app.theme);

    let scroll_view_area = Rect::new(
        inner.x + horizontal_padding,
        inner.y,
        inner.width.saturating_sub(horizontal_padding),
        inner.height,
    );
    f.render_stateful_widget(scroll_view, scroll_view_area, &mut app.results_scroll_state);
}

/// Number of card columns for a grid `width` cells wide.
pub fn grid_columns(width: u16) -> u16 {
    match width {
        0..60 => 1,
        60..90 => 2,
        90..120 => 3,
        _ => 4,
    }
}

/// Total height of a grid holding `count` cards.
pub fn grid_height(width: u16, count: usize) -> u16 {
    let columns = grid_columns(width) as usize;
    let rows = count.div_ceil(columns);
    (rows as u16).saturating_mul(CARD_HEIGHT)
}

/// Card rectangles for `count` cards laid out row by row inside `area`.
///
/// Cards below the bottom of `area` are still returned; callers clip.
pub fn card_rects(area: Rect, count: usize) -> Vec<Rect> {
    let columns = grid_columns(area.width);
    let card_width = area.width / columns;
    (0..count)
        .map(|i| {
            let column = (i as u16) % columns;
            let row = (i / columns as usize) as u16;
            Rect::new(
                area.x + column * card_width,
                area.y.saturating_add(row.saturating_mul(CARD_HEIGHT)),
                card_width,
                CARD_HEIGHT,
            )
        })
        .collect()
}

/// Inner regions of one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    /// Image slot: country tag and vehicle identifier in text, pictures in screenshots.
    pub thumb: Rect,
    pub name: Rect,
    pub rating: Rect,
}

pub fn card_layout(card: Rect) -> CardLayout {
    let inner = Block::default().borders(Borders::ALL).inner(card);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(THUMB_ROWS),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);
    CardLayout {
        thumb: rows[0],
        name: rows[1],
        rating: rows[2],
    }
}

/// `country_usa` → `USA`
pub fn country_tag(country: &str) -> String {
    country
        .strip_prefix("country_")
        .unwrap_or(country)
        .to_uppercase()
}

/// Draws the vehicle cards for `records` into `buf`.
///
/// Shared by the results pane and the screenshot export, so both show the
/// same grid for the same width.
pub fn render_grid(buf: &mut Buffer, area: Rect, records: &[VehicleRecord], theme: &ThemeConfig) {
    buf.set_style(area, theme.text);
    for (record, card) in records.iter().zip(card_rects(area, records.len())) {
        let visible = card.intersection(area);
        if visible.is_empty() || visible != card {
            continue;
        }
        render_card(buf, card, record, theme);
    }
}

/// Plain-text rendering of the card grid, one string per terminal row.
pub fn grid_lines(records: &[VehicleRecord], width: u16, theme: &ThemeConfig) -> Vec<String> {
    let area = Rect::new(0, 0, width, grid_height(width, records.len()));
    let mut buf = Buffer::empty(area);
    render_grid(&mut buf, area, records, theme);
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol()))
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

fn render_card(buf: &mut Buffer, card: Rect, record: &VehicleRecord, theme: &ThemeConfig) {
    let colors = theme.cards.colors(record.card_style());
    let fill = Style::default().fg(colors.text).bg(colors.fill);

    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(colors.border).bg(colors.fill))
        .style(fill)
        .render(card, buf);

    let layout = card_layout(card);
    let thumb = Text::from(vec![
        Line::from(Span::styled(
            country_tag(&record.country),
            fill.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            record.identifying_name.clone(),
            fill.add_modifier(Modifier::DIM),
        )),
    ]);
    Paragraph::new(thumb).style(fill).render(layout.thumb, buf);

    Paragraph::new(record.display_name())
        .style(fill.add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .render(layout.name, buf);
    Paragraph::new(record.rating_label())
        .style(fill)
        .alignment(Alignment::Center)
        .render(layout.rating, buf);
}

/// Renders the status bar at the bottom.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);
    let shortcuts = Line::from(vec![
        Span::styled("Tab ", key_style),
        Span::raw("pane  "),
        Span::styled("Ctrl+Y ", key_style),
        Span::raw("copy  "),
        Span::styled("Ctrl+S ", key_style),
        Span::raw("shot  "),
        Span::styled("Ctrl+C ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(Paragraph::new(shortcuts).style(bar_style), chunks[0]);

    let status = match (&app.status_note, app.phase) {
        (Some(note), _) => Span::styled(note.clone(), app.theme.status),
        (None, SearchPhase::Searching) => Span::raw("Searching…"),
        (None, SearchPhase::Success) => Span::raw(format!("Vehicles: {}", app.vehicles.len())),
        (None, _) => Span::raw(""),
    };
    f.render_widget(
        Paragraph::new(Line::from(status))
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    f.render_widget(
        Paragraph::new(app.app_version.as_str())
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(60).saturating_sub(4);
    let popup_height = 22.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(BorderType::Double)
        .title_style(app.theme.title);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: &[(&str, &str)]| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{key: <16}"), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "Name input",
        &[
            ("Enter", "search"),
            ("Ctrl+U", "clear name"),
            ("Ctrl+W", "delete word"),
            ("Ctrl+A | E", "start | end of line"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Results",
        &[
            ("↑ ↓ PgUp PgDn", "scroll"),
            ("c", "copy first five names"),
            ("s", "save screenshot.png"),
            ("q", "quit"),
        ],
    ));
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Anywhere",
        &[
            ("Tab", "switch pane"),
            ("Ctrl+Y | Ctrl+S", "copy | screenshot"),
            ("Mouse", "buttons, focus, wheel scroll"),
            ("Esc | ?", "close help"),
            ("Ctrl+C", "quit"),
        ],
    ));

    f.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        popup_rect,
    );
}

/// Calculates the terminal cell width offset for a given character index.
/// Uses `unicode-width` to correctly handle multibyte and multi-cell characters.
pub fn name_cursor_offset(text: &str, cursor: usize) -> u16 {
    text.chars()
        .take(cursor)
        .filter_map(|c| c.width())
        .map(|w| w as u16)
        .sum::<u16>()
}

/// Horizontal viewport offset that keeps the cursor visible in the input.
pub fn name_horizontal_scroll(text: &str, cursor: usize, visible_width: u16) -> u16 {
    if visible_width == 0 {
        return 0;
    }
    name_cursor_offset(text, cursor).saturating_sub(visible_width.saturating_sub(1))
}

pub fn name_cursor_for_column(text: &str, target_column: u16) -> usize {
    let mut width = 0u16;
    for (idx, ch) in text.chars().enumerate() {
        let char_width = ch.width().unwrap_or(0) as u16;
        if width + char_width > target_column {
            return idx;
        }
        width += char_width;
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{player, vehicle};
    use crate::theme::Theme;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut text = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = buf.cell((x, y)) {
                    text.push_str(cell.symbol());
                }
            }
            text.push('\n');
        }
        text
    }

    fn draw(app: &mut AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn make_app() -> AppState {
        AppState::new(Theme::Dracula.config(), "v0.1.0".to_string())
    }

    #[test]
    fn test_grid_columns_by_width() {
        assert_eq!(grid_columns(40), 1);
        assert_eq!(grid_columns(60), 2);
        assert_eq!(grid_columns(100), 3);
        assert_eq!(grid_columns(200), 4);
    }

    #[test]
    fn test_grid_height_rounds_rows_up() {
        assert_eq!(grid_height(100, 0), 0);
        assert_eq!(grid_height(100, 3), CARD_HEIGHT);
        assert_eq!(grid_height(100, 4), CARD_HEIGHT * 2);
    }

    #[test]
    fn test_card_rects_fill_rows_left_to_right() {
        let rects = card_rects(Rect::new(2, 0, 90, 100), 4);
        assert_eq!(rects[0], Rect::new(2, 0, 30, CARD_HEIGHT));
        assert_eq!(rects[2], Rect::new(62, 0, 30, CARD_HEIGHT));
        assert_eq!(rects[3], Rect::new(2, CARD_HEIGHT, 30, CARD_HEIGHT));
    }

    #[test]
    fn test_card_layout_inside_borders() {
        let layout = card_layout(Rect::new(0, 0, 20, CARD_HEIGHT));
        assert_eq!(layout.thumb, Rect::new(1, 1, 18, THUMB_ROWS));
        assert_eq!(layout.name.y, 1 + THUMB_ROWS);
        assert_eq!(layout.rating.y, 2 + THUMB_ROWS);
    }

    #[test]
    fn test_country_tag() {
        assert_eq!(country_tag("country_germany"), "GERMANY");
        assert_eq!(country_tag("ussr"), "USSR");
    }

    #[test]
    fn test_render_grid_uses_card_colors() {
        let theme = Theme::Dracula.config();
        let mut premium = vehicle("p", "Tiger II (H)", 5, 6.7);
        premium.premium = true;
        let records = vec![premium, vehicle("r", "M4A1", 2, 3.3)];
        let area = Rect::new(0, 0, 60, CARD_HEIGHT);
        let mut buf = Buffer::empty(area);

        render_grid(&mut buf, area, &records, &theme);

        let text = buffer_text(&buf);
        assert!(text.contains("Tiger II (H)"));
        assert!(text.contains("BR: 6.7 (Rank: 5)"));
        assert!(text.contains("BR: 3.3 (Rank: 2)"));
        let name_y = 1 + THUMB_ROWS;
        let premium_fill = theme.cards.premium.fill;
        let regular_fill = theme.cards.regular.fill;
        assert_eq!(buf.cell((5, name_y)).map(|c| c.bg), Some(premium_fill));
        assert_eq!(buf.cell((35, name_y)).map(|c| c.bg), Some(regular_fill));
    }

    #[test]
    fn test_render_grid_skips_cards_outside_area() {
        let theme = Theme::Dracula.config();
        let records: Vec<_> = (0..4)
            .map(|i| vehicle(&format!("v{i}"), &format!("Tank {i}"), 1, 1.0))
            .collect();
        let area = Rect::new(0, 0, 40, CARD_HEIGHT);
        let mut buf = Buffer::empty(area);

        render_grid(&mut buf, area, &records, &theme);

        let text = buffer_text(&buf);
        assert!(text.contains("Tank 0"));
        assert!(!text.contains("Tank 1"));
    }

    #[test]
    fn test_grid_lines_plain_text() {
        let theme = Theme::Dracula.config();
        let records = vec![vehicle("a", "Panther D", 4, 5.7)];
        let lines = grid_lines(&records, 40, &theme);

        assert_eq!(lines.len(), CARD_HEIGHT as usize);
        assert!(lines.iter().any(|l| l.contains("Panther D")));
        assert!(lines.iter().any(|l| l.contains("USA")));
        assert!(grid_lines(&[], 40, &theme).is_empty());
    }

    #[test]
    fn test_ui_records_areas_and_shows_results() {
        let mut app = make_app();
        app.player = Some(player("1", "pilot"));
        app.vehicles = vec![vehicle("a", "Panther D", 4, 5.7)];
        app.phase = SearchPhase::Success;

        let text = draw(&mut app, 100, 30);

        assert!(text.contains("Panther D"));
        assert!(text.contains("BR: 5.7 (Rank: 4)"));
        assert!(text.contains("Vehicles (1)"));
        assert!(app.search_button_area.is_some());
        assert!(app.copy_button_area.is_some());
        assert!(text.contains("Screenshot"));
        assert!(app.results_area.is_some());
        assert_eq!(app.results_grid_width, 96);
    }

    #[test]
    fn test_ui_shows_field_error_and_banner() {
        let mut app = make_app();
        app.submit();
        app.error_message = Some("No player with this name was found.".to_string());

        let text = draw(&mut app, 100, 20);

        assert!(text.contains("This field is required"));
        assert!(text.contains("No player with this name was found."));
    }

    #[test]
    fn test_ui_hides_export_buttons_without_results() {
        let mut app = make_app();
        let text = draw(&mut app, 100, 20);
        assert!(!text.contains("Copy names"));
        assert!(app.copy_button_area.is_none());
        assert!(app.screenshot_button_area.is_none());
    }

    #[test]
    fn test_ui_help_overlay() {
        let mut app = make_app();
        app.show_help = true;
        let text = draw(&mut app, 80, 30);
        assert!(text.contains("Help"));
        assert!(text.contains("copy first five names"));
    }

    #[test]
    fn test_ui_tiny_terminal_does_not_panic() {
        let mut app = make_app();
        app.vehicles = vec![vehicle("a", "A", 1, 1.0)];
        draw(&mut app, 10, 4);
    }

    #[test]
    fn test_name_cursor_helpers() {
        assert_eq!(name_cursor_offset("ab界c", 3), 4);
        assert_eq!(name_horizontal_scroll("abcdefgh", 8, 5), 4);
        assert_eq!(name_horizontal_scroll("abc", 3, 0), 0);
        assert_eq!(name_cursor_for_column("ab界c", 3), 2);
        assert_eq!(name_cursor_for_column("abc", 10), 3);
    }
}
