//! # thunder-lineup
//!
//! Look up a War Thunder player's vehicle lineup from the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use thunder_lineup::app_core::export::{
    CLIPBOARD_LIMIT, ExportError, ResultsRegion, SCREENSHOT_FILE_NAME, clipboard_text,
    copy_results, export_screenshot,
};
use thunder_lineup::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use thunder_lineup::app_core::reducer;
use thunder_lineup::app_core::state::{
    AppAction, AppState, NOTHING_TO_EXPORT_NOTE, SearchEvent, SearchPhase,
};
use thunder_lineup::app_core::workflow::{
    GENERIC_FAILURE_MESSAGE, NOT_FOUND_MESSAGE, REFRESH_PENDING_MESSAGE, SearchOutcome,
    SearchProgress, run_search,
};
use thunder_lineup::runtime::native::data::{self, DEFAULT_API_BASE, HttpStatsApi};
use thunder_lineup::runtime::native::export::{DEFAULT_SCALE, Osc52Clipboard, PngCapture};
use thunder_lineup::runtime::native::{logging, worker};
use thunder_lineup::{theme, ui};
use tracing::{error, info, warn};

use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

/// Width used for `--print` output.
const PRINT_WIDTH: u16 = 100;
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "thunder-lineup: look up a War Thunder player's vehicles by nickname.\n\
                  Shows the deduplicated lineup sorted by rank and battle rating, copies the top\n\
                  five names to the clipboard and saves a PNG screenshot of the card grid."
)]
struct Args {
    /// Prefill the player name and search on start
    #[arg(short, long)]
    name: Option<String>,

    /// Search once, print the lineup to stdout and exit
    #[arg(short, long, value_name = "NAME")]
    print: Option<String>,

    /// Base URL of the statistics site
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Request timeout in seconds (0 disables)
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Directory for screenshot.png
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Screenshot scale factor
    #[arg(long, default_value_t = DEFAULT_SCALE)]
    scale: f32,

    /// UI theme (dracula, gruvbox, solarized)
    #[arg(short, long)]
    theme: Option<String>,

    /// Show the paths used by the application (log file, screenshot) and exit
    #[arg(long)]
    config: bool,
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let key_code = match code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::SUPER),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        is_release: false,
    })
}

fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        _ => return None,
    };
    Some(AppMouseEvent {
        kind,
        column: mouse.column,
        row: mouse.row,
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    let theme_name = args.theme.as_deref().unwrap_or("dracula");
    let theme = theme::Theme::from_str(theme_name)
        .map_err(anyhow::Error::msg)?
        .config();

    let data_dir = data::get_data_dir()?;
    let log_path = logging::log_path()?;

    if args.config {
        println!("App Paths:");
        println!("  Data:       {}", data_dir.display());
        println!("  Log:        {}", log_path.display());
        println!(
            "  Screenshot: {}",
            args.out_dir.join(SCREENSHOT_FILE_NAME).display()
        );
        println!("  API base:   {}", args.api_base);
        return Ok(());
    }

    logging::init_tracing(&log_path)?;
    info!(version = %app_version, api_base = %args.api_base, "thunder-lineup starting");

    let timeout = (args.timeout > 0).then(|| Duration::from_secs(args.timeout));
    let api = Arc::new(HttpStatsApi::new(&args.api_base, timeout)?);

    if let Some(name) = &args.print {
        return print_lineup(api.as_ref(), name, &theme);
    }

    let mut runtime = Runtime {
        api: api.clone(),
        capture: PngCapture::new(api, theme.clone(), args.scale),
        out_dir: args.out_dir.clone(),
        events: mpsc::channel(),
    };

    let mut app = AppState::new(theme, app_version);
    if let Some(name) = &args.name {
        app.set_name(name);
        app.submit();
    }

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut runtime);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = %err, "application error");
    }
    info!("thunder-lineup exiting");
    res
}

/// Headless `--print` mode: one search, lineup on stdout, error exit on failure.
fn print_lineup(api: &HttpStatsApi, name: &str, theme: &theme::ThemeConfig) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Player name must not be empty");
    }

    let mut player = None;
    let outcome = run_search(api, name, |progress| {
        let SearchProgress::PlayerResolved(resolved) = progress;
        player = Some(resolved);
    });

    match outcome {
        SearchOutcome::Found(records) => {
            if let Some(player) = player {
                println!("{} (#{}): {} vehicles", player.name, player.user_id, records.len());
            }
            for line in ui::grid_lines(&records, PRINT_WIDTH, theme) {
                println!("{line}");
            }
            println!();
            println!("{}", clipboard_text(&records));
            Ok(())
        }
        SearchOutcome::NotFound => anyhow::bail!(NOT_FOUND_MESSAGE),
        SearchOutcome::RefreshPending => anyhow::bail!(REFRESH_PENDING_MESSAGE),
        SearchOutcome::Failed(message) => anyhow::bail!(message),
    }
}

/// Native services the action handler needs besides the state.
struct Runtime {
    api: Arc<HttpStatsApi>,
    capture: PngCapture<HttpStatsApi>,
    out_dir: PathBuf,
    events: (Sender<SearchEvent>, Receiver<SearchEvent>),
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    runtime: &mut Runtime,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut needs_draw = true;

    loop {
        if let Some(action) = app.pending_action.take() {
            handle_action(terminal, app, runtime, action)?;
            needs_draw = true;
        }
        if app.should_quit {
            break;
        }

        while let Ok(event) = runtime.events.1.try_recv() {
            needs_draw |= app.apply_search_event(event);
        }

        if needs_draw {
            terminal.draw(|f| ui::ui(f, app))?;
            needs_draw = false;
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if let Some(event) = crossterm_to_app_key_event(key.code, key.modifiers, key.kind)
                {
                    reducer::handle_key_event(app, event);
                    needs_draw = true;
                }
            }
            Event::Mouse(mouse) => {
                if let Some(event) = crossterm_to_app_mouse_event(&mouse) {
                    needs_draw |= reducer::handle_mouse_event(app, event);
                    needs_draw |= app.pending_action.is_some();
                }
            }
            Event::Resize(_, _) => needs_draw = true,
            _ => {}
        }
    }
    Ok(())
}

fn handle_action<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    runtime: &mut Runtime,
    action: AppAction,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    match action {
        AppAction::Submit { name, generation } => {
            let spawned = worker::spawn_search(
                runtime.api.clone(),
                name,
                generation,
                runtime.events.0.clone(),
            );
            if let Err(err) = spawned {
                error!(generation, error = %err, "failed to start search worker");
                app.error_message = Some(GENERIC_FAILURE_MESSAGE.to_string());
                app.phase = SearchPhase::Failed;
            }
        }
        AppAction::Copy => {
            let mut clipboard = Osc52Clipboard::new(io::stdout());
            match copy_results(&app.vehicles, &mut clipboard) {
                Ok(_) => {
                    let count = app.vehicles.len().min(CLIPBOARD_LIMIT);
                    app.set_status(format!("Copied {count} names to clipboard"));
                }
                Err(err) => {
                    warn!(error = %err, "clipboard export failed");
                    app.set_status(format!("Copy failed: {err}"));
                }
            }
        }
        AppAction::Screenshot => {
            app.set_status("Capturing…");
            terminal.draw(|f| ui::ui(f, app))?;

            let region = ResultsRegion {
                records: &app.vehicles,
                width: app.results_grid_width,
            };
            let result = export_screenshot(&region, &mut runtime.capture, &runtime.out_dir);
            match result {
                Ok(path) => app.set_status(format!("Saved {}", path.display())),
                Err(ExportError::NothingToExport) => app.set_status(NOTHING_TO_EXPORT_NOTE),
                Err(err) => {
                    warn!(error = %err, "screenshot export failed");
                    app.set_status(format!("Screenshot failed: {err}"));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_adapter_maps_modifiers() {
        let event = crossterm_to_app_key_event(
            KeyCode::Char('y'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        )
        .unwrap();
        assert_eq!(event.code, AppKeyCode::Char('y'));
        assert!(event.ctrl);
        assert!(!event.alt);
    }

    #[test]
    fn test_key_adapter_skips_release_and_unknown_keys() {
        assert!(
            crossterm_to_app_key_event(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release)
                .is_none()
        );
        assert!(
            crossterm_to_app_key_event(KeyCode::F(1), KeyModifiers::NONE, KeyEventKind::Press)
                .is_none()
        );
    }

    #[test]
    fn test_mouse_adapter() {
        let mouse = event::MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 4,
            row: 9,
            modifiers: KeyModifiers::NONE,
        };
        let event = crossterm_to_app_mouse_event(&mouse).unwrap();
        assert_eq!(event.kind, AppMouseKind::ScrollDown);
        assert_eq!((event.column, event.row), (4, 9));

        let moved = event::MouseEvent {
            kind: MouseEventKind::Moved,
            ..mouse
        };
        assert!(crossterm_to_app_mouse_event(&moved).is_none());
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["thunder-lineup"]);
        assert_eq!(args.api_base, DEFAULT_API_BASE);
        assert_eq!(args.timeout, 30);
        assert_eq!(args.scale, DEFAULT_SCALE);
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert!(args.print.is_none());
    }
}
