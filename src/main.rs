use std::io;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use gamerec_tui::api::ApiClient;
use gamerec_tui::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use gamerec_tui::app_core::reducer;
use gamerec_tui::app_core::state::{AppAction, AppState};
use gamerec_tui::theme::Theme;
use gamerec_tui::ui;

/// Terminal client for a game recommendation search service.
#[derive(Parser, Debug)]
#[command(name = "gamerec-tui", version, about)]
struct Args {
    /// Backend base URL. Overrides the GAMEREC_API_URL environment variable.
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Color theme: dracula, solarized, gruvbox.
    #[arg(long, default_value = "dracula")]
    theme: Theme,

    /// Query to search for on startup.
    query: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let api = ApiClient::new(ApiClient::resolve_base_url(args.api_url.as_deref()))?;
    let mut app = AppState::new(
        args.theme.config(),
        api.base_url().to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    if let Some(query) = args.query {
        app.query_text = query.clone();
        app.query_move_to_end();
        app.pending_action = Some(AppAction::Search(query));
    }

    // Restore the terminal even if rendering panics.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, &api);
    restore_terminal()?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Draw-on-event main loop. Blocks on the next terminal event; actions the
/// reducer queues are executed between the event and the following draw.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    api: &ApiClient,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        if let Some(action) = app.pending_action.take() {
            handle_action(terminal, app, api, action)?;
        }
        terminal.draw(|frame| ui::draw(frame, app))?;
        if app.should_quit {
            return Ok(());
        }

        match event::read()? {
            Event::Key(key) => {
                if let Some(converted) = convert_key(key) {
                    reducer::handle_key_event(app, converted);
                }
            }
            Event::Mouse(mouse) => {
                if let Some(converted) = convert_mouse(mouse) {
                    reducer::handle_mouse_event(app, converted);
                }
            }
            Event::Resize(..) => {}
            _ => {}
        }
    }
}

fn handle_action<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    api: &ApiClient,
    action: AppAction,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    match action {
        AppAction::Search(text) => search_with_ui(terminal, app, api, &text),
    }
}

/// Runs one blocking search, drawing the loading state first so the user
/// sees it while the request is in flight.
fn search_with_ui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    api: &ApiClient,
    text: &str,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    app.begin_search();
    terminal.draw(|frame| ui::draw(frame, app))?;
    let result = api.search(text);
    app.finish_search(result);
    Ok(())
}

fn convert_key(key: KeyEvent) -> Option<AppKeyEvent> {
    let code = match key.code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        KeyCode::Backspace => AppKeyCode::Backspace,
        _ => return None,
    };
    Some(AppKeyEvent {
        code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
        is_release: key.kind == KeyEventKind::Release,
    })
}

fn convert_mouse(mouse: MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => AppMouseKind::LeftDown,
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

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use gamerec_tui::model::Game;
    use ratatui::backend::TestBackend;

    fn test_app() -> AppState {
        AppState::new(
            Theme::Dracula.config(),
            "http://localhost:8000".to_string(),
            "0.1.0".to_string(),
        )
    }

    #[test]
    fn test_convert_key_extracts_modifiers() {
        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        let converted = convert_key(key).unwrap();
        assert_eq!(converted.code, AppKeyCode::Char('u'));
        assert!(converted.ctrl);
        assert!(!converted.alt);
        assert!(!converted.is_release);
    }

    #[test]
    fn test_convert_key_ignores_unmapped_codes() {
        let key = KeyEvent::new(KeyCode::F(5), KeyModifiers::NONE);
        assert!(convert_key(key).is_none());
    }

    #[test]
    fn test_convert_mouse_maps_clicks_and_scrolls() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        let converted = convert_mouse(click).unwrap();
        assert_eq!(converted.kind, AppMouseKind::LeftDown);
        assert_eq!((converted.column, converted.row), (4, 7));

        let drag = MouseEvent {
            kind: MouseEventKind::Drag(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(convert_mouse(drag).is_none());
    }

    #[test]
    fn test_search_action_runs_against_any_backend() {
        // Instantiates the generic runtime path with a non-crossterm
        // backend; port 9 (discard) refuses the connection, so the search
        // errors out and the loading flag must still be cleared.
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();

        handle_action(
            &mut terminal,
            &mut app,
            &api,
            AppAction::Search("portal".to_string()),
        )
        .unwrap();
        assert!(!app.searching);
        assert!(app.notification.is_some());
        assert!(app.games.is_empty());
    }

    #[test]
    fn test_submit_query_queues_a_search_action() {
        let mut app = test_app();
        app.query_text = "cozy farming".to_string();
        app.submit_query();
        match app.pending_action {
            Some(AppAction::Search(ref text)) => assert_eq!(text, "cozy farming"),
            _ => panic!("expected a queued search"),
        }
    }

    #[test]
    fn test_failed_search_clears_loading_and_keeps_results() {
        let mut app = test_app();
        app.set_results(vec![Game {
            name: "Portal".to_string(),
            ..Default::default()
        }]);

        app.begin_search();
        assert!(app.searching);
        app.finish_search(Err(anyhow!("text too long")));
        assert!(!app.searching);
        assert_eq!(app.notification.as_deref(), Some("text too long"));
        assert_eq!(app.games.len(), 1);
    }

    #[test]
    fn test_successful_search_replaces_results_and_resets_selection() {
        let mut app = test_app();
        app.set_results(vec![
            Game {
                name: "Old".to_string(),
                ..Default::default()
            },
            Game {
                name: "Older".to_string(),
                ..Default::default()
            },
        ]);
        app.list_state.select(Some(1));

        app.begin_search();
        app.finish_search(Ok(vec![Game {
            name: "New".to_string(),
            ..Default::default()
        }]));
        assert!(!app.searching);
        assert_eq!(app.games.len(), 1);
        assert_eq!(app.games[0].name, "New");
        assert_eq!(app.list_state.selected(), Some(0));
        assert!(app.cards_dirty);
    }
}
