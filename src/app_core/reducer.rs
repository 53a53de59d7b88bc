//! Event reducer: pure-ish handlers for key and mouse events.
//!
//! The binary converts crossterm events to [`AppKeyEvent`] /
//! [`AppMouseEvent`] and calls these functions. Network work never happens
//! here; submitting a query only sets `pending_action` for the runtime.

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, FocusPane, InputMode};
use crate::ui;

pub const SCROLL_LINES: u16 = 1;

/// Returns the pane that contains the given cell coordinates, if any.
pub fn pane_at(app: &AppState, column: u16, row: u16) -> Option<FocusPane> {
    if let Some(area) = app.search_area
        && area.contains((column, row).into())
    {
        return Some(FocusPane::Search);
    }
    if let Some(area) = app.results_area
        && area.contains((column, row).into())
    {
        return Some(FocusPane::Results);
    }
    None
}

/// Handle a key event, mutating `app` in place.
///
/// May set `app.pending_action`; the runtime is responsible for acting on it
/// after this function returns.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    if event.is_release {
        return;
    }

    // Error notifications are transient: any keypress dismisses them.
    app.notification = None;

    let code = event.code;
    let ctrl = event.ctrl;
    let alt = event.alt;

    if app.detail_open {
        match code {
            AppKeyCode::Esc | AppKeyCode::Char('q') | AppKeyCode::Enter => app.close_detail(),
            AppKeyCode::Up => app.scroll_detail_up(SCROLL_LINES),
            AppKeyCode::Down => app.scroll_detail_down(SCROLL_LINES),
            AppKeyCode::PageUp => app.scroll_detail_up(10),
            AppKeyCode::PageDown => app.scroll_detail_down(10),
            AppKeyCode::Home => app.detail_scroll = 0,
            AppKeyCode::End => app.detail_scroll = app.detail_max_scroll,
            _ => {}
        }
        return;
    }

    if app.show_help {
        if matches!(code, AppKeyCode::Char('?') | AppKeyCode::Esc) {
            app.show_help = false;
        }
        return;
    }

    if code == AppKeyCode::Tab || code == AppKeyCode::BackTab {
        app.focus_next_pane();
        return;
    }

    match app.input_mode {
        InputMode::Normal => match code {
            AppKeyCode::Char('q') => app.should_quit = true,
            AppKeyCode::Char('/') => app.focus_pane(FocusPane::Search),
            AppKeyCode::Char('?') => app.show_help = true,
            AppKeyCode::Enter => app.open_detail(),
            AppKeyCode::Up => app.move_selection(-1),
            AppKeyCode::Down => app.move_selection(1),
            AppKeyCode::Home => {
                if !app.games.is_empty() {
                    app.list_state.select(Some(0));
                }
            }
            AppKeyCode::End => {
                let len = app.games.len();
                if len > 0 {
                    app.list_state.select(Some(len - 1));
                }
            }
            AppKeyCode::PageUp => {
                let page = page_size(app);
                let current = app.list_state.selected().unwrap_or(0);
                app.list_state.select(Some(current.saturating_sub(page)));
                app.clamp_selection();
            }
            AppKeyCode::PageDown => {
                let page = page_size(app);
                let current = app.list_state.selected().unwrap_or(0);
                let len = app.games.len();
                if len > 0 {
                    app.list_state.select(Some((current + page).min(len - 1)));
                }
            }
            AppKeyCode::Char(c) if c.is_alphanumeric() && !ctrl && !alt => {
                // Typing anywhere starts a new query.
                app.focus_pane(FocusPane::Search);
                app.query_move_to_end();
                app.query_add_char(c);
            }
            _ => {}
        },
        InputMode::Editing => match code {
            AppKeyCode::Enter => app.submit_query(),
            AppKeyCode::Esc => {
                app.history_index = None;
                app.focus_pane(FocusPane::Results);
            }
            AppKeyCode::Char('u') if ctrl => app.query_clear(),
            AppKeyCode::Char('w') if ctrl => app.query_delete_word(),
            AppKeyCode::Char('a') if ctrl => app.query_move_to_start(),
            AppKeyCode::Char('e') if ctrl => app.query_move_to_end(),
            AppKeyCode::Char(c) if !ctrl => {
                app.history_index = None;
                app.query_add_char(c);
            }
            AppKeyCode::Backspace => {
                app.history_index = None;
                app.query_backspace();
            }
            AppKeyCode::Delete => {
                app.history_index = None;
                app.query_delete();
            }
            AppKeyCode::Up => {
                if !app.query_history.is_empty() {
                    match app.history_index {
                        None => {
                            app.stashed_input = app.query_text.clone();
                            app.history_index = Some(app.query_history.len() - 1);
                        }
                        Some(idx) if idx > 0 => {
                            app.history_index = Some(idx - 1);
                        }
                        _ => {}
                    }
                    if let Some(idx) = app.history_index {
                        app.query_text = app.query_history[idx].clone();
                        app.query_move_to_end();
                    }
                }
            }
            AppKeyCode::Down => {
                if let Some(idx) = app.history_index {
                    if idx < app.query_history.len() - 1 {
                        app.history_index = Some(idx + 1);
                        app.query_text = app.query_history[idx + 1].clone();
                    } else {
                        app.history_index = None;
                        app.query_text = app.stashed_input.clone();
                    }
                    app.query_move_to_end();
                }
            }
            AppKeyCode::Left => app.query_move_cursor_left(),
            AppKeyCode::Right => app.query_move_cursor_right(),
            AppKeyCode::Home => app.query_move_to_start(),
            AppKeyCode::End => app.query_move_to_end(),
            _ => {}
        },
    }
}

fn page_size(app: &AppState) -> usize {
    // Cards are several rows tall; a "page" moves by roughly the number of
    // cards visible in the results pane.
    let rows = app
        .results_content_area
        .map(|area| area.height)
        .unwrap_or(12) as usize;
    (rows / 6).max(1)
}

/// Handle a mouse event in terminal cell coordinates.
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    let mut transitioned = false;
    if app.notification.is_some() {
        app.notification = None;
        transitioned = true;
    }

    if app.detail_open {
        match event.kind {
            AppMouseKind::ScrollUp => {
                app.scroll_detail_up(SCROLL_LINES);
                return true;
            }
            AppMouseKind::ScrollDown => {
                app.scroll_detail_down(SCROLL_LINES);
                return true;
            }
            AppMouseKind::LeftDown => {
                // Clicking the backdrop dismisses the overlay.
                let inside = app
                    .detail_area
                    .map(|area| area.contains((event.column, event.row).into()))
                    .unwrap_or(false);
                if !inside {
                    app.close_detail();
                }
                return true;
            }
        }
    }

    let column = event.column;
    let row = event.row;
    let hovered_pane = pane_at(app, column, row);

    if matches!(event.kind, AppMouseKind::ScrollUp | AppMouseKind::ScrollDown) {
        if hovered_pane == Some(FocusPane::Results) && !app.games.is_empty() {
            let direction = if event.kind == AppMouseKind::ScrollDown {
                1
            } else {
                -1
            };
            for _ in 0..SCROLL_LINES {
                app.move_selection(direction);
            }
            transitioned = true;
        }
        return transitioned;
    }

    if event.kind == AppMouseKind::LeftDown {
        if let Some(pane) = hovered_pane {
            let previous_focus = app.focused_pane;
            let previous_mode = app.input_mode;
            app.focus_pane(pane);
            if app.focused_pane != previous_focus || app.input_mode != previous_mode {
                transitioned = true;
            }
        }

        if hovered_pane == Some(FocusPane::Results)
            && let Some(content_area) = app.results_content_area
            && content_area.contains((column, row).into())
            && !app.games.is_empty()
            && let Some(clicked) = card_at_row(app, content_area.y, row)
        {
            // A click both selects the card and opens its detail overlay.
            app.list_state.select(Some(clicked));
            app.open_detail();
            transitioned = true;
        }

        if hovered_pane == Some(FocusPane::Search)
            && let Some(input_area) = app.search_input_area
            && input_area.contains((column, row).into())
        {
            let horizontal_scroll =
                ui::query_horizontal_scroll(&app.query_text, app.query_cursor, input_area.width);
            let local_x = column.saturating_sub(input_area.x);
            let target_column = horizontal_scroll + local_x;
            let new_cursor = ui::query_cursor_for_column(&app.query_text, target_column);
            if new_cursor != app.query_cursor {
                app.query_cursor = new_cursor;
                transitioned = true;
            }
        }
    }

    transitioned
}

/// Maps a clicked row to a card index, walking the variable-height cards
/// from the list's current scroll offset.
fn card_at_row(app: &AppState, content_top: u16, row: u16) -> Option<usize> {
    let mut cursor = content_top;
    for idx in app.list_state.offset()..app.cached_cards.len() {
        let height = app.cached_cards[idx].height() as u16;
        if row < cursor + height {
            return Some(idx.min(app.games.len().saturating_sub(1)));
        }
        cursor = cursor.saturating_add(height);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::input::AppKeyEvent;
    use crate::app_core::state::AppAction;
    use crate::model::Game;
    use crate::theme::Theme;
    use ratatui::layout::Rect;

    fn test_app() -> AppState {
        AppState::new(
            Theme::Dracula.config(),
            "http://localhost:8000".to_string(),
            "0.1.0".to_string(),
        )
    }

    fn named_game(name: &str) -> Game {
        Game {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn press(app: &mut AppState, code: AppKeyCode) {
        handle_key_event(app, AppKeyEvent::new(code));
    }

    fn type_str(app: &mut AppState, text: &str) {
        for c in text.chars() {
            press(app, AppKeyCode::Char(c));
        }
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut app = test_app();
        let mut event = AppKeyEvent::new(AppKeyCode::Char('x'));
        event.is_release = true;
        handle_key_event(&mut app, event);
        assert_eq!(app.query_text, "");
    }

    #[test]
    fn test_any_key_dismisses_notification() {
        let mut app = test_app();
        app.notification = Some("text too long".to_string());
        press(&mut app, AppKeyCode::Left);
        assert!(app.notification.is_none());
    }

    #[test]
    fn test_enter_submits_and_moves_focus_to_results() {
        let mut app = test_app();
        type_str(&mut app, "roguelike");
        press(&mut app, AppKeyCode::Enter);
        assert!(matches!(app.pending_action, Some(AppAction::Search(ref t)) if t == "roguelike"));
        assert_eq!(app.focused_pane, FocusPane::Results);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_submit_is_ignored_while_searching() {
        let mut app = test_app();
        type_str(&mut app, "first");
        app.searching = true;
        press(&mut app, AppKeyCode::Enter);
        assert!(app.pending_action.is_none());
    }

    #[test]
    fn test_history_recall_up_and_down() {
        let mut app = test_app();
        type_str(&mut app, "first");
        press(&mut app, AppKeyCode::Enter);
        app.pending_action = None;
        app.focus_pane(FocusPane::Search);
        app.query_clear();
        type_str(&mut app, "second");
        press(&mut app, AppKeyCode::Enter);
        app.pending_action = None;
        app.focus_pane(FocusPane::Search);
        app.query_clear();

        type_str(&mut app, "draft");
        press(&mut app, AppKeyCode::Up);
        assert_eq!(app.query_text, "second");
        press(&mut app, AppKeyCode::Up);
        assert_eq!(app.query_text, "first");
        // Walking past the oldest entry stays there.
        press(&mut app, AppKeyCode::Up);
        assert_eq!(app.query_text, "first");
        press(&mut app, AppKeyCode::Down);
        assert_eq!(app.query_text, "second");
        // Walking below the newest entry restores the stashed draft.
        press(&mut app, AppKeyCode::Down);
        assert_eq!(app.query_text, "draft");
        assert!(app.history_index.is_none());
    }

    #[test]
    fn test_typing_resets_history_position() {
        let mut app = test_app();
        app.query_history = vec!["first".to_string()];
        press(&mut app, AppKeyCode::Up);
        assert_eq!(app.history_index, Some(0));
        press(&mut app, AppKeyCode::Char('!'));
        assert!(app.history_index.is_none());
        assert_eq!(app.query_text, "first!");
    }

    #[test]
    fn test_typing_in_results_pane_starts_a_new_query() {
        let mut app = test_app();
        app.focus_pane(FocusPane::Results);
        press(&mut app, AppKeyCode::Char('z'));
        assert_eq!(app.focused_pane, FocusPane::Search);
        assert_eq!(app.query_text, "z");
    }

    #[test]
    fn test_q_quits_only_in_normal_mode() {
        let mut app = test_app();
        press(&mut app, AppKeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.query_text, "q");

        app.focus_pane(FocusPane::Results);
        press(&mut app, AppKeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_detail_overlay_keys() {
        let mut app = test_app();
        app.set_results(vec![named_game("Portal"), named_game("Portal 2")]);
        app.focus_pane(FocusPane::Results);
        press(&mut app, AppKeyCode::Enter);
        assert!(app.detail_open);

        app.detail_max_scroll = 20;
        press(&mut app, AppKeyCode::Down);
        assert_eq!(app.detail_scroll, SCROLL_LINES);
        press(&mut app, AppKeyCode::End);
        assert_eq!(app.detail_scroll, 20);
        press(&mut app, AppKeyCode::Home);
        assert_eq!(app.detail_scroll, 0);
        press(&mut app, AppKeyCode::Esc);
        assert!(!app.detail_open);
    }

    #[test]
    fn test_selection_navigation_and_bounds() {
        let mut app = test_app();
        app.set_results(vec![
            named_game("A"),
            named_game("B"),
            named_game("C"),
        ]);
        app.focus_pane(FocusPane::Results);
        assert_eq!(app.list_state.selected(), Some(0));
        press(&mut app, AppKeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(1));
        press(&mut app, AppKeyCode::End);
        assert_eq!(app.list_state.selected(), Some(2));
        press(&mut app, AppKeyCode::Down);
        assert_eq!(app.list_state.selected(), Some(2));
        press(&mut app, AppKeyCode::Home);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_mouse_scroll_over_results_moves_selection() {
        let mut app = test_app();
        app.set_results(vec![named_game("A"), named_game("B")]);
        app.results_area = Some(Rect::new(0, 3, 80, 20));
        app.results_content_area = Some(Rect::new(1, 4, 78, 18));

        let scrolled = handle_mouse_event(
            &mut app,
            AppMouseEvent {
                kind: AppMouseKind::ScrollDown,
                column: 10,
                row: 10,
            },
        );
        assert!(scrolled);
        assert_eq!(app.list_state.selected(), Some(1));

        // Scrolling outside the results pane does nothing.
        let outside = handle_mouse_event(
            &mut app,
            AppMouseEvent {
                kind: AppMouseKind::ScrollDown,
                column: 10,
                row: 1,
            },
        );
        assert!(!outside);
        assert_eq!(app.list_state.selected(), Some(1));
    }

    #[test]
    fn test_click_on_card_selects_and_opens_detail() {
        let mut app = test_app();
        app.set_results(vec![named_game("A"), named_game("B")]);
        app.results_area = Some(Rect::new(0, 3, 80, 20));
        app.results_content_area = Some(Rect::new(1, 4, 78, 18));
        app.rebuild_card_cache(78);
        let first_height = app.cached_cards[0].height() as u16;

        handle_mouse_event(
            &mut app,
            AppMouseEvent {
                kind: AppMouseKind::LeftDown,
                column: 10,
                row: 4 + first_height,
            },
        );
        assert_eq!(app.list_state.selected(), Some(1));
        assert!(app.detail_open);
    }

    #[test]
    fn test_click_on_backdrop_closes_detail() {
        let mut app = test_app();
        app.set_results(vec![named_game("A")]);
        app.open_detail();
        app.detail_area = Some(Rect::new(10, 5, 60, 14));

        handle_mouse_event(
            &mut app,
            AppMouseEvent {
                kind: AppMouseKind::LeftDown,
                column: 20,
                row: 8,
            },
        );
        assert!(app.detail_open);

        handle_mouse_event(
            &mut app,
            AppMouseEvent {
                kind: AppMouseKind::LeftDown,
                column: 0,
                row: 0,
            },
        );
        assert!(!app.detail_open);
    }

    #[test]
    fn test_tab_toggles_panes() {
        let mut app = test_app();
        assert_eq!(app.focused_pane, FocusPane::Search);
        press(&mut app, AppKeyCode::Tab);
        assert_eq!(app.focused_pane, FocusPane::Results);
        assert_eq!(app.input_mode, InputMode::Normal);
        press(&mut app, AppKeyCode::Tab);
        assert_eq!(app.focused_pane, FocusPane::Search);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_ctrl_w_deletes_previous_word() {
        let mut app = test_app();
        type_str(&mut app, "open world rpg");
        let mut event = AppKeyEvent::new(AppKeyCode::Char('w'));
        event.ctrl = true;
        handle_key_event(&mut app, event);
        assert_eq!(app.query_text, "open world ");
    }
}
