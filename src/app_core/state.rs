//! Application state and state-mutation methods.
//!
//! All UI state is owned here and updated in one direction: state → render →
//! event → state. Nothing in this module touches the network or the
//! terminal; the binary performs searches and feeds the outcome back in via
//! [`AppState::finish_search`].

use crate::model::Game;
use crate::theme::{self, ThemeConfig};
use crate::ui;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::ListState;

/// How many description lines a card shows before clamping.
pub const CARD_DESC_LINES: usize = 2;

/// Current input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Mode for editing the search query
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Search,
    Results,
}

/// Action the reducer hands to the runtime for execution.
#[derive(Debug, Clone)]
pub enum AppAction {
    Search(String),
}

/// Pre-rendered display data for one result card.
///
/// Rebuilt only when the result set or the pane width changes, so rendering
/// borrows strings instead of re-deriving them every frame.
#[derive(Debug, Clone)]
pub struct CardDisplay {
    pub name: String,
    pub website: String,
    pub developers: String,
    pub developer_color: Color,
    pub release_date: String,
    pub is_free: bool,
    pub artwork: String,
    pub desc_lines: Vec<String>,
}

impl CardDisplay {
    /// Rows the card occupies in the list, including the trailing blank.
    pub fn height(&self) -> usize {
        3 + self.desc_lines.len() + 1
    }
}

/// Application state for the Ratatui app.
pub struct AppState {
    /// Current result set, in backend order. Replaced wholesale on every
    /// successful search, never re-sorted or mutated.
    pub games: Vec<Game>,
    /// Card selection state managed by ratatui
    pub list_state: ListState,
    /// Search query text
    pub query_text: String,
    /// Cursor position in the query, in chars
    pub query_cursor: usize,
    /// Current input mode
    pub input_mode: InputMode,
    /// Which pane currently has keyboard focus
    pub focused_pane: FocusPane,
    /// Theme configuration
    pub theme: ThemeConfig,
    /// Backend base URL, shown in the status bar
    pub api_label: String,
    /// App version string
    pub app_version: String,
    /// True while a search request is in flight
    pub searching: bool,
    /// True once at least one search has completed
    pub searched: bool,
    /// Transient user-facing error message; cleared on the next input event
    pub notification: Option<String>,
    /// Whether the detail overlay is open for the selected game
    pub detail_open: bool,
    /// Scroll offset inside the detail overlay
    pub detail_scroll: u16,
    /// Upper scroll bound for the overlay, set during render
    pub detail_max_scroll: u16,
    /// Whether the help overlay is visible
    pub show_help: bool,
    /// Flag to quit app
    pub should_quit: bool,
    /// Previously submitted queries (in-memory only, never persisted)
    pub query_history: Vec<String>,
    /// Current index in history during navigation
    pub history_index: Option<usize>,
    /// Saved input when starting history navigation
    pub stashed_input: String,
    /// Pending action to execute after input handling
    pub pending_action: Option<AppAction>,
    /// Screen region of the results pane (including borders)
    pub results_area: Option<Rect>,
    /// Screen region of results content (inside borders)
    pub results_content_area: Option<Rect>,
    /// Screen region of the search pane (including borders)
    pub search_area: Option<Rect>,
    /// Screen region of the search text (inside borders)
    pub search_input_area: Option<Rect>,
    /// Screen region of the detail overlay when open
    pub detail_area: Option<Rect>,
    /// Pre-rendered card lines for the current result set
    pub cached_cards: Vec<CardDisplay>,
    /// Width used for the current card cache
    pub cached_card_width: u16,
    /// Forces a card cache rebuild on the next render
    pub cards_dirty: bool,
}

impl AppState {
    pub fn new(theme: ThemeConfig, api_label: String, app_version: String) -> Self {
        Self {
            games: Vec::new(),
            list_state: ListState::default(),
            query_text: String::new(),
            query_cursor: 0,
            input_mode: InputMode::Editing,
            focused_pane: FocusPane::Search,
            theme,
            api_label,
            app_version,
            searching: false,
            searched: false,
            notification: None,
            detail_open: false,
            detail_scroll: 0,
            detail_max_scroll: 0,
            show_help: false,
            should_quit: false,
            query_history: Vec::new(),
            history_index: None,
            stashed_input: String::new(),
            pending_action: None,
            results_area: None,
            results_content_area: None,
            search_area: None,
            search_input_area: None,
            detail_area: None,
            cached_cards: Vec::new(),
            cached_card_width: 0,
            cards_dirty: false,
        }
    }

    /// Queues the current query for the runtime. Ignored while a request is
    /// already in flight — the UI allows one search at a time.
    pub fn submit_query(&mut self) {
        if self.searching {
            return;
        }
        if !self.query_text.trim().is_empty()
            && self.query_history.last() != Some(&self.query_text)
        {
            self.query_history.push(self.query_text.clone());
        }
        self.history_index = None;
        self.pending_action = Some(AppAction::Search(self.query_text.clone()));
        self.focus_pane(FocusPane::Results);
    }

    /// Marks the search as in flight and drops any stale notification.
    pub fn begin_search(&mut self) {
        self.searching = true;
        self.notification = None;
    }

    /// Applies the outcome of a search. The loading flag is cleared no
    /// matter what; on failure the previous result set is left untouched
    /// and the error's display text becomes the notification.
    pub fn finish_search(&mut self, result: anyhow::Result<Vec<Game>>) {
        self.searching = false;
        match result {
            Ok(games) => self.set_results(games),
            Err(err) => self.notification = Some(err.to_string()),
        }
    }

    /// Replaces the result set wholesale and resets selection to the top.
    pub fn set_results(&mut self, games: Vec<Game>) {
        self.games = games;
        self.searched = true;
        self.detail_open = false;
        self.detail_scroll = 0;
        self.list_state = ListState::default();
        if !self.games.is_empty() {
            self.list_state.select(Some(0));
        }
        self.cards_dirty = true;
    }

    /// Rebuilds the card display cache for the given content width.
    /// Called from render only when the set or the width changed.
    pub fn rebuild_card_cache(&mut self, width: u16) {
        self.cached_cards = self
            .games
            .iter()
            .map(|game| CardDisplay {
                name: game.name.clone(),
                website: game.website.clone(),
                developers: game.developers.clone(),
                developer_color: theme::color_for(&game.developers),
                release_date: game.release_date.clone(),
                is_free: game.is_free,
                artwork: game.artwork_url(),
                desc_lines: ui::clamp_lines(
                    &game.short_description,
                    width as usize,
                    CARD_DESC_LINES,
                ),
            })
            .collect();
        self.cached_card_width = width;
        self.cards_dirty = false;
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.list_state
            .selected()
            .and_then(|idx| self.games.get(idx))
    }

    /// Clamps the current selection to valid bounds.
    pub fn clamp_selection(&mut self) {
        let len = self.games.len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        if let Some(selected) = self.list_state.selected()
            && selected >= len
        {
            self.list_state.select(Some(len - 1));
        }
    }

    /// Moves selection by `direction` (+1 or -1).
    pub fn move_selection(&mut self, direction: i32) {
        if self.games.is_empty() {
            return;
        }
        if direction < 0 {
            self.list_state.select_previous();
        } else {
            self.list_state.select_next();
        }
        self.clamp_selection();
    }

    /// Opens the detail overlay for the selected game, if any. The overlay
    /// reads the already-fetched record — no further network activity.
    pub fn open_detail(&mut self) {
        if self.selected_game().is_some() {
            self.detail_open = true;
            self.detail_scroll = 0;
        }
    }

    /// Closes the overlay, returning the view to its pre-open state.
    pub fn close_detail(&mut self) {
        self.detail_open = false;
        self.detail_scroll = 0;
        self.detail_area = None;
    }

    pub fn scroll_detail_up(&mut self, lines: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(lines);
    }

    pub fn scroll_detail_down(&mut self, lines: u16) {
        self.detail_scroll = self
            .detail_scroll
            .saturating_add(lines)
            .min(self.detail_max_scroll);
    }

    pub fn query_add_char(&mut self, c: char) {
        let byte_idx = self
            .query_text
            .char_indices()
            .nth(self.query_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.query_text.len());
        self.query_text.insert(byte_idx, c);
        self.query_cursor += 1;
    }

    pub fn query_backspace(&mut self) {
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
            if let Some((byte_idx, _)) = self.query_text.char_indices().nth(self.query_cursor) {
                self.query_text.remove(byte_idx);
            }
        }
    }

    pub fn query_delete(&mut self) {
        let char_count = self.query_text.chars().count();
        if self.query_cursor < char_count
            && let Some((byte_idx, _)) = self.query_text.char_indices().nth(self.query_cursor)
        {
            self.query_text.remove(byte_idx);
        }
    }

    pub fn query_move_cursor_left(&mut self) {
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
        }
    }

    pub fn query_move_cursor_right(&mut self) {
        let char_count = self.query_text.chars().count();
        if self.query_cursor < char_count {
            self.query_cursor += 1;
        }
    }

    pub fn query_move_to_start(&mut self) {
        self.query_cursor = 0;
    }

    pub fn query_move_to_end(&mut self) {
        self.query_cursor = self.query_text.chars().count();
    }

    pub fn query_clear(&mut self) {
        self.query_text.clear();
        self.query_cursor = 0;
    }

    pub fn query_delete_word(&mut self) {
        if self.query_cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.query_text.chars().collect();
        let mut i = self.query_cursor;

        // Skip trailing whitespace
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }

        // Skip non-whitespace (the word)
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }

        let new_cursor = i;
        let byte_start = self
            .query_text
            .char_indices()
            .nth(new_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        let byte_end = self
            .query_text
            .char_indices()
            .nth(self.query_cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.query_text.len());

        self.query_text.replace_range(byte_start..byte_end, "");
        self.query_cursor = new_cursor;
    }

    pub fn focus_pane(&mut self, pane: FocusPane) {
        self.focused_pane = pane;
        self.input_mode = if pane == FocusPane::Search {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
    }

    pub fn focus_next_pane(&mut self) {
        let next = match self.focused_pane {
            FocusPane::Search => FocusPane::Results,
            FocusPane::Results => FocusPane::Search,
        };
        self.focus_pane(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn test_app() -> AppState {
        AppState::new(
            Theme::Dracula.config(),
            "http://localhost:8000".to_string(),
            "0.1.0".to_string(),
        )
    }

    #[test]
    fn test_query_editing_is_char_indexed() {
        let mut app = test_app();
        for c in "héllo".chars() {
            app.query_add_char(c);
        }
        assert_eq!(app.query_cursor, 5);

        app.query_move_cursor_left();
        app.query_move_cursor_left();
        app.query_add_char('x');
        assert_eq!(app.query_text, "hélxlo");

        app.query_backspace();
        assert_eq!(app.query_text, "héllo");
        app.query_delete();
        assert_eq!(app.query_text, "hélo");
    }

    #[test]
    fn test_query_delete_word_stops_at_whitespace() {
        let mut app = test_app();
        for c in "two words  ".chars() {
            app.query_add_char(c);
        }
        app.query_delete_word();
        assert_eq!(app.query_text, "two ");
        app.query_delete_word();
        assert_eq!(app.query_text, "");
        // No-op at the start of the line.
        app.query_delete_word();
        assert_eq!(app.query_cursor, 0);
    }

    #[test]
    fn test_submit_query_deduplicates_history() {
        let mut app = test_app();
        app.query_text = "portal".to_string();
        app.submit_query();
        app.pending_action = None;
        app.submit_query();
        assert_eq!(app.query_history, vec!["portal".to_string()]);

        app.query_text = "   ".to_string();
        app.submit_query();
        assert_eq!(app.query_history.len(), 1);
        // Blank queries are still submitted, just not recorded.
        assert!(matches!(app.pending_action, Some(AppAction::Search(_))));
    }

    #[test]
    fn test_clamp_selection_handles_shrinking_sets() {
        let mut app = test_app();
        app.games = vec![Game::default(), Game::default()];
        app.list_state.select(Some(5));
        app.clamp_selection();
        assert_eq!(app.list_state.selected(), Some(1));

        app.games.clear();
        app.clamp_selection();
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_open_detail_requires_a_selection() {
        let mut app = test_app();
        app.open_detail();
        assert!(!app.detail_open);

        app.set_results(vec![Game::default()]);
        app.open_detail();
        assert!(app.detail_open);
    }
}
