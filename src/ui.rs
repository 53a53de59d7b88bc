//! Rendering. Pure ratatui: reads [`AppState`], draws widgets, and records
//! the screen regions the reducer needs for mouse hit-testing.

use crate::app_core::state::{AppState, FocusPane, InputMode};
use crate::model::parse_list;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Top-level draw: search bar, result list, status bar, then overlays.
pub fn draw(frame: &mut Frame, app: &mut AppState) {
    let area = frame.area();
    frame.render_widget(Block::new().style(app.theme.text), area);

    let [search, results, status] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_search_input(frame, app, search);
    render_results(frame, app, results);
    render_status_bar(frame, app, status);

    if app.detail_open {
        render_detail_overlay(frame, app);
    }
    if app.show_help {
        render_help_overlay(frame, app);
    }
}

fn render_search_input(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let focused = app.focused_pane == FocusPane::Search;
    let block = Block::bordered()
        .title(" Search ")
        .title_style(app.theme.title)
        .border_style(if focused {
            app.theme.border_selected
        } else {
            app.theme.border
        });
    let inner = block.inner(area);
    app.search_area = Some(area);
    app.search_input_area = Some(inner);

    let scroll = query_horizontal_scroll(&app.query_text, app.query_cursor, inner.width);
    let input = Paragraph::new(app.query_text.as_str())
        .style(app.theme.text)
        .scroll((0, scroll))
        .block(block);
    frame.render_widget(input, area);

    if app.input_mode == InputMode::Editing && !app.detail_open && !app.show_help {
        let cursor_col: usize = app
            .query_text
            .chars()
            .take(app.query_cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum();
        let x = inner.x + (cursor_col as u16).saturating_sub(scroll);
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn render_results(frame: &mut Frame, app: &mut AppState, area: Rect) {
    let focused = app.focused_pane == FocusPane::Results;
    let title = if app.searched {
        format!(" Results ({}) ", app.games.len())
    } else {
        " Results ".to_string()
    };
    let block = Block::bordered()
        .title(title)
        .title_style(app.theme.title)
        .border_style(if focused {
            app.theme.border_selected
        } else {
            app.theme.border
        });
    let inner = block.inner(area);
    app.results_area = Some(area);
    app.results_content_area = Some(inner);
    frame.render_widget(block, area);

    if app.searching {
        frame.render_widget(
            Paragraph::new("Searching…").style(app.theme.dim).centered(),
            inner,
        );
        return;
    }
    if app.games.is_empty() {
        let hint = if app.searched {
            "No results. Try a different query."
        } else {
            "Type what you feel like playing and press Enter."
        };
        frame.render_widget(Paragraph::new(hint).style(app.theme.dim).centered(), inner);
        return;
    }

    if app.cards_dirty || app.cached_card_width != inner.width {
        app.rebuild_card_cache(inner.width);
    }

    let selected = app.list_state.selected();
    let items: Vec<ListItem> = app
        .cached_cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let name_style = if selected == Some(idx) {
                app.theme.list_selected
            } else {
                app.theme.title
            };
            let title_spans = vec![Span::styled(card.name.clone(), name_style)];

            let mut source_spans = vec![Span::styled(card.artwork.clone(), app.theme.dim)];
            if !card.website.is_empty() {
                source_spans.push(Span::raw("  "));
                source_spans.push(Span::styled(format!("↗ {}", card.website), app.theme.link));
            }

            let price_tag = if card.is_free {
                Span::styled(" Free ", app.theme.tag_free)
            } else {
                Span::styled(" Paid ", app.theme.tag_paid)
            };
            let mut lines = vec![
                Line::from(title_spans),
                Line::from(vec![
                    Span::styled(
                        card.developers.clone(),
                        Style::default().fg(card.developer_color),
                    ),
                    Span::raw("  "),
                    Span::styled(format!(" {} ", card.release_date), app.theme.tag_date),
                    Span::raw(" "),
                    price_tag,
                ]),
                Line::from(source_spans),
            ];
            for desc in &card.desc_lines {
                lines.push(Line::from(Span::styled(desc.clone(), app.theme.text)));
            }
            lines.push(Line::default());
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items);
    frame.render_stateful_widget(list, inner, &mut app.list_state);

    if app.games.len() > 1 {
        let mut scrollbar_state =
            ScrollbarState::new(app.games.len()).position(selected.unwrap_or(0));
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

fn render_status_bar(frame: &mut Frame, app: &mut AppState, area: Rect) {
    if let Some(message) = &app.notification {
        frame.render_widget(
            Paragraph::new(message.as_str()).style(app.theme.error),
            area,
        );
        return;
    }

    let hints = if app.detail_open {
        "↑/↓ scroll · Esc close"
    } else if app.show_help {
        "? or Esc to close"
    } else if app.searching {
        "Searching…"
    } else {
        match app.input_mode {
            InputMode::Editing => "Enter search · ↑/↓ history · Tab results · Ctrl+U clear",
            InputMode::Normal => "↑/↓ select · Enter details · / search · ? help · q quit",
        }
    };
    let right = format!("{} · v{}", app.api_label, app.app_version);

    let [left_area, right_area] = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(right.width() as u16),
    ])
    .areas(area);
    frame.render_widget(Paragraph::new(hints).style(app.theme.dim), left_area);
    frame.render_widget(Paragraph::new(right).style(app.theme.dim), right_area);
}

fn render_detail_overlay(frame: &mut Frame, app: &mut AppState) {
    let Some(game) = app.selected_game().cloned() else {
        return;
    };

    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(format!(" {} ", game.name))
        .title_style(app.theme.title)
        .border_style(app.theme.border_selected)
        .style(app.theme.text);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.detail_area = Some(area);

    let theme = &app.theme;
    let label = |text: &str| Span::styled(format!("{text}: "), theme.dim);
    let price = if game.is_free {
        Span::styled(" Free ", theme.tag_free)
    } else {
        Span::styled(
            format!(" {:.2} {} ", game.price_final, game.price_currency),
            theme.tag_paid,
        )
    };
    let platforms: Vec<&str> = [
        ("Windows", game.platforms_windows),
        ("Mac", game.platforms_mac),
        ("Linux", game.platforms_linux),
    ]
    .iter()
    .filter(|(_, present)| *present)
    .map(|(name, _)| *name)
    .collect();

    let mut lines = vec![
        Line::from(Span::styled(game.artwork_url(), theme.dim)),
        Line::from(vec![
            label("Developer"),
            Span::styled(
                game.developers.clone(),
                Style::default().fg(crate::theme::color_for(&game.developers)),
            ),
        ]),
        Line::from(vec![label("Publisher"), Span::raw(game.publishers.clone())]),
        Line::from(vec![
            label("Released"),
            Span::styled(format!(" {} ", game.release_date), theme.tag_date),
            Span::raw("  "),
            price,
        ]),
        Line::from(vec![
            label("Platforms"),
            Span::raw(platforms.join(", ")),
        ]),
        Line::from(vec![
            label("Genres"),
            Span::raw(parse_list(&game.genres).join(", ")),
        ]),
        Line::from(vec![
            label("Categories"),
            Span::raw(parse_list(&game.categories).join(", ")),
        ]),
        Line::from(vec![
            label("Languages"),
            Span::raw(game.supported_languages.join(", ")),
        ]),
    ];
    if !game.recommendations_total.is_empty() {
        lines.push(Line::from(vec![
            label("Recommendations"),
            Span::raw(game.recommendations_total.clone()),
        ]));
    }
    if !game.metacritic_score.is_empty() {
        lines.push(Line::from(vec![
            label("Metacritic"),
            Span::raw(game.metacritic_score.clone()),
        ]));
    }
    if !game.website.is_empty() {
        lines.push(Line::from(vec![
            label("Website"),
            Span::styled(game.website.clone(), theme.link),
        ]));
    }

    let width = inner.width as usize;
    let about = if game.about_the_game.is_empty() {
        &game.short_description
    } else {
        &game.about_the_game
    };
    if !about.is_empty() {
        lines.push(Line::default());
        for wrapped in wrap_text(about, width) {
            lines.push(Line::from(Span::styled(wrapped, theme.text)));
        }
    }

    if !game.pc_min_os.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Minimum requirements",
            theme.title,
        )));
        for (name, value) in [
            ("OS", &game.pc_min_os),
            ("Processor", &game.pc_min_processor),
            ("Memory", &game.pc_min_memory),
            ("Graphics", &game.pc_min_graphics),
            ("Storage", &game.pc_min_storage),
        ] {
            if !value.is_empty() {
                lines.push(Line::from(vec![label(name), Span::raw(value.clone())]));
            }
        }
    }

    let total = lines.len() as u16;
    app.detail_max_scroll = total.saturating_sub(inner.height);
    app.detail_scroll = app.detail_scroll.min(app.detail_max_scroll);

    let body = Paragraph::new(lines).scroll((app.detail_scroll, 0));
    frame.render_widget(body, inner);

    if app.detail_max_scroll > 0 {
        let mut scrollbar_state = ScrollbarState::new(app.detail_max_scroll as usize)
            .position(app.detail_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            inner,
            &mut scrollbar_state,
        );
    }
}

fn render_help_overlay(frame: &mut Frame, app: &mut AppState) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" Keys ")
        .title_style(app.theme.title)
        .border_style(app.theme.border_selected)
        .style(app.theme.text);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let theme = &app.theme;
    let row = |key: &str, action: &str| {
        Line::from(vec![
            Span::styled(format!("{key:>12}  "), theme.title),
            Span::styled(action.to_string(), theme.text),
        ])
    };
    let lines = vec![
        row("Enter", "search / open details"),
        row("Tab", "switch pane"),
        row("/", "focus search"),
        row("↑ / ↓", "move selection or recall history"),
        row("PgUp / PgDn", "page through results"),
        row("Esc", "leave search / close overlay"),
        row("Ctrl+U", "clear query"),
        row("Ctrl+W", "delete last word"),
        row("?", "toggle this help"),
        row("q", "quit"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Centered popup rectangle sized as a percentage of `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [_, vertical, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(r);
    let [_, horizontal, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(vertical);
    horizontal
}

/// Wraps `text` to `width` display columns, breaking on whitespace and
/// hard-splitting words longer than a full line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let mut lines = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw_line.split_whitespace() {
            push_word(word, width, &mut lines, &mut current, &mut current_width);
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn push_word(
    word: &str,
    width: usize,
    lines: &mut Vec<String>,
    current: &mut String,
    current_width: &mut usize,
) {
    let word_width = word.width();
    if *current_width > 0 && *current_width + 1 + word_width <= width {
        current.push(' ');
        current.push_str(word);
        *current_width += 1 + word_width;
        return;
    }
    if *current_width > 0 {
        lines.push(std::mem::take(current));
        *current_width = 0;
    }
    if word_width <= width {
        current.push_str(word);
        *current_width = word_width;
        return;
    }
    // Longer than a full line: split on character boundaries.
    for c in word.chars() {
        let c_width = c.width().unwrap_or(0);
        if *current_width + c_width > width && *current_width > 0 {
            lines.push(std::mem::take(current));
            *current_width = 0;
        }
        current.push(c);
        *current_width += c_width;
    }
}

/// Wraps like [`wrap_text`] but keeps at most `max_lines`, marking the cut
/// with a trailing ellipsis.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines = wrap_text(text, width);
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            while !last.is_empty() && last.width() + 1 > width {
                last.pop();
            }
            last.push('…');
        }
    }
    lines
}

/// Horizontal scroll offset that keeps the query cursor inside a field of
/// `width` columns.
pub fn query_horizontal_scroll(text: &str, cursor: usize, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let cursor_col: usize = text
        .chars()
        .take(cursor)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    let width = width as usize;
    if cursor_col < width {
        0
    } else {
        (cursor_col + 1 - width) as u16
    }
}

/// Char index in `text` of the glyph under display column `column`.
/// Columns past the end map to the end of the text.
pub fn query_cursor_for_column(text: &str, column: u16) -> usize {
    let column = column as usize;
    let mut col = 0usize;
    for (idx, c) in text.chars().enumerate() {
        let c_width = c.width().unwrap_or(0);
        if column < col + c_width {
            return idx;
        }
        col += c_width;
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::state::AppState;
    use crate::model::Game;
    use crate::theme::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_wrap_text_breaks_on_words() {
        assert_eq!(
            wrap_text("a quick brown fox", 7),
            vec!["a quick", "brown", "fox"]
        );
    }

    #[test]
    fn test_wrap_text_hard_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_text_empty_input() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_text_preserves_explicit_newlines() {
        assert_eq!(wrap_text("one\ntwo", 10), vec!["one", "two"]);
    }

    #[test]
    fn test_clamp_lines_adds_ellipsis() {
        let lines = clamp_lines("a quick brown fox jumps over", 7, 2);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with('…'));
    }

    #[test]
    fn test_clamp_lines_short_text_untouched() {
        assert_eq!(clamp_lines("short", 10, 2), vec!["short"]);
    }

    #[test]
    fn test_query_horizontal_scroll() {
        assert_eq!(query_horizontal_scroll("hello", 3, 10), 0);
        // Cursor at the end of a string wider than the field.
        assert_eq!(query_horizontal_scroll("0123456789", 10, 5), 6);
    }

    #[test]
    fn test_query_cursor_for_column() {
        assert_eq!(query_cursor_for_column("hello", 0), 0);
        assert_eq!(query_cursor_for_column("hello", 3), 3);
        assert_eq!(query_cursor_for_column("hello", 42), 5);
    }

    fn sample_game(name: &str) -> Game {
        Game {
            name: name.to_string(),
            developers: "Valve".to_string(),
            publishers: "Valve".to_string(),
            release_date: "Apr 18, 2011".to_string(),
            short_description: "A puzzle game about portals.".to_string(),
            genres: "['Action', 'Puzzle']".to_string(),
            categories: "['Single-player']".to_string(),
            header_image: "https://cdn.example.com/header.jpg".to_string(),
            ..Default::default()
        }
    }

    fn test_app() -> AppState {
        AppState::new(
            Theme::Dracula.config(),
            "http://localhost:8000".to_string(),
            "0.1.0".to_string(),
        )
    }

    #[test]
    fn test_draw_smoke_empty_state() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert!(app.search_input_area.is_some());
        assert!(app.results_content_area.is_some());
    }

    #[test]
    fn test_draw_builds_card_cache_and_detail_area() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        app.set_results(vec![sample_game("Portal 2"), sample_game("Portal")]);
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert_eq!(app.cached_cards.len(), 2);
        assert!(app.cached_cards[0].height() >= 4);

        app.open_detail();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert!(app.detail_area.is_some());
    }

    #[test]
    fn test_detail_scroll_is_clamped_during_render() {
        let backend = TestBackend::new(80, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut app = test_app();
        let mut game = sample_game("Portal 2");
        game.about_the_game = "word ".repeat(400);
        app.set_results(vec![game]);
        app.open_detail();
        app.detail_scroll = u16::MAX;
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert!(app.detail_scroll <= app.detail_max_scroll);
        assert!(app.detail_max_scroll > 0);
    }
}
