use crate::core::detail::DetailState;
use crate::core::home::HomeState;
use crate::domain::{Character, LoadState};
use crate::tui::{InputMode, TuiState};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, Padding, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Render the full interface: title bar, main area, status footer.
pub fn draw_ui(
    frame: &mut Frame,
    home: &HomeState,
    detail: Option<&DetailState>,
    tui: &mut TuiState,
) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, status_area] = layout.areas(frame.area());

    // Title bar
    let title_text = match detail {
        Some(state) => format!("rickdex | character {}", state.character_id),
        None if home.search_query.is_empty() => {
            format!("rickdex | {} characters loaded", home.feed.item_count())
        }
        None => format!(
            "rickdex | {} characters loaded | filter: {}",
            home.feed.item_count(),
            home.search_query
        ),
    };
    frame.render_widget(
        Span::styled(title_text, Style::default().fg(Color::Cyan)),
        title_area,
    );

    // Main area - detail screen covers the list when open
    match detail {
        Some(state) => draw_detail_view(frame, main_area, state),
        None => draw_home_view(frame, main_area, home, tui),
    }

    // Status footer
    let status = match detail {
        Some(state) => detail_status(state),
        None => home_status(home, tui.input_mode),
    };
    frame.render_widget(Paragraph::new(status), status_area);
}

fn draw_home_view(frame: &mut Frame, area: Rect, home: &HomeState, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [search_area, list_area] = Layout::vertical([Length(3), Min(0)]).areas(area);

    draw_search_box(frame, search_area, home, tui.input_mode);
    draw_character_list(frame, list_area, home, tui);
}

fn draw_search_box(frame: &mut Frame, area: Rect, home: &HomeState, input_mode: InputMode) {
    let border_style = match input_mode {
        InputMode::Input => Style::default().fg(Color::Cyan),
        InputMode::Cursor => Style::default().fg(Color::DarkGray),
    };
    let text = if home.search_query.is_empty() && input_mode == InputMode::Cursor {
        Span::styled(
            "Press / to search by name",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(home.search_query.as_str())
    };
    let search = Paragraph::new(Line::from(text)).block(
        Block::bordered()
            .title("Search")
            .border_style(border_style),
    );
    frame.render_widget(search, area);

    if input_mode == InputMode::Input {
        // Park the terminal cursor just after the typed text, inside the border.
        let x = area.x + 1 + home.search_query.width() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_character_list(frame: &mut Frame, area: Rect, home: &HomeState, tui: &mut TuiState) {
    let block = Block::bordered()
        .title("Characters")
        .padding(Padding::horizontal(1));

    if home.feed.item_count() == 0 {
        let text = match home.feed.load_state() {
            LoadState::Loading => "Loading characters...",
            LoadState::Error(_) => "Could not load characters.",
            LoadState::NotLoading { .. } if !home.search_query.is_empty() => {
                "No characters match this search."
            }
            LoadState::NotLoading { .. } => "No characters yet.",
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // The name column gets whatever width the species and status columns leave over.
    let name_width = (area.width as usize).saturating_sub(24).max(12);
    let items: Vec<ListItem> = home
        .feed
        .items()
        .map(|character| ListItem::new(character_row(character, name_width)))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut tui.list_state);
}

fn character_row(character: &Character, name_width: usize) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!(
            "{:<width$}",
            truncate_str(&character.name, name_width),
            width = name_width
        )),
        Span::styled(
            format!(" {:<12}", truncate_str(&character.species, 12)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(" {}", character.status),
            status_style(&character.status),
        ),
    ])
}

fn draw_detail_view(frame: &mut Frame, area: Rect, state: &DetailState) {
    if state.is_loading {
        let loading = Paragraph::new(format!("Loading character {}...", state.character_id))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::bordered().padding(Padding::horizontal(1)));
        frame.render_widget(loading, area);
        return;
    }

    if let Some(error) = &state.error {
        draw_detail_error(frame, area, error);
        return;
    }

    let Some(character) = &state.character else {
        return;
    };
    let lines = vec![
        field("Status", &character.status),
        field("Species", &character.species),
        field("Type", &character.kind),
        field("Gender", &character.gender),
        field("Origin", &character.origin.name),
        field("Location", &character.location.name),
        field("Episodes", &character.episodes.len().to_string()),
        field("Created", &format_created(&character.created)),
        field("URL", &character.url),
    ];
    let view = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::bordered()
            .title(character.name.clone())
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(view, area);
}

fn draw_detail_error(frame: &mut Frame, area: Rect, error: &crate::domain::CharacterError) {
    let text = vec![
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to retry or Esc to go back.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let view = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::bordered().title("ERROR"));
    frame.render_widget(view, area);
}

fn field(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::Cyan)),
        Span::raw(dash_if_empty(value).to_string()),
    ])
}

fn home_status(home: &HomeState, input_mode: InputMode) -> Line<'static> {
    let keys = match input_mode {
        InputMode::Input => "Esc: list | Enter: done typing",
        InputMode::Cursor => "/: search | Enter: open | r: refresh | q: quit",
    };
    match home.feed.load_state() {
        LoadState::Loading => Line::from(vec![
            Span::raw(keys),
            Span::styled(" | Loading page...", Style::default().fg(Color::Yellow)),
        ]),
        LoadState::Error(error) => Line::from(vec![
            Span::raw(keys),
            Span::styled(
                format!(" | {error} (r: retry)"),
                Style::default().fg(Color::Red),
            ),
        ]),
        LoadState::NotLoading { end_reached: true } => Line::from(vec![
            Span::raw(keys),
            Span::styled(" | End of list", Style::default().fg(Color::DarkGray)),
        ]),
        LoadState::NotLoading { end_reached: false } => Line::from(Span::raw(keys)),
    }
}

fn detail_status(state: &DetailState) -> Line<'static> {
    if state.error.is_some() {
        Line::from(Span::raw("Esc: back | r: retry | q: quit"))
    } else {
        Line::from(Span::raw("Esc: back | q: quit"))
    }
}

fn status_style(status: &str) -> Style {
    match status {
        "Alive" => Style::default().fg(Color::Green),
        "Dead" => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::DarkGray),
    }
}

/// Replace an empty API field with a placeholder dash.
fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

/// Render an API timestamp like "2017-11-04T18:48:46.250Z" as "Nov 04 2017".
/// Falls back to the raw string if it does not parse.
fn format_created(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(timestamp) => timestamp.format("%b %d %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Truncate a string to at most `max_width` display columns, appending "..."
/// when it gets cut. Counts columns rather than bytes so wide characters
/// never split mid-glyph.
fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width - 3 {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push_str("...");
    truncated
}
