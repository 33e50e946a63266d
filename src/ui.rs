//! The UI renders the application state into something visible.
//!
//! The outline shows the whole desktop as a tree drawn with box-drawing characters, the current
//! range highlighted. Below it, the speech area shows what was last said and any announcement,
//! and the help bar lists the keys.

use crate::app_state::AppState;
use crate::output;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const HELP: &str = "←/→ object | ↑/↓ line | c/w char/word | h 1-6 l v b x m e f t find (Shift/Alt: back) | Alt+arrows/Home/End/PgUp/PgDn table | Ctrl+t/u title/URL | Menu context | r read | s stop | q quit";

/// Generate box-drawing prefix for tree structure
fn get_tree_prefix(level: usize, is_last: bool, parent_states: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();

    for i in 0..level.saturating_sub(1) {
        if parent_states.get(i).copied().unwrap_or(false) {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }

    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }

    prefix
}

/// Renders the outline, speech area and help bar.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Length(3),
        ])
        .split(f.area());

    let highlighted = app.highlighted();
    let rows = app.outline();
    let mut selected = None;

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let node = app.tree.node(row.node)?;
            let prefix = get_tree_prefix(row.depth, row.is_last, &row.open_levels);
            let mut spans = vec![
                Span::raw(prefix),
                Span::styled(
                    output::describe_node(node),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if !node.name().is_empty() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    node.name().lines().next().unwrap_or_default().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ));
            }
            let style = if highlighted.contains(&row.node) {
                selected.get_or_insert(i);
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Some(ListItem::new(Line::from(spans)).style(style))
        })
        .collect();

    let title = if app.session.is_reading() {
        format!("Desktop ({} files, reading)", app.files.len())
    } else {
        format!("Desktop ({} files)", app.files.len())
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    let mut state = ListState::default().with_selected(selected);
    f.render_stateful_widget(list, chunks[0], &mut state);

    let mut speech = vec![Line::from(
        app.speech.spoken.clone().unwrap_or_default(),
    )];
    if let Some(status) = &app.speech.status {
        speech.push(Line::styled(status.clone(), Style::default().fg(Color::Yellow)));
    }
    let speech_widget = Paragraph::new(speech)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Speech"));
    f.render_widget(speech_widget, chunks[1]);

    let help_widget = Paragraph::new(HELP).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, chunks[2]);
}
