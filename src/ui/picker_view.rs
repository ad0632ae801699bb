use ratatui::{
    layout::{Alignment, Constraint, Layout, Margin},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::prompt::picker::PickerState;

/// Render the fuzzy picker popup: filter line, choice list, hint.
pub fn render(frame: &mut Frame, state: &PickerState) {
    let popup_area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, popup_area);

    let inner_area = popup_area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    });

    let chunks = Layout::vertical([
        Constraint::Length(1), // Filter input
        Constraint::Min(3),    // List
        Constraint::Length(1), // Hint
    ])
    .split(inner_area);

    let input_line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(state.input.as_str()),
        Span::styled("█", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    let list_items: Vec<ListItem> = state
        .filtered
        .iter()
        .enumerate()
        .map(|(row, &idx)| {
            let item = &state.items[idx];
            let style = if row == state.cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let prefix = if row == state.cursor { "▶ " } else { "  " };
            let mark = if !state.multi {
                ""
            } else if state.checked.contains(&idx) {
                "[x] "
            } else {
                "[ ] "
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(mark, style),
                Span::styled(item.clone(), style),
            ]))
        })
        .collect();

    let list = List::new(list_items).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default();
    list_state.select((!state.filtered.is_empty()).then_some(state.cursor));
    frame.render_stateful_widget(list, chunks[1], &mut list_state);

    let hint = if state.multi {
        "type to filter | Tab: toggle | Ctrl-a: toggle all | Enter: confirm | Esc: cancel"
    } else {
        "type to filter | Up/Down: move | Enter: select | Esc: cancel"
    };
    let hint_widget = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint_widget, chunks[2]);

    let block = Block::default()
        .title(state.title.as_str())
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, popup_area);
}
