use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
    Frame,
};

use crate::watch::poll::WatchView;

/// Render the pod watch screen: spinner header, current listing, hint line.
pub fn render(frame: &mut Frame, view: &WatchView) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Pod table
        Constraint::Length(1), // Hint
    ])
    .split(frame.area());

    let mut header = vec![
        Span::styled(view.spinner, Style::default().fg(Color::Cyan)),
        Span::raw(format!(" Watching pods in {}", view.namespace)),
    ];
    if let Some(last_poll) = view.last_poll {
        header.push(Span::styled(
            format!("  last poll {}", last_poll.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if let Some(error) = &view.error {
        header.push(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    if view.rows.is_empty() {
        let waiting = Paragraph::new("Waiting for the first poll...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(waiting, chunks[1]);
    } else {
        render_table(frame, chunks[1], &view.rows);
    }

    let hint = Paragraph::new("q: quit").style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, chunks[2]);
}

fn render_table(frame: &mut Frame, area: Rect, rows: &[Vec<String>]) {
    let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    if col_count == 0 {
        return;
    }

    // Column widths follow the widest field, like kubectl's own output.
    let mut widths = vec![0usize; col_count];
    for row in rows {
        for (i, field) in row.iter().enumerate() {
            widths[i] = widths[i].max(field.chars().count());
        }
    }
    let constraints: Vec<Constraint> = widths
        .iter()
        .map(|w| Constraint::Length((*w as u16).saturating_add(2)))
        .collect();

    let (header, body) = match rows.split_first() {
        Some((first, rest)) if first.first().map(String::as_str) == Some("NAME") => {
            (Some(first), rest)
        }
        _ => (None, rows),
    };

    let body_rows: Vec<Row> = body
        .iter()
        .map(|row| {
            Row::new(
                row.iter()
                    .enumerate()
                    .map(|(i, field)| {
                        let style = if i == 2 {
                            status_style(field)
                        } else {
                            Style::default()
                        };
                        Cell::from(field.clone()).style(style)
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let mut table = Table::new(body_rows, constraints);
    if let Some(header) = header {
        table = table.header(
            Row::new(
                header
                    .iter()
                    .map(|field| Cell::from(field.clone()))
                    .collect::<Vec<_>>(),
            )
            .style(Style::default().add_modifier(Modifier::BOLD)),
        );
    }
    frame.render_widget(table, area);
}

fn status_style(value: &str) -> Style {
    if value == "Running" || value == "Completed" {
        Style::default().fg(Color::Green)
    } else if value.contains("BackOff") || value.contains("Err") || value == "Failed" {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Yellow)
    }
}
