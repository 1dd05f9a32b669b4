use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::{control_label, market_color};
use crate::engine::pagination::PageControl;
use crate::models::disposition::SortKey;
use crate::models::view::{BoardSnapshot, TableView};

const TITLE: &str = "Stock Disposition Records";

const COLUMN_WIDTHS: [Constraint; 6] = [
    Constraint::Length(10),
    Constraint::Min(14),
    Constraint::Length(14),
    Constraint::Length(10),
    Constraint::Length(10),
    Constraint::Length(10),
];

/// Draw the whole board for the current snapshot.
pub fn draw_board(f: &mut Frame, snapshot: &BoardSnapshot) {
    let area = f.size();
    match snapshot {
        BoardSnapshot::Loading => draw_loading(f, area),
        BoardSnapshot::Failed { message } => draw_error(f, area, message),
        BoardSnapshot::Ready(view) => draw_table(f, area, view),
    }
}

fn framed(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
}

fn draw_loading(f: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading disposition records...",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .block(framed(TITLE));
    f.render_widget(paragraph, area);
}

fn draw_error(f: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "⚠ Failed to load data",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::raw(message)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("R", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to retry, "),
            Span::styled("Q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to quit."),
        ]),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(framed(TITLE));
    f.render_widget(paragraph, area);
}

fn draw_table(f: &mut Frame, area: Rect, view: &TableView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(area);

    // Header: record count, sort info, key hints
    let mut summary = vec![Span::styled(
        format!("{} records", view.total_records),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(label) = &view.sort_label {
        summary.push(Span::raw("  •  sorted by "));
        summary.push(Span::styled(label.clone(), Style::default().fg(Color::Yellow)));
    }
    summary.push(Span::styled(
        "   [1-6] sort  [←/→] page  [r] refresh  [q] quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(summary)).block(framed(TITLE)), chunks[0]);

    // Table
    let header = Row::new(SortKey::COLUMNS.iter().enumerate().map(|(i, k)| {
        Cell::from(format!("{} {} {}", i + 1, k.label(), view.sort_icon(*k)))
    }))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = if view.rows.is_empty() {
        vec![Row::new(vec![Cell::from(Span::styled(
            "No records found",
            Style::default().fg(Color::DarkGray),
        ))])]
    } else {
        view.rows
            .iter()
            .map(|r| {
                Row::new(vec![
                    Cell::from(Span::styled(
                        r.symbol.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(r.name.clone()),
                    Cell::from(r.stock_date.clone()),
                    Cell::from(Span::styled(
                        r.market.clone(),
                        Style::default().fg(market_color(&r.market_tag)),
                    )),
                    Cell::from(r.start.clone()),
                    Cell::from(r.end.clone()),
                ])
            })
            .collect()
    };

    let table = Table::new(rows, COLUMN_WIDTHS)
        .header(header)
        .column_spacing(2)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(table, chunks[1]);

    // Footer: range and pagination bar, only when there is data at all
    if view.total_records > 0 {
        let mut footer = Vec::new();
        if let Some(summary) = view.range_summary() {
            footer.push(Line::from(Span::raw(summary)));
        }
        footer.push(pagination_line(&view.controls));
        f.render_widget(
            Paragraph::new(footer)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
            chunks[2],
        );
    }
}

fn pagination_line(controls: &[PageControl]) -> Line<'static> {
    let mut spans = Vec::with_capacity(controls.len() * 2);
    for control in controls {
        let style = match control {
            PageControl::Previous { enabled: false } | PageControl::Next { enabled: false } => {
                Style::default().fg(Color::DarkGray)
            }
            PageControl::Page { active: true, .. } => Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            PageControl::Ellipsis => Style::default().fg(Color::DarkGray),
            _ => Style::default(),
        };
        spans.push(Span::styled(control_label(control), style));
        spans.push(Span::raw(" "));
    }
    spans.pop();
    Line::from(spans)
}
