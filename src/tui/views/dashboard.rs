//! Ledger dashboard
//!
//! Filter summary, search line and the filtered transaction table.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{Transaction, TransactionKind};
use crate::tui::app::{App, InputMode};
use crate::tui::layout::DashboardLayout;

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = DashboardLayout::new(area);

    render_header(frame, app, layout.header);

    let mut search = app.search_input.clone();
    search.focused = app.input_mode == InputMode::Search;
    frame.render_widget(search, layout.search);

    render_table(frame, app, layout.table);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let shown = app.visible_transactions().len();
    let block = Block::default()
        .title(" coinlog ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let line = Line::from(vec![
        Span::styled(
            app.filter.describe(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{} of {} transactions", shown, app.session.ledger.len()),
            Style::default().fg(Color::White),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn kind_color(kind: TransactionKind) -> Color {
    match kind {
        TransactionKind::Buy => Color::Green,
        TransactionKind::Sell => Color::Red,
        TransactionKind::Deposit => Color::Blue,
        TransactionKind::Withdraw => Color::Magenta,
    }
}

fn transaction_row(txn: &Transaction) -> Row<'static> {
    let primary = txn.movement.primary().map(|l| l.display()).unwrap_or_default();
    let secondary = txn
        .movement
        .secondary()
        .map(|l| l.display())
        .unwrap_or_else(|| "-".to_string());

    Row::new(vec![
        Cell::from(txn.date.format("%Y-%m-%d %H:%M").to_string()),
        Cell::from(txn.exchange.clone()),
        Cell::from(txn.kind().to_string()).style(Style::default().fg(kind_color(txn.kind()))),
        Cell::from(primary),
        Cell::from(secondary),
        Cell::from(txn.tag.clone().unwrap_or_default()),
        Cell::from(txn.note.clone().unwrap_or_default()),
    ])
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let transactions = app.visible_transactions();
    if transactions.is_empty() {
        let hint = if app.session.ledger.is_empty() {
            "No transactions yet. Press 'i' to import a CSV file."
        } else {
            "No transactions match the current filter. Press 'c' to clear it."
        };
        let text = Paragraph::new(hint)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let widths = [
        Constraint::Length(16), // Date
        Constraint::Length(12), // Exchange
        Constraint::Length(9),  // Type
        Constraint::Length(20), // Amount
        Constraint::Length(20), // For
        Constraint::Length(10), // Tag
        Constraint::Min(10),    // Note
    ];

    let header = Row::new(
        ["Date", "Exchange", "Type", "Amount", "For", "Tag", "Note"]
            .into_iter()
            .map(|h| Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))),
    )
    .style(Style::default().fg(Color::Yellow))
    .height(1);

    let rows: Vec<Row> = transactions.iter().map(|txn| transaction_row(txn)).collect();

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(table, area, &mut state);
}
