//! Help dialog
//!
//! Keyboard shortcuts for the dashboard and the import wizard

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

pub fn render(frame: &mut Frame, _app: &mut App) {
    let area = centered_rect_fixed(60, 28, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(help_lines())
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn help_lines() -> Vec<Line<'static>> {
    vec![
        section("Dashboard"),
        key_line("j/k", "Move selection down/up"),
        key_line("/", "Search exchange, currency, tag and note"),
        key_line("e", "Cycle exchange filter"),
        key_line("t", "Cycle type filter"),
        key_line("y", "Cycle year filter"),
        key_line("m", "Cycle month filter"),
        key_line("c", "Clear all filters"),
        key_line("d", "Delete selected transaction"),
        key_line("x", "Export filtered list"),
        key_line("i", "Import a CSV file"),
        key_line("q", "Quit"),
        Line::from(""),
        section("Import"),
        key_line("Tab", "Next field (upload step)"),
        key_line("Up/Down", "Header row, mapping field or scroll"),
        key_line("Left/Right", "Change mapped column"),
        key_line("Enter", "Continue / import"),
        key_line("Backspace", "Previous step"),
        key_line("Esc", "Cancel import"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
    ))
}

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Cyan)),
        Span::raw(description),
    ])
}
