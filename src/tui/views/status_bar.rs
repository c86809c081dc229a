//! Status bar view
//!
//! Ledger size, current view, the last status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ledger::View;
use crate::tui::app::{App, InputMode};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} transactions", app.session.ledger.len()),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )];

    spans.push(Span::raw(" │ "));
    let view = match app.session.view() {
        View::Dashboard => "Dashboard",
        View::Import(_) => "Import",
    };
    spans.push(Span::styled(view, Style::default().fg(Color::Cyan)));

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let hints = match (app.session.view(), app.input_mode) {
        (View::Import(_), _) => " Esc:Cancel import ",
        (View::Dashboard, InputMode::Search) => " Enter/Esc:Done ",
        (View::Dashboard, InputMode::Normal) => " q:Quit  ?:Help  i:Import ",
    };

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
