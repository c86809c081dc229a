//! Export dialog
//!
//! Asks for the output path of the filtered list; a `.json` path selects
//! the JSON format.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(70, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Export ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let count = app.visible_transactions().len();
    frame.render_widget(
        Paragraph::new(format!("{} transactions ({})", count, app.current_filter().describe())),
        chunks[0],
    );
    frame.render_widget(app.export_input.clone(), chunks[1]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Export  "),
            Span::styled("[Esc]", Style::default().fg(Color::Yellow)),
            Span::raw(" Cancel"),
        ])),
        chunks[2],
    );
}
