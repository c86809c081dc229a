//! Import wizard view
//!
//! Four screens (upload, preview, mapping, review) drawn over the
//! [`ImportWizard`] held by the session, plus the text fields and cursors
//! the wizard itself does not own.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::display::{column_label, format_skipped_row, format_transaction_row};
use crate::import::{AmountColumns, ColumnMapping, ImportWizard, KindSource, WizardStep};
use crate::models::TransactionKind;
use crate::tui::app::App;
use crate::tui::widgets::TextInput;

/// Which field is focused on the upload screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadField {
    #[default]
    Exchange,
    Tag,
    Path,
}

impl UploadField {
    pub fn next(self) -> Self {
        match self {
            Self::Exchange => Self::Tag,
            Self::Tag => Self::Path,
            Self::Path => Self::Exchange,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Exchange => Self::Path,
            Self::Tag => Self::Exchange,
            Self::Path => Self::Tag,
        }
    }
}

/// Editable rows of the mapping screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingField {
    Date,
    Time,
    Type,
    Amount,
    Currency,
    CounterAmount,
    CounterCurrency,
    Tag,
    Note,
}

impl MappingField {
    pub const ALL: [MappingField; 9] = [
        Self::Date,
        Self::Time,
        Self::Type,
        Self::Amount,
        Self::Currency,
        Self::CounterAmount,
        Self::CounterCurrency,
        Self::Tag,
        Self::Note,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date *",
            Self::Time => "Time",
            Self::Type => "Type",
            Self::Amount => "Amount",
            Self::Currency => "Currency",
            Self::CounterAmount => "Paid / received",
            Self::CounterCurrency => "Its currency",
            Self::Tag => "Tag",
            Self::Note => "Note",
        }
    }
}

/// Text fields and cursors of the import screens
#[derive(Debug, Clone)]
pub struct ImportFormState {
    pub focused_field: UploadField,

    pub exchange_input: TextInput,

    pub tag_input: TextInput,

    pub path_input: TextInput,

    /// Path whose contents the wizard currently holds
    pub loaded_path: Option<String>,

    /// Index into [`MappingField::ALL`]
    pub mapping_index: usize,

    /// First visible line on the review screen
    pub review_scroll: usize,
}

impl Default for ImportFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportFormState {
    pub fn new() -> Self {
        let mut state = Self {
            focused_field: UploadField::Exchange,
            exchange_input: TextInput::new()
                .label("Exchange")
                .placeholder("e.g. Binance"),
            tag_input: TextInput::new().label("Tag").placeholder("optional"),
            path_input: TextInput::new()
                .label("CSV file")
                .placeholder("path/to/transactions.csv"),
            loaded_path: None,
            mapping_index: 0,
            review_scroll: 0,
        };
        state.set_focus(UploadField::Exchange);
        state
    }

    pub fn set_focus(&mut self, field: UploadField) {
        self.focused_field = field;
        self.exchange_input.focused = field == UploadField::Exchange;
        self.tag_input.focused = field == UploadField::Tag;
        self.path_input.focused = field == UploadField::Path;
    }

    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            UploadField::Exchange => &mut self.exchange_input,
            UploadField::Tag => &mut self.tag_input,
            UploadField::Path => &mut self.path_input,
        }
    }

    /// Reset per-screen cursors after a step change
    pub fn enter_step(&mut self, step: WizardStep) {
        match step {
            WizardStep::Mapping => self.mapping_index = 0,
            WizardStep::Review => self.review_scroll = 0,
            WizardStep::Upload | WizardStep::Preview => {}
        }
    }

    pub fn mapping_field(&self) -> MappingField {
        MappingField::ALL[self.mapping_index % MappingField::ALL.len()]
    }

    pub fn mapping_up(&mut self) {
        self.mapping_index = self.mapping_index.saturating_sub(1);
    }

    pub fn mapping_down(&mut self) {
        if self.mapping_index + 1 < MappingField::ALL.len() {
            self.mapping_index += 1;
        }
    }
}

/// Step an optional column through `None, 0, 1, …, n-1` and back to `None`
pub fn step_column(current: Option<usize>, columns: usize, forward: bool) -> Option<usize> {
    if columns == 0 {
        return None;
    }
    match (current, forward) {
        (None, true) => Some(0),
        (None, false) => Some(columns - 1),
        (Some(i), true) if i + 1 < columns => Some(i + 1),
        (Some(_), true) => None,
        (Some(0), false) => None,
        (Some(i), false) => Some((i - 1).min(columns - 1)),
    }
}

/// Step the kind source through the four fixed kinds, then every column
pub fn step_kind(current: KindSource, columns: usize, forward: bool) -> KindSource {
    let fixed = TransactionKind::ALL.len();
    let total = fixed + columns;
    let position = match current {
        KindSource::Fixed(kind) => TransactionKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or(0),
        KindSource::Column(i) => fixed + i.min(columns.saturating_sub(1)),
    };
    let next = if forward {
        (position + 1) % total
    } else {
        (position + total - 1) % total
    };
    if next < fixed {
        KindSource::Fixed(TransactionKind::ALL[next])
    } else {
        KindSource::Column(next - fixed)
    }
}

/// Move one mapping field to the next or previous column
///
/// Editing an amount field of a ledger-layout mapping switches it to the
/// primary / counter layout, starting from the buy and sell pairs.
pub fn adjust_mapping(
    mapping: &mut ColumnMapping,
    field: MappingField,
    columns: usize,
    forward: bool,
) {
    match field {
        MappingField::Date => mapping.date = step_column(mapping.date, columns, forward),
        MappingField::Time => mapping.time = step_column(mapping.time, columns, forward),
        MappingField::Type => mapping.kind = step_kind(mapping.kind, columns, forward),
        MappingField::Tag => mapping.tag = step_column(mapping.tag, columns, forward),
        MappingField::Note => mapping.note = step_column(mapping.note, columns, forward),
        MappingField::Amount
        | MappingField::Currency
        | MappingField::CounterAmount
        | MappingField::CounterCurrency => {
            let (mut primary, mut secondary) = match mapping.amounts {
                AmountColumns::Roles { primary, secondary } => (primary, secondary),
                AmountColumns::Ledger { buy, sell, .. } => (buy, sell),
            };
            let slot = match field {
                MappingField::Amount => &mut primary.amount,
                MappingField::Currency => &mut primary.currency,
                MappingField::CounterAmount => &mut secondary.amount,
                _ => &mut secondary.currency,
            };
            *slot = step_column(*slot, columns, forward);
            mapping.amounts = AmountColumns::Roles { primary, secondary };
        }
    }
}

fn field_value(mapping: &ColumnMapping, field: MappingField, headers: &[String]) -> String {
    let roles = match mapping.amounts {
        AmountColumns::Roles { primary, secondary } => Some((primary, secondary)),
        AmountColumns::Ledger { .. } => None,
    };
    match field {
        MappingField::Date => column_label(mapping.date, headers),
        MappingField::Time => column_label(mapping.time, headers),
        MappingField::Type => match mapping.kind {
            KindSource::Column(i) => column_label(Some(i), headers),
            KindSource::Fixed(kind) => format!("always {}", kind),
        },
        MappingField::Amount => match roles {
            Some((primary, _)) => column_label(primary.amount, headers),
            None => "coinlog export layout (Buy/Sell/Deposit/Withdraw pairs)".into(),
        },
        MappingField::Currency => roles
            .map(|(p, _)| column_label(p.currency, headers))
            .unwrap_or_default(),
        MappingField::CounterAmount => roles
            .map(|(_, s)| column_label(s.amount, headers))
            .unwrap_or_default(),
        MappingField::CounterCurrency => roles
            .map(|(_, s)| column_label(s.currency, headers))
            .unwrap_or_default(),
        MappingField::Tag => column_label(mapping.tag, headers),
        MappingField::Note => column_label(mapping.note, headers),
    }
}

/// Render the wizard for the current step
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(wizard) = app.session.wizard() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Step indicator
            Constraint::Min(5),    // Step body
            Constraint::Length(3), // Message and hints
        ])
        .split(area);

    render_steps(frame, wizard.step(), chunks[0]);

    match wizard.step() {
        WizardStep::Upload => render_upload(frame, &app.import_form, wizard, chunks[1]),
        WizardStep::Preview => render_preview(frame, wizard, chunks[1]),
        WizardStep::Mapping => render_mapping(frame, &app.import_form, wizard, chunks[1]),
        WizardStep::Review => render_review(frame, &app.import_form, wizard, chunks[1]),
    }

    render_footer(frame, wizard, chunks[2]);
}

fn render_steps(frame: &mut Frame, current: WizardStep, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, step) in WizardStep::ALL.iter().enumerate() {
        let style = if *step == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step.index() < current.index() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {}. {} ", i + 1, step.title()), style));
        if i + 1 < WizardStep::ALL.len() {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }
    }

    let block = Block::default()
        .title(" Import CSV ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_upload(frame: &mut Frame, form: &ImportFormState, wizard: &ImportWizard, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    frame.render_widget(form.exchange_input.clone(), rows[0]);
    frame.render_widget(form.tag_input.clone(), rows[1]);
    frame.render_widget(form.path_input.clone(), rows[2]);

    let loaded = match wizard.source_name() {
        Some(name) => format!(
            "Loaded {}: {} rows, {} columns",
            name,
            wizard.grid().len(),
            wizard.column_count()
        ),
        None => "No file loaded yet. Enter a path and press Enter.".to_string(),
    };
    frame.render_widget(
        Paragraph::new(loaded).style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );
}

fn render_preview(frame: &mut Frame, wizard: &ImportWizard, area: Rect) {
    let columns = wizard.column_count().max(1);
    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(5))
        .chain((0..columns).map(|_| Constraint::Min(8)))
        .collect();

    let rows: Vec<Row> = wizard
        .grid()
        .iter()
        .enumerate()
        .map(|(i, cells)| {
            let style = if i == wizard.header_row() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let label = if i == wizard.header_row() {
                "hdr".to_string()
            } else {
                (i + 1).to_string()
            };
            Row::new(
                std::iter::once(Cell::from(label))
                    .chain(cells.iter().map(|c| Cell::from(c.as_str())))
                    .collect::<Vec<_>>(),
            )
            .style(style)
        })
        .collect();

    let title = format!(
        " Choose the header row: {} data rows ",
        wizard.data_row_count()
    );
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(wizard.header_row()));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_mapping(frame: &mut Frame, form: &ImportFormState, wizard: &ImportWizard, area: Rect) {
    let headers = wizard.headers();
    let mapping = wizard.mapping();

    let mut items: Vec<ListItem> = MappingField::ALL
        .iter()
        .map(|field| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<17}", field.label()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(field_value(mapping, *field, headers)),
            ]))
        })
        .collect();
    if let Some(column) = mapping.exchange {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(format!("{:<17}", "Exchange"), Style::default().fg(Color::DarkGray)),
            Span::styled(column_label(Some(column), headers), Style::default().fg(Color::DarkGray)),
        ])));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Map columns (Left/Right to change) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(form.mapping_index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_review(frame: &mut Frame, form: &ImportFormState, wizard: &ImportWizard, area: Rect) {
    let Some(report) = wizard.report() else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} transactions ready to import into {}",
                report.imported(),
                wizard.exchange()
            ),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for txn in &report.transactions {
        lines.push(Line::from(format!("  {}", format_transaction_row(txn))));
    }
    if !report.skipped.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{} rows skipped:", report.skipped.len()),
            Style::default().fg(Color::Yellow),
        )));
        for row in &report.skipped {
            lines.push(Line::from(Span::styled(
                format!("  {}", format_skipped_row(row)),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Review ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false })
        .scroll((form.review_scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame, wizard: &ImportWizard, area: Rect) {
    let hints = match wizard.step() {
        WizardStep::Upload => "Tab:Next field  Enter:Load & continue  Esc:Cancel",
        WizardStep::Preview => "Up/Down:Header row  Enter:Continue  Backspace:Back  Esc:Cancel",
        WizardStep::Mapping => "Up/Down:Field  Left/Right:Column  Enter:Parse  Backspace:Back  Esc:Cancel",
        WizardStep::Review => "Up/Down:Scroll  Enter:Import  Backspace:Back  Esc:Cancel",
    };

    let mut lines = Vec::new();
    if let Some(message) = wizard.message() {
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray))));

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
