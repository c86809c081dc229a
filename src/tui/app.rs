//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! Ledger changes go through [`TransactionService`] so they are persisted
//! and audited exactly like their CLI counterparts.

use std::path::Path;

use crate::cli::export::{export_to_file, ExportFormat};
use crate::config::Settings;
use crate::import::{ImportWizard, WizardStep};
use crate::ledger::{LedgerFilter, Session, MONTHS};
use crate::models::{Transaction, TransactionId, TransactionKind};
use crate::services::TransactionService;
use crate::storage::Storage;

use super::views::import::ImportFormState;
use super::widgets::TextInput;

/// Mode of input on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search box
    Search,
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    ConfirmDelete(TransactionId),
    Export,
}

/// Main application state
pub struct App<'a> {
    pub storage: &'a Storage,

    pub settings: &'a Settings,

    /// Ledger plus dashboard / import view
    pub session: Session,

    pub should_quit: bool,

    pub input_mode: InputMode,

    pub active_dialog: ActiveDialog,

    /// Dashboard filter; search text lives in `search_input`
    pub filter: LedgerFilter,

    pub search_input: TextInput,

    /// Selected row in the filtered table
    pub selected_index: usize,

    /// Export dialog path
    pub export_input: TextInput,

    /// Import wizard text fields and cursors
    pub import_form: ImportFormState,

    /// Status message to display
    pub status_message: Option<String>,
}

impl<'a> App<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings, session: Session) -> Self {
        Self {
            storage,
            settings,
            session,
            should_quit: false,
            input_mode: InputMode::default(),
            active_dialog: ActiveDialog::default(),
            filter: settings.base_filter(),
            search_input: TextInput::new().label("Search").placeholder("press / to search"),
            selected_index: 0,
            export_input: TextInput::new().label("File"),
            import_form: ImportFormState::new(),
            status_message: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        if dialog == ActiveDialog::Export {
            let default = ExportFormat::Csv.default_filename(chrono::Local::now().date_naive());
            self.export_input.set_value(default.display().to_string());
            self.export_input.focused = true;
        }
        self.active_dialog = dialog;
    }

    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
        self.export_input.focused = false;
    }

    pub fn has_dialog(&self) -> bool {
        !matches!(self.active_dialog, ActiveDialog::None)
    }

    /// Dashboard filter including the live search text
    pub fn current_filter(&self) -> LedgerFilter {
        self.filter.clone().search(self.search_input.value())
    }

    /// Transactions shown in the dashboard table
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        self.session.ledger.filter(&self.current_filter())
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        self.visible_transactions().get(self.selected_index).copied()
    }

    pub fn move_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let count = self.visible_transactions().len();
        if self.selected_index + 1 < count {
            self.selected_index += 1;
        }
    }

    /// Keep the selection inside the filtered list
    pub fn clamp_selection(&mut self) {
        let count = self.visible_transactions().len();
        self.selected_index = self.selected_index.min(count.saturating_sub(1));
    }

    pub fn cycle_exchange(&mut self) {
        let exchanges = self.session.ledger.exchanges();
        self.filter.exchange = cycle(&exchanges, self.filter.exchange.as_ref());
        self.selected_index = 0;
    }

    pub fn cycle_kind(&mut self) {
        self.filter.kind = cycle(&TransactionKind::ALL, self.filter.kind.as_ref());
        self.selected_index = 0;
    }

    pub fn cycle_year(&mut self) {
        let years = self.session.ledger.years();
        self.filter.year = cycle(&years, self.filter.year.as_ref());
        self.selected_index = 0;
    }

    pub fn cycle_month(&mut self) {
        let months: Vec<u32> = (0..MONTHS.len() as u32).collect();
        self.filter.month = cycle(&months, self.filter.month.as_ref());
        self.selected_index = 0;
    }

    pub fn clear_filters(&mut self) {
        self.filter = LedgerFilter::new();
        self.search_input.clear();
        self.selected_index = 0;
        self.set_status("Filters cleared");
    }

    /// Delete a transaction and persist the ledger
    pub fn delete_transaction(&mut self, id: TransactionId) {
        let service = TransactionService::new(self.storage);
        match service.delete(&mut self.session.ledger, &id.to_string()) {
            Ok(txn) => {
                self.set_status(format!("Deleted {} {} {}", txn.day(), txn.exchange, txn.kind()));
                self.clamp_selection();
            }
            Err(e) => self.set_status(format!("Delete failed: {}", e)),
        }
    }

    /// Write the filtered list; `.json` paths get the JSON format
    pub fn export_filtered(&mut self, path: &Path) {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        };
        let result = {
            let rows = self.visible_transactions();
            export_to_file(rows.iter().copied(), path, format, true)
        };
        match result {
            Ok(count) => {
                self.set_status(format!("Exported {} transactions to {}", count, path.display()))
            }
            Err(e) => self.set_status(format!("Export failed: {}", e)),
        }
    }

    /// Switch the dashboard to the import wizard
    pub fn begin_import(&mut self) {
        let wizard = ImportWizard::new().with_date_format(self.settings.import_date_format.clone());
        self.session.begin_import(wizard);
        self.import_form = ImportFormState::new();
        self.input_mode = InputMode::Normal;
        self.clear_status();
    }

    pub fn cancel_import(&mut self) {
        self.session.cancel_import();
        self.set_status("Import cancelled");
    }

    /// Advance the wizard; on the upload step this first loads the file
    /// named in the path field if it changed
    pub fn import_next(&mut self) {
        let form = &mut self.import_form;
        let Some(wizard) = self.session.wizard_mut() else {
            return;
        };

        if wizard.step() == WizardStep::Upload {
            wizard.set_exchange(form.exchange_input.value());
            wizard.set_tag(form.tag_input.value());

            let path = form.path_input.value().trim().to_string();
            if !path.is_empty() && form.loaded_path.as_deref() != Some(path.as_str()) {
                if wizard.load_file(Path::new(&path)).is_err() {
                    return;
                }
                form.loaded_path = Some(path);
            }
        }

        if let Ok(step) = wizard.next() {
            form.enter_step(step);
        }
    }

    pub fn import_back(&mut self) {
        if let Some(wizard) = self.session.wizard_mut() {
            let step = wizard.back();
            self.import_form.enter_step(step);
        }
    }

    /// Commit the wizard into the ledger, persist it and return to the
    /// dashboard. A refused commit leaves the wizard open with its message.
    pub fn commit_import(&mut self) {
        let batch = match self.session.finish_import() {
            Ok(batch) => batch,
            Err(e) => {
                self.set_status(e.to_string());
                return;
            }
        };

        let service = TransactionService::new(self.storage);
        match service.record_import(&self.session.ledger, &batch) {
            Ok(()) => {
                let mut message = format!(
                    "Imported {} transactions from {}",
                    batch.transactions.len(),
                    batch.exchange
                );
                if !batch.skipped.is_empty() {
                    message.push_str(&format!(" ({} rows skipped)", batch.skipped.len()));
                }
                self.set_status(message);
            }
            Err(e) => self.set_status(format!("Imported, but saving failed: {}", e)),
        }
        self.selected_index = 0;
    }
}

/// Step `None → items[0] → … → items[n-1] → None`
fn cycle<T: Clone + PartialEq>(items: &[T], current: Option<&T>) -> Option<T> {
    match current {
        None => items.first().cloned(),
        Some(value) => items
            .iter()
            .position(|item| item == value)
            .and_then(|i| items.get(i + 1))
            .cloned(),
    }
}
