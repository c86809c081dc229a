//! Event handler for the TUI
//!
//! Routes key events to the open dialog, the import wizard or the
//! dashboard.

use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App, InputMode};
use super::event::Event;
use super::views::import::{adjust_mapping, UploadField};
use crate::import::WizardStep;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) -> Result<()> {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Tick | Event::Resize(_, _) => Ok(()),
    }
}

fn handle_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return Ok(());
    }

    if app.has_dialog() {
        return handle_dialog_key(app, key);
    }

    if app.session.is_importing() {
        return handle_wizard_key(app, key);
    }

    match app.input_mode {
        InputMode::Normal => handle_dashboard_key(app, key),
        InputMode::Search => handle_search_key(app, key),
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) -> Result<()> {
    app.clear_status();
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Char('?') => app.open_dialog(ActiveDialog::Help),

        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),

        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_input.move_end();
        }
        KeyCode::Char('e') => app.cycle_exchange(),
        KeyCode::Char('t') => app.cycle_kind(),
        KeyCode::Char('y') => app.cycle_year(),
        KeyCode::Char('m') => app.cycle_month(),
        KeyCode::Char('c') => app.clear_filters(),

        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.selected_transaction().map(|t| t.id) {
                app.open_dialog(ActiveDialog::ConfirmDelete(id));
            }
        }
        KeyCode::Char('x') => app.open_dialog(ActiveDialog::Export),
        KeyCode::Char('i') => app.begin_import(),

        _ => {}
    }
    Ok(())
}

fn handle_search_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
        _ => {
            if app.search_input.handle_key(key) {
                app.selected_index = 0;
            }
        }
    }
    Ok(())
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match app.active_dialog.clone() {
        ActiveDialog::Help => app.close_dialog(),
        ActiveDialog::ConfirmDelete(id) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                app.close_dialog();
                app.delete_transaction(id);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.close_dialog(),
            _ => {}
        },
        ActiveDialog::Export => match key.code {
            KeyCode::Esc => app.close_dialog(),
            KeyCode::Enter => {
                let path = PathBuf::from(app.export_input.value().trim());
                app.close_dialog();
                if path.as_os_str().is_empty() {
                    app.set_status("Export cancelled: no file name");
                } else {
                    app.export_filtered(&path);
                }
            }
            _ => {
                app.export_input.handle_key(key);
            }
        },
        ActiveDialog::None => {}
    }
    Ok(())
}

fn handle_wizard_key(app: &mut App, key: KeyEvent) -> Result<()> {
    let Some(step) = app.session.wizard().map(|w| w.step()) else {
        return Ok(());
    };

    if key.code == KeyCode::Esc {
        app.cancel_import();
        return Ok(());
    }

    match step {
        WizardStep::Upload => handle_upload_key(app, key),
        WizardStep::Preview => handle_preview_key(app, key),
        WizardStep::Mapping => handle_mapping_key(app, key),
        WizardStep::Review => handle_review_key(app, key),
    }
    Ok(())
}

fn handle_upload_key(app: &mut App, key: KeyEvent) {
    let form = &mut app.import_form;
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.set_focus(form.focused_field.next()),
        KeyCode::BackTab | KeyCode::Up => form.set_focus(form.focused_field.prev()),
        KeyCode::Enter => {
            if form.focused_field == UploadField::Path {
                app.import_next();
            } else {
                form.set_focus(form.focused_field.next());
            }
        }
        _ => {
            form.focused_input().handle_key(key);
        }
    }
}

fn handle_preview_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.import_next(),
        KeyCode::Backspace | KeyCode::Left => app.import_back(),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Down | KeyCode::Char('j') => {
            let Some(wizard) = app.session.wizard_mut() else {
                return;
            };
            let current = wizard.header_row();
            let target = if matches!(key.code, KeyCode::Up | KeyCode::Char('k')) {
                current.saturating_sub(1)
            } else {
                current + 1
            };
            if target != current && target < wizard.grid().len() {
                let _ = wizard.select_header_row(target);
            }
        }
        _ => {}
    }
}

fn handle_mapping_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.import_next(),
        KeyCode::Backspace => app.import_back(),
        KeyCode::Up | KeyCode::Char('k') => app.import_form.mapping_up(),
        KeyCode::Down | KeyCode::Char('j') => app.import_form.mapping_down(),
        KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
            let forward = matches!(key.code, KeyCode::Right | KeyCode::Char('l'));
            let field = app.import_form.mapping_field();
            if let Some(wizard) = app.session.wizard_mut() {
                let columns = wizard.column_count();
                adjust_mapping(wizard.mapping_mut(), field, columns, forward);
            }
        }
        _ => {}
    }
}

fn handle_review_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_import(),
        KeyCode::Backspace | KeyCode::Left => app.import_back(),
        KeyCode::Up | KeyCode::Char('k') => {
            app.import_form.review_scroll = app.import_form.review_scroll.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => app.import_form.review_scroll += 1,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::CoinlogPaths;
    use crate::config::Settings;
    use crate::import::{AmountColumns, KindSource};
    use crate::ledger::{sample_transactions, Ledger, Session, View};
    use crate::models::TransactionKind;
    use crate::storage::Storage;
    use tempfile::TempDir;

    fn storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = CoinlogPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE))).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_dashboard_keys() {
        let (_dir, storage) = storage();
        let settings = Settings::default();
        let session = Session::new(Ledger::from_transactions(sample_transactions()));
        let mut app = App::new(&storage, &settings, session);

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.filter.kind, Some(TransactionKind::Buy));

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "q");
        assert_eq!(app.search_input.value(), "q");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);

        press(&mut app, KeyCode::Char('c'));
        assert!(app.current_filter().is_empty());

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (_dir, storage) = storage();
        let settings = Settings::default();
        let session = Session::new(Ledger::from_transactions(sample_transactions()));
        let mut app = App::new(&storage, &settings, session);

        press(&mut app, KeyCode::Char('d'));
        assert!(matches!(app.active_dialog, ActiveDialog::ConfirmDelete(_)));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session.ledger.len(), 18);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(!app.has_dialog());
        assert_eq!(app.session.ledger.len(), 17);
    }

    #[test]
    fn test_wizard_keys_end_to_end() {
        let (dir, storage) = storage();
        let settings = Settings::default();
        let mut app = App::new(&storage, &settings, Session::new(Ledger::new()));

        let csv = dir.path().join("export.csv");
        std::fs::write(
            &csv,
            "My wallet export\nTime,Coin,Qty\n2025-02-01 10:00,ETH,2\n2025-02-02 11:00,ETH,1\n",
        )
        .unwrap();

        press(&mut app, KeyCode::Char('i'));
        assert!(app.session.is_importing());

        type_text(&mut app, "Ledger Live");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, &csv.display().to_string());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.wizard().unwrap().step(), WizardStep::Preview);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.session.wizard().unwrap().header_row(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.wizard().unwrap().step(), WizardStep::Mapping);

        // Timestamp, coin and quantity are detected from the labels
        let mapping = app.session.wizard().unwrap().mapping().clone();
        assert_eq!(mapping.date, Some(0));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(
            app.session.wizard().unwrap().mapping().kind,
            KindSource::Fixed(TransactionKind::Deposit)
        );

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Left);
        match app.session.wizard().unwrap().mapping().amounts {
            AmountColumns::Roles { primary, .. } => {
                assert_eq!(primary.amount, Some(2));
                assert_eq!(primary.currency, Some(1));
            }
            AmountColumns::Ledger { .. } => panic!("expected role columns"),
        }

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.wizard().unwrap().step(), WizardStep::Review);
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.session.view(), View::Dashboard));
        assert_eq!(app.session.ledger.len(), 2);
        assert!(app
            .session
            .ledger
            .all()
            .iter()
            .all(|t| t.exchange == "Ledger Live" && t.kind() == TransactionKind::Deposit));
    }

    #[test]
    fn test_escape_cancels_import() {
        let (_dir, storage) = storage();
        let settings = Settings::default();
        let mut app = App::new(&storage, &settings, Session::new(Ledger::new()));

        press(&mut app, KeyCode::Char('i'));
        type_text(&mut app, "q");
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc);
        assert!(!app.session.is_importing());
    }
}
