//! TUI views
//!
//! The dashboard and the import wizard share the status bar; dialogs are
//! drawn on top of either.

pub mod dashboard;
pub mod import;
pub mod status_bar;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;
use crate::ledger::View;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    match app.session.view() {
        View::Dashboard => dashboard::render(frame, app, layout.main),
        View::Import(_) => import::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

fn render_dialog(frame: &mut Frame, app: &mut App) {
    match &app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame, app),
        ActiveDialog::ConfirmDelete(id) => {
            let message = match app.session.ledger.get(*id) {
                Some(txn) => format!(
                    "Delete {} {} on {}?",
                    txn.exchange,
                    txn.kind(),
                    txn.day()
                ),
                None => format!("Delete transaction {}?", id),
            };
            dialogs::confirm::render(frame, &message);
        }
        ActiveDialog::Export => dialogs::export::render(frame, app),
        ActiveDialog::None => {}
    }
}
