//! Dashboard / import view switching

use super::Ledger;
use crate::error::{CoinlogError, CoinlogResult};
use crate::import::{ImportBatch, ImportWizard};

/// What the session is showing
#[derive(Debug, Clone, Default)]
pub enum View {
    #[default]
    Dashboard,
    /// The wizard replaces the dashboard until it is committed or cancelled
    Import(Box<ImportWizard>),
}

/// A ledger plus the view state that sits on top of it
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub ledger: Ledger,
    view: View,
}

impl Session {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            view: View::Dashboard,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_importing(&self) -> bool {
        matches!(self.view, View::Import(_))
    }

    /// Switch to the import view with a fresh wizard
    pub fn begin_import(&mut self, wizard: ImportWizard) {
        self.view = View::Import(Box::new(wizard));
    }

    pub fn wizard(&self) -> Option<&ImportWizard> {
        match &self.view {
            View::Import(wizard) => Some(wizard),
            View::Dashboard => None,
        }
    }

    pub fn wizard_mut(&mut self) -> Option<&mut ImportWizard> {
        match &mut self.view {
            View::Import(wizard) => Some(wizard),
            View::Dashboard => None,
        }
    }

    /// Commit the wizard into the ledger and return to the dashboard
    ///
    /// If the wizard refuses to commit, the session stays in the import view
    /// with the wizard untouched.
    pub fn finish_import(&mut self) -> CoinlogResult<ImportBatch> {
        match &self.view {
            View::Import(wizard) => wizard.ready_to_commit()?,
            View::Dashboard => {
                return Err(CoinlogError::Validation("No import in progress".into()));
            }
        }

        if let View::Import(wizard) = std::mem::take(&mut self.view) {
            let batch = (*wizard).commit()?;
            self.ledger.extend(batch.transactions.iter().cloned());
            return Ok(batch);
        }
        Err(CoinlogError::Validation("No import in progress".into()))
    }

    /// Drop the wizard without touching the ledger
    pub fn cancel_import(&mut self) {
        self.view = View::Dashboard;
    }
}
