//! Transaction repository backed by `transactions.json`

use std::path::PathBuf;

use crate::error::CoinlogError;
use crate::ledger::Ledger;

use super::file_io::{read_json, write_json_atomic};

/// Loads and saves the whole ledger
pub struct TransactionRepository {
    path: PathBuf,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the ledger; a missing file is an empty ledger
    pub fn load(&self) -> Result<Ledger, CoinlogError> {
        read_json(&self.path)
    }

    pub fn save(&self, ledger: &Ledger) -> Result<(), CoinlogError> {
        write_json_atomic(&self.path, ledger)
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
