//! Transaction service
//!
//! Applies ledger changes, persists them and records them in the audit
//! log. The ledger itself stays in memory with the caller, so the TUI and
//! the CLI share one code path.

use crate::audit::EntityType;
use crate::error::{CoinlogError, CoinlogResult};
use crate::import::ImportBatch;
use crate::ledger::{Ledger, NewTransaction, TransactionEdit};
use crate::models::Transaction;
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Load the persisted ledger
    pub fn load(&self) -> CoinlogResult<Ledger> {
        self.storage.transactions.load()
    }

    pub fn create(&self, ledger: &mut Ledger, input: NewTransaction) -> CoinlogResult<Transaction> {
        let txn = input.into_transaction()?;
        ledger.add(txn.clone());
        self.storage.transactions.save(ledger)?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(label(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Apply an edit to the transaction `reference` points at
    pub fn update(
        &self,
        ledger: &mut Ledger,
        reference: &str,
        edit: TransactionEdit,
    ) -> CoinlogResult<Transaction> {
        if edit.is_empty() {
            return Err(CoinlogError::Validation("Nothing to change".into()));
        }

        let before = ledger.find(reference)?.clone();
        let mut txn = before.clone();
        edit.apply(&mut txn)?;
        ledger.update(txn.clone())?;
        self.storage.transactions.save(ledger)?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(label(&txn)),
            &before,
            &txn,
            diff_summary(&before, &txn),
        )?;

        Ok(txn)
    }

    pub fn delete(&self, ledger: &mut Ledger, reference: &str) -> CoinlogResult<Transaction> {
        let id = ledger.find(reference)?.id;
        let txn = ledger.remove(id)?;
        self.storage.transactions.save(ledger)?;

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(label(&txn)),
            &txn,
        )?;

        Ok(txn)
    }

    /// Persist a ledger whose import was just committed in memory
    pub fn record_import(&self, ledger: &Ledger, batch: &ImportBatch) -> CoinlogResult<()> {
        self.storage.transactions.save(ledger)?;
        let ids: Vec<String> = batch.transactions.iter().map(|t| t.id.to_string()).collect();
        self.storage
            .log_import(&batch.exchange, batch.source.as_deref(), &ids, batch.skipped.len())
    }

    /// Append a committed import batch and persist it
    pub fn import(&self, ledger: &mut Ledger, batch: &ImportBatch) -> CoinlogResult<usize> {
        let count = ledger.extend(batch.transactions.iter().cloned());
        self.record_import(ledger, batch)?;
        Ok(count)
    }
}

/// `2025-01-15 Coinbase Buy`
fn label(txn: &Transaction) -> String {
    format!("{} {} {}", txn.day(), txn.exchange, txn.kind())
}

fn diff_summary(before: &Transaction, after: &Transaction) -> Option<String> {
    let mut changes = Vec::new();
    if before.exchange != after.exchange {
        changes.push(format!("exchange: {} -> {}", before.exchange, after.exchange));
    }
    if before.date != after.date {
        changes.push(format!("date: {} -> {}", before.date, after.date));
    }
    if before.kind() != after.kind() {
        changes.push(format!("kind: {} -> {}", before.kind(), after.kind()));
    }
    if before.movement != after.movement && before.kind() == after.kind() {
        changes.push("amounts changed".to_string());
    }
    if before.tag != after.tag {
        changes.push(format!(
            "tag: {} -> {}",
            before.tag.as_deref().unwrap_or("-"),
            after.tag.as_deref().unwrap_or("-")
        ));
    }
    if before.note != after.note {
        changes.push("note changed".to_string());
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}
