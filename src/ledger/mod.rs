//! The transaction ledger
//!
//! [`Ledger`] owns the ordered transaction collection and answers filtered
//! queries. [`Session`] adds the dashboard / import view switch on top.

pub mod filter;
pub mod input;
pub mod sample;
pub mod session;

pub use filter::{month_from_name, LedgerFilter, MONTHS};
pub use input::{parse_leg, NewTransaction, TransactionEdit};
pub use sample::sample_transactions;
pub use session::{Session, View};

use serde::{Deserialize, Serialize};

use crate::error::{CoinlogError, CoinlogResult};
use crate::models::{Transaction, TransactionId};

/// Ordered collection of transactions, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Every transaction, in insertion order
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn add(&mut self, txn: Transaction) -> TransactionId {
        let id = txn.id;
        self.transactions.push(txn);
        id
    }

    /// Append imported transactions
    pub fn extend(&mut self, txns: impl IntoIterator<Item = Transaction>) -> usize {
        let before = self.transactions.len();
        self.transactions.extend(txns);
        self.transactions.len() - before
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Resolve a user-typed reference (`tx-1a2b3c4d`, a hex prefix, or a full UUID)
    pub fn find(&self, reference: &str) -> CoinlogResult<&Transaction> {
        let mut matches = self.transactions.iter().filter(|t| t.id.matches_ref(reference));
        let first = matches
            .next()
            .ok_or_else(|| CoinlogError::transaction_not_found(reference))?;
        if matches.next().is_some() {
            return Err(CoinlogError::Validation(format!(
                "'{}' matches more than one transaction; use a longer id",
                reference
            )));
        }
        Ok(first)
    }

    /// Replace the transaction with the same id, returning the old version
    pub fn update(&mut self, txn: Transaction) -> CoinlogResult<Transaction> {
        let slot = self
            .transactions
            .iter_mut()
            .find(|t| t.id == txn.id)
            .ok_or_else(|| CoinlogError::transaction_not_found(txn.id.to_string()))?;
        Ok(std::mem::replace(slot, txn))
    }

    pub fn remove(&mut self, id: TransactionId) -> CoinlogResult<Transaction> {
        let pos = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoinlogError::transaction_not_found(id.to_string()))?;
        Ok(self.transactions.remove(pos))
    }

    /// Matching transactions, most recent first
    pub fn filter(&self, filter: &LedgerFilter) -> Vec<&Transaction> {
        let mut result: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect();
        result.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        result
    }

    /// Distinct exchange names, sorted
    pub fn exchanges(&self) -> Vec<String> {
        let mut names: Vec<String> = self.transactions.iter().map(|t| t.exchange.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Distinct years with transactions, newest first
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.transactions.iter().map(Transaction::year).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }
}
