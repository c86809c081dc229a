//! Compound filtering for the transaction list

use crate::models::{Transaction, TransactionKind};

/// Short month names, indexed by zero-based month
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Zero-based month for `"Feb"`, `"february"` or `"2"`
pub fn month_from_name(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    if let Ok(n) = name.parse::<u32>() {
        return (1..=12).contains(&n).then(|| n - 1);
    }
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| name.starts_with(&m.to_lowercase()))
        .map(|i| i as u32)
}

/// Filter criteria; every set criterion must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerFilter {
    pub exchange: Option<String>,
    pub kind: Option<TransactionKind>,
    pub year: Option<i32>,
    /// Zero-based month (January = 0)
    pub month: Option<u32>,
    /// Case-insensitive substring over exchange, currencies, tag and note
    pub search: String,
}

impl LedgerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month0: u32) -> Self {
        self.month = Some(month0);
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(exchange) = &self.exchange {
            if txn.exchange != exchange.trim() {
                return false;
            }
        }
        if self.kind.is_some_and(|k| txn.kind() != k) {
            return false;
        }
        if self.year.is_some_and(|y| txn.year() != y) {
            return false;
        }
        if self.month.is_some_and(|m| txn.month0() != m) {
            return false;
        }
        txn.matches_search(&self.search)
    }

    /// Short human description, e.g. `Binance · Buy · Feb 2025`
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(exchange) = &self.exchange {
            parts.push(exchange.clone());
        }
        if let Some(kind) = self.kind {
            parts.push(kind.to_string());
        }
        match (self.month, self.year) {
            (Some(m), Some(y)) => parts.push(format!("{} {}", MONTHS[m as usize % 12], y)),
            (Some(m), None) => parts.push(MONTHS[m as usize % 12].to_string()),
            (None, Some(y)) => parts.push(y.to_string()),
            (None, None) => {}
        }
        if !self.search.trim().is_empty() {
            parts.push(format!("\"{}\"", self.search.trim()));
        }
        if parts.is_empty() {
            "All transactions".to_string()
        } else {
            parts.join(" · ")
        }
    }
}
