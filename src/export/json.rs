//! JSON export of the ledger with schema versioning

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoinlogError, CoinlogResult};
use crate::models::Transaction;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// A JSON ledger dump
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// coinlog version that wrote the file
    pub app_version: String,

    pub metadata: ExportMetadata,

    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub transaction_count: usize,

    pub exchanges: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_transaction: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_transaction: Option<String>,
}

impl LedgerExport {
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let transactions: Vec<Transaction> = transactions.into_iter().cloned().collect();

        let mut exchanges: Vec<String> = transactions.iter().map(|t| t.exchange.clone()).collect();
        exchanges.sort();
        exchanges.dedup();

        let earliest = transactions.iter().map(|t| t.date).min();
        let latest = transactions.iter().map(|t| t.date).max();

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata: ExportMetadata {
                transaction_count: transactions.len(),
                exchanges,
                earliest_transaction: earliest.map(|d| d.date().to_string()),
                latest_transaction: latest.map(|d| d.date().to_string()),
            },
            transactions,
        }
    }

    /// Check that the file was written by a compatible version
    pub fn validate(&self) -> Result<(), String> {
        let major = self.schema_version.split('.').next().unwrap_or("");
        if major != "1" {
            return Err(format!(
                "Unsupported schema version: {} (expected 1.x.x)",
                self.schema_version
            ));
        }
        if self.metadata.transaction_count != self.transactions.len() {
            return Err(format!(
                "Transaction count mismatch: metadata says {}, found {}",
                self.metadata.transaction_count,
                self.transactions.len()
            ));
        }
        Ok(())
    }
}

/// Write transactions as a JSON document
pub fn export_ledger_json<'a, W: Write>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    writer: &mut W,
    pretty: bool,
) -> CoinlogResult<usize> {
    let export = LedgerExport::new(transactions);

    if pretty {
        serde_json::to_writer_pretty(&mut *writer, &export)
    } else {
        serde_json::to_writer(&mut *writer, &export)
    }
    .map_err(|e| CoinlogError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| CoinlogError::Export(e.to_string()))?;

    Ok(export.metadata.transaction_count)
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> CoinlogResult<LedgerExport> {
    let export: LedgerExport =
        serde_json::from_str(json_str).map_err(|e| CoinlogError::Import(e.to_string()))?;

    export.validate().map_err(CoinlogError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::sample_transactions;

    #[test]
    fn test_json_round_trip() {
        let txns = sample_transactions();
        let mut out = Vec::new();
        assert_eq!(export_ledger_json(&txns, &mut out, true).unwrap(), 18);

        let text = String::from_utf8(out).unwrap();
        let export = import_from_json(&text).unwrap();
        assert_eq!(export.transactions, txns);
        assert_eq!(export.metadata.exchanges.len(), 5);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2025-01-05"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2025-03-20"));
    }

    #[test]
    fn test_rejects_tampered_count() {
        let mut export = LedgerExport::new(&sample_transactions());
        export.metadata.transaction_count = 3;
        let text = serde_json::to_string(&export).unwrap();
        assert!(import_from_json(&text).is_err());
    }

    #[test]
    fn test_rejects_future_schema() {
        let mut export = LedgerExport::new(std::iter::empty());
        export.schema_version = "2.0.0".into();
        assert!(export.validate().is_err());
    }
}
