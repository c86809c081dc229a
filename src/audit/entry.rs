//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// A batch of transactions committed by the import wizard
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Transaction,
    ImportBatch,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::ImportBatch => write!(f, "ImportBatch"),
        }
    }
}

/// A single audit log entry
///
/// Snapshots are stored as JSON so the log stays readable when the
/// transaction schema changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    pub entity_id: String,

    /// Short description, e.g. `2025-01-15 Coinbase Buy`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Field changes for updates, counts for imports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn blank(operation: Operation, entity_type: EntityType, entity_id: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            after: serde_json::to_value(entity).ok(),
            ..Self::blank(Operation::Create, entity_type, entity_id.into())
        }
    }

    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(before).ok(),
            after: serde_json::to_value(after).ok(),
            diff_summary,
            ..Self::blank(Operation::Update, entity_type, entity_id.into())
        }
    }

    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        Self {
            entity_name,
            before: serde_json::to_value(entity).ok(),
            ..Self::blank(Operation::Delete, entity_type, entity_id.into())
        }
    }

    /// One entry for a whole import; `ids` lists the new transactions
    pub fn import(
        exchange: &str,
        source: Option<&str>,
        ids: &[String],
        skipped: usize,
    ) -> Self {
        let name = match source {
            Some(file) => format!("{} from {}", exchange, file),
            None => exchange.to_string(),
        };
        Self {
            entity_name: Some(name),
            after: serde_json::to_value(ids).ok(),
            diff_summary: Some(format!("{} imported, {} skipped", ids.len(), skipped)),
            ..Self::blank(
                Operation::Import,
                EntityType::ImportBatch,
                ids.first().cloned().unwrap_or_default(),
            )
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Import.to_string(), "IMPORT");
    }

    #[test]
    fn test_update_entry_keeps_both_snapshots() {
        let before = json!({"exchange": "Kraken"});
        let after = json!({"exchange": "Bitstamp"});
        let entry = AuditEntry::update(
            EntityType::Transaction,
            "tx-1a2b3c4d",
            None,
            &before,
            &after,
            Some("exchange: Kraken -> Bitstamp".into()),
        );

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.before, Some(before));
        assert_eq!(entry.after, Some(after));
    }

    #[test]
    fn test_import_entry() {
        let ids = vec!["tx-00000001".to_string(), "tx-00000002".to_string()];
        let entry = AuditEntry::import("Binance", Some("binance.csv"), &ids, 1);

        assert_eq!(entry.entity_type, EntityType::ImportBatch);
        assert_eq!(entry.entity_name.as_deref(), Some("Binance from binance.csv"));
        assert_eq!(entry.diff_summary.as_deref(), Some("2 imported, 1 skipped"));

        let line = serde_json::to_string(&entry).unwrap();
        assert!(line.contains("\"operation\":\"import\""));
        assert!(line.contains("\"entity_type\":\"import_batch\""));
    }

    #[test]
    fn test_human_readable() {
        let entry = AuditEntry::delete(
            EntityType::Transaction,
            "tx-1a2b3c4d",
            Some("2025-02-06 Kraken Withdraw".into()),
            &json!({}),
        );
        let text = entry.format_human_readable();
        assert!(text.contains("DELETE Transaction tx-1a2b3c4d (2025-02-06 Kraken Withdraw)"));
    }
}
