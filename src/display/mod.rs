//! Display formatting for terminal output
//!
//! Turns transactions, import reports and audit entries into text for the
//! CLI.

pub mod import;
pub mod transaction;

pub use import::{column_label, format_import_report, format_mapping, format_skipped_row, mapping_fields};
pub use transaction::{
    format_list_summary, format_transaction_details, format_transaction_row,
    format_transaction_table,
};

use crate::audit::AuditEntry;

/// Format audit entries oldest first, one per line
pub fn format_history(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded yet.\n".to_string();
    }
    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}
