//! Export
//!
//! - CSV: the fixed 14-column layout that `coinlog import` reads back
//! - JSON: a versioned dump of full transaction records

pub mod csv;
pub mod json;

pub use csv::{
    default_export_filename, export_transactions_csv, transaction_to_csv_row, EXPORT_COLUMNS,
    EXPORT_HEADER,
};
pub use json::{export_ledger_json, import_from_json, LedgerExport, EXPORT_SCHEMA_VERSION};
