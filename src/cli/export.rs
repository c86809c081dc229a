//! CLI command for data export
//!
//! Writes the filtered ledger as CSV (the layout `coinlog import` reads
//! back) or as a versioned JSON document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, ValueEnum};

use super::FilterArgs;
use crate::config::Settings;
use crate::error::{CoinlogError, CoinlogResult};
use crate::export::{default_export_filename, export_ledger_json, export_transactions_csv};
use crate::models::Transaction;
use crate::services::TransactionService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// 14-column CSV, re-importable
    #[default]
    Csv,
    /// Full transaction records with metadata
    Json,
}

impl ExportFormat {
    /// `crypto_transactions_<date>.csv` or `.json`
    pub fn default_filename(&self, today: NaiveDate) -> PathBuf {
        let name = PathBuf::from(default_export_filename(today));
        match self {
            Self::Csv => name,
            Self::Json => name.with_extension("json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Output file (defaults to crypto_transactions_<today>.csv)
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub filter: FilterArgs,

    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: ExportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Write transactions to `output` in the given format
pub fn export_to_file<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    output: &Path,
    format: ExportFormat,
    pretty: bool,
) -> CoinlogResult<usize> {
    let file = File::create(output).map_err(|e| {
        CoinlogError::Export(format!(
            "Failed to create file {}: {}",
            output.display(),
            e
        ))
    })?;
    let mut writer = BufWriter::new(file);

    let count = match format {
        ExportFormat::Csv => export_transactions_csv(transactions, &mut writer)?,
        ExportFormat::Json => export_ledger_json(transactions, &mut writer, pretty)?,
    };
    writer
        .flush()
        .map_err(|e| CoinlogError::Export(e.to_string()))?;

    Ok(count)
}

/// Handle the export command
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    args: ExportArgs,
) -> CoinlogResult<()> {
    let ledger = TransactionService::new(storage).load()?;
    let filter = args.filter.to_filter(settings)?;
    let rows = ledger.filter(&filter);

    let output = args
        .output
        .unwrap_or_else(|| args.format.default_filename(chrono::Local::now().date_naive()));

    let count = export_to_file(rows.iter().copied(), &output, args.format, args.pretty)?;
    println!(
        "Exported {} transactions ({}) to: {}",
        count,
        filter.describe(),
        output.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{import_from_json, EXPORT_HEADER};
    use crate::ledger::sample_transactions;
    use tempfile::TempDir;

    #[test]
    fn test_default_filenames() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        assert_eq!(
            ExportFormat::Csv.default_filename(today),
            PathBuf::from("crypto_transactions_2025-03-20.csv")
        );
        assert_eq!(
            ExportFormat::Json.default_filename(today),
            PathBuf::from("crypto_transactions_2025-03-20.json")
        );
    }

    #[test]
    fn test_export_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let txns = sample_transactions();

        let csv_path = temp_dir.path().join("out.csv");
        assert_eq!(export_to_file(&txns, &csv_path, ExportFormat::Csv, false).unwrap(), 18);
        let text = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(text.lines().next(), Some(EXPORT_HEADER));
        assert_eq!(text.lines().count(), 19);

        let json_path = temp_dir.path().join("out.json");
        export_to_file(&txns, &json_path, ExportFormat::Json, true).unwrap();
        let export = import_from_json(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(export.transactions.len(), 18);
    }
}
