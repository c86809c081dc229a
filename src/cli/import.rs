//! CLI command handler for CSV import
//!
//! Drives the import wizard without interaction: upload, header row,
//! mapping (detected from the header unless overridden), review, commit.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Settings;
use crate::display::{format_import_report, format_mapping, format_transaction_row};
use crate::error::{CoinlogError, CoinlogResult};
use crate::export::import_from_json;
use crate::import::{ImportBatch, ImportWizard};
use crate::models::TransactionKind;
use crate::services::TransactionService;
use crate::storage::Storage;

/// Arguments of `coinlog import`; column numbers are 1-based
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// CSV file to import (or a coinlog JSON export)
    pub file: PathBuf,

    /// Exchange the rows came from
    #[arg(short, long)]
    pub exchange: Option<String>,

    /// Tag attached to every imported transaction
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Row holding the column labels
    #[arg(long, default_value_t = 1)]
    pub header_row: usize,

    #[arg(long)]
    pub date_col: Option<usize>,

    #[arg(long)]
    pub time_col: Option<usize>,

    /// Column whose text decides the kind (buy, sell, ...)
    #[arg(long, conflicts_with = "kind")]
    pub type_col: Option<usize>,

    /// Kind for every row when the file has no type column
    #[arg(short, long)]
    pub kind: Option<TransactionKind>,

    #[arg(long)]
    pub amount_col: Option<usize>,

    #[arg(long)]
    pub currency_col: Option<usize>,

    /// Amount paid (buy) or received (sell)
    #[arg(long)]
    pub counter_amount_col: Option<usize>,

    #[arg(long)]
    pub counter_currency_col: Option<usize>,

    #[arg(long)]
    pub note_col: Option<usize>,

    /// Show what would be imported without saving anything
    #[arg(long)]
    pub dry_run: bool,
}

impl ImportArgs {
    fn has_column_overrides(&self) -> bool {
        self.date_col.is_some()
            || self.time_col.is_some()
            || self.type_col.is_some()
            || self.kind.is_some()
            || self.amount_col.is_some()
            || self.currency_col.is_some()
            || self.counter_amount_col.is_some()
            || self.counter_currency_col.is_some()
            || self.note_col.is_some()
    }
}

/// Convert a 1-based column flag to an index
fn column(flag: &str, value: Option<usize>) -> CoinlogResult<Option<usize>> {
    match value {
        Some(0) => Err(CoinlogError::Validation(format!(
            "{} is 1-based; column 0 does not exist",
            flag
        ))),
        Some(n) => Ok(Some(n - 1)),
        None => Ok(None),
    }
}

/// Run the wizard over a file and return the batch it would commit
pub fn prepare_import(
    args: &ImportArgs,
    settings: &Settings,
) -> CoinlogResult<(ImportWizard, Option<ImportBatch>)> {
    let mut wizard = ImportWizard::new().with_date_format(settings.import_date_format.clone());
    wizard.set_exchange(args.exchange.as_deref().unwrap_or(""));
    wizard.set_tag(args.tag.as_deref().unwrap_or(""));

    wizard.load_file(&args.file)?;
    wizard.next()?;

    let header_row = column("--header-row", Some(args.header_row))?.unwrap_or(0);
    wizard.select_header_row(header_row)?;
    wizard.next()?;

    if args.has_column_overrides() {
        let mut mapping = wizard.mapping().clone();
        if let Some(date) = column("--date-col", args.date_col)? {
            mapping = mapping.with_date(date);
        }
        if let Some(time) = column("--time-col", args.time_col)? {
            mapping = mapping.with_time(time);
        }
        if let Some(kind_col) = column("--type-col", args.type_col)? {
            mapping = mapping.with_kind_column(kind_col);
        }
        if let Some(kind) = args.kind {
            mapping = mapping.with_fixed_kind(kind);
        }
        if args.amount_col.is_some() || args.currency_col.is_some() {
            mapping = mapping.with_primary(
                column("--amount-col", args.amount_col)?,
                column("--currency-col", args.currency_col)?,
            );
        }
        if args.counter_amount_col.is_some() || args.counter_currency_col.is_some() {
            mapping = mapping.with_secondary(
                column("--counter-amount-col", args.counter_amount_col)?,
                column("--counter-currency-col", args.counter_currency_col)?,
            );
        }
        if let Some(note) = column("--note-col", args.note_col)? {
            mapping = mapping.with_note(note);
        }
        wizard.set_mapping(mapping)?;
    }

    wizard.next()?;

    let batch = if wizard.can_commit() {
        Some(wizard.clone().commit()?)
    } else {
        None
    };
    Ok((wizard, batch))
}

/// Handle the import command
pub fn handle_import_command(
    storage: &Storage,
    settings: &Settings,
    args: ImportArgs,
) -> CoinlogResult<()> {
    if is_json(&args.file) {
        return handle_json_restore(storage, &args);
    }
    if args.exchange.as_deref().map_or(true, |e| e.trim().is_empty()) {
        return Err(CoinlogError::Validation(
            "Please enter an exchange name (--exchange).".into(),
        ));
    }

    let (wizard, batch) = prepare_import(&args, settings)?;

    println!(
        "Import preview for '{}' ({})",
        wizard.exchange(),
        wizard.source_name().unwrap_or("file")
    );
    println!("{}", "=".repeat(40));
    println!("Header row {}: {}", wizard.header_row() + 1, wizard.headers().join(", "));
    println!();
    println!("Column mapping:");
    print!("{}", format_mapping(wizard.mapping(), wizard.headers()));
    println!();

    if let Some(report) = wizard.report() {
        print!("{}", format_import_report(report, 10));
    }

    let Some(batch) = batch else {
        return Err(CoinlogError::Import(
            "No transactions could be parsed from this file.".into(),
        ));
    };

    println!();
    println!("First transactions to import:");
    for txn in batch.transactions.iter().take(5) {
        println!("  {}", format_transaction_row(txn));
    }
    if batch.transactions.len() > 5 {
        println!("  ... and {} more", batch.transactions.len() - 5);
    }
    println!();

    if args.dry_run {
        println!("Dry run: nothing was saved.");
        return Ok(());
    }

    let service = TransactionService::new(storage);
    let mut ledger = service.load()?;
    let imported = service.import(&mut ledger, &batch)?;

    println!("Import Complete!");
    println!("  Imported: {}", imported);
    println!("  Skipped:  {}", batch.skipped.len());

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Append the transactions of a `coinlog export --format json` file
fn handle_json_restore(storage: &Storage, args: &ImportArgs) -> CoinlogResult<()> {
    let text = std::fs::read_to_string(&args.file).map_err(|e| {
        CoinlogError::Import(format!("Failed to read {}: {}", args.file.display(), e))
    })?;
    let export = import_from_json(&text)?;

    let service = TransactionService::new(storage);
    let mut ledger = service.load()?;

    let (fresh, duplicates): (Vec<_>, Vec<_>) = export
        .transactions
        .into_iter()
        .partition(|t| ledger.get(t.id).is_none());

    println!(
        "Restoring {} transactions from {} (schema {})",
        fresh.len(),
        args.file.display(),
        export.schema_version
    );
    if !duplicates.is_empty() {
        println!("  Already present, skipped: {}", duplicates.len());
    }
    if args.dry_run {
        println!("Dry run: nothing was saved.");
        return Ok(());
    }

    let batch = ImportBatch {
        exchange: "JSON restore".into(),
        source: args
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned()),
        transactions: fresh,
        skipped: Vec::new(),
    };
    let imported = service.import(&mut ledger, &batch)?;
    println!("Import Complete!");
    println!("  Imported: {}", imported);

    Ok(())
}
