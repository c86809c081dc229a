//! Import wizard state machine
//!
//! Upload → Preview → Mapping → Review, strictly linear. A failed
//! validation leaves the wizard on its current step and stores a
//! user-facing message. Dropping the wizard cancels the import.

use std::fmt;
use std::path::Path;

use super::convert::{convert_rows, ConversionReport, ImportContext, SkippedRow};
use super::mapping::ColumnMapping;
use super::tokenizer::{parse_csv, Grid};
use crate::error::{CoinlogError, CoinlogResult};
use crate::models::Transaction;

/// Steps of the import wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Upload,
    Preview,
    Mapping,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Upload,
        WizardStep::Preview,
        WizardStep::Mapping,
        WizardStep::Review,
    ];

    /// Zero-based position, for step indicators
    pub fn index(&self) -> usize {
        match self {
            Self::Upload => 0,
            Self::Preview => 1,
            Self::Mapping => 2,
            Self::Review => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Upload => "Upload",
            Self::Preview => "Preview",
            Self::Mapping => "Map Columns",
            Self::Review => "Review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Transactions accepted by a finished wizard
#[derive(Debug, Clone)]
pub struct ImportBatch {
    pub exchange: String,
    /// File name the rows came from, when known
    pub source: Option<String>,
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

/// The CSV import wizard
#[derive(Debug, Clone)]
pub struct ImportWizard {
    step: WizardStep,
    exchange: String,
    tag: String,
    grid: Grid,
    source: Option<String>,
    header_row: usize,
    mapping: ColumnMapping,
    mapping_touched: bool,
    date_format: Option<String>,
    report: Option<ConversionReport>,
    message: Option<String>,
}

impl Default for ImportWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Upload,
            exchange: String::new(),
            tag: String::new(),
            grid: Grid::new(),
            source: None,
            header_row: 0,
            mapping: ColumnMapping::new(),
            mapping_touched: false,
            date_format: None,
            report: None,
            message: None,
        }
    }

    /// Date format tried first during conversion
    pub fn with_date_format(mut self, format: Option<String>) -> Self {
        self.date_format = format;
        self
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Current user-facing message, if the last action failed
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn set_exchange(&mut self, exchange: &str) {
        self.exchange = exchange.to_string();
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: &str) {
        self.tag = tag.to_string();
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn has_file(&self) -> bool {
        !self.grid.is_empty()
    }

    pub fn header_row(&self) -> usize {
        self.header_row
    }

    pub fn headers(&self) -> &[String] {
        self.grid
            .get(self.header_row)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every row except the header row
    pub fn data_row_count(&self) -> usize {
        self.grid.len().saturating_sub(1)
    }

    /// Widest row in the grid
    pub fn column_count(&self) -> usize {
        self.grid.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Conversion result, available on the Review step
    pub fn report(&self) -> Option<&ConversionReport> {
        self.report.as_ref()
    }

    /// Tokenize uploaded text and replace the current grid
    ///
    /// Returns the number of rows read. Files with fewer than two rows are
    /// rejected and the previous grid is kept.
    pub fn load_text(&mut self, source: Option<&str>, text: &str) -> CoinlogResult<usize> {
        if self.step != WizardStep::Upload {
            return self.fail("Files can only be loaded in the upload step.");
        }

        let grid = match parse_csv(text) {
            Ok(grid) => grid,
            Err(e) => return self.fail(&format!("Could not read CSV: {}", e)),
        };
        if grid.len() < 2 {
            return self.fail("File must contain at least 2 rows (header + data).");
        }

        let rows = grid.len();
        self.grid = grid;
        self.source = source.map(str::to_string);
        self.header_row = 0;
        self.mapping = ColumnMapping::new();
        self.mapping_touched = false;
        self.report = None;
        self.message = None;
        Ok(rows)
    }

    /// Read a file from disk and load it
    pub fn load_file(&mut self, path: &Path) -> CoinlogResult<usize> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                return self.fail(&format!("Failed to read {}: {}", path.display(), e));
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.load_text(Some(&name), &text)
    }

    /// Choose which row holds the column labels
    pub fn select_header_row(&mut self, row: usize) -> CoinlogResult<()> {
        if self.step != WizardStep::Preview {
            return self.fail("The header row is chosen in the preview step.");
        }
        if row >= self.grid.len() {
            return self.fail(&format!(
                "Row {} does not exist (file has {} rows).",
                row + 1,
                self.grid.len()
            ));
        }
        self.header_row = row;
        self.message = None;
        Ok(())
    }

    /// Replace the column mapping
    pub fn set_mapping(&mut self, mapping: ColumnMapping) -> CoinlogResult<()> {
        if self.step != WizardStep::Mapping {
            return self.fail("Columns are mapped in the mapping step.");
        }
        self.mapping = mapping;
        self.mapping_touched = true;
        self.message = None;
        Ok(())
    }

    /// Edit the mapping in place; only meaningful in the mapping step
    pub fn mapping_mut(&mut self) -> &mut ColumnMapping {
        self.mapping_touched = true;
        &mut self.mapping
    }

    /// Advance one step
    pub fn next(&mut self) -> CoinlogResult<WizardStep> {
        match self.step {
            WizardStep::Upload => {
                if self.exchange.trim().is_empty() {
                    return self.fail("Please enter an exchange name.");
                }
                if self.grid.is_empty() {
                    return self.fail("Please upload a CSV file first.");
                }
                self.step = WizardStep::Preview;
            }
            WizardStep::Preview => {
                if !self.mapping_touched {
                    self.mapping = ColumnMapping::detect_from_headers(self.headers());
                }
                self.step = WizardStep::Mapping;
            }
            WizardStep::Mapping => {
                if !self.mapping.is_date_mapped() {
                    return self.fail("Please map at least the Date column.");
                }
                let ctx = ImportContext::new(self.exchange.trim())
                    .with_tag(Some(self.tag.clone()))
                    .with_date_format(self.date_format.clone());
                let report = convert_rows(&self.grid, self.header_row, &self.mapping, &ctx)?;
                self.report = Some(report);
                self.step = WizardStep::Review;
            }
            WizardStep::Review => {}
        }
        self.message = None;
        Ok(self.step)
    }

    /// Go back one step; a no-op on the first step
    pub fn back(&mut self) -> WizardStep {
        self.step = match self.step {
            WizardStep::Upload | WizardStep::Preview => WizardStep::Upload,
            WizardStep::Mapping => WizardStep::Preview,
            WizardStep::Review => {
                self.report = None;
                WizardStep::Mapping
            }
        };
        self.message = None;
        self.step
    }

    pub fn can_commit(&self) -> bool {
        self.ready_to_commit().is_ok()
    }

    /// Why [`ImportWizard::commit`] would fail, if it would
    pub fn ready_to_commit(&self) -> CoinlogResult<()> {
        if self.step != WizardStep::Review {
            return Err(CoinlogError::Validation(
                "Finish mapping the columns before importing.".into(),
            ));
        }
        if self.report.as_ref().map_or(true, ConversionReport::is_empty) {
            return Err(CoinlogError::Validation(
                "No transactions could be parsed from this file.".into(),
            ));
        }
        Ok(())
    }

    /// Finish the wizard and hand over the parsed transactions
    pub fn commit(self) -> CoinlogResult<ImportBatch> {
        self.ready_to_commit()?;
        let report = self.report.unwrap_or_default();
        Ok(ImportBatch {
            exchange: self.exchange.trim().to_string(),
            source: self.source,
            transactions: report.transactions,
            skipped: report.skipped,
        })
    }

    fn fail<T>(&mut self, message: &str) -> CoinlogResult<T> {
        self.message = Some(message.to_string());
        Err(CoinlogError::Validation(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use tempfile::TempDir;

    const SAMPLE: &str = "Date,Type,Amount,Currency,Total,Quote\n\
                          2025-01-15,Buy,0.5,BTC,21500,USD\n\
                          2025-02-10,Sell,0.25,BTC,11200,USD\n\
                          garbage,Buy,1,ETH,3200,USD\n";

    fn loaded() -> ImportWizard {
        let mut wizard = ImportWizard::new();
        wizard.set_exchange("Coinbase");
        wizard.load_text(Some("coinbase.csv"), SAMPLE).unwrap();
        wizard
    }

    #[test]
    fn test_upload_requires_exchange() {
        let mut wizard = ImportWizard::new();
        wizard.load_text(None, SAMPLE).unwrap();

        let err = wizard.next().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert_eq!(wizard.message(), Some("Please enter an exchange name."));

        wizard.set_exchange("   ");
        assert!(wizard.next().is_err());
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn test_upload_requires_file() {
        let mut wizard = ImportWizard::new();
        wizard.set_exchange("Kraken");
        assert!(wizard.next().is_err());
        assert_eq!(wizard.message(), Some("Please upload a CSV file first."));
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn test_short_file_keeps_previous_grid() {
        let mut wizard = loaded();
        let err = wizard.load_text(Some("empty.csv"), "Date,Amount\n").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            wizard.message(),
            Some("File must contain at least 2 rows (header + data).")
        );
        assert_eq!(wizard.grid().len(), 4);
        assert_eq!(wizard.source_name(), Some("coinbase.csv"));
    }

    #[test]
    fn test_last_upload_wins() {
        let mut wizard = loaded();
        wizard
            .load_text(Some("second.csv"), "Date\n2025-01-01\n")
            .unwrap();
        assert_eq!(wizard.grid().len(), 2);
        assert_eq!(wizard.source_name(), Some("second.csv"));
    }

    #[test]
    fn test_mapping_requires_date() {
        let mut wizard = loaded();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.step(), WizardStep::Mapping);

        wizard.set_mapping(ColumnMapping::new()).unwrap();
        let err = wizard.next().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(wizard.step(), WizardStep::Mapping);
        assert_eq!(wizard.message(), Some("Please map at least the Date column."));
    }

    #[test]
    fn test_full_flow_with_detected_mapping() {
        let mut wizard = loaded();
        wizard.set_tag("Imported");
        assert_eq!(wizard.next().unwrap(), WizardStep::Preview);
        assert_eq!(wizard.next().unwrap(), WizardStep::Mapping);
        assert!(wizard.mapping().is_date_mapped());
        assert_eq!(wizard.next().unwrap(), WizardStep::Review);

        let report = wizard.report().unwrap();
        assert_eq!(report.imported(), 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row_number, 4);
        assert!(wizard.can_commit());

        let batch = wizard.commit().unwrap();
        assert_eq!(batch.exchange, "Coinbase");
        assert_eq!(batch.source.as_deref(), Some("coinbase.csv"));
        assert_eq!(batch.transactions[0].kind(), TransactionKind::Buy);
        assert_eq!(batch.transactions[1].kind(), TransactionKind::Sell);
        assert!(batch
            .transactions
            .iter()
            .all(|t| t.tag.as_deref() == Some("Imported")));
    }

    #[test]
    fn test_back_is_linear() {
        let mut wizard = loaded();
        assert_eq!(wizard.back(), WizardStep::Upload);
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.back(), WizardStep::Mapping);
        assert!(wizard.report().is_none());
        assert_eq!(wizard.back(), WizardStep::Preview);
        assert_eq!(wizard.back(), WizardStep::Upload);
    }

    #[test]
    fn test_user_mapping_survives_back_and_forth() {
        let mut wizard = loaded();
        wizard.next().unwrap();
        wizard.next().unwrap();
        let custom = ColumnMapping::new()
            .with_date(0)
            .with_fixed_kind(TransactionKind::Deposit)
            .with_primary(Some(2), Some(3));
        wizard.set_mapping(custom.clone()).unwrap();
        wizard.back();
        wizard.next().unwrap();
        assert_eq!(wizard.mapping(), &custom);
    }

    #[test]
    fn test_header_row_selection() {
        let mut wizard = ImportWizard::new();
        wizard.set_exchange("Kraken");
        wizard
            .load_text(None, "Kraken ledger export\nDate,Amount,Asset\n2025-01-05,10000,USD\n")
            .unwrap();
        assert!(wizard.select_header_row(1).is_err());

        wizard.next().unwrap();
        assert!(wizard.select_header_row(7).is_err());
        wizard.select_header_row(1).unwrap();
        assert_eq!(wizard.headers()[0], "Date");
        wizard.next().unwrap();
        assert_eq!(wizard.mapping().date, Some(0));

        wizard.next().unwrap();
        let report = wizard.report().unwrap();
        assert_eq!(report.imported(), 1);
        assert_eq!(report.skipped[0].row_number, 1);
    }

    #[test]
    fn test_commit_requires_review_and_rows() {
        let wizard = loaded();
        assert!(wizard.commit().is_err());

        let mut wizard = ImportWizard::new();
        wizard.set_exchange("Gemini");
        wizard.load_text(None, "Date\nnope\n").unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert!(!wizard.can_commit());
        assert!(wizard.commit().is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binance.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let mut wizard = ImportWizard::new();
        assert_eq!(wizard.load_file(&path).unwrap(), 4);
        assert_eq!(wizard.source_name(), Some("binance.csv"));

        assert!(wizard.load_file(&dir.path().join("missing.csv")).is_err());
        assert_eq!(wizard.grid().len(), 4);
    }
}
