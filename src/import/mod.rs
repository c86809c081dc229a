//! CSV import
//!
//! Tokenizing, column mapping, row conversion, and the step-by-step
//! [`ImportWizard`] that ties them together.

pub mod convert;
pub mod mapping;
pub mod tokenizer;
pub mod wizard;

pub use convert::{convert_rows, ConversionReport, ImportContext, SkippedRow};
pub use mapping::{AmountColumns, ColumnMapping, ColumnPair, KindSource};
pub use tokenizer::{parse_csv, Grid};
pub use wizard::{ImportBatch, ImportWizard, WizardStep};
