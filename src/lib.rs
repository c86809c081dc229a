//! coinlog - crypto transaction ledger with a CSV import wizard
//!
//! This library keeps a ledger of buys, sells, deposits and withdrawals
//! across exchanges, and imports arbitrary exchange CSV exports through a
//! four-step wizard: upload, header-row preview, column mapping, review.
//!
//! # Architecture
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Quantities, transaction kinds and transactions
//! - `import`: CSV tokenizer, column mapping, row conversion and the wizard
//! - `ledger`: In-memory ledger, filters and the dashboard/import session
//! - `storage`: JSON file storage layer
//! - `services`: Validated, persisted and audited ledger operations
//! - `audit`: Append-only audit log
//! - `export`: CSV and JSON export
//! - `cli` / `display`: Command handlers and their text output
//! - `tui`: Interactive dashboard and import wizard
//!
//! # Example
//!
//! ```rust,ignore
//! use coinlog::import::ImportWizard;
//!
//! let mut wizard = ImportWizard::new();
//! wizard.set_exchange("Kraken");
//! wizard.load_text(Some("kraken.csv"), "Date,Type,Amount,Asset\n2025-01-05,Deposit,100,USD\n")?;
//! wizard.next()?; // preview
//! wizard.next()?; // mapping (auto-detected)
//! wizard.next()?; // review
//! let batch = wizard.commit()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{CoinlogError, CoinlogResult};
