//! Custom error types for coinlog
//!
//! One enum covers the library; the binary and the TUI wrap it in
//! `anyhow` at the top level.

use thiserror::Error;

/// The main error type for coinlog operations
#[derive(Error, Debug)]
pub enum CoinlogError {
    /// Unresolvable data directory or unreadable settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Ledger, settings or export JSON that fails to (de)serialize
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and wizard steps
    #[error("Validation error: {0}")]
    Validation(String),

    /// No transaction matches the given reference
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Unreadable or untokenizable import file
    #[error("Import error: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoinlogError {
    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for CoinlogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CoinlogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for CoinlogError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for coinlog operations
pub type CoinlogResult<T> = Result<T, CoinlogError>;
