//! CLI command handlers
//!
//! Bridges clap argument parsing with the ledger, import wizard and
//! service layer.

pub mod export;
pub mod history;
pub mod import;
pub mod transaction;

pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use history::handle_history_command;
pub use import::{handle_import_command, ImportArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use clap::Args;

use crate::config::Settings;
use crate::error::{CoinlogError, CoinlogResult};
use crate::import::convert::parse_time;
use crate::ledger::{month_from_name, LedgerFilter};
use crate::models::TransactionKind;

/// Filters shared by `list` and `export`
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this exchange (case-insensitive)
    #[arg(short, long)]
    pub exchange: Option<String>,

    /// Only this kind (buy, sell, deposit, withdraw)
    #[arg(short, long)]
    pub kind: Option<TransactionKind>,

    /// Only this calendar year
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Only this month (name like "Feb" or number 1-12)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Text to look for in exchange, currencies, tag and note
    #[arg(short, long)]
    pub search: Option<String>,
}

impl FilterArgs {
    /// Build a ledger filter on top of the saved default year
    pub fn to_filter(&self, settings: &Settings) -> CoinlogResult<LedgerFilter> {
        let mut filter = settings.base_filter();

        if let Some(exchange) = &self.exchange {
            filter = filter.exchange(exchange.as_str());
        }
        if let Some(kind) = self.kind {
            filter = filter.kind(kind);
        }
        if let Some(year) = self.year {
            filter = filter.year(year);
        }
        if let Some(month) = &self.month {
            let month0 = month_from_name(month).ok_or_else(|| {
                CoinlogError::Validation(format!(
                    "Invalid month: '{}'. Use a name like 'Feb' or a number 1-12",
                    month
                ))
            })?;
            filter = filter.month(month0);
        }
        if let Some(search) = &self.search {
            filter = filter.search(search.as_str());
        }

        Ok(filter)
    }
}

/// Parse `YYYY-MM-DD` plus an optional `HH:MM[:SS]`
pub fn parse_date_time(date: &str, time: Option<&str>) -> CoinlogResult<NaiveDateTime> {
    let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        CoinlogError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", date))
    })?;

    let time = match time {
        Some(t) => parse_time(t).ok_or_else(|| {
            CoinlogError::Validation(format!("Invalid time format: '{}'. Use HH:MM", t))
        })?,
        None => NaiveTime::MIN,
    };

    Ok(day.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_args_month_names() {
        let args = FilterArgs {
            year: Some(2025),
            month: Some("feb".into()),
            ..Default::default()
        };
        let filter = args.to_filter(&Settings::default()).unwrap();
        assert_eq!(filter.year, Some(2025));
        assert_eq!(filter.month, Some(1));

        let bad = FilterArgs {
            month: Some("Smarch".into()),
            ..Default::default()
        };
        assert!(bad.to_filter(&Settings::default()).unwrap_err().is_validation());
    }

    #[test]
    fn test_filter_args_use_default_year() {
        let settings = Settings {
            default_year: Some(2024),
            ..Settings::default()
        };
        assert_eq!(FilterArgs::default().to_filter(&settings).unwrap().year, Some(2024));

        let explicit = FilterArgs {
            year: Some(2025),
            ..Default::default()
        };
        assert_eq!(explicit.to_filter(&settings).unwrap().year, Some(2025));
    }

    #[test]
    fn test_parse_date_time() {
        let dt = parse_date_time("2025-01-15", Some("09:30")).unwrap();
        assert_eq!(dt.to_string(), "2025-01-15 09:30:00");
        assert_eq!(
            parse_date_time("2025-01-15", None).unwrap().to_string(),
            "2025-01-15 00:00:00"
        );
        assert!(parse_date_time("15/01/2025", None).is_err());
        assert!(parse_date_time("2025-01-15", Some("noon")).is_err());
    }
}
