//! Transaction CLI commands
//!
//! Implements CLI commands for listing and editing ledger entries.

use clap::Subcommand;

use super::{parse_date_time, FilterArgs};
use crate::config::Settings;
use crate::display::{
    format_list_summary, format_transaction_details, format_transaction_row,
    format_transaction_table,
};
use crate::error::{CoinlogError, CoinlogResult};
use crate::ledger::{parse_leg, NewTransaction, TransactionEdit};
use crate::models::{Leg, TransactionKind};
use crate::services::TransactionService;
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a transaction by hand
    Add {
        /// Exchange the transaction happened on
        #[arg(short, long)]
        exchange: String,
        /// buy, sell, deposit or withdraw
        #[arg(short, long)]
        kind: TransactionKind,
        /// Amount bought, sold, deposited or withdrawn
        #[arg(short, long)]
        amount: String,
        /// Currency of --amount (e.g. BTC)
        #[arg(short, long)]
        currency: String,
        /// Amount paid (buy) or received (sell)
        #[arg(long, requires = "counter_currency")]
        counter_amount: Option<String>,
        /// Currency of --counter-amount
        #[arg(long, requires = "counter_amount")]
        counter_currency: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Time of day (HH:MM)
        #[arg(short, long)]
        time: Option<String>,
        #[arg(long)]
        tag: Option<String>,
        #[arg(short, long)]
        note: Option<String>,
    },
    /// List transactions, newest first
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID (full or short prefix)
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID (full or short prefix)
        id: String,
        #[arg(short, long)]
        exchange: Option<String>,
        #[arg(short, long)]
        kind: Option<TransactionKind>,
        /// New primary amount (needs --currency unless the currency stays)
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        currency: Option<String>,
        #[arg(long)]
        counter_amount: Option<String>,
        #[arg(long)]
        counter_currency: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New time of day (HH:MM), keeps the date unless --date is given
        #[arg(short, long)]
        time: Option<String>,
        /// New tag ("" clears it)
        #[arg(long)]
        tag: Option<String>,
        /// New note ("" clears it)
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Delete a transaction
    #[command(alias = "rm")]
    Delete {
        /// Transaction ID (full or short prefix)
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// List the exchanges that appear in the ledger
    Exchanges,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> CoinlogResult<()> {
    let service = TransactionService::new(storage);
    let mut ledger = service.load()?;

    match cmd {
        TransactionCommands::Add {
            exchange,
            kind,
            amount,
            currency,
            counter_amount,
            counter_currency,
            date,
            time,
            tag,
            note,
        } => {
            let date = match date {
                Some(d) => parse_date_time(&d, time.as_deref())?,
                None => {
                    let today = chrono::Local::now().date_naive().to_string();
                    parse_date_time(&today, time.as_deref())?
                }
            };

            let secondary = match (counter_amount, counter_currency) {
                (Some(a), Some(c)) => Some(parse_leg(&a, &c)?),
                _ => None,
            };
            if secondary.is_some() && !kind.is_trade() {
                println!("Note: {} transactions have no counter amount; ignoring it", kind);
            }

            let input = NewTransaction {
                exchange,
                date,
                kind,
                primary: Some(parse_leg(&amount, &currency)?),
                secondary,
                tag,
                note,
            };

            let txn = service.create(&mut ledger, input)?;
            println!("Created transaction:");
            print!("{}", format_transaction_details(&txn));
        }

        TransactionCommands::List { filter, limit } => {
            let filter = filter.to_filter(settings)?;
            let limit = limit.unwrap_or(settings.list_limit);

            let matched = ledger.filter(&filter);
            let shown: Vec<_> = matched.iter().copied().take(limit).collect();

            print!("{}", format_transaction_table(&shown));
            println!();
            println!("{}", format_list_summary(shown.len(), matched.len(), &filter));
        }

        TransactionCommands::Show { id } => {
            let txn = ledger.find(&id)?;
            print!("{}", format_transaction_details(txn));
        }

        TransactionCommands::Edit {
            id,
            exchange,
            kind,
            amount,
            currency,
            counter_amount,
            counter_currency,
            date,
            time,
            tag,
            note,
        } => {
            let current = ledger.find(&id)?;

            let date = match (date, time) {
                (Some(d), t) => Some(parse_date_time(&d, t.as_deref())?),
                (None, Some(t)) => Some(parse_date_time(&current.day().to_string(), Some(&t))?),
                (None, None) => None,
            };
            let primary = edited_leg(amount, currency, current.movement.primary(), "--amount")?;
            let secondary = edited_leg(
                counter_amount,
                counter_currency,
                current.movement.secondary(),
                "--counter-amount",
            )?;

            let edit = TransactionEdit {
                exchange,
                date,
                kind,
                primary,
                secondary,
                tag,
                note,
            };

            let reference = current.id.to_string();
            let updated = service.update(&mut ledger, &reference, edit)?;
            println!("Updated transaction:");
            print!("{}", format_transaction_details(&updated));
        }

        TransactionCommands::Delete { id, force } => {
            let txn = ledger.find(&id)?;

            if !force {
                println!("About to delete transaction:");
                println!("  {}", format_transaction_row(txn));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let reference = txn.id.to_string();
            let deleted = service.delete(&mut ledger, &reference)?;
            println!("Deleted transaction: {}", format_transaction_row(&deleted));
        }

        TransactionCommands::Exchanges => {
            let exchanges = ledger.exchanges();
            if exchanges.is_empty() {
                println!("No exchanges yet. Add or import some transactions first.");
            }
            for exchange in exchanges {
                let count = ledger.all().iter().filter(|t| t.exchange == exchange).count();
                println!("{:<20} {:>5}", exchange, count);
            }
        }
    }

    Ok(())
}

/// Combine edited amount/currency flags with the leg they replace
fn edited_leg(
    amount: Option<String>,
    currency: Option<String>,
    current: Option<&Leg>,
    flag: &str,
) -> CoinlogResult<Option<Leg>> {
    match (amount, currency) {
        (None, None) => Ok(None),
        (Some(a), Some(c)) => parse_leg(&a, &c).map(Some),
        (Some(a), None) => match current {
            Some(leg) => parse_leg(&a, &leg.currency).map(Some),
            None => Err(CoinlogError::Validation(format!(
                "{} needs a currency because the transaction has none",
                flag
            ))),
        },
        (None, Some(c)) => match current {
            Some(leg) => parse_leg(&leg.amount.to_string(), &c).map(Some),
            None => Err(CoinlogError::Validation(format!(
                "A currency needs {} because the transaction has no amount",
                flag
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quantity;

    #[test]
    fn test_edited_leg_keeps_missing_half() {
        let current = Leg::new(Quantity::parse("0.5").unwrap(), "BTC");

        let leg = edited_leg(Some("0.75".into()), None, Some(&current), "--amount")
            .unwrap()
            .unwrap();
        assert_eq!(leg.amount, Quantity::parse("0.75").unwrap());
        assert_eq!(leg.currency, "BTC");

        let leg = edited_leg(None, Some("eth".into()), Some(&current), "--amount")
            .unwrap()
            .unwrap();
        assert_eq!(leg.amount, Quantity::parse("0.5").unwrap());
        assert_eq!(leg.currency, "ETH");

        assert!(edited_leg(None, None, Some(&current), "--amount").unwrap().is_none());
        assert!(edited_leg(Some("1".into()), None, None, "--amount").is_err());
    }
}
