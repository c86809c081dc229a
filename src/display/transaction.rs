//! Transaction display formatting
//!
//! Renders the filtered ledger as a table and single transactions as a
//! detail block.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::ledger::LedgerFilter;
use crate::models::{Leg, Transaction};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Exchange")]
    exchange: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "For")]
    counter: String,
    #[tabled(rename = "Tag")]
    tag: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(txn: &Transaction) -> Self {
        Self {
            id: txn.id.short(),
            date: txn.date.format("%Y-%m-%d %H:%M").to_string(),
            exchange: truncate(&txn.exchange, 16),
            kind: txn.kind().to_string(),
            amount: leg_or_dash(txn.movement.primary()),
            counter: leg_or_dash(txn.movement.secondary()),
            tag: txn.tag.clone().unwrap_or_default(),
        }
    }
}

/// Format one transaction as a compact line
pub fn format_transaction_row(txn: &Transaction) -> String {
    let counter = match txn.movement.secondary() {
        Some(leg) => format!(" for {}", leg.display()),
        None => String::new(),
    };
    format!(
        "{} {} {:16} {:8} {}{}",
        txn.id.short(),
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.exchange, 16),
        txn.kind().to_string(),
        leg_or_dash(txn.movement.primary()),
        counter
    )
}

/// Format a list of transactions as a table
pub fn format_transaction_table(transactions: &[&Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions.iter().map(|t| TransactionRow::from(*t)).collect();
    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(4..6)).with(Alignment::right()));

    format!("{}\n", table)
}

/// `Showing 10 of 18 transactions (Binance · 2025)`
pub fn format_list_summary(shown: usize, matched: usize, filter: &LedgerFilter) -> String {
    let noun = if matched == 1 { "transaction" } else { "transactions" };
    if shown < matched {
        format!("Showing {} of {} {} ({})", shown, matched, noun, filter.describe())
    } else {
        format!("{} {} ({})", matched, noun, filter.describe())
    }
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d %H:%M")));
    output.push_str(&format!("Exchange:    {}\n", txn.exchange));
    output.push_str(&format!("Type:        {}\n", txn.kind()));

    for (label, leg) in leg_labels(txn) {
        if let Some(leg) = leg {
            output.push_str(&format!("{:<12} {}\n", label, leg.display()));
        }
    }

    if let Some(tag) = &txn.tag {
        output.push_str(&format!("Tag:         {}\n", tag));
    }

    if let Some(note) = &txn.note {
        output.push_str(&format!("Note:        {}\n", note));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            txn.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}

/// Labelled legs in kind order
fn leg_labels(txn: &Transaction) -> Vec<(&'static str, Option<&Leg>)> {
    use crate::models::Movement;

    match &txn.movement {
        Movement::Buy { bought, paid } => vec![("Bought:", bought.as_ref()), ("Paid:", paid.as_ref())],
        Movement::Sell { sold, received } => {
            vec![("Sold:", sold.as_ref()), ("Received:", received.as_ref())]
        }
        Movement::Deposit { deposited } => vec![("Deposited:", deposited.as_ref())],
        Movement::Withdraw { withdrawn } => vec![("Withdrawn:", withdrawn.as_ref())],
    }
}

fn leg_or_dash(leg: Option<&Leg>) -> String {
    leg.map(Leg::display).unwrap_or_else(|| "-".to_string())
}

/// Truncate a string to a maximum display width
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
