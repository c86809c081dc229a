//! CSV export in the fixed 14-column ledger layout

use std::io::Write;

use chrono::NaiveDate;

use crate::error::{CoinlogError, CoinlogResult};
use crate::models::{Leg, Transaction};

/// Column labels of the export layout, in order
pub const EXPORT_COLUMNS: [&str; 14] = [
    "Date",
    "Time",
    "Exchange",
    "Type",
    "Buy Amount",
    "Buy Currency",
    "Sell Amount",
    "Sell Currency",
    "Deposit Amount",
    "Deposit Currency",
    "Withdraw Amount",
    "Withdraw Currency",
    "Tag",
    "Note",
];

pub const EXPORT_HEADER: &str = "Date,Time,Exchange,Type,Buy Amount,Buy Currency,Sell Amount,Sell Currency,Deposit Amount,Deposit Currency,Withdraw Amount,Withdraw Currency,Tag,Note";

/// `crypto_transactions_2025-03-20.csv`
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("crypto_transactions_{}.csv", date.format("%Y-%m-%d"))
}

/// One data line (without newline)
///
/// Buy writes bought to the Buy pair and paid to the Sell pair; Sell writes
/// sold to the Sell pair and received to the Buy pair. A note is quoted
/// whenever present. Line breaks inside cells are written as spaces so each
/// transaction stays on one line.
pub fn transaction_to_csv_row(txn: &Transaction) -> String {
    let movement = &txn.movement;
    let mut fields = vec![
        txn.date.format("%m/%d/%Y").to_string(),
        txn.date.format("%H:%M").to_string(),
        escape_csv(&txn.exchange),
        txn.kind().to_string(),
    ];
    for leg in [
        movement.buy_leg(),
        movement.sell_leg(),
        movement.deposit_leg(),
        movement.withdraw_leg(),
    ] {
        let (amount, currency) = leg_fields(leg);
        fields.push(amount);
        fields.push(currency);
    }
    fields.push(escape_csv(txn.tag.as_deref().unwrap_or("")));
    fields.push(match txn.note.as_deref() {
        Some(note) => format!("\"{}\"", single_line(note).replace('"', "\"\"")),
        None => String::new(),
    });
    fields.join(",")
}

fn leg_fields(leg: Option<&Leg>) -> (String, String) {
    match leg {
        Some(leg) => (leg.amount.to_string(), escape_csv(&leg.currency)),
        None => (String::new(), String::new()),
    }
}

/// Write the header and one line per transaction, in the order given
pub fn export_transactions_csv<'a, W, I>(transactions: I, writer: &mut W) -> CoinlogResult<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Transaction>,
{
    writeln!(writer, "{}", EXPORT_HEADER).map_err(|e| CoinlogError::Export(e.to_string()))?;

    let mut count = 0;
    for txn in transactions {
        writeln!(writer, "{}", transaction_to_csv_row(txn))
            .map_err(|e| CoinlogError::Export(e.to_string()))?;
        count += 1;
    }

    Ok(count)
}

fn single_line(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

fn escape_csv(s: &str) -> String {
    let s = single_line(s);
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{ColumnMapping, ImportWizard, WizardStep};
    use crate::ledger::{sample_transactions, Ledger, LedgerFilter};
    use crate::models::{Movement, Quantity, TransactionKind};
    use chrono::NaiveDateTime;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn leg(amount: &str, currency: &str) -> Leg {
        Leg::new(Quantity::parse(amount).unwrap(), currency)
    }

    #[test]
    fn test_header_matches_columns() {
        assert_eq!(EXPORT_HEADER, EXPORT_COLUMNS.join(","));
    }

    #[test]
    fn test_default_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        assert_eq!(default_export_filename(date), "crypto_transactions_2025-03-20.csv");
    }

    #[test]
    fn test_buy_row() {
        let txn = Transaction::new(
            "Coinbase",
            at("2025-01-15 09:30"),
            Movement::from_legs(
                TransactionKind::Buy,
                Some(leg("0.5", "BTC")),
                Some(leg("21500", "USD")),
            ),
        )
        .with_tag(Some("DCA"))
        .with_note(Some("Weekly \"stack\", sats"));

        assert_eq!(
            transaction_to_csv_row(&txn),
            "01/15/2025,09:30,Coinbase,Buy,0.5,BTC,21500,USD,,,,,DCA,\"Weekly \"\"stack\"\", sats\""
        );
    }

    #[test]
    fn test_sell_row_swaps_pairs() {
        let txn = Transaction::new(
            "Binance",
            at("2025-03-12 00:00"),
            Movement::from_legs(
                TransactionKind::Sell,
                Some(leg("5", "SOL")),
                Some(leg("1100", "USDT")),
            ),
        );
        assert_eq!(
            transaction_to_csv_row(&txn),
            "03/12/2025,00:00,Binance,Sell,1100,USDT,5,SOL,,,,,,"
        );
    }

    #[test]
    fn test_multiline_note_stays_on_one_line() {
        let txn = Transaction::new(
            "Kraken",
            at("2025-02-06 00:00"),
            Movement::from_legs(TransactionKind::Deposit, Some(leg("1", "ETH")), None),
        )
        .with_note(Some("cold\r\nwallet\nmove"));

        let row = transaction_to_csv_row(&txn);
        assert!(!row.contains('\n') && !row.contains('\r'));
        assert!(row.ends_with(",\"cold wallet move\""));
    }

    #[test]
    fn test_transfer_rows() {
        let withdraw = Transaction::new(
            "Kraken",
            at("2025-02-06 00:00"),
            Movement::from_legs(TransactionKind::Withdraw, Some(leg("1.5", "ETH")), None),
        );
        assert_eq!(
            transaction_to_csv_row(&withdraw),
            "02/06/2025,00:00,Kraken,Withdraw,,,,,,,1.5,ETH,,"
        );
    }

    #[test]
    fn test_export_then_import_round_trip() {
        let ledger = Ledger::from_transactions(sample_transactions());
        let rows = ledger.filter(&LedgerFilter::new());

        let mut out = Vec::new();
        let written = export_transactions_csv(rows.iter().copied(), &mut out).unwrap();
        assert_eq!(written, 18);
        let text = String::from_utf8(out).unwrap();

        let mut wizard = ImportWizard::new();
        wizard.set_exchange("ignored");
        wizard.load_text(Some("export.csv"), &text).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert_eq!(wizard.mapping(), &ColumnMapping::ledger_layout());
        assert_eq!(wizard.next().unwrap(), WizardStep::Review);
        let batch = wizard.commit().unwrap();

        assert_eq!(batch.transactions.len(), rows.len());
        assert!(batch.skipped.is_empty());
        for (original, imported) in rows.iter().zip(&batch.transactions) {
            assert_eq!(original.exchange, imported.exchange);
            assert_eq!(original.date, imported.date);
            assert_eq!(original.movement, imported.movement);
            assert_eq!(original.tag, imported.tag);
            assert_eq!(original.note, imported.note);
        }
    }
}
