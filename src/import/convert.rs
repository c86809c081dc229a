//! Row-to-transaction conversion
//!
//! Applies a [`ColumnMapping`] to the data rows of a grid. Rows whose date
//! cannot be parsed are skipped and reported; everything else is converted
//! permissively (unparseable amounts simply leave the leg unset).

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::mapping::{AmountColumns, ColumnMapping, ColumnPair, KindSource};
use super::tokenizer::cell;
use crate::error::{CoinlogError, CoinlogResult};
use crate::models::{Leg, Movement, Quantity, Transaction, TransactionKind};

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y", "%d-%m-%Y",
    "%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y",
];

const TIME_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M %p", "%I:%M:%S %p"];

/// Values entered in the upload step, applied to every row
#[derive(Debug, Clone, Default)]
pub struct ImportContext {
    pub exchange: String,
    pub tag: Option<String>,
    /// Preferred date format, tried before the built-in list
    pub date_format: Option<String>,
}

impl ImportContext {
    pub fn new(exchange: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_date_format(mut self, format: Option<String>) -> Self {
        self.date_format = format;
        self
    }
}

/// A data row that was left out of the import
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based position of the row in the uploaded file
    pub row_number: usize,
    pub reason: String,
}

/// Outcome of converting every data row
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

impl ConversionReport {
    pub fn imported(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Convert every row except `header_row`
pub fn convert_rows(
    rows: &[Vec<String>],
    header_row: usize,
    mapping: &ColumnMapping,
    ctx: &ImportContext,
) -> CoinlogResult<ConversionReport> {
    if !mapping.is_date_mapped() {
        return Err(CoinlogError::Validation(
            "Please map at least the Date column.".into(),
        ));
    }

    let mut report = ConversionReport::default();
    for (idx, row) in rows.iter().enumerate() {
        if idx == header_row {
            continue;
        }
        match convert_row(row, mapping, ctx) {
            Ok(txn) => report.transactions.push(txn),
            Err(reason) => report.skipped.push(SkippedRow {
                row_number: idx + 1,
                reason,
            }),
        }
    }
    Ok(report)
}

/// Convert one row; the error is the human-readable skip reason
pub fn convert_row(
    row: &[String],
    mapping: &ColumnMapping,
    ctx: &ImportContext,
) -> Result<Transaction, String> {
    let date_col = mapping
        .date
        .ok_or_else(|| "Date column is not mapped".to_string())?;
    let date_cell = cell(row, date_col);
    if date_cell.is_empty() {
        return Err("Missing date".to_string());
    }
    let mut date = parse_date(date_cell, ctx.date_format.as_deref())
        .ok_or_else(|| format!("Could not parse date: '{}'", date_cell))?;

    if let Some(time) = mapping
        .time
        .map(|col| cell(row, col))
        .and_then(parse_time)
    {
        date = date.date().and_time(time);
    }

    let kind = match mapping.kind {
        KindSource::Column(col) => TransactionKind::classify(cell(row, col)),
        KindSource::Fixed(kind) => kind,
    };

    let movement = match mapping.amounts {
        AmountColumns::Roles { primary, secondary } => {
            Movement::from_legs(kind, read_leg(row, primary), read_leg(row, secondary))
        }
        AmountColumns::Ledger {
            buy,
            sell,
            deposit,
            withdraw,
        } => Movement::from_ledger_legs(
            kind,
            read_leg(row, buy),
            read_leg(row, sell),
            read_leg(row, deposit),
            read_leg(row, withdraw),
        ),
    };

    let exchange = mapping
        .exchange
        .map(|col| cell(row, col))
        .filter(|e| !e.is_empty())
        .unwrap_or(ctx.exchange.as_str());

    let row_tag = mapping
        .tag
        .map(|col| cell(row, col))
        .filter(|t| !t.is_empty());
    let tag = row_tag.or(ctx.tag.as_deref());
    let note = mapping.note.map(|col| cell(row, col));

    Ok(Transaction::new(exchange, date, movement)
        .with_tag(tag)
        .with_note(note))
}

/// A leg exists when its amount cell holds a number
fn read_leg(row: &[String], pair: ColumnPair) -> Option<Leg> {
    let amount = pair
        .amount
        .and_then(|col| Quantity::parse_lenient(cell(row, col)))?;
    let currency = pair.currency.map(|col| cell(row, col)).unwrap_or("");
    Some(Leg::new(amount, currency))
}

/// Parse a date cell, with or without a time part
///
/// Date-only values get midnight.
pub fn parse_date(s: &str, preferred: Option<&str>) -> Option<NaiveDateTime> {
    let s = s.trim();

    if let Some(format) = preferred {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a time-of-day cell such as `14:30`, `14:30:05` or `2:30 PM`
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(s, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn qty(s: &str) -> Quantity {
        Quantity::parse(s).unwrap()
    }

    fn ctx() -> ImportContext {
        ImportContext::new("Binance")
    }

    #[test]
    fn test_buy_row_fills_bought_leg_only() {
        let mapping = ColumnMapping::new()
            .with_date(0)
            .with_kind_column(1)
            .with_primary(Some(2), Some(3));
        let rows = grid(&[
            &["Date", "Type", "Amount", "Currency"],
            &["2025-01-01", "buy", "0.5", "BTC"],
        ]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        assert_eq!(report.imported(), 1);
        let txn = &report.transactions[0];
        assert_eq!(txn.kind(), TransactionKind::Buy);
        assert_eq!(txn.exchange, "Binance");
        let bought = txn.movement.buy_leg().unwrap();
        assert_eq!(bought.amount, qty("0.5"));
        assert_eq!(bought.currency, "BTC");
        assert!(txn.movement.sell_leg().is_none());
    }

    #[test]
    fn test_unparseable_date_skips_exactly_that_row() {
        let mapping = ColumnMapping::new().with_date(0).with_primary(Some(1), Some(2));
        let rows = grid(&[
            &["Date", "Amount", "Currency"],
            &["2025-01-01", "1", "ETH"],
            &["not-a-date", "2", "ETH"],
            &["2025-01-03", "3", "ETH"],
        ]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        assert_eq!(report.imported(), 2);
        assert_eq!(
            report.skipped,
            vec![SkippedRow {
                row_number: 3,
                reason: "Could not parse date: 'not-a-date'".into(),
            }]
        );
    }

    #[test]
    fn test_fixed_kind_ignores_row_content() {
        let mapping = ColumnMapping::new()
            .with_date(0)
            .with_fixed_kind(TransactionKind::Deposit)
            .with_primary(Some(2), Some(3));
        let rows = grid(&[
            &["Date", "Type", "Amount", "Currency"],
            &["2025-01-01", "sell", "100", "USD"],
            &["2025-01-02", "buy", "1", "BTC"],
        ]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        assert!(report
            .transactions
            .iter()
            .all(|t| t.kind() == TransactionKind::Deposit));
    }

    #[test]
    fn test_receive_and_send_are_transfers() {
        let mapping = ColumnMapping::new()
            .with_date(0)
            .with_kind_column(1)
            .with_primary(Some(2), Some(3));
        let rows = grid(&[
            &["Date", "Type", "Amount", "Currency"],
            &["2025-01-01", "Receive", "1", "ETH"],
            &["2025-01-02", "Send", "0.5", "ETH"],
        ]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        assert_eq!(report.transactions[0].kind(), TransactionKind::Deposit);
        assert_eq!(report.transactions[1].kind(), TransactionKind::Withdraw);
    }

    #[test]
    fn test_amounts_are_cleaned_and_made_positive() {
        let mapping = ColumnMapping::new()
            .with_date(0)
            .with_fixed_kind(TransactionKind::Sell)
            .with_primary(Some(1), Some(2))
            .with_secondary(Some(3), Some(4));
        let rows = grid(&[
            &["Date", "Qty", "Asset", "Total", "Quote"],
            &["2025-03-12", "-5 SOL", "SOL", "$1,100.00", "USDT"],
            &["2025-03-13", "n/a", "SOL", "", "USDT"],
        ]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        let first = &report.transactions[0].movement;
        assert_eq!(first.primary().unwrap().amount, qty("5"));
        assert_eq!(first.secondary().unwrap().amount, qty("1100"));

        let second = &report.transactions[1].movement;
        assert!(second.primary().is_none());
        assert!(second.secondary().is_none());
    }

    #[test]
    fn test_header_row_in_the_middle() {
        let mapping = ColumnMapping::new().with_date(0);
        let rows = grid(&[
            &["2025-01-01"],
            &["Date"],
            &["2025-01-02"],
        ]);

        let report = convert_rows(&rows, 1, &mapping, &ctx()).unwrap();
        assert_eq!(report.imported(), 2);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_unmapped_date_is_rejected() {
        let rows = grid(&[&["Date"], &["2025-01-01"]]);
        let err = convert_rows(&rows, 0, &ColumnMapping::new(), &ctx()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_row_tag_overrides_context_tag() {
        let mapping = ColumnMapping::new().with_date(0).with_tag(1).with_note(2);
        let rows = grid(&[
            &["Date", "Tag", "Note"],
            &["2025-01-01", "", "first"],
            &["2025-01-02", "DCA", ""],
        ]);
        let ctx = ctx().with_tag(Some("Imported".into()));

        let report = convert_rows(&rows, 0, &mapping, &ctx).unwrap();
        assert_eq!(report.transactions[0].tag.as_deref(), Some("Imported"));
        assert_eq!(report.transactions[0].note.as_deref(), Some("first"));
        assert_eq!(report.transactions[1].tag.as_deref(), Some("DCA"));
        assert!(report.transactions[1].note.is_none());
    }

    #[test]
    fn test_row_exchange_overrides_context_exchange() {
        let mapping = ColumnMapping::new().with_date(0).with_exchange(1);
        let rows = grid(&[
            &["Date", "Exchange"],
            &["2025-01-01", "Kraken"],
            &["2025-01-02", ""],
        ]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        assert_eq!(report.transactions[0].exchange, "Kraken");
        assert_eq!(report.transactions[1].exchange, "Binance");
    }

    #[test]
    fn test_time_column_sets_time_of_day() {
        let mapping = ColumnMapping::new().with_date(0).with_time(1);
        let rows = grid(&[&["Date", "Time"], &["01/15/2025", "14:30"]]);

        let report = convert_rows(&rows, 0, &mapping, &ctx()).unwrap();
        let date = report.transactions[0].date;
        assert_eq!(date.date(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!((date.hour(), date.minute()), (14, 30));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 6).unwrap();
        for s in [
            "2025-02-06",
            "02/06/2025",
            "2025/02/06",
            "Feb 06, 2025",
            "06 Feb 2025",
            "2025-02-06T09:15:00Z",
            "2025-02-06 09:15:00",
        ] {
            assert_eq!(parse_date(s, None).map(|d| d.date()), Some(expected), "{}", s);
        }
        assert!(parse_date("not-a-date", None).is_none());
    }

    #[test]
    fn test_preferred_format_wins() {
        let parsed = parse_date("06/02/2025", Some("%d/%m/%Y")).unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 2, 6).unwrap());
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("09:05"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_time("2:30 PM"), NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(parse_time(""), None);
        assert_eq!(parse_time("noon"), None);
    }
}
