//! Column mapping for CSV import
//!
//! Assigns logical fields to zero-based column indices of the uploaded grid.
//! `None` means the field is not mapped.

use crate::export::csv::EXPORT_COLUMNS;
use crate::models::TransactionKind;

/// Amount and currency columns of one leg
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPair {
    pub amount: Option<usize>,
    pub currency: Option<usize>,
}

impl ColumnPair {
    pub fn new(amount: usize, currency: usize) -> Self {
        Self {
            amount: Some(amount),
            currency: Some(currency),
        }
    }
}

/// Where the transaction kind comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindSource {
    /// Classify the text in this column
    Column(usize),
    /// Every row gets this kind
    Fixed(TransactionKind),
}

impl Default for KindSource {
    fn default() -> Self {
        Self::Fixed(TransactionKind::Buy)
    }
}

/// How amount columns are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountColumns {
    /// Primary and secondary legs, meaning depends on the row's kind
    Roles {
        primary: ColumnPair,
        secondary: ColumnPair,
    },
    /// The four fixed pairs of coinlog's own export layout
    Ledger {
        buy: ColumnPair,
        sell: ColumnPair,
        deposit: ColumnPair,
        withdraw: ColumnPair,
    },
}

impl Default for AmountColumns {
    fn default() -> Self {
        Self::Roles {
            primary: ColumnPair::default(),
            secondary: ColumnPair::default(),
        }
    }
}

/// Column mapping configuration for CSV import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Date column; required before rows can be converted
    pub date: Option<usize>,
    /// Optional separate time-of-day column
    pub time: Option<usize>,
    /// Per-row exchange; falls back to the exchange entered for the import
    pub exchange: Option<usize>,
    pub kind: KindSource,
    pub amounts: AmountColumns,
    /// Per-row tag; falls back to the tag entered for the whole import
    pub tag: Option<usize>,
    pub note: Option<usize>,
}

impl ColumnMapping {
    /// An empty mapping: nothing mapped, fixed kind Buy
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping for files written by `coinlog export`
    pub fn ledger_layout() -> Self {
        Self {
            date: Some(0),
            time: Some(1),
            exchange: Some(2),
            kind: KindSource::Column(3),
            amounts: AmountColumns::Ledger {
                buy: ColumnPair::new(4, 5),
                sell: ColumnPair::new(6, 7),
                deposit: ColumnPair::new(8, 9),
                withdraw: ColumnPair::new(10, 11),
            },
            tag: Some(12),
            note: Some(13),
        }
    }

    pub fn with_date(mut self, column: usize) -> Self {
        self.date = Some(column);
        self
    }

    pub fn with_time(mut self, column: usize) -> Self {
        self.time = Some(column);
        self
    }

    pub fn with_exchange(mut self, column: usize) -> Self {
        self.exchange = Some(column);
        self
    }

    pub fn with_kind_column(mut self, column: usize) -> Self {
        self.kind = KindSource::Column(column);
        self
    }

    pub fn with_fixed_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = KindSource::Fixed(kind);
        self
    }

    /// Set the primary pair (switches to role-based amounts)
    pub fn with_primary(mut self, amount: Option<usize>, currency: Option<usize>) -> Self {
        let pair = ColumnPair { amount, currency };
        self.amounts = match self.amounts {
            AmountColumns::Roles { secondary, .. } => AmountColumns::Roles {
                primary: pair,
                secondary,
            },
            AmountColumns::Ledger { .. } => AmountColumns::Roles {
                primary: pair,
                secondary: ColumnPair::default(),
            },
        };
        self
    }

    /// Set the secondary pair (switches to role-based amounts)
    pub fn with_secondary(mut self, amount: Option<usize>, currency: Option<usize>) -> Self {
        let pair = ColumnPair { amount, currency };
        self.amounts = match self.amounts {
            AmountColumns::Roles { primary, .. } => AmountColumns::Roles {
                primary,
                secondary: pair,
            },
            AmountColumns::Ledger { .. } => AmountColumns::Roles {
                primary: ColumnPair::default(),
                secondary: pair,
            },
        };
        self
    }

    pub fn with_tag(mut self, column: usize) -> Self {
        self.tag = Some(column);
        self
    }

    pub fn with_note(mut self, column: usize) -> Self {
        self.note = Some(column);
        self
    }

    pub fn is_date_mapped(&self) -> bool {
        self.date.is_some()
    }

    /// Whether the mapping uses the export layout's four pairs
    pub fn is_ledger_layout(&self) -> bool {
        matches!(self.amounts, AmountColumns::Ledger { .. })
    }

    /// Guess a mapping from header labels
    ///
    /// A header identical to coinlog's export header maps to
    /// [`ColumnMapping::ledger_layout`]; anything else is matched by keyword.
    pub fn detect_from_headers(headers: &[String]) -> Self {
        let is_export_header = headers.len() == EXPORT_COLUMNS.len()
            && headers
                .iter()
                .zip(EXPORT_COLUMNS.iter())
                .all(|(h, e)| h.trim().eq_ignore_ascii_case(e));
        if is_export_header {
            return Self::ledger_layout();
        }

        let mut mapping = Self::new();
        let mut amounts: Vec<usize> = Vec::new();
        let mut currencies: Vec<usize> = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            let h = header.trim().to_lowercase();
            if h.is_empty() {
                continue;
            }

            if (h.contains("date") || h.contains("timestamp")) && mapping.date.is_none() {
                mapping.date = Some(idx);
            } else if h.contains("time") && mapping.time.is_none() {
                mapping.time = Some(idx);
            } else if (h.contains("type") || h.contains("side") || h == "kind" || h == "operation")
                && !matches!(mapping.kind, KindSource::Column(_))
            {
                mapping.kind = KindSource::Column(idx);
            } else if h.contains("note") || h.contains("memo") || h.contains("description") {
                mapping.note.get_or_insert(idx);
            } else if h == "tag" || h == "label" {
                mapping.tag.get_or_insert(idx);
            } else if h.contains("amount")
                || h.contains("quantity")
                || h.contains("qty")
                || h.contains("total")
                || h.contains("cost")
            {
                amounts.push(idx);
            } else if h.contains("currency")
                || h.contains("asset")
                || h.contains("coin")
                || h.contains("symbol")
            {
                currencies.push(idx);
            }
        }

        // Without a date column the timestamp column doubles as the date
        if mapping.date.is_none() {
            mapping.date = mapping.time.take();
        }

        mapping.amounts = AmountColumns::Roles {
            primary: ColumnPair {
                amount: amounts.first().copied(),
                currency: currencies.first().copied(),
            },
            secondary: ColumnPair {
                amount: amounts.get(1).copied(),
                currency: currencies.get(1).copied(),
            },
        };

        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_mapping_is_unmapped() {
        let mapping = ColumnMapping::new();
        assert!(!mapping.is_date_mapped());
        assert_eq!(mapping.kind, KindSource::Fixed(TransactionKind::Buy));
        assert!(!mapping.is_ledger_layout());
    }

    #[test]
    fn test_builder() {
        let mapping = ColumnMapping::new()
            .with_date(0)
            .with_kind_column(1)
            .with_primary(Some(2), Some(3))
            .with_secondary(Some(4), None);

        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.kind, KindSource::Column(1));
        assert_eq!(
            mapping.amounts,
            AmountColumns::Roles {
                primary: ColumnPair::new(2, 3),
                secondary: ColumnPair {
                    amount: Some(4),
                    currency: None
                },
            }
        );
    }

    #[test]
    fn test_detect_export_header() {
        let mapping = ColumnMapping::detect_from_headers(&headers(&EXPORT_COLUMNS));
        assert_eq!(mapping, ColumnMapping::ledger_layout());
    }

    #[test]
    fn test_detect_generic_exchange_header() {
        let mapping = ColumnMapping::detect_from_headers(&headers(&[
            "Transaction Date",
            "Transaction Type",
            "Asset",
            "Quantity Transacted",
            "Spot Price Currency",
            "Total (inclusive of fees)",
            "Notes",
        ]));

        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.kind, KindSource::Column(1));
        assert_eq!(mapping.note, Some(6));
        assert_eq!(
            mapping.amounts,
            AmountColumns::Roles {
                primary: ColumnPair::new(3, 2),
                secondary: ColumnPair::new(5, 4),
            }
        );
    }

    #[test]
    fn test_detect_timestamp_only_header() {
        let mapping = ColumnMapping::detect_from_headers(&headers(&["Time", "Side", "Amount"]));
        assert_eq!(mapping.date, Some(0));
        assert_eq!(mapping.time, None);
        assert_eq!(mapping.kind, KindSource::Column(1));
    }
}
