//! Import display formatting

use crate::import::{
    AmountColumns, ColumnMapping, ColumnPair, ConversionReport, KindSource, SkippedRow,
};

/// Describe a column by its 1-based position and header label
pub fn column_label(column: Option<usize>, headers: &[String]) -> String {
    match column {
        Some(i) => match headers.get(i).map(|h| h.trim()).filter(|h| !h.is_empty()) {
            Some(header) => format!("col {} ({})", i + 1, header),
            None => format!("col {}", i + 1),
        },
        None => "-".to_string(),
    }
}

fn pair_label(pair: &ColumnPair, headers: &[String]) -> String {
    format!(
        "{} / {}",
        column_label(pair.amount, headers),
        column_label(pair.currency, headers)
    )
}

/// Field name and assigned column, in display order
pub fn mapping_fields(mapping: &ColumnMapping, headers: &[String]) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("Date", column_label(mapping.date, headers)),
        ("Time", column_label(mapping.time, headers)),
    ];
    if mapping.exchange.is_some() {
        fields.push(("Exchange", column_label(mapping.exchange, headers)));
    }
    fields.push((
        "Type",
        match mapping.kind {
            KindSource::Column(i) => column_label(Some(i), headers),
            KindSource::Fixed(kind) => format!("always {}", kind),
        },
    ));

    match &mapping.amounts {
        AmountColumns::Roles { primary, secondary } => {
            fields.push(("Amount", pair_label(primary, headers)));
            fields.push(("Counter amount", pair_label(secondary, headers)));
        }
        AmountColumns::Ledger {
            buy,
            sell,
            deposit,
            withdraw,
        } => {
            fields.push(("Buy", pair_label(buy, headers)));
            fields.push(("Sell", pair_label(sell, headers)));
            fields.push(("Deposit", pair_label(deposit, headers)));
            fields.push(("Withdraw", pair_label(withdraw, headers)));
        }
    }

    fields.push(("Tag", column_label(mapping.tag, headers)));
    fields.push(("Note", column_label(mapping.note, headers)));
    fields
}

/// Format the mapping as aligned `Field: column` lines
pub fn format_mapping(mapping: &ColumnMapping, headers: &[String]) -> String {
    let mut output = String::new();
    for (field, column) in mapping_fields(mapping, headers) {
        output.push_str(&format!("  {:<15} {}\n", format!("{}:", field), column));
    }
    output
}

pub fn format_skipped_row(row: &SkippedRow) -> String {
    format!("Row {}: {}", row.row_number, row.reason)
}

/// Summarize a conversion, listing at most `max_skipped` skip reasons
pub fn format_import_report(report: &ConversionReport, max_skipped: usize) -> String {
    let mut output = format!(
        "{} transaction{} ready to import",
        report.imported(),
        if report.imported() == 1 { "" } else { "s" }
    );
    if report.skipped.is_empty() {
        output.push('\n');
        return output;
    }

    let skipped = report.skipped.len();
    output.push_str(&format!(
        ", {} row{} skipped:\n",
        skipped,
        if skipped == 1 { "" } else { "s" }
    ));
    for row in report.skipped.iter().take(max_skipped) {
        output.push_str(&format!("  {}\n", format_skipped_row(row)));
    }
    if skipped > max_skipped {
        output.push_str(&format!("  ... and {} more\n", skipped - max_skipped));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    fn headers() -> Vec<String> {
        ["Date", "Side", "Amount", "Coin"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_label() {
        assert_eq!(column_label(Some(2), &headers()), "col 3 (Amount)");
        assert_eq!(column_label(Some(7), &headers()), "col 8");
        assert_eq!(column_label(None, &headers()), "-");
    }

    #[test]
    fn test_mapping_fields_for_fixed_kind() {
        let mapping = ColumnMapping::new()
            .with_date(0)
            .with_fixed_kind(TransactionKind::Deposit)
            .with_primary(Some(2), Some(3));
        let fields = mapping_fields(&mapping, &headers());

        assert_eq!(fields[0], ("Date", "col 1 (Date)".to_string()));
        assert!(fields.contains(&("Type", "always Deposit".to_string())));
        assert!(fields.contains(&("Amount", "col 3 (Amount) / col 4 (Coin)".to_string())));
        assert!(!fields.iter().any(|(f, _)| *f == "Exchange"));
    }

    #[test]
    fn test_report_lists_skips() {
        let report = ConversionReport {
            transactions: Vec::new(),
            skipped: (2..6)
                .map(|n| SkippedRow {
                    row_number: n,
                    reason: "Missing date".into(),
                })
                .collect(),
        };
        let text = format_import_report(&report, 2);
        assert!(text.starts_with("0 transactions ready to import, 4 rows skipped:"));
        assert!(text.contains("Row 2: Missing date"));
        assert!(!text.contains("Row 4"));
        assert!(text.contains("... and 2 more"));
    }
}
