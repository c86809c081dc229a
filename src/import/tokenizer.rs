//! CSV tokenizer
//!
//! Turns uploaded text into a grid of trimmed string cells. Rows may have
//! different lengths; callers look cells up with [`cell`], which treats
//! out-of-range columns as empty.

use csv::{ReaderBuilder, Trim};

use crate::error::CoinlogResult;

/// Tokenized file contents, one `Vec<String>` per non-blank line
pub type Grid = Vec<Vec<String>>;

/// Tokenize CSV text
///
/// Rows split on newlines first, so an unbalanced quote only affects its own
/// line. Within a line, quoted fields may contain commas (and doubled `""`
/// quotes). Lines whose cells are all empty are dropped.
pub fn parse_csv(text: &str) -> CoinlogResult<Grid> {
    let text = text.trim_start_matches('\u{feff}');

    let mut rows = Grid::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(row) = parse_line(line)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn parse_line(line: &str) -> CoinlogResult<Option<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut cells = Vec::new();
    for record in reader.records() {
        cells.extend(record?.iter().map(str::to_string));
    }
    if cells.iter().all(String::is_empty) {
        return Ok(None);
    }
    Ok(Some(cells))
}

/// Cell at `index`, or `""` when the row is too short
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_comma_is_not_a_separator() {
        let rows = parse_csv("a,\"b,c\",d").unwrap();
        assert_eq!(rows, vec![vec!["a", "b,c", "d"]]);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let rows = parse_csv("Date,Amount\n\n2025-01-01,1\n   \n\n2025-01-02,2\n").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec!["2025-01-01", "1"]);
        assert_eq!(rows[2], vec!["2025-01-02", "2"]);
    }

    #[test]
    fn test_cells_are_trimmed() {
        let rows = parse_csv("  Date , Type \r\n 2025-01-01 ,  buy\r\n").unwrap();
        assert_eq!(rows[0], vec!["Date", "Type"]);
        assert_eq!(rows[1], vec!["2025-01-01", "buy"]);
    }

    #[test]
    fn test_ragged_rows_are_tolerated() {
        let rows = parse_csv("a,b,c\n1\n1,2,3,4").unwrap();
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2].len(), 4);
        assert_eq!(cell(&rows[1], 2), "");
        assert_eq!(cell(&rows[2], 3), "4");
    }

    #[test]
    fn test_doubled_quotes_are_unescaped() {
        let rows = parse_csv("x,\"he said \"\"hodl\"\"\"").unwrap();
        assert_eq!(rows[0][1], "he said \"hodl\"");
    }

    #[test]
    fn test_unclosed_quote_stays_on_its_line() {
        let rows =
            parse_csv("Date,Note,Amount\n2025-01-01,\"oops,1\n2025-01-02,ok,2\n2025-01-03,ok,3\n")
                .unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1][0], "2025-01-01");
        assert!(rows[1][1].starts_with("oops"));
        assert_eq!(rows[2], vec!["2025-01-02", "ok", "2"]);
        assert_eq!(rows[3], vec!["2025-01-03", "ok", "3"]);
    }

    #[test]
    fn test_comma_only_line_is_dropped() {
        let rows = parse_csv("a,b\n , ,\n1,2").unwrap();
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let rows = parse_csv("\u{feff}Date,Type\n2025-01-01,buy").unwrap();
        assert_eq!(rows[0][0], "Date");
    }
}
