// ============================================================
// TABLE PARSER
// ============================================================
// Normalize raw comma-delimited text into a validated Table

use csv::ReaderBuilder;
use std::collections::HashSet;
use tracing::warn;

use crate::domain::error::ParseError;
use crate::domain::table::Table;

/// Comma-delimited parser producing a validated [`Table`].
///
/// Pure over its input: identical text always yields an identical table
/// with preserved row order. Size limits are the transport layer's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableParser;

impl TableParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw text into a column map, enforcing header and row-shape
    /// invariants.
    pub fn parse(&self, raw: &str) -> Result<Table, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::EmptyInput);
        }

        // The csv reader is lenient about quoting; pre-scan so an
        // unbalanced quote fails here instead of surfacing as a
        // shape error on whatever record it mangles.
        Self::check_quote_balance(raw)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(raw.as_bytes());

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| ParseError::MalformedInput(e.to_string()))?;
            records.push(record);
        }

        if records.is_empty() {
            return Err(ParseError::NoData);
        }

        let header = &records[0];
        if header.is_empty() {
            return Err(ParseError::MissingHeader);
        }
        // A header with at least one non-blank name is accepted even if
        // others are blank.
        if header.iter().all(|name| name.trim().is_empty()) {
            return Err(ParseError::InvalidHeader);
        }

        let names: Vec<String> = header.iter().map(str::to_string).collect();
        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                warn!(column = %name, "duplicate header name collapses into one column");
            }
        }

        let mut table = Table::with_columns(&names);
        for (row_index, record) in records.iter().enumerate().skip(1) {
            // Blank lines surface as zero-field records; skip them.
            if record.is_empty() {
                continue;
            }
            if record.len() != names.len() {
                return Err(ParseError::RowShapeMismatch { row_index });
            }
            for (name, field) in names.iter().zip(record.iter()) {
                table.push(name, field.to_string());
            }
        }

        Ok(table)
    }

    /// RFC 4180 quote scan: a `""` pair inside a quoted field is an
    /// escaped quote; a field still open at end of input is malformed.
    fn check_quote_balance(raw: &str) -> Result<(), ParseError> {
        let mut in_quotes = false;
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '"' {
                continue;
            }
            if in_quotes {
                if chars.peek() == Some(&'"') {
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        }
        if in_quotes {
            return Err(ParseError::MalformedInput(
                "unterminated quoted field".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_csv() {
        let table = TableParser::new()
            .parse("name,age,city\nAlice,30,NYC\nBob,25,LA")
            .unwrap();

        assert_eq!(table.column_names(), ["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        for name in table.column_names() {
            assert_eq!(table.column(name).unwrap().len(), 2);
        }
        assert_eq!(table.column("age").unwrap(), ["30", "25"]);
    }

    #[test]
    fn rejects_empty_input() {
        assert_eq!(TableParser::new().parse(""), Err(ParseError::EmptyInput));
        assert_eq!(TableParser::new().parse("   "), Err(ParseError::EmptyInput));
    }

    #[test]
    fn rejects_all_blank_header() {
        assert_eq!(
            TableParser::new().parse(",,"),
            Err(ParseError::InvalidHeader)
        );
    }

    #[test]
    fn accepts_partially_blank_header() {
        let table = TableParser::new().parse("a,,c\n1,2,3").unwrap();
        assert_eq!(table.column_names(), ["a", "", "c"]);
        assert_eq!(table.column("").unwrap(), ["2"]);
    }

    #[test]
    fn rejects_short_row_with_its_index() {
        let err = TableParser::new()
            .parse("a,b\n1,2\n3\n4,5")
            .unwrap_err();
        assert_eq!(err, ParseError::RowShapeMismatch { row_index: 2 });
    }

    #[test]
    fn skips_blank_rows() {
        let table = TableParser::new().parse("a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("a").unwrap(), ["1", "3"]);
    }

    #[test]
    fn rejects_unterminated_quote_as_malformed() {
        let err = TableParser::new().parse("a,b\n\"1,2").unwrap_err();
        assert!(matches!(err, ParseError::MalformedInput(_)));
    }

    #[test]
    fn preserves_quoted_fields() {
        let table = TableParser::new()
            .parse("name,notes\nAlice,\"likes a, b\nand c\"")
            .unwrap();
        assert_eq!(table.column("notes").unwrap(), ["likes a, b\nand c"]);
    }

    #[test]
    fn round_trips_data_rows() {
        let table = TableParser::new()
            .parse("a,b,c\n1,2,3\n4,5,6\n7,8,9")
            .unwrap();
        let rows = table.rows();
        assert_eq!(
            rows,
            vec![
                vec!["1", "2", "3"],
                vec!["4", "5", "6"],
                vec!["7", "8", "9"],
            ]
        );
    }

    #[test]
    fn identical_input_yields_identical_table() {
        let parser = TableParser::new();
        assert_eq!(
            parser.parse("a,b\n1,2\n3,4"),
            parser.parse("a,b\n1,2\n3,4")
        );
    }

    #[test]
    fn duplicate_headers_collapse() {
        let table = TableParser::new().parse("a,a\n1,2").unwrap();
        assert_eq!(table.column_count(), 1);
        // Positional appends from both occurrences land in the one column.
        assert_eq!(table.column("a").unwrap(), ["1", "2"]);
    }
}
