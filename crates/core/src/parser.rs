//! CSV parsing into header names and ordered records.
//!
//! The first record is the header row, completely empty lines are skipped,
//! and ragged rows are tolerated. Duplicate header names get a numeric
//! suffix so no column is silently overwritten inside a [`Record`].

use csv::{ReaderBuilder, StringRecord};

use crate::error::ParseError;
use crate::schema::Record;

/// UTF-8 byte-order mark some spreadsheet exports prepend.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parsed file contents: header names plus one record per data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Record>,
}

/// CSV parser with a configurable delimiter.
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse raw file bytes.
    pub fn parse(&self, bytes: &[u8]) -> Result<ParsedCsv, ParseError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader
            .records()
            .filter(|result| !matches!(result, Ok(record) if is_empty_line(record)));

        let headers = match records.next() {
            Some(header_record) => dedupe_headers(&header_record?),
            None => return Ok(ParsedCsv::default()),
        };

        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            if record.len() > headers.len() {
                tracing::debug!(
                    row = rows.len() + 1,
                    extra = record.len() - headers.len(),
                    "Dropping cells beyond the header row"
                );
            }
            let row: Record = headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect();
            rows.push(row);
        }

        Ok(ParsedCsv { headers, rows })
    }
}

fn is_empty_line(record: &StringRecord) -> bool {
    record.len() == 0 || (record.len() == 1 && record[0].is_empty())
}

/// Rename repeated header names to `name_1`, `name_2`, ... in order of appearance.
fn dedupe_headers(record: &StringRecord) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(record.len());
    for raw in record.iter() {
        let mut candidate = raw.to_string();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{raw}_{suffix}");
            suffix += 1;
        }
        headers.push(candidate);
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParsedCsv {
        CsvParser::new().parse(input.as_bytes()).unwrap()
    }

    #[test]
    fn parses_headers_and_rows() {
        let parsed = parse("name,email,age\nAna,a@b.com,30\nBo,bo@c.org,41\n");
        assert_eq!(parsed.headers, vec!["name", "email", "age"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0]["name"], "Ana");
        assert_eq!(parsed.rows[1]["age"], "41");
    }

    #[test]
    fn record_keys_follow_header_order() {
        let parsed = parse("age,name\n3,Zed\n");
        let keys: Vec<&String> = parsed.rows[0].keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
    }

    #[test]
    fn skips_empty_lines() {
        let parsed = parse("name,age\n\nAna,30\n\n\nBo,41\n");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1]["name"], "Bo");
    }

    #[test]
    fn strips_byte_order_mark() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(b"name,age\nAna,30\n");
        let parsed = CsvParser::new().parse(&bytes).unwrap();
        assert_eq!(parsed.headers[0], "name");
    }

    #[test]
    fn short_row_lacks_trailing_keys() {
        let parsed = parse("name,email,age\nAna\n");
        assert_eq!(parsed.rows[0].len(), 1);
        assert!(parsed.rows[0].get("age").is_none());
    }

    #[test]
    fn long_row_drops_extra_cells() {
        let parsed = parse("name,age\nAna,30,extra,more\n");
        assert_eq!(parsed.rows[0].len(), 2);
        assert_eq!(parsed.rows[0]["age"], "30");
    }

    #[test]
    fn duplicate_headers_get_suffixes() {
        let parsed = parse("name,name,age,name\nA,B,1,C\n");
        assert_eq!(parsed.headers, vec!["name", "name_1", "age", "name_2"]);
        assert_eq!(parsed.rows[0]["name_1"], "B");
        assert_eq!(parsed.rows[0]["name_2"], "C");
    }

    #[test]
    fn quoted_fields_keep_delimiters() {
        let parsed = parse("name,age\n\"Smith, Ana\",30\n");
        assert_eq!(parsed.rows[0]["name"], "Smith, Ana");
    }

    #[test]
    fn empty_input_has_no_headers() {
        assert_eq!(parse(""), ParsedCsv::default());
        assert_eq!(parse("\n\n"), ParsedCsv::default());
    }

    #[test]
    fn header_only_input_has_no_rows() {
        let parsed = parse("name,email,age\n");
        assert_eq!(parsed.headers.len(), 3);
        assert!(parsed.rows.is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let parsed = CsvParser::new()
            .with_delimiter(b';')
            .parse(b"name;age\nAna;30\n")
            .unwrap();
        assert_eq!(parsed.rows[0]["age"], "30");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let err = CsvParser::new()
            .parse(b"name,age\n\xff\xfe,30\n")
            .unwrap_err();
        assert!(!err.message.is_empty());
    }
}
