//! Sequences header and row validation into one outcome.

use super::evaluator::validate_row;
use super::headers::validate_headers;
use super::outcome::ValidationOutcome;
use crate::schema::{FieldSchema, Record};

/// Validate a parsed file.
///
/// A header failure short-circuits: rows are not inspected. Otherwise every
/// row is checked and errors are concatenated in row order. Rows are only
/// returned when nothing failed.
pub fn validate(schema: &FieldSchema, headers: &[String], rows: &[Record]) -> ValidationOutcome {
    if let Some(header_error) = validate_headers(schema, headers) {
        return ValidationOutcome::invalid(vec![header_error]);
    }

    let errors: Vec<String> = rows
        .iter()
        .enumerate()
        .flat_map(|(index, row)| validate_row(schema, row, index))
        .map(|violation| violation.to_string())
        .collect();

    if errors.is_empty() {
        ValidationOutcome::valid(rows.to_vec())
    } else {
        ValidationOutcome::invalid(errors)
    }
}
