//! Validation result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldRule, Record};

/// Prefix for errors raised by the parser rather than by validation.
pub const PARSE_ERROR_PREFIX: &str = "Error parsing CSV file: ";

/// A single field-level rule violation in one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// 1-based position of the row in the parsed sequence.
    pub row: usize,
    pub field: String,
    pub rule: FieldRule,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {}: '{}' {}",
            self.row,
            self.field,
            self.rule.failure_message()
        )
    }
}

/// Aggregated result of one parse-and-validate cycle.
///
/// `is_valid` holds iff `errors` is empty, and `rows` is only populated for
/// a valid outcome. Use the constructors rather than building it by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub rows: Vec<Record>,
}

impl ValidationOutcome {
    /// A passing outcome carrying the parsed rows.
    pub fn valid(rows: Vec<Record>) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            rows,
        }
    }

    /// A failing outcome. Any parsed rows are discarded.
    ///
    /// An empty `errors` list would break the invariant, so it is replaced
    /// with a generic message.
    pub fn invalid(errors: Vec<String>) -> Self {
        let errors = if errors.is_empty() {
            vec!["Validation failed".to_string()]
        } else {
            errors
        };
        Self {
            is_valid: false,
            errors,
            rows: Vec::new(),
        }
    }

    /// A failing outcome for a file the parser could not read.
    pub fn parse_failure(message: &str) -> Self {
        Self::invalid(vec![format!("{PARSE_ERROR_PREFIX}{message}")])
    }

    /// Column names for table display: the keys of the first row.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
