//! Row evaluator — pure logic, no I/O.

use std::sync::LazyLock;

use regex::Regex;

use super::outcome::FieldViolation;
use crate::schema::{FieldRule, FieldSchema, FieldSpec, Record};

/// `local@domain.tld`: no whitespace, exactly one `@`, a dot after it.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Check one record against every field rule in the schema.
///
/// `row_index` is the 0-based position in the parsed sequence; violations
/// carry the 1-based row number. All rules run, in schema order.
pub fn validate_row(schema: &FieldSchema, row: &Record, row_index: usize) -> Vec<FieldViolation> {
    schema
        .fields()
        .iter()
        .filter(|spec| !satisfies(spec, row.get(&spec.name).map(String::as_str)))
        .map(|spec| FieldViolation {
            row: row_index + 1,
            field: spec.name.clone(),
            rule: spec.rule,
        })
        .collect()
}

fn satisfies(spec: &FieldSpec, value: Option<&str>) -> bool {
    match spec.rule {
        FieldRule::Required => is_present(value),
        FieldRule::Email => match value {
            Some(v) if !v.is_empty() => is_email(v),
            _ => true, // empty email is accepted
        },
        FieldRule::Numeric => value.is_some_and(is_number),
    }
}

fn is_present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Integers and decimals, surrounding whitespace allowed. Rejects blanks,
/// `NaN` and infinities.
fn is_number(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return false;
    }
    trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}
