//! Record type and the required-field schema.
//!
//! The schema is an immutable value handed to the validators. The default
//! contract is `name`, `email`, `age`, each paired with the rule applied to
//! its values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One parsed CSV data row: column name to cell value, in header order.
pub type Record = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// The check applied to a required field's value in every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    /// Value must be present and non-empty.
    Required,
    /// Value, when present and non-empty, must look like `local@domain.tld`.
    Email,
    /// Value must be present and parse as a finite number.
    Numeric,
}

impl FieldRule {
    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Numeric => "numeric",
        }
    }

    /// Message tail used when a value breaks this rule.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Required => "cannot be empty.",
            Self::Email => "is not valid.",
            Self::Numeric => "must be a number.",
        }
    }
}

/// A required column and the rule its values must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, rule: FieldRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Column name of the person's name field.
pub const FIELD_NAME: &str = "name";

/// Column name of the email field.
pub const FIELD_EMAIL: &str = "email";

/// Column name of the age field.
pub const FIELD_AGE: &str = "age";

/// Ordered set of required fields.
///
/// Order matters twice: missing headers are listed in schema order, and row
/// errors within a row follow schema order.
///
/// Serializes as a plain field list; deserializing goes through
/// [`FieldSchema::new`], so an invalid list is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Build a schema from an explicit field list.
    ///
    /// Rejects an empty list, blank field names and duplicates.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, CoreError> {
        if fields.is_empty() {
            return Err(CoreError::Validation(
                "Schema must declare at least one field".to_string(),
            ));
        }
        for (i, spec) in fields.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "Schema field at position {i} has an empty name"
                )));
            }
            if fields[..i].iter().any(|prev| prev.name == spec.name) {
                return Err(CoreError::Validation(format!(
                    "Schema field '{}' is declared more than once",
                    spec.name
                )));
            }
        }
        Ok(Self { fields })
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Required column names in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

impl TryFrom<Vec<FieldSpec>> for FieldSchema {
    type Error = CoreError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<FieldSchema> for Vec<FieldSpec> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldSpec::new(FIELD_NAME, FieldRule::Required),
                FieldSpec::new(FIELD_EMAIL, FieldRule::Email),
                FieldSpec::new(FIELD_AGE, FieldRule::Numeric),
            ],
        }
    }
}
