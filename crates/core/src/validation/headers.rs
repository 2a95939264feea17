//! Header-shape check.

use crate::schema::FieldSchema;

/// Check that every required field appears among `headers`.
///
/// Returns one message naming all missing fields in schema order, or `None`
/// when nothing is missing. Unexpected extra headers are ignored.
pub fn validate_headers(schema: &FieldSchema, headers: &[String]) -> Option<String> {
    let missing: Vec<&str> = schema
        .required_names()
        .filter(|name| !headers.iter().any(|h| h == name))
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(format!("Missing required headers: {}", missing.join(", ")))
    }
}
