//! CSV validation engine.
//!
//! Header-shape checking, per-row field rules, and the orchestrator that
//! sequences them into a single [`outcome::ValidationOutcome`]. Pure logic,
//! no I/O.

pub mod evaluator;
pub mod headers;
pub mod orchestrator;
pub mod outcome;

pub use evaluator::validate_row;
pub use headers::validate_headers;
pub use orchestrator::validate;
pub use outcome::{FieldViolation, ValidationOutcome};
