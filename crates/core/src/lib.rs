//! `csvgate-core` -- CSV parsing, schema validation and the upload session.
//!
//! Everything here is free of terminal or display concerns; the CLI crate
//! renders whatever [`validation::ValidationOutcome`] comes back.

pub mod error;
pub mod parser;
pub mod schema;
pub mod uploader;
pub mod validation;
