//! One select-check-render cycle for a file on disk.

use std::path::PathBuf;

use csvgate_core::parser::CsvParser;
use csvgate_core::schema::FieldSchema;
use csvgate_core::uploader::{SelectedFile, Uploader};

use crate::config::OutputFormat;
use crate::render::render_outcome;

/// Exit status for a file that passed every check.
pub const EXIT_VALID: u8 = 0;

/// Exit status for a file with header, row or parse errors.
pub const EXIT_INVALID: u8 = 1;

/// Exit status for bad flags, bad configuration or an I/O failure outside
/// the check itself.
pub const EXIT_USAGE: u8 = 2;

/// Everything needed to check one file.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub path: PathBuf,
    pub output: OutputFormat,
    pub delimiter: u8,
}

/// Rendered result of a check.
#[derive(Debug, Clone)]
pub struct Report {
    pub is_valid: bool,
    pub rendered: String,
}

impl Report {
    pub fn exit_code(&self) -> u8 {
        if self.is_valid {
            EXIT_VALID
        } else {
            EXIT_INVALID
        }
    }
}

/// Select the file, run the check, render the outcome, then reset.
pub async fn check_file(request: &CheckRequest) -> anyhow::Result<Report> {
    let parser = CsvParser::new().with_delimiter(request.delimiter);
    let mut uploader = Uploader::new(FieldSchema::default(), parser);

    let file = SelectedFile::from_path(&request.path);
    let banner = format!("Selected file: {}\n\n", file.name);
    uploader.select_file(file)?;

    let outcome = uploader.check().await?;
    let is_valid = outcome.is_valid;
    let body = render_outcome(outcome, request.output)?;

    let rendered = match request.output {
        OutputFormat::Table => format!("{banner}{body}"),
        OutputFormat::Json => format!("{body}\n"),
    };

    uploader.reset();
    Ok(Report { is_valid, rendered })
}
