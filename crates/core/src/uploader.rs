//! Upload session state machine.
//!
//! One [`Uploader`] drives a single parse-and-validate cycle at a time:
//! `Idle -> FileSelected -> Parsing -> {Valid | Invalid}`, with `reset`
//! returning any state to `Idle`.
//!
//! A check is split into [`Uploader::begin_check`] and
//! [`Uploader::finish_check`] so event-driven hosts can parse off the
//! calling thread. The [`CheckTicket`] handed out by `begin_check` names the
//! cycle it belongs to; results arriving after a reset or a newer check are
//! rejected as stale.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ParseError};
use crate::parser::{CsvParser, ParsedCsv};
use crate::schema::{FieldSchema, Record};
use crate::validation::{validate, ValidationOutcome};

/// File extension the uploader expects.
pub const CSV_EXTENSION: &str = "csv";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Where the uploader is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploaderState {
    Idle,
    FileSelected,
    Parsing,
    Valid,
    Invalid,
}

impl UploaderState {
    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FileSelected => "file_selected",
            Self::Parsing => "parsing",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for UploaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Selected file
// ---------------------------------------------------------------------------

/// The file picked for checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name (final path component).
    pub name: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { name, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file carries a `.csv` extension (case-insensitive).
    pub fn has_csv_extension(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION))
    }
}

/// Proof that a check was started, tied to the cycle that started it.
#[derive(Debug, PartialEq, Eq)]
pub struct CheckTicket {
    cycle: u64,
    file: SelectedFile,
}

impl CheckTicket {
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The file this check should read.
    pub fn file(&self) -> &SelectedFile {
        &self.file
    }
}

// ---------------------------------------------------------------------------
// Uploader
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Uploader {
    schema: FieldSchema,
    parser: CsvParser,
    state: UploaderState,
    file: Option<SelectedFile>,
    outcome: ValidationOutcome,
    cycle: u64,
    show_reset: bool,
}

impl Default for Uploader {
    fn default() -> Self {
        Self::new(FieldSchema::default(), CsvParser::default())
    }
}

impl Uploader {
    pub fn new(schema: FieldSchema, parser: CsvParser) -> Self {
        Self {
            schema,
            parser,
            state: UploaderState::Idle,
            file: None,
            outcome: ValidationOutcome::default(),
            cycle: 0,
            show_reset: false,
        }
    }

    pub fn state(&self) -> UploaderState {
        self.state
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn outcome(&self) -> &ValidationOutcome {
        &self.outcome
    }

    pub fn is_valid(&self) -> bool {
        self.outcome.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.outcome.errors
    }

    pub fn rows(&self) -> &[Record] {
        &self.outcome.rows
    }

    /// Whether the reset control should be offered: a check has been
    /// started since the last reset.
    pub fn show_reset(&self) -> bool {
        self.show_reset
    }

    /// Pick the file for the next check, discarding any previous result.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), CoreError> {
        if self.state == UploaderState::Parsing {
            return Err(CoreError::InvalidTransition {
                action: "select a file",
                state: self.state,
            });
        }
        if !file.has_csv_extension() {
            tracing::warn!(file = %file.name, "Selected file does not have a .csv extension");
        }
        tracing::info!(file = %file.name, "File selected");
        self.file = Some(file);
        self.outcome = ValidationOutcome::default();
        self.transition(UploaderState::FileSelected);
        Ok(())
    }

    /// Enter `Parsing` for the selected file.
    ///
    /// Fails with [`CoreError::Busy`] while another check is running and with
    /// [`CoreError::NoFileSelected`] when there is nothing to check.
    pub fn begin_check(&mut self) -> Result<CheckTicket, CoreError> {
        if self.state == UploaderState::Parsing {
            return Err(CoreError::Busy);
        }
        let file = self.file.clone().ok_or(CoreError::NoFileSelected)?;

        self.cycle += 1;
        self.show_reset = true;
        self.transition(UploaderState::Parsing);
        Ok(CheckTicket {
            cycle: self.cycle,
            file,
        })
    }

    /// Apply a parse result to the cycle named by `ticket`.
    pub fn finish_check(
        &mut self,
        ticket: CheckTicket,
        parsed: Result<ParsedCsv, ParseError>,
    ) -> Result<&ValidationOutcome, CoreError> {
        if ticket.cycle != self.cycle {
            tracing::debug!(
                ticket = ticket.cycle,
                current = self.cycle,
                "Discarding stale check result"
            );
            return Err(CoreError::StaleCheck {
                ticket: ticket.cycle,
                current: self.cycle,
            });
        }
        if self.state != UploaderState::Parsing {
            return Err(CoreError::InvalidTransition {
                action: "finish a check",
                state: self.state,
            });
        }

        self.outcome = match parsed {
            Ok(ParsedCsv { headers, rows }) => validate(&self.schema, &headers, &rows),
            Err(err) => {
                tracing::warn!(file = %ticket.file.name, error = %err, "CSV parse failed");
                ValidationOutcome::parse_failure(&err.message)
            }
        };

        let next = if self.outcome.is_valid {
            UploaderState::Valid
        } else {
            UploaderState::Invalid
        };
        tracing::info!(
            file = %ticket.file.name,
            is_valid = self.outcome.is_valid,
            rows = self.outcome.rows.len(),
            errors = self.outcome.errors.len(),
            "CSV check complete"
        );
        self.transition(next);
        Ok(&self.outcome)
    }

    /// Run a whole check over bytes already in memory.
    pub fn check_bytes(&mut self, bytes: &[u8]) -> Result<&ValidationOutcome, CoreError> {
        let ticket = self.begin_check()?;
        let parsed = self.parser.parse(bytes);
        self.finish_check(ticket, parsed)
    }

    /// Read the selected file and run a whole check.
    ///
    /// Unreadable files are reported through the outcome like any other
    /// parse failure. Parsing runs on the blocking pool.
    pub async fn check(&mut self) -> Result<&ValidationOutcome, CoreError> {
        let ticket = self.begin_check()?;
        let parser = self.parser.clone();

        let parsed = match tokio::fs::read(ticket.file().path()).await {
            Ok(bytes) => tokio::task::spawn_blocking(move || parser.parse(&bytes))
                .await
                .unwrap_or_else(|e| Err(ParseError::new(format!("parser task failed: {e}")))),
            Err(err) => Err(ParseError::from(err)),
        };

        self.finish_check(ticket, parsed)
    }

    /// Return to the initial state. Any in-flight check becomes stale.
    pub fn reset(&mut self) {
        self.file = None;
        self.outcome = ValidationOutcome::default();
        self.show_reset = false;
        self.cycle += 1;
        self.transition(UploaderState::Idle);
    }

    fn transition(&mut self, next: UploaderState) {
        tracing::debug!(from = %self.state, to = %next, "Uploader transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const GOOD: &[u8] = b"name,email,age\nAna,a@b.com,30\n";
    const BAD_ROW: &[u8] = b"name,email,age\n,x,5\n";

    fn selected() -> SelectedFile {
        SelectedFile::from_path("people.csv")
    }

    fn ready() -> Uploader {
        let mut uploader = Uploader::default();
        uploader.select_file(selected()).unwrap();
        uploader
    }

    #[test]
    fn starts_idle_and_empty() {
        let uploader = Uploader::default();
        assert_eq!(uploader.state(), UploaderState::Idle);
        assert!(uploader.selected_file().is_none());
        assert!(!uploader.is_valid());
        assert!(uploader.rows().is_empty());
        assert!(uploader.errors().is_empty());
        assert!(!uploader.show_reset());
    }

    #[test]
    fn select_moves_to_file_selected() {
        let uploader = ready();
        assert_eq!(uploader.state(), UploaderState::FileSelected);
        assert_eq!(uploader.selected_file().unwrap().name, "people.csv");
    }

    #[test]
    fn check_without_file_is_rejected() {
        let mut uploader = Uploader::default();
        assert_matches!(uploader.check_bytes(GOOD), Err(CoreError::NoFileSelected));
        assert_eq!(uploader.state(), UploaderState::Idle);
    }

    #[test]
    fn valid_check_keeps_rows() {
        let mut uploader = ready();
        let outcome = uploader.check_bytes(GOOD).unwrap();
        assert!(outcome.is_valid);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(uploader.state(), UploaderState::Valid);
        assert!(uploader.show_reset());
    }

    #[test]
    fn invalid_check_reports_errors() {
        let mut uploader = ready();
        uploader.check_bytes(BAD_ROW).unwrap();
        assert_eq!(uploader.state(), UploaderState::Invalid);
        assert_eq!(
            uploader.errors(),
            &["Row 1: 'name' cannot be empty.", "Row 1: 'email' is not valid."]
        );
        assert!(uploader.rows().is_empty());
    }

    #[test]
    fn parse_failure_goes_to_invalid() {
        let mut uploader = ready();
        let ticket = uploader.begin_check().unwrap();
        uploader
            .finish_check(ticket, Err(ParseError::new("Unexpected quote")))
            .unwrap();
        assert_eq!(uploader.state(), UploaderState::Invalid);
        assert_eq!(uploader.errors(), &["Error parsing CSV file: Unexpected quote"]);
    }

    #[test]
    fn second_begin_while_parsing_is_busy() {
        let mut uploader = ready();
        let _ticket = uploader.begin_check().unwrap();
        assert_matches!(uploader.begin_check(), Err(CoreError::Busy));
        assert_eq!(uploader.state(), UploaderState::Parsing);
    }

    #[test]
    fn select_while_parsing_is_rejected() {
        let mut uploader = ready();
        let _ticket = uploader.begin_check().unwrap();
        assert_matches!(
            uploader.select_file(SelectedFile::from_path("other.csv")),
            Err(CoreError::InvalidTransition {
                state: UploaderState::Parsing,
                ..
            })
        );
    }

    #[test]
    fn result_after_reset_is_stale() {
        let mut uploader = ready();
        let ticket = uploader.begin_check().unwrap();
        assert_eq!(ticket.cycle(), 1);
        assert_eq!(ticket.file().name, "people.csv");
        uploader.reset();
        let parsed = CsvParser::new().parse(GOOD);
        assert_matches!(
            uploader.finish_check(ticket, parsed),
            Err(CoreError::StaleCheck { .. })
        );
        assert_eq!(uploader.state(), UploaderState::Idle);
        assert!(uploader.rows().is_empty());
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut uploader = ready();
        uploader.check_bytes(GOOD).unwrap();
        uploader.reset();
        assert_eq!(uploader.state(), UploaderState::Idle);
        assert!(uploader.selected_file().is_none());
        assert_eq!(uploader.outcome(), &ValidationOutcome::default());
        assert!(!uploader.show_reset());
    }

    #[test]
    fn new_check_replaces_previous_rows() {
        let mut uploader = ready();
        uploader.check_bytes(GOOD).unwrap();
        uploader
            .check_bytes(b"name,email,age\nBo,b@c.de,1\nCy,,2\n")
            .unwrap();
        let names: Vec<&str> = uploader.rows().iter().map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["Bo", "Cy"]);
    }

    #[test]
    fn valid_then_invalid_clears_table() {
        let mut uploader = ready();
        uploader.check_bytes(GOOD).unwrap();
        uploader.check_bytes(BAD_ROW).unwrap();
        assert!(uploader.rows().is_empty());
        assert!(!uploader.is_valid());
    }

    #[test]
    fn selecting_a_new_file_clears_outcome() {
        let mut uploader = ready();
        uploader.check_bytes(GOOD).unwrap();
        uploader.select_file(SelectedFile::from_path("next.csv")).unwrap();
        assert_eq!(uploader.state(), UploaderState::FileSelected);
        assert!(uploader.rows().is_empty());
        assert!(uploader.show_reset());
    }

    #[test]
    fn csv_extension_detection() {
        assert!(SelectedFile::from_path("a.csv").has_csv_extension());
        assert!(SelectedFile::from_path("dir/A.CSV").has_csv_extension());
        assert!(!SelectedFile::from_path("a.txt").has_csv_extension());
        assert!(!SelectedFile::from_path("csv").has_csv_extension());
    }

    #[test]
    fn file_name_is_last_component() {
        let file = SelectedFile::from_path("/tmp/uploads/people.csv");
        assert_eq!(file.name, "people.csv");
    }

    #[test]
    fn state_display_matches_serde() {
        let json = serde_json::to_value(UploaderState::FileSelected).unwrap();
        assert_eq!(json, "file_selected");
        assert_eq!(UploaderState::FileSelected.to_string(), "file_selected");
    }
}
