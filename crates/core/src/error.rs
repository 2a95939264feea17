use crate::uploader::UploaderState;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("A check is already in progress")]
    Busy,

    #[error("No file selected")]
    NoFileSelected,

    #[error("Check result belongs to cycle {ticket}, current cycle is {current}")]
    StaleCheck { ticket: u64, current: u64 },

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: UploaderState,
    },
}

/// Failure reported by the CSV parser or while reading the input stream.
///
/// The message is surfaced verbatim after the `Error parsing CSV file: `
/// prefix, so it should read well on its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}
