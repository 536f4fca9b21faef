//! Error types for notes parsing.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading and parsing a notes file.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read the notes file.
    #[error("Failed to read notes: {0}")]
    IoError(#[from] std::io::Error),

    /// A line is neither a slide header nor a content line under one.
    #[error("Parsing error in line {line}:\n>>> {text}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// The raw line as it appeared in the input.
        text: String,
    },
}

impl Error {
    /// Line number of a parse failure, if this is one.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Error::MalformedLine { line, .. } => Some(*line),
            Error::IoError(_) => None,
        }
    }
}
