//! Error types for the mediator lexicon.
//!
//! Live ingestion never fails: blank names and invalid weights are skipped.
//! Errors only arise at the persistence boundary, where a malformed file is
//! treated as corruption and an unwritable sink as an I/O failure.

use thiserror::Error;

/// A persisted record that does not parse into `(integer, name, weight)`.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The record does not split into exactly three tab-separated fields.
    #[error("line {line}: expected 3 tab-separated fields, found {found}")]
    FieldCount {
        /// Line of the record.
        line: usize,
        /// Number of fields actually present.
        found: usize,
    },

    /// The first field is not a signed 64-bit integer.
    #[error("line {line}: invalid entity id '{value}'")]
    InvalidEntityId {
        /// Line of the record.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// The third field is not a finite, non-negative number.
    #[error("line {line}: invalid weight '{value}'")]
    InvalidWeight {
        /// Line of the record.
        line: usize,
        /// The offending field.
        value: String,
    },

    /// The record bytes are not valid UTF-8.
    #[error("line {line}: record is not valid UTF-8")]
    InvalidUtf8 {
        /// Line of the record.
        line: usize,
    },
}

impl ParseError {
    /// Returns the line the error was found on.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::FieldCount { line, .. }
            | Self::InvalidEntityId { line, .. }
            | Self::InvalidWeight { line, .. }
            | Self::InvalidUtf8 { line } => *line,
        }
    }
}

/// Top-level error type for lexicon persistence.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// A persisted record is malformed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The underlying reader or writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored name cannot be written without breaking the record format.
    #[error("Name {name:?} contains a tab or newline and cannot be persisted")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// A load configuration is malformed or inconsistent.
    #[error("Invalid configuration: {message}")]
    Config {
        /// What is wrong with it.
        message: String,
    },
}

impl LexiconError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns true if this is a parse error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Result type alias for lexicon operations.
pub type LexiconResult<T> = Result<T, LexiconError>;
