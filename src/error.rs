use std::fmt::Display;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CsvError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Parse and decode error
pub enum CsvError {
    #[error("unexpected character {character:?} after quoted cell at byte {offset}")]
    CharacterAfterQuotedCell { character: char, offset: usize },

    #[error("unexpected end of input inside a quoted cell")]
    UnexpectedEndOfInput,

    #[error("input contains no rows")]
    EmptyInput,

    #[error("invalid escape sequence at byte {offset}")]
    CorruptedInput { offset: usize },

    #[error("row {row} has {actual} columns, expected {expected}")]
    ColumnCountMismatch {
        expected: usize,
        actual: usize,
        row: usize,
    },

    #[error("column '{key}' does not exist")]
    KeyNotFound { key: String },

    #[error("column names cannot be resolved because no header row is present")]
    NoHeaderAvailable,

    #[error("could not decode '{raw_text}' at {path} as {target_type}")]
    TypeMismatch {
        path: String,
        raw_text: String,
        target_type: &'static str,
    },

    #[error("no value left at {path} to decode as {target_type}")]
    ValueNotFound {
        path: String,
        target_type: &'static str,
    },

    #[error("cannot decode {attempted_shape} at {path}")]
    UnsupportedOperation {
        path: String,
        attempted_shape: &'static str,
    },

    #[error("invalid parser configuration: {0}")]
    InvalidConfiguration(String),

    #[error("{0}")]
    Message(String),
}

impl serde::de::Error for CsvError {
    fn custom<T: Display>(msg: T) -> Self {
        CsvError::Message(msg.to_string())
    }
}
