//! Error types for the data-loader crate.

use thiserror::Error;

/// Errors that can occur while loading and validating a movie catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("Catalog file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read catalog: {0}")]
    IoError(#[from] std::io::Error),

    /// A document in the catalog file couldn't be parsed
    ///
    /// `line` is 1-based for JSON-lines files and the JSON parser's line
    /// for array files.
    #[error("Malformed document at {file}:{line}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A document field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same movie id appears twice in one catalog file
    #[error("Duplicate movie id {id} at line {line}")]
    DuplicateId { id: String, line: usize },

    /// The loaded catalog is inconsistent (e.g. index out of sync)
    #[error("Catalog validation failed: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DataLoadError>;
