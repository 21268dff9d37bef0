//! Error types for the exonic library.

use thiserror::Error;

/// Errors that can occur while parsing GenBank records or resolving locations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A record could not be parsed.
    #[error("{0}")]
    Parse(String),

    /// A feature location expression violates the location grammar.
    /// `near` holds the text starting where the scan failed.
    #[error("invalid location '{expression}': {reason} near '{near}'")]
    Location {
        expression: String,
        near: String,
        reason: String,
    },

    /// A feature entry that could not be read. `source` keeps the
    /// underlying error, e.g. a [`Error::Location`] for a bad location.
    #[error("feature '{name}' at '{line}': {source}")]
    Feature {
        name: String,
        line: String,
        source: Box<Error>,
    },

    /// Coordinates that do not fit the sequence they refer to.
    #[error("{0}")]
    Validation(String),
}
