//! Error types for unnotion library.

use std::io;
use thiserror::Error;

/// Result type alias for unnotion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading, fetching or rendering documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not valid JSON or does not match the block/page shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A block payload lacks a field its formatting rule requires.
    #[error("Block {block_id} is missing required field `{field}`")]
    MissingField {
        /// Id of the offending block
        block_id: String,
        /// Name of the missing field
        field: &'static str,
    },

    /// A table contains a child that is not a table row.
    #[error("Table child {block_id} is not a table row")]
    MalformedTable {
        /// Id of the offending child block
        block_id: String,
    },

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or error message
        message: String,
    },

    /// Transport-level HTTP failure.
    #[cfg(feature = "fetch")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Id of the block that caused the error, if any.
    pub fn block_id(&self) -> Option<&str> {
        match self {
            Error::MissingField { block_id, .. } | Error::MalformedTable { block_id } => {
                Some(block_id)
            }
            _ => None,
        }
    }
}
