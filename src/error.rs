//! Error types for reading inputs and checking pipeline outputs.
//!
//! Matching, mining and selection never fail; everything here comes from
//! the I/O adapters or from a pipeline-level sanity check.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: vertex or edge declared before any graph header")]
    MissingGraphHeader { line: usize },

    #[error("malformed array file: {0}")]
    Npy(String),

    #[error("unsupported array element type {0:?}")]
    UnsupportedElementType(String),

    #[error("feature value {value} at ({row}, {col}) is not 0 or 1")]
    NonBinaryValue { row: usize, col: usize, value: i64 },

    #[error("feature dimension mismatch: expected {expected} columns, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("expected {expected} fragments, found {found}")]
    FragmentCount { expected: usize, found: usize },

    #[error("graph database is empty")]
    EmptyDatabase,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
