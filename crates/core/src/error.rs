//! Error types for streamburn

use thiserror::Error;

/// Main error type for streamburn operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Grid shape mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    ShapeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{context}: {source}")]
    Processing {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error with processing context.
    ///
    /// The orchestrator uses this so a strategy-internal failure surfaces
    /// together with the strategy that produced it. Callers must treat any
    /// error as "no usable output produced".
    pub fn processing(context: impl Into<String>, source: Error) -> Self {
        Error::Processing {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias for streamburn operations
pub type Result<T> = std::result::Result<T, Error>;
