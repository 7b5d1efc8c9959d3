//! Error types for runoff modelling

use thiserror::Error;

/// Main error type for grid and routing operations.
///
/// Every variant raised by the routing core describes a structural problem
/// (bad input shape, broken invariant). None of them are transient.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: String,
    },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: isize,
        col: isize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("Flow direction at ({row}, {col}) already assigned (code {existing})")]
    DuplicateAssignment { row: usize, col: usize, existing: i32 },

    #[error("Invalid flow direction code {code} at ({row}, {col})")]
    InvalidDirectionCode { row: usize, col: usize, code: i32 },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Tiff(e.to_string())
    }
}

/// Result type alias for runoff operations
pub type Result<T> = std::result::Result<T, Error>;
