//! Error types for sheet-cursor-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sheet-cursor-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An index or slice bound is not an integer
    #[error("Cell indices must be integers, {0:?} given")]
    IndexType(String),

    /// A resolved index falls outside `[0, length)`
    #[error("Cell index {index} out of range (length: {length})")]
    IndexOutOfRange { index: i64, length: u32 },

    /// The request is well formed but uses a feature that is not implemented
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// Indexing used a number of keys the range shape does not have
    #[error("Cell range has {supported} dimension(s), {given} key(s) given")]
    Dimension { given: usize, supported: usize },

    /// A slice resolved to zero rows or columns
    #[error("Empty cell range: {0}")]
    EmptyRange(String),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid value type for a cell value or formula
    #[error("Invalid value type: expected {expected}, got {actual}")]
    InvalidValueType {
        expected: &'static str,
        actual: &'static str,
    },

    /// A block written to a range does not match the range's shape
    #[error("Shape mismatch: range is {expected_rows}x{expected_cols}, block is {actual_rows}x{actual_cols}")]
    ShapeMismatch {
        expected_rows: u32,
        expected_cols: u32,
        actual_rows: usize,
        actual_cols: usize,
    },
}
