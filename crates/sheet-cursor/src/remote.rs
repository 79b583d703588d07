//! The remote cursor collaborator.
//!
//! A remote cursor is a movable, resizable selection living in the
//! spreadsheet process (`com.sun.star.sheet.XSheetCellCursor` in
//! LibreOffice). Every method is a blocking round trip; block reads and
//! writes address whatever rectangle the cursor currently covers.

use std::fmt;

use sheet_cursor_core::{CellRangeAddress, Scalar};
use thiserror::Error;

/// What went wrong on the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorKind {
    /// A move or resize would leave the sheet
    OutOfBounds,
    /// The call was rejected for its arguments (e.g. a block of the wrong shape)
    InvalidArgument,
    /// The connection to the remote process failed
    Transport,
}

impl fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteErrorKind::OutOfBounds => "out of bounds",
            RemoteErrorKind::InvalidArgument => "invalid argument",
            RemoteErrorKind::Transport => "transport",
        })
    }
}

/// A failure reported by the remote cursor, with its message preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::OutOfBounds, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::InvalidArgument, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Transport, message)
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Operations offered by a remote sheet cursor.
pub trait RemoteCursor {
    /// The rectangle the cursor currently covers (`getRangeAddress`).
    fn range_address(&mut self) -> RemoteResult<CellRangeAddress>;

    /// Move the cursor without changing its size (`gotoOffset`).
    fn move_by(&mut self, delta_cols: i64, delta_rows: i64) -> RemoteResult<()>;

    /// Resize the cursor, keeping its top-left corner (`collapseToSize`).
    fn resize_to(&mut self, cols: u32, rows: u32) -> RemoteResult<()>;

    /// Read the covered block as values (`getDataArray`).
    fn read_values(&mut self) -> RemoteResult<Vec<Vec<Scalar>>>;

    /// Write values into the covered block (`setDataArray`).
    fn write_values(&mut self, block: &[Vec<Scalar>]) -> RemoteResult<()>;

    /// Read the covered block as formulas (`getFormulaArray`).
    fn read_formulas(&mut self) -> RemoteResult<Vec<Vec<String>>>;

    /// Write formulas into the covered block (`setFormulaArray`).
    fn write_formulas(&mut self, block: &[Vec<String>]) -> RemoteResult<()>;
}

impl<R: RemoteCursor + ?Sized> RemoteCursor for Box<R> {
    fn range_address(&mut self) -> RemoteResult<CellRangeAddress> {
        (**self).range_address()
    }

    fn move_by(&mut self, delta_cols: i64, delta_rows: i64) -> RemoteResult<()> {
        (**self).move_by(delta_cols, delta_rows)
    }

    fn resize_to(&mut self, cols: u32, rows: u32) -> RemoteResult<()> {
        (**self).resize_to(cols, rows)
    }

    fn read_values(&mut self) -> RemoteResult<Vec<Vec<Scalar>>> {
        (**self).read_values()
    }

    fn write_values(&mut self, block: &[Vec<Scalar>]) -> RemoteResult<()> {
        (**self).write_values(block)
    }

    fn read_formulas(&mut self) -> RemoteResult<Vec<Vec<String>>> {
        (**self).read_formulas()
    }

    fn write_formulas(&mut self, block: &[Vec<String>]) -> RemoteResult<()> {
        (**self).write_formulas(block)
    }
}
