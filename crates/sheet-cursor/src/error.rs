//! Error types for sheet access.

use thiserror::Error;

use crate::remote::RemoteError;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error(transparent)]
    Core(#[from] sheet_cursor_core::Error),

    #[error("Remote cursor error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Remote returned a {actual_rows}x{actual_cols} block for a {rows}x{cols} range")]
    MalformedBlock {
        rows: u32,
        cols: u32,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Sheet cursor is out of sync with the remote cursor after a failed call")]
    CursorDesynced,

    #[error("Sheet cursor is already in use")]
    CursorBusy,
}

pub type Result<T> = std::result::Result<T, SheetError>;
