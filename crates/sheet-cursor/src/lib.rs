//! # sheet-cursor
//!
//! Index, slice and bulk-read a remote spreadsheet sheet through one cursor.
//!
//! Spreadsheet servers such as LibreOffice Calc are reached through slow
//! round trips, and asking for a fresh cell range per access is the most
//! expensive call there is. This crate keeps a single cell cursor per sheet
//! and moves or resizes it over whatever rectangle is being read or written.
//!
//! ## Features
//!
//! - Indexing with negative indices and `start..stop` slices
//! - Range shapes that follow the indexing: tabular, horizontal, vertical, cell
//! - One remote block call per bulk read or write
//! - Cursor repositioning that never lets the selection leave the sheet
//! - Date and time values coerced through the document's null date
//!
//! ## Architecture
//!
//! ```text
//! Sheet ── RefCell<SheetCursor<R>> ── R: RemoteCursor (LibreOffice, MemoryCursor, ...)
//!   │
//!   └── TabularRange / HorizontalRange / VerticalRange / Cell   (borrow &Sheet)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sheet_cursor::prelude::*;
//!
//! let sheet = Sheet::new(MemoryCursor::new(DEFAULT_ROWS, DEFAULT_COLS)).unwrap();
//!
//! let block = sheet.get(10..20, 1..6).unwrap();
//! assert_eq!(block.to_string(), "$B$11:$F$20");
//!
//! let inner = block.get_keys(&[Key::from(1..9), Key::from(1..4)]).unwrap();
//! assert_eq!(inner.to_string(), "$C$12:$E$19");
//!
//! let cell = sheet.get(0, 0).unwrap().into_cell().unwrap();
//! cell.set_value(42.0).unwrap();
//! assert_eq!(cell.value().unwrap(), Scalar::Number(42.0));
//! ```

pub mod cursor;
pub mod error;
pub mod memory;
pub mod prelude;
pub mod range;
pub mod remote;
pub mod sheet;

pub use cursor::{CursorState, SheetCursor};
pub use error::{Result, SheetError};
pub use memory::{CursorCall, MemoryCursor};
pub use range::{Cell, HorizontalRange, Range, TabularRange, VerticalRange};
pub use remote::{RemoteCursor, RemoteError, RemoteErrorKind, RemoteResult};
pub use sheet::{Sheet, SheetConfig};

// Re-export core types
pub use sheet_cursor_core::{
    column_index, column_name, normalize_index, normalize_slice, parse_keys, row_index, row_name,
    CellRangeAddress, CellValue, DateSystem, Key, NameGenerator, Scalar, SheetAddress,
    SheetPosition, Slice, DEFAULT_COLS, DEFAULT_ROWS, MAX_NAME_LEN,
};
