//! # sheet-cursor-core
//!
//! Pure value layer for the sheet-cursor library.
//!
//! This crate provides the types that do not talk to a remote spreadsheet:
//! - [`column_name`] / [`row_name`] - Spreadsheet column and row notation
//! - [`Key`], [`normalize_index`], [`normalize_slice`] - Index keys with negative indices
//! - [`SheetAddress`] and [`SheetPosition`] - Logical and physical rectangles
//! - [`CellValue`] and [`Scalar`] - Values written to and read from cells
//! - [`DateSystem`] - Conversion between dates and the document's day numbers
//! - [`NameGenerator`] - Unique, sanitized labels for sheets and objects
//!
//! ## Example
//!
//! ```rust
//! use sheet_cursor_core::{column_name, normalize_index, SheetAddress};
//!
//! assert_eq!(column_name(26), "AA");
//!
//! // Negative indices count from the end of the axis
//! let row = normalize_index(-1, 1_048_576).unwrap();
//! let col = normalize_index(-1, 1_024).unwrap();
//! let address = SheetAddress::cell(row, col);
//! assert_eq!(address.to_string(), "$AMJ$1048576");
//! ```

pub mod cell;
pub mod date;
pub mod error;
pub mod index;
pub mod naming;
pub mod position;

// Re-exports for convenience
pub use cell::{
    column_index, column_name, row_index, row_name, CellRangeAddress, CellValue, Scalar,
    SheetAddress,
};
pub use date::DateSystem;
pub use error::{Error, Result};
pub use index::{normalize_index, normalize_slice, parse_keys, Key, Slice};
pub use naming::NameGenerator;
pub use position::SheetPosition;

/// Number of rows in a LibreOffice Calc sheet
pub const DEFAULT_ROWS: u32 = 1_048_576;

/// Number of columns in a LibreOffice Calc sheet
pub const DEFAULT_COLS: u32 = 1_024;

/// Maximum length of a generated sheet or object name
pub const MAX_NAME_LEN: usize = 31;
