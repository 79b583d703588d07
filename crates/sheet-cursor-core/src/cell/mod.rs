//! Cell-related types and utilities
//!
//! This module contains:
//! - [`SheetAddress`] - A rectangular block of cells (e.g., "$B$11:$F$20")
//! - [`CellRangeAddress`] - The corner-based range descriptor used by remote cursors
//! - [`CellValue`] - A value written to a cell
//! - [`Scalar`] - A value exchanged with the remote cell array

mod address;
mod value;

pub use address::{
    column_index, column_name, row_index, row_name, CellRangeAddress, SheetAddress,
};
pub use value::{CellValue, Scalar};
