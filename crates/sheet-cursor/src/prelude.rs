//! Prelude module - common imports for sheet-cursor users
//!
//! ```rust
//! use sheet_cursor::prelude::*;
//! ```

// Sheet
pub use crate::{Sheet, SheetConfig};

// Ranges
pub use crate::{Cell, HorizontalRange, Range, TabularRange, VerticalRange};

// Addressing
pub use crate::{Key, SheetAddress, SheetPosition, Slice, DEFAULT_COLS, DEFAULT_ROWS};

// Values
pub use crate::{CellValue, DateSystem, NameGenerator, Scalar};

// Collaborators
pub use crate::{MemoryCursor, RemoteCursor};

// Errors
pub use crate::SheetError;
