//! Range views over a sheet: tabular, horizontal, vertical and single cells.
//!
//! Indexing a range with integer keys and slices produces a narrower range.
//! The shape of the result follows from which axes were indexed with a
//! single integer:
//!
//! | row key | col key | result |
//! |---|---|---|
//! | index | index | [`Cell`] |
//! | index | slice | [`HorizontalRange`] |
//! | slice | index | [`VerticalRange`] |
//! | slice | slice | [`TabularRange`] |
//!
//! Reads and writes go through the sheet's shared cursor and issue one
//! remote block call per operation.

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use sheet_cursor_core::{
    normalize_index, normalize_slice, CellValue, Error, Key, Scalar, SheetAddress,
};

use crate::error::{Result, SheetError};
use crate::remote::RemoteCursor;
use crate::sheet::Sheet;

/// Resolve one key against an axis starting at `origin` with `length` cells.
///
/// Returns the absolute start, the count, and whether the key was a single index.
fn resolve(key: &Key, origin: u32, length: u32) -> Result<(u32, u32, bool)> {
    match key {
        Key::Index(index) => {
            let offset = normalize_index(*index, length)?;
            Ok((origin + offset, 1, true))
        }
        Key::Slice(slice) => {
            let (start, stop) = normalize_slice(slice, length)?;
            Ok((origin + start, stop.saturating_sub(start), false))
        }
    }
}

/// Address of a slice result; an empty slice can't be addressed
fn sub_address(row: u32, col: u32, row_count: u32, col_count: u32) -> Result<SheetAddress> {
    Ok(SheetAddress::new(row, col, row_count, col_count)?)
}

fn dimension_error(given: usize, supported: usize) -> SheetError {
    Error::Dimension { given, supported }.into()
}

/// A sheet plus an address: the part every range shape shares.
struct View<'s, R> {
    sheet: &'s Sheet<R>,
    address: SheetAddress,
}

impl<R> Clone for View<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for View<'_, R> {}

impl<'s, R: RemoteCursor> View<'s, R> {
    fn rows(&self) -> u32 {
        self.address.row_count()
    }

    fn cols(&self) -> u32 {
        self.address.col_count()
    }

    fn check_read<T>(&self, block: &[Vec<T>]) -> Result<()> {
        let ok = block.len() == self.rows() as usize
            && block.iter().all(|row| row.len() == self.cols() as usize);
        if ok {
            Ok(())
        } else {
            Err(SheetError::MalformedBlock {
                rows: self.rows(),
                cols: self.cols(),
                actual_rows: block.len(),
                actual_cols: block.first().map_or(0, Vec::len),
            })
        }
    }

    fn check_write<T>(&self, block: &[Vec<T>]) -> Result<()> {
        let actual_cols = block.first().map_or(0, Vec::len);
        let ok = block.len() == self.rows() as usize
            && block.iter().all(|row| row.len() == self.cols() as usize);
        if ok {
            Ok(())
        } else {
            Err(Error::ShapeMismatch {
                expected_rows: self.rows(),
                expected_cols: self.cols(),
                actual_rows: block.len(),
                actual_cols,
            }
            .into())
        }
    }

    fn read_values(&self) -> Result<Vec<Vec<Scalar>>> {
        let block = self.sheet.with_target(&self.address, |r| r.read_values())?;
        self.check_read(&block)?;
        Ok(block)
    }

    fn read_formulas(&self) -> Result<Vec<Vec<String>>> {
        let block = self.sheet.with_target(&self.address, |r| r.read_formulas())?;
        self.check_read(&block)?;
        Ok(block)
    }

    fn write_values(&self, block: Vec<Vec<CellValue>>) -> Result<()> {
        self.check_write(&block)?;
        let dates = self.sheet.date_system();
        let block: Vec<Vec<Scalar>> = block
            .iter()
            .map(|row| row.iter().map(|v| v.to_scalar(dates)).collect())
            .collect();
        tracing::debug!("Writing {} values to {}", self.address.cell_count(), self.address);
        self.sheet.with_target(&self.address, |r| r.write_values(&block))
    }

    fn write_formulas(&self, block: Vec<Vec<CellValue>>) -> Result<()> {
        self.check_write(&block)?;
        let dates = self.sheet.date_system();
        let block: Vec<Vec<String>> = block
            .iter()
            .map(|row| row.iter().map(|v| v.to_formula(dates)).collect())
            .collect();
        tracing::debug!("Writing {} formulas to {}", self.address.cell_count(), self.address);
        self.sheet.with_target(&self.address, |r| r.write_formulas(&block))
    }
}

fn collect_grid<I, Row, V>(rows: I) -> Vec<Vec<CellValue>>
where
    I: IntoIterator<Item = Row>,
    Row: IntoIterator<Item = V>,
    V: Into<CellValue>,
{
    rows.into_iter()
        .map(|row| row.into_iter().map(Into::into).collect())
        .collect()
}

fn collect_line<I, V>(values: I) -> Vec<CellValue>
where
    I: IntoIterator<Item = V>,
    V: Into<CellValue>,
{
    values.into_iter().map(Into::into).collect()
}

macro_rules! range_common {
    ($name:ident) => {
        impl<'s, R> $name<'s, R> {
            pub(crate) fn new(sheet: &'s Sheet<R>, address: SheetAddress) -> Self {
                Self {
                    view: View { sheet, address },
                }
            }

            /// Absolute address of the range
            pub fn address(&self) -> SheetAddress {
                self.view.address
            }

            /// The sheet the range belongs to
            pub fn sheet(&self) -> &'s Sheet<R> {
                self.view.sheet
            }
        }

        impl<R> Clone for $name<'_, R> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<R> Copy for $name<'_, R> {}

        impl<R> fmt::Display for $name<'_, R> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.view.address)
            }
        }

        impl<R> fmt::Debug for $name<'_, R> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "<{}: '{}'>", stringify!($name), self.view.address)
            }
        }
    };
}

/// A block of cells spanning several rows and columns
pub struct TabularRange<'s, R> {
    view: View<'s, R>,
}

/// Cells in one row
pub struct HorizontalRange<'s, R> {
    view: View<'s, R>,
}

/// Cells in one column
pub struct VerticalRange<'s, R> {
    view: View<'s, R>,
}

/// A single cell
pub struct Cell<'s, R> {
    view: View<'s, R>,
}

range_common!(TabularRange);
range_common!(HorizontalRange);
range_common!(VerticalRange);
range_common!(Cell);

impl<'s, R: RemoteCursor> TabularRange<'s, R> {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.view.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index or slice by row and column
    pub fn get(&self, row: impl Into<Key>, col: impl Into<Key>) -> Result<Range<'s, R>> {
        let address = self.view.address;
        let (row, row_count, single_row) = resolve(&row.into(), address.row(), address.row_count())?;
        let (col, col_count, single_col) = resolve(&col.into(), address.col(), address.col_count())?;
        let address = sub_address(row, col, row_count, col_count)?;

        let sheet = self.view.sheet;
        Ok(match (single_row, single_col) {
            (true, true) => Range::Cell(Cell::new(sheet, address)),
            (true, false) => Range::Horizontal(HorizontalRange::new(sheet, address)),
            (false, true) => Range::Vertical(VerticalRange::new(sheet, address)),
            (false, false) => Range::Tabular(TabularRange::new(sheet, address)),
        })
    }

    /// Index or slice by row; all columns are kept
    pub fn get_row(&self, row: impl Into<Key>) -> Result<Range<'s, R>> {
        self.get(row, Key::full())
    }

    /// Index with one key (rows) or two keys (rows, columns)
    pub fn get_keys(&self, keys: &[Key]) -> Result<Range<'s, R>> {
        match keys {
            [row] => self.get_row(*row),
            [row, col] => self.get(*row, *col),
            _ => Err(dimension_error(keys.len(), 2)),
        }
    }

    /// Read values as rows of scalars
    pub fn values(&self) -> Result<Vec<Vec<Scalar>>> {
        self.view.read_values()
    }

    /// Write values from rows of cell values; the shape must match the range
    pub fn set_values<I, Row, V>(&self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
        Row: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.view.write_values(collect_grid(rows))
    }

    /// Read formulas as rows of text; cells without a formula give their value
    pub fn formulas(&self) -> Result<Vec<Vec<String>>> {
        self.view.read_formulas()
    }

    /// Write formulas (or plain values) from rows of cell values
    pub fn set_formulas<I, Row, V>(&self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = Row>,
        Row: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.view.write_formulas(collect_grid(rows))
    }
}

impl<'s, R: RemoteCursor> HorizontalRange<'s, R> {
    /// Number of columns
    pub fn len(&self) -> usize {
        self.view.cols() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index or slice along the row
    pub fn get(&self, key: impl Into<Key>) -> Result<Range<'s, R>> {
        let address = self.view.address;
        let (col, col_count, single) = resolve(&key.into(), address.col(), address.col_count())?;
        let address = sub_address(address.row(), col, address.row_count(), col_count)?;

        let sheet = self.view.sheet;
        Ok(if single {
            Range::Cell(Cell::new(sheet, address))
        } else {
            Range::Horizontal(HorizontalRange::new(sheet, address))
        })
    }

    pub fn values(&self) -> Result<Vec<Scalar>> {
        Ok(self.view.read_values()?.into_iter().flatten().collect())
    }

    pub fn set_values<I, V>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.view.write_values(vec![collect_line(values)])
    }

    pub fn formulas(&self) -> Result<Vec<String>> {
        Ok(self.view.read_formulas()?.into_iter().flatten().collect())
    }

    pub fn set_formulas<I, V>(&self, formulas: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        self.view.write_formulas(vec![collect_line(formulas)])
    }
}

impl<'s, R: RemoteCursor> VerticalRange<'s, R> {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.view.rows() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index or slice along the column
    pub fn get(&self, key: impl Into<Key>) -> Result<Range<'s, R>> {
        let address = self.view.address;
        let (row, row_count, single) = resolve(&key.into(), address.row(), address.row_count())?;
        let address = sub_address(row, address.col(), row_count, address.col_count())?;

        let sheet = self.view.sheet;
        Ok(if single {
            Range::Cell(Cell::new(sheet, address))
        } else {
            Range::Vertical(VerticalRange::new(sheet, address))
        })
    }

    pub fn values(&self) -> Result<Vec<Scalar>> {
        Ok(self.view.read_values()?.into_iter().flatten().collect())
    }

    pub fn set_values<I, V>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let column = collect_line(values).into_iter().map(|v| vec![v]).collect();
        self.view.write_values(column)
    }

    pub fn formulas(&self) -> Result<Vec<String>> {
        Ok(self.view.read_formulas()?.into_iter().flatten().collect())
    }

    pub fn set_formulas<I, V>(&self, formulas: I) -> Result<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let column = collect_line(formulas).into_iter().map(|v| vec![v]).collect();
        self.view.write_formulas(column)
    }
}

impl<'s, R: RemoteCursor> Cell<'s, R> {
    /// Read the cell's value
    pub fn value(&self) -> Result<Scalar> {
        let block = self.view.read_values()?;
        Ok(block.into_iter().flatten().next().unwrap_or_default())
    }

    /// Write a value; `None`/[`CellValue::Empty`] clears the cell
    pub fn set_value(&self, value: impl Into<CellValue>) -> Result<()> {
        self.view.write_values(vec![vec![value.into()]])
    }

    /// Read the cell's formula, or its value as text when it has none
    pub fn formula(&self) -> Result<String> {
        let block = self.view.read_formulas()?;
        Ok(block.into_iter().flatten().next().unwrap_or_default())
    }

    /// Write a formula; text starting with `=` is a formula, anything else a value
    pub fn set_formula(&self, formula: impl Into<CellValue>) -> Result<()> {
        self.view.write_formulas(vec![vec![formula.into()]])
    }

    /// Read the cell's number as a date and time; `None` if it holds no number
    pub fn date(&self) -> Result<Option<NaiveDateTime>> {
        let dates = self.view.sheet.date_system();
        Ok(self
            .value()?
            .as_number()
            .and_then(|n| dates.number_to_datetime(n)))
    }

    /// Read the cell's number as a time of day; `None` if it holds no number
    pub fn time(&self) -> Result<Option<NaiveTime>> {
        let dates = self.view.sheet.date_system();
        Ok(self
            .value()?
            .as_number()
            .and_then(|n| dates.number_to_time(n)))
    }
}

/// Any range shape, as produced by indexing.
pub enum Range<'s, R> {
    Tabular(TabularRange<'s, R>),
    Horizontal(HorizontalRange<'s, R>),
    Vertical(VerticalRange<'s, R>),
    Cell(Cell<'s, R>),
}

impl<R> Clone for Range<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Range<'_, R> {}

impl<'s, R: RemoteCursor> Range<'s, R> {
    /// Absolute address of the range
    pub fn address(&self) -> SheetAddress {
        match self {
            Range::Tabular(r) => r.address(),
            Range::Horizontal(r) => r.address(),
            Range::Vertical(r) => r.address(),
            Range::Cell(r) => r.address(),
        }
    }

    /// Length along the range's first indexable axis (1 for a cell)
    pub fn len(&self) -> usize {
        match self {
            Range::Tabular(r) => r.len(),
            Range::Horizontal(r) => r.len(),
            Range::Vertical(r) => r.len(),
            Range::Cell(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index with as many keys as the shape has free axes
    pub fn get_keys(&self, keys: &[Key]) -> Result<Range<'s, R>> {
        match (self, keys) {
            (Range::Tabular(r), _) => r.get_keys(keys),
            (Range::Horizontal(r), [key]) => r.get(*key),
            (Range::Vertical(r), [key]) => r.get(*key),
            (Range::Horizontal(_) | Range::Vertical(_), _) => Err(dimension_error(keys.len(), 1)),
            (Range::Cell(_), _) => Err(dimension_error(keys.len(), 0)),
        }
    }

    /// Name of the shape
    pub fn kind(&self) -> &'static str {
        match self {
            Range::Tabular(_) => "TabularRange",
            Range::Horizontal(_) => "HorizontalRange",
            Range::Vertical(_) => "VerticalRange",
            Range::Cell(_) => "Cell",
        }
    }

    /// Read values as rows of scalars, whatever the shape
    pub fn values_grid(&self) -> Result<Vec<Vec<Scalar>>> {
        match self {
            Range::Tabular(r) => r.view.read_values(),
            Range::Horizontal(r) => r.view.read_values(),
            Range::Vertical(r) => r.view.read_values(),
            Range::Cell(r) => r.view.read_values(),
        }
    }

    /// Write values from rows of cell values, whatever the shape
    pub fn set_values_grid(&self, rows: Vec<Vec<CellValue>>) -> Result<()> {
        match self {
            Range::Tabular(r) => r.view.write_values(rows),
            Range::Horizontal(r) => r.view.write_values(rows),
            Range::Vertical(r) => r.view.write_values(rows),
            Range::Cell(r) => r.view.write_values(rows),
        }
    }

    pub fn into_tabular(self) -> Option<TabularRange<'s, R>> {
        match self {
            Range::Tabular(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_horizontal(self) -> Option<HorizontalRange<'s, R>> {
        match self {
            Range::Horizontal(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_vertical(self) -> Option<VerticalRange<'s, R>> {
        match self {
            Range::Vertical(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_cell(self) -> Option<Cell<'s, R>> {
        match self {
            Range::Cell(r) => Some(r),
            _ => None,
        }
    }
}

impl<R> fmt::Display for Range<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Tabular(r) => fmt::Display::fmt(r, f),
            Range::Horizontal(r) => fmt::Display::fmt(r, f),
            Range::Vertical(r) => fmt::Display::fmt(r, f),
            Range::Cell(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl<R> fmt::Debug for Range<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Tabular(r) => fmt::Debug::fmt(r, f),
            Range::Horizontal(r) => fmt::Debug::fmt(r, f),
            Range::Vertical(r) => fmt::Debug::fmt(r, f),
            Range::Cell(r) => fmt::Debug::fmt(r, f),
        }
    }
}
