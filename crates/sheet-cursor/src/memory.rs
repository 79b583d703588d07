//! In-memory remote cursor.
//!
//! [`MemoryCursor`] behaves like a LibreOffice sheet cell cursor over a
//! sparse grid: moves and resizes that would leave the sheet are rejected,
//! block I/O addresses the covered rectangle, and every call is recorded so
//! round trips can be counted. Formulas are stored verbatim, not evaluated.

use ahash::AHashMap;
use sheet_cursor_core::{CellRangeAddress, Scalar};

use crate::remote::{RemoteCursor, RemoteError, RemoteErrorKind, RemoteResult};

/// One call made against a [`MemoryCursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCall {
    RangeAddress,
    MoveBy { delta_cols: i64, delta_rows: i64 },
    ResizeTo { cols: u32, rows: u32 },
    ReadValues,
    WriteValues,
    ReadFormulas,
    WriteFormulas,
}

impl CursorCall {
    /// Whether this call moves or resizes the cursor
    pub fn is_primitive(&self) -> bool {
        matches!(self, CursorCall::MoveBy { .. } | CursorCall::ResizeTo { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Value(Scalar),
    Formula(String),
}

/// A sheet held in memory, reached through one cursor.
#[derive(Debug, Clone)]
pub struct MemoryCursor {
    rows: u32,
    cols: u32,
    /// (row, col, row_count, col_count)
    cursor: (u32, u32, u32, u32),
    cells: AHashMap<(u32, u32), Content>,
    calls: Vec<CursorCall>,
    /// Calls left to succeed, and the failure after them
    fail_at: Option<(usize, RemoteErrorKind)>,
}

impl MemoryCursor {
    /// Create a sheet of `rows` x `cols` cells with the cursor covering all of it.
    ///
    /// Zero dimensions are raised to one.
    pub fn new(rows: u32, cols: u32) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            cursor: (0, 0, rows, cols),
            cells: AHashMap::new(),
            calls: Vec::new(),
            fail_at: None,
        }
    }

    /// Sheet dimensions as (rows, cols)
    pub fn size(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// The covered rectangle as (row, col, row_count, col_count)
    pub fn cursor(&self) -> (u32, u32, u32, u32) {
        self.cursor
    }

    /// Every call made so far
    pub fn calls(&self) -> &[CursorCall] {
        &self.calls
    }

    /// Moves and resizes made so far
    pub fn primitive_calls(&self) -> impl Iterator<Item = &CursorCall> {
        self.calls.iter().filter(|call| call.is_primitive())
    }

    /// Forget recorded calls
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Make the next call fail with the given kind
    pub fn fail_next(&mut self, kind: RemoteErrorKind) {
        self.fail_after(0, kind);
    }

    /// Let `calls` more calls succeed, then fail the one after with the given kind
    pub fn fail_after(&mut self, calls: usize, kind: RemoteErrorKind) {
        self.fail_at = Some((calls, kind));
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell holds anything
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn record(&mut self, call: CursorCall) -> RemoteResult<()> {
        self.calls.push(call);
        match self.fail_at.take() {
            Some((0, kind)) => Err(RemoteError::new(kind, "injected failure")),
            Some((left, kind)) => {
                self.fail_at = Some((left - 1, kind));
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn check_block<T>(&self, block: &[Vec<T>]) -> RemoteResult<()> {
        let (_, _, rows, cols) = self.cursor;
        let shape_ok = block.len() == rows as usize && block.iter().all(|r| r.len() == cols as usize);
        if shape_ok {
            Ok(())
        } else {
            Err(RemoteError::invalid_argument(format!(
                "block does not match the {}x{} selection",
                rows, cols
            )))
        }
    }

    fn covered(&self) -> impl Iterator<Item = impl Iterator<Item = (u32, u32)>> {
        let (row, col, row_count, col_count) = self.cursor;
        (row..row + row_count).map(move |r| (col..col + col_count).map(move |c| (r, c)))
    }

    fn store(&mut self, at: (u32, u32), content: Option<Content>) {
        match content {
            Some(content) => {
                self.cells.insert(at, content);
            }
            None => {
                self.cells.remove(&at);
            }
        }
    }
}

/// Interpret formula text the way a cell does on assignment
fn parse_formula(text: &str) -> Option<Content> {
    if text.is_empty() {
        None
    } else if text.starts_with('=') {
        Some(Content::Formula(text.to_string()))
    } else if let Ok(n) = text.trim().parse::<f64>() {
        Some(Content::Value(Scalar::Number(n)))
    } else {
        Some(Content::Value(Scalar::Text(text.to_string())))
    }
}

impl RemoteCursor for MemoryCursor {
    fn range_address(&mut self) -> RemoteResult<CellRangeAddress> {
        self.record(CursorCall::RangeAddress)?;
        let (row, col, row_count, col_count) = self.cursor;
        Ok(CellRangeAddress {
            sheet: 0,
            start_col: col,
            start_row: row,
            end_col: col + col_count - 1,
            end_row: row + row_count - 1,
        })
    }

    fn move_by(&mut self, delta_cols: i64, delta_rows: i64) -> RemoteResult<()> {
        self.record(CursorCall::MoveBy {
            delta_cols,
            delta_rows,
        })?;

        let (row, col, row_count, col_count) = self.cursor;
        let new_row = i64::from(row) + delta_rows;
        let new_col = i64::from(col) + delta_cols;
        if new_row < 0
            || new_col < 0
            || new_row + i64::from(row_count) > i64::from(self.rows)
            || new_col + i64::from(col_count) > i64::from(self.cols)
        {
            return Err(RemoteError::out_of_bounds(format!(
                "moving {}x{} selection to row {}, column {}",
                row_count, col_count, new_row, new_col
            )));
        }

        self.cursor = (new_row as u32, new_col as u32, row_count, col_count);
        Ok(())
    }

    fn resize_to(&mut self, cols: u32, rows: u32) -> RemoteResult<()> {
        self.record(CursorCall::ResizeTo { cols, rows })?;

        let (row, col, _, _) = self.cursor;
        if rows == 0
            || cols == 0
            || u64::from(row) + u64::from(rows) > u64::from(self.rows)
            || u64::from(col) + u64::from(cols) > u64::from(self.cols)
        {
            return Err(RemoteError::out_of_bounds(format!(
                "resizing selection at row {}, column {} to {}x{}",
                row, col, rows, cols
            )));
        }

        self.cursor = (row, col, rows, cols);
        Ok(())
    }

    fn read_values(&mut self) -> RemoteResult<Vec<Vec<Scalar>>> {
        self.record(CursorCall::ReadValues)?;
        Ok(self
            .covered()
            .map(|row| {
                row.map(|at| match self.cells.get(&at) {
                    Some(Content::Value(v)) => v.clone(),
                    Some(Content::Formula(f)) => Scalar::Text(f.clone()),
                    None => Scalar::Empty,
                })
                .collect()
            })
            .collect())
    }

    fn write_values(&mut self, block: &[Vec<Scalar>]) -> RemoteResult<()> {
        self.record(CursorCall::WriteValues)?;
        self.check_block(block)?;

        let (row, col, _, _) = self.cursor;
        for (r, values) in (row..).zip(block) {
            for (c, value) in (col..).zip(values) {
                let content = (!value.is_empty()).then(|| Content::Value(value.clone()));
                self.store((r, c), content);
            }
        }
        Ok(())
    }

    fn read_formulas(&mut self) -> RemoteResult<Vec<Vec<String>>> {
        self.record(CursorCall::ReadFormulas)?;
        Ok(self
            .covered()
            .map(|row| {
                row.map(|at| match self.cells.get(&at) {
                    Some(Content::Value(v)) => v.to_string(),
                    Some(Content::Formula(f)) => f.clone(),
                    None => String::new(),
                })
                .collect()
            })
            .collect())
    }

    fn write_formulas(&mut self, block: &[Vec<String>]) -> RemoteResult<()> {
        self.record(CursorCall::WriteFormulas)?;
        self.check_block(block)?;

        let (row, col, _, _) = self.cursor;
        for (r, formulas) in (row..).zip(block) {
            for (c, formula) in (col..).zip(formulas) {
                self.store((r, c), parse_formula(formula));
            }
        }
        Ok(())
    }
}
