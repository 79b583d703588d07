//! Cursor positioning: moving one remote selection over arbitrary rectangles.
//!
//! Creating a remote cell range per access is expensive; moving and
//! resizing an existing cursor is cheap. [`SheetCursor`] keeps a local copy
//! of the cursor's rectangle so it can compute deltas without asking the
//! remote side, and issues only the primitive calls that change something.

use sheet_cursor_core::{Error as CoreError, SheetAddress};

use crate::error::{Result, SheetError};
use crate::remote::RemoteCursor;

/// The rectangle a remote cursor covers, plus the bounds it may never leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorState {
    pub row: u32,
    pub col: u32,
    pub row_count: u32,
    pub col_count: u32,
    /// Rows of the range the cursor was created over
    pub max_row_count: u32,
    /// Columns of the range the cursor was created over
    pub max_col_count: u32,
}

impl CursorState {
    /// Whether the cursor covers exactly the given rectangle
    pub fn covers(&self, row: u32, col: u32, row_count: u32, col_count: u32) -> bool {
        (self.row, self.col, self.row_count, self.col_count) == (row, col, row_count, col_count)
    }

    /// Whether a resize to the given size fits at the current anchor
    fn can_resize_in_place(&self, row_count: u32, col_count: u32) -> bool {
        fits(self.row, row_count, self.max_row_count) && fits(self.col, col_count, self.max_col_count)
    }
}

fn fits(start: u32, count: u32, max: u32) -> bool {
    u64::from(start) + u64::from(count) <= u64::from(max)
}

fn delta(from: u32, to: u32) -> i64 {
    i64::from(to) - i64::from(from)
}

/// The single cursor shared by everything that reads or writes one sheet.
#[derive(Debug)]
pub struct SheetCursor<R> {
    remote: R,
    state: CursorState,
    /// Set when a primitive failed; the local state can't be trusted
    stale: bool,
    resync: bool,
}

impl<R: RemoteCursor> SheetCursor<R> {
    /// Wrap a freshly created remote cursor.
    ///
    /// The cursor's initial rectangle (normally the whole sheet) also fixes
    /// the bounds it can be moved and resized within.
    pub fn new(remote: R) -> Result<Self> {
        Self::with_resync(remote, true)
    }

    /// Like [`new`](Self::new), choosing what happens after a failed primitive:
    /// with `resync` the next request re-reads the remote rectangle, without
    /// it every later request fails with [`SheetError::CursorDesynced`].
    pub fn with_resync(mut remote: R, resync: bool) -> Result<Self> {
        let range = remote.range_address()?;
        let extent = SheetAddress::from_range_address(&range)?;
        let bound = |end: u32| {
            end.checked_add(1).ok_or_else(|| {
                CoreError::InvalidAddress(format!("cursor over {} ends past the last index", extent))
            })
        };

        let state = CursorState {
            row: extent.row(),
            col: extent.col(),
            row_count: extent.row_count(),
            col_count: extent.col_count(),
            max_row_count: bound(extent.row_end())?,
            max_col_count: bound(extent.col_end())?,
        };
        tracing::debug!(
            "Created sheet cursor over {} ({}x{} max)",
            extent,
            state.max_row_count,
            state.max_col_count
        );

        Ok(Self {
            remote,
            state,
            stale: false,
            resync,
        })
    }

    /// The cursor's current rectangle as last requested
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Whether a failed primitive left the state untrusted
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Get a reference to the remote cursor.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Get a mutable reference to the remote cursor (for advanced operations).
    ///
    /// Moving the remote cursor directly bypasses the local state; call
    /// [`resync`](Self::resync) afterwards.
    pub fn remote_mut(&mut self) -> &mut R {
        &mut self.remote
    }

    /// Unwrap the remote cursor.
    pub fn into_remote(self) -> R {
        self.remote
    }

    /// Position the cursor over the given rectangle and return it.
    ///
    /// After success the cursor covers exactly the requested rectangle. A
    /// remote failure is returned as is and not retried.
    pub fn get_target(
        &mut self,
        row: u32,
        col: u32,
        row_count: u32,
        col_count: u32,
    ) -> Result<&mut R> {
        if self.stale {
            if !self.resync {
                return Err(SheetError::CursorDesynced);
            }
            self.resync()?;
        }

        if let Err(err) = self.reposition(row, col, row_count, col_count) {
            tracing::debug!("Cursor reposition failed, marking state stale: {}", err);
            self.stale = true;
            return Err(err);
        }
        Ok(&mut self.remote)
    }

    /// Position the cursor over an address and return it.
    pub fn target(&mut self, address: &SheetAddress) -> Result<&mut R> {
        self.get_target(
            address.row(),
            address.col(),
            address.row_count(),
            address.col_count(),
        )
    }

    /// Reload the cursor's rectangle from the remote side.
    pub fn resync(&mut self) -> Result<()> {
        let range = self.remote.range_address()?;
        let current = SheetAddress::from_range_address(&range)?;
        tracing::debug!("Resynchronized sheet cursor at {}", current);

        self.state.row = current.row();
        self.state.col = current.col();
        self.state.row_count = current.row_count();
        self.state.col_count = current.col_count();
        self.stale = false;
        Ok(())
    }

    fn reposition(&mut self, row: u32, col: u32, row_count: u32, col_count: u32) -> Result<()> {
        let state = &mut self.state;
        let remote = &mut self.remote;

        if state.covers(row, col, row_count, col_count) {
            return Ok(());
        }

        // Both a resize and a move can fail for lack of room, so when the
        // new size doesn't fit at the current anchor, move first along every
        // axis where the current size fits at the target offset.
        if !state.can_resize_in_place(row_count, col_count) {
            let row_delta = if fits(row, state.row_count, state.max_row_count) {
                delta(state.row, row)
            } else {
                0
            };
            let col_delta = if fits(col, state.col_count, state.max_col_count) {
                delta(state.col, col)
            } else {
                0
            };

            if row_delta != 0 || col_delta != 0 {
                tracing::trace!("move_by({}, {}) before resize", col_delta, row_delta);
                remote.move_by(col_delta, row_delta)?;
                if row_delta != 0 {
                    state.row = row;
                }
                if col_delta != 0 {
                    state.col = col;
                }
            }
        }

        if (row_count, col_count) != (state.row_count, state.col_count) {
            tracing::trace!("resize_to({}, {})", col_count, row_count);
            remote.resize_to(col_count, row_count)?;
            state.row_count = row_count;
            state.col_count = col_count;
        }

        if (row, col) != (state.row, state.col) {
            let (col_delta, row_delta) = (delta(state.col, col), delta(state.row, row));
            tracing::trace!("move_by({}, {})", col_delta, row_delta);
            remote.move_by(col_delta, row_delta)?;
            state.row = row;
            state.col = col;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CursorCall, MemoryCursor};
    use crate::remote::{RemoteErrorKind, RemoteResult};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use sheet_cursor_core::{CellRangeAddress, Scalar};

    const ROWS: u32 = 1_048_576;
    const COLS: u32 = 1_024;

    fn cursor() -> SheetCursor<MemoryCursor> {
        let mut cursor = SheetCursor::new(MemoryCursor::new(ROWS, COLS)).unwrap();
        cursor.remote_mut().clear_calls();
        cursor
    }

    fn primitives(cursor: &SheetCursor<MemoryCursor>) -> Vec<CursorCall> {
        cursor.remote().primitive_calls().cloned().collect()
    }

    #[test]
    fn test_initial_state_covers_sheet() {
        let cursor = cursor();
        assert_eq!(
            cursor.state(),
            CursorState {
                row: 0,
                col: 0,
                row_count: ROWS,
                col_count: COLS,
                max_row_count: ROWS,
                max_col_count: COLS,
            }
        );
    }

    #[test]
    fn test_same_target_issues_no_calls() {
        let mut cursor = cursor();
        cursor.get_target(0, 0, ROWS, COLS).unwrap();
        assert!(primitives(&cursor).is_empty());

        cursor.get_target(5, 5, 2, 2).unwrap();
        cursor.remote_mut().clear_calls();
        cursor.get_target(5, 5, 2, 2).unwrap();
        assert!(primitives(&cursor).is_empty());
    }

    #[test]
    fn test_resize_then_move() {
        let mut cursor = cursor();
        cursor.get_target(ROWS - 1, COLS - 1, 1, 1).unwrap();
        assert_eq!(
            primitives(&cursor),
            vec![
                CursorCall::ResizeTo { cols: 1, rows: 1 },
                CursorCall::MoveBy {
                    delta_cols: i64::from(COLS - 1),
                    delta_rows: i64::from(ROWS - 1),
                },
            ]
        );
        assert_eq!(cursor.remote().cursor(), (ROWS - 1, COLS - 1, 1, 1));
    }

    #[test]
    fn test_move_then_resize() {
        let mut cursor = cursor();
        cursor.get_target(ROWS - 1, COLS - 1, 1, 1).unwrap();
        cursor.remote_mut().clear_calls();

        cursor.get_target(0, 0, ROWS, COLS).unwrap();
        assert_eq!(
            primitives(&cursor),
            vec![
                CursorCall::MoveBy {
                    delta_cols: -i64::from(COLS - 1),
                    delta_rows: -i64::from(ROWS - 1),
                },
                CursorCall::ResizeTo {
                    cols: COLS,
                    rows: ROWS
                },
            ]
        );
        assert_eq!(cursor.remote().cursor(), (0, 0, ROWS, COLS));
    }

    #[test]
    fn test_move_resize_move() {
        let mut cursor = cursor();
        // Last row, all columns
        cursor.get_target(ROWS - 1, 0, 1, COLS).unwrap();
        assert_eq!(cursor.remote().cursor(), (ROWS - 1, 0, 1, COLS));
        cursor.remote_mut().clear_calls();

        // Last column, all rows: the full-width row can't move right and the
        // full-height column can't start at the last row, so the cursor goes
        // up first, shrinks, then moves right.
        cursor.get_target(0, COLS - 1, ROWS, 1).unwrap();
        assert_eq!(
            primitives(&cursor),
            vec![
                CursorCall::MoveBy {
                    delta_cols: 0,
                    delta_rows: -i64::from(ROWS - 1),
                },
                CursorCall::ResizeTo { cols: 1, rows: ROWS },
                CursorCall::MoveBy {
                    delta_cols: i64::from(COLS - 1),
                    delta_rows: 0,
                },
            ]
        );
        assert_eq!(cursor.remote().cursor(), (0, COLS - 1, ROWS, 1));
    }

    #[test]
    fn test_only_move_when_size_matches() {
        let mut cursor = cursor();
        cursor.get_target(10, 1, 10, 5).unwrap();
        cursor.remote_mut().clear_calls();

        cursor.get_target(20, 3, 10, 5).unwrap();
        assert_eq!(
            primitives(&cursor),
            vec![CursorCall::MoveBy {
                delta_cols: 2,
                delta_rows: 10
            }]
        );
    }

    #[test]
    fn test_only_resize_when_position_matches() {
        let mut cursor = cursor();
        cursor.get_target(10, 1, 10, 5).unwrap();
        cursor.remote_mut().clear_calls();

        cursor.get_target(10, 1, 3, 3).unwrap();
        assert_eq!(
            primitives(&cursor),
            vec![CursorCall::ResizeTo { cols: 3, rows: 3 }]
        );
    }

    #[test]
    fn test_failure_marks_state_stale_and_resyncs() {
        let mut cursor = cursor();
        cursor.get_target(10, 10, 5, 5).unwrap();

        cursor.remote_mut().fail_next(RemoteErrorKind::Transport);
        let err = cursor.get_target(100, 100, 5, 5).unwrap_err();
        assert!(matches!(err, SheetError::Remote(ref e) if e.kind == RemoteErrorKind::Transport));
        assert!(cursor.is_stale());

        cursor.get_target(20, 20, 2, 2).unwrap();
        assert!(!cursor.is_stale());
        assert_eq!(cursor.remote().cursor(), (20, 20, 2, 2));
        assert!(cursor.state().covers(20, 20, 2, 2));
    }

    #[test]
    fn test_failure_after_partial_move_resyncs() {
        let mut cursor = SheetCursor::new(MemoryCursor::new(100, 10)).unwrap();
        cursor.get_target(99, 0, 1, 10).unwrap();
        cursor.remote_mut().clear_calls();

        // The move toward row 50 succeeds, the resize after it fails
        cursor.remote_mut().fail_after(1, RemoteErrorKind::Transport);
        assert!(cursor.get_target(50, 3, 10, 2).is_err());
        assert!(cursor.is_stale());
        assert_eq!(cursor.remote().cursor(), (50, 0, 1, 10));

        cursor.remote_mut().clear_calls();
        cursor.get_target(50, 3, 10, 2).unwrap();
        assert!(!cursor.is_stale());
        assert_eq!(cursor.remote().cursor(), (50, 3, 10, 2));
        assert!(cursor.state().covers(50, 3, 10, 2));
        assert_eq!(
            cursor.remote().calls(),
            &[
                CursorCall::RangeAddress,
                CursorCall::ResizeTo { cols: 2, rows: 10 },
                CursorCall::MoveBy {
                    delta_cols: 3,
                    delta_rows: 0
                },
            ]
        );
    }

    #[test]
    fn test_extent_ending_at_last_index_is_rejected() {
        #[derive(Debug)]
        struct Unbounded;

        impl RemoteCursor for Unbounded {
            fn range_address(&mut self) -> RemoteResult<CellRangeAddress> {
                Ok(CellRangeAddress {
                    sheet: 0,
                    start_col: 0,
                    start_row: 1,
                    end_col: 9,
                    end_row: u32::MAX,
                })
            }
            fn move_by(&mut self, _: i64, _: i64) -> RemoteResult<()> {
                Ok(())
            }
            fn resize_to(&mut self, _: u32, _: u32) -> RemoteResult<()> {
                Ok(())
            }
            fn read_values(&mut self) -> RemoteResult<Vec<Vec<Scalar>>> {
                Ok(Vec::new())
            }
            fn write_values(&mut self, _: &[Vec<Scalar>]) -> RemoteResult<()> {
                Ok(())
            }
            fn read_formulas(&mut self) -> RemoteResult<Vec<Vec<String>>> {
                Ok(Vec::new())
            }
            fn write_formulas(&mut self, _: &[Vec<String>]) -> RemoteResult<()> {
                Ok(())
            }
        }

        let err = SheetCursor::new(Unbounded).unwrap_err();
        assert!(matches!(err, SheetError::Core(CoreError::InvalidAddress(_))));
    }

    #[test]
    fn test_failure_without_resync_is_fatal() {
        let mut cursor = SheetCursor::with_resync(MemoryCursor::new(100, 10), false).unwrap();
        cursor.remote_mut().fail_next(RemoteErrorKind::Transport);
        assert!(cursor.get_target(1, 1, 1, 1).is_err());
        assert!(matches!(
            cursor.get_target(1, 1, 1, 1),
            Err(SheetError::CursorDesynced)
        ));
    }

    #[test]
    fn test_target_outside_sheet_surfaces_remote_error() {
        let mut cursor = SheetCursor::new(MemoryCursor::new(100, 10)).unwrap();
        let err = cursor.get_target(99, 0, 5, 1).unwrap_err();
        assert!(matches!(err, SheetError::Remote(ref e) if e.kind == RemoteErrorKind::OutOfBounds));
    }

    fn rectangle(rows: u32, cols: u32) -> impl Strategy<Value = (u32, u32, u32, u32)> {
        (0..rows, 0..cols).prop_flat_map(move |(row, col)| {
            (Just(row), Just(col), 1..=rows - row, 1..=cols - col)
        })
    }

    proptest! {
        #[test]
        fn final_state_matches_last_request(targets in proptest::collection::vec(rectangle(40, 12), 1..30)) {
            let mut cursor = SheetCursor::new(MemoryCursor::new(40, 12)).unwrap();
            for &(row, col, row_count, col_count) in &targets {
                cursor.get_target(row, col, row_count, col_count).unwrap();
                prop_assert!(cursor.state().covers(row, col, row_count, col_count));
                prop_assert_eq!(cursor.remote().cursor(), (row, col, row_count, col_count));
            }
        }

        #[test]
        fn repeated_request_is_free(target in rectangle(40, 12)) {
            let (row, col, row_count, col_count) = target;
            let mut cursor = SheetCursor::new(MemoryCursor::new(40, 12)).unwrap();
            cursor.get_target(row, col, row_count, col_count).unwrap();
            cursor.remote_mut().clear_calls();
            cursor.get_target(row, col, row_count, col_count).unwrap();
            prop_assert_eq!(cursor.remote().primitive_calls().count(), 0);
        }
    }
}
