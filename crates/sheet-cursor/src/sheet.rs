//! Sheet handle: owns the shared cursor and hands out ranges.

use std::cell::RefCell;
use std::fmt;

use sheet_cursor_core::{DateSystem, Key, SheetAddress};

use crate::cursor::{CursorState, SheetCursor};
use crate::error::{Result, SheetError};
use crate::range::{Range, TabularRange};
use crate::remote::{RemoteCursor, RemoteResult};

/// Configuration for a [`Sheet`].
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Date system used to turn dates and times into cell numbers.
    /// Default: null date 1899-12-30.
    pub date_system: DateSystem,
    /// Re-read the remote cursor after a failed move or resize instead of
    /// refusing further access. Default: true.
    pub resync_on_failure: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            date_system: DateSystem::default(),
            resync_on_failure: true,
        }
    }
}

/// One sheet of a spreadsheet document.
///
/// The sheet owns the single remote cursor used for all of its cell access.
/// Ranges borrow the sheet, so every range derived from it moves the same
/// cursor. A `Sheet` is not `Sync`; confine it and its ranges to one thread.
pub struct Sheet<R> {
    cursor: RefCell<SheetCursor<R>>,
    address: SheetAddress,
    config: SheetConfig,
}

impl<R: RemoteCursor> Sheet<R> {
    /// Attach to a remote cursor covering the whole sheet.
    pub fn new(remote: R) -> Result<Self> {
        Self::with_config(remote, SheetConfig::default())
    }

    /// Attach to a remote cursor with explicit configuration.
    pub fn with_config(remote: R, config: SheetConfig) -> Result<Self> {
        let cursor = SheetCursor::with_resync(remote, config.resync_on_failure)?;
        let state = cursor.state();
        // The sheet's extent is whatever the fresh cursor covers
        let address = SheetAddress::new(state.row, state.col, state.row_count, state.col_count)?;
        tracing::info!("Attached sheet {}", address);

        Ok(Self {
            cursor: RefCell::new(cursor),
            address,
            config,
        })
    }

    /// The sheet's full extent
    pub fn address(&self) -> SheetAddress {
        self.address
    }

    /// Number of rows in the sheet
    pub fn row_count(&self) -> u32 {
        self.address.row_count()
    }

    /// Number of columns in the sheet
    pub fn col_count(&self) -> u32 {
        self.address.col_count()
    }

    /// The sheet's configuration
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Date system used for value coercion
    pub fn date_system(&self) -> &DateSystem {
        &self.config.date_system
    }

    /// The whole sheet as a tabular range
    pub fn cells(&self) -> TabularRange<'_, R> {
        TabularRange::new(self, self.address)
    }

    /// Index or slice the sheet by row and column
    pub fn get(&self, row: impl Into<Key>, col: impl Into<Key>) -> Result<Range<'_, R>> {
        self.cells().get(row, col)
    }

    /// Index or slice the sheet by row only (all columns)
    pub fn get_row(&self, row: impl Into<Key>) -> Result<Range<'_, R>> {
        self.cells().get_row(row)
    }

    /// Index or slice the sheet with one or two keys
    pub fn get_keys(&self, keys: &[Key]) -> Result<Range<'_, R>> {
        self.cells().get_keys(keys)
    }

    /// Snapshot of the shared cursor state
    ///
    /// Fails with [`SheetError::CursorBusy`] while the cursor is lent out to a
    /// [`with_target`](Self::with_target) callback.
    pub fn cursor_state(&self) -> Result<CursorState> {
        let cursor = self.cursor.try_borrow().map_err(|_| SheetError::CursorBusy)?;
        Ok(cursor.state())
    }

    /// Position the shared cursor over `address` and run `f` against it.
    ///
    /// This is the entry point for collaborators (formatting, charts, ...)
    /// that need a remote handle placed over a range.
    pub fn with_target<T>(
        &self,
        address: &SheetAddress,
        f: impl FnOnce(&mut R) -> RemoteResult<T>,
    ) -> Result<T> {
        let mut cursor = self
            .cursor
            .try_borrow_mut()
            .map_err(|_| SheetError::CursorBusy)?;
        let target = cursor.target(address)?;
        Ok(f(target)?)
    }

    /// Inspect the remote cursor without moving it.
    pub fn inspect<T>(&self, f: impl FnOnce(&R) -> T) -> Result<T> {
        let cursor = self.cursor.try_borrow().map_err(|_| SheetError::CursorBusy)?;
        Ok(f(cursor.remote()))
    }

    /// Detach from the remote cursor.
    pub fn into_remote(self) -> R {
        self.cursor.into_inner().into_remote()
    }
}

impl<R> fmt::Debug for Sheet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("address", &self.address)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCursor;
    use crate::remote::RemoteError;

    #[test]
    fn test_sheet_extent() {
        let sheet = Sheet::new(MemoryCursor::new(1_048_576, 1_024)).unwrap();
        assert_eq!(sheet.row_count(), 1_048_576);
        assert_eq!(sheet.col_count(), 1_024);
        assert_eq!(sheet.address().to_string(), "$A$1:$AMJ$1048576");
    }

    #[test]
    fn test_with_target_positions_cursor() {
        let sheet = Sheet::new(MemoryCursor::new(100, 10)).unwrap();
        let address = SheetAddress::new(5, 2, 3, 4).unwrap();
        let covered = sheet.with_target(&address, |remote| Ok(remote.cursor())).unwrap();
        assert_eq!(covered, (5, 2, 3, 4));
        assert!(sheet.cursor_state().unwrap().covers(5, 2, 3, 4));
    }

    #[test]
    fn test_collaborator_error_is_wrapped() {
        let sheet = Sheet::new(MemoryCursor::new(100, 10)).unwrap();
        let err = sheet
            .with_target(&sheet.address(), |_| -> RemoteResult<()> {
                Err(RemoteError::transport("connection reset"))
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Remote cursor error: transport: connection reset");
    }

    #[test]
    fn test_reentrant_access_is_rejected() {
        let sheet = Sheet::new(MemoryCursor::new(100, 10)).unwrap();
        let inner = sheet
            .with_target(&sheet.address(), |_| {
                Ok(sheet.with_target(&sheet.address(), |_| Ok(())).is_err())
            })
            .unwrap();
        assert!(inner);
    }

    #[test]
    fn test_state_access_inside_callback_is_busy() {
        let sheet = Sheet::new(MemoryCursor::new(100, 10)).unwrap();
        let (state, calls) = sheet
            .with_target(&sheet.address(), |_| {
                Ok((sheet.cursor_state(), sheet.inspect(|remote| remote.calls().len())))
            })
            .unwrap();
        assert!(matches!(state, Err(SheetError::CursorBusy)));
        assert!(matches!(calls, Err(SheetError::CursorBusy)));

        // Released again once the callback returns
        assert!(sheet.cursor_state().unwrap().covers(0, 0, 100, 10));
        assert!(sheet.inspect(|remote| remote.calls().len()).is_ok());
    }
}
