//! Index and slice normalization with negative indices counted from the end

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};
use std::str::FromStr;

use crate::error::{Error, Result};

/// A slice over one axis: `start:stop:step`, each part optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Slice {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl Slice {
    /// Create a slice without a step
    pub fn new(start: Option<i64>, stop: Option<i64>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    /// The slice covering the whole axis (`:`)
    pub fn full() -> Self {
        Self::default()
    }

    /// Set the step
    pub fn with_step(mut self, step: i64) -> Self {
        self.step = Some(step);
        self
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        f.write_str(":")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

/// A key along one axis: a single index or a slice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Index(i64),
    Slice(Slice),
}

impl Key {
    /// The key covering the whole axis (`:`)
    pub fn full() -> Self {
        Key::Slice(Slice::full())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Slice(s) => write!(f, "{}", s),
        }
    }
}

impl From<Slice> for Key {
    fn from(slice: Slice) -> Self {
        Key::Slice(slice)
    }
}

macro_rules! key_from_int {
    ($($t:ty),*) => {$(
        impl From<$t> for Key {
            fn from(index: $t) -> Self {
                Key::Index(i64::from(index))
            }
        }

        impl From<Range<$t>> for Key {
            fn from(range: Range<$t>) -> Self {
                Key::Slice(Slice::new(Some(i64::from(range.start)), Some(i64::from(range.end))))
            }
        }

        impl From<RangeFrom<$t>> for Key {
            fn from(range: RangeFrom<$t>) -> Self {
                Key::Slice(Slice::new(Some(i64::from(range.start)), None))
            }
        }

        impl From<RangeTo<$t>> for Key {
            fn from(range: RangeTo<$t>) -> Self {
                Key::Slice(Slice::new(None, Some(i64::from(range.end))))
            }
        }
    )*};
}

// i32 is what unsuffixed literals fall back to
key_from_int!(i32, i64);

impl From<RangeFull> for Key {
    fn from(_: RangeFull) -> Self {
        Key::full()
    }
}

fn parse_bound(text: &str) -> Result<Option<i64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| Error::IndexType(text.to_string()))
}

impl FromStr for Key {
    type Err = Error;

    /// Parse `5`, `-1`, `:`, `10:20`, `-20:-10` or `0:10:2`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if !s.contains(':') {
            return s
                .parse()
                .map(Key::Index)
                .map_err(|_| Error::IndexType(s.to_string()));
        }

        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() > 3 {
            return Err(Error::IndexType(s.to_string()));
        }

        Ok(Key::Slice(Slice {
            start: parse_bound(parts[0])?,
            stop: parse_bound(parts[1])?,
            step: match parts.get(2) {
                Some(step) => parse_bound(step)?,
                None => None,
            },
        }))
    }
}

/// Parse a comma-separated list of keys, e.g. `"10:20, 1:6"`
pub fn parse_keys(s: &str) -> Result<Vec<Key>> {
    s.split(',').map(str::parse).collect()
}

/// Validate an index and resolve it to an absolute position in `[0, length)`.
///
/// Negative indices count from the end of the axis.
///
/// ```
/// use sheet_cursor_core::normalize_index;
///
/// assert_eq!(normalize_index(0, 10).unwrap(), 0);
/// assert_eq!(normalize_index(-10, 10).unwrap(), 0);
/// assert!(normalize_index(10, 10).is_err());
/// assert!(normalize_index(-11, 10).is_err());
/// ```
pub fn normalize_index(key: i64, length: u32) -> Result<u32> {
    let len = i64::from(length);
    let index = if key < 0 { key + len } else { key };
    if (0..len).contains(&index) {
        Ok(index as u32)
    } else {
        Err(Error::IndexOutOfRange { index: key, length })
    }
}

/// Validate a slice and resolve it to an absolute `[start, stop)` pair.
///
/// Missing bounds default to the whole axis, negative bounds count from the
/// end, and out-of-range bounds are clamped rather than rejected. The result
/// is not reordered: `start >= stop` describes an empty selection that the
/// caller must reject.
///
/// ```
/// use sheet_cursor_core::{normalize_slice, Slice};
///
/// assert_eq!(normalize_slice(&Slice::full(), 10).unwrap(), (0, 10));
/// assert_eq!(normalize_slice(&Slice::new(Some(-10), Some(10)), 10).unwrap(), (0, 10));
/// assert_eq!(normalize_slice(&Slice::new(Some(-11), Some(11)), 10).unwrap(), (0, 10));
/// assert!(normalize_slice(&Slice::full().with_step(2), 10).is_err());
/// ```
pub fn normalize_slice(slice: &Slice, length: u32) -> Result<(u32, u32)> {
    if slice.step.is_some_and(|step| step != 1) {
        return Err(Error::Unsupported(
            "Cell slice with step is not supported".into(),
        ));
    }

    let len = i64::from(length);
    let resolve = |bound: i64| if bound < 0 { bound + len } else { bound };
    let start = slice.start.map_or(0, resolve).clamp(0, len);
    let stop = slice.stop.map_or(len, resolve).clamp(0, len);

    Ok((start as u32, stop as u32))
}
