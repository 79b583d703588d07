//! Cell value types

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::date::DateSystem;
use crate::error::{Error, Result};

/// A scalar exchanged with the remote cell array.
///
/// This is what a remote spreadsheet stores: nothing, a number or text.
/// Dates and times travel as numbers.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    /// Empty cell
    #[default]
    Empty,
    /// Numeric value (dates and times included)
    Number(f64),
    /// Text value
    Text(String),
}

impl Scalar {
    /// Check if the scalar is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }

    /// Try to get the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Convert to a JSON value (`null`, number or string)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Scalar::Empty => serde_json::Value::Null,
            Scalar::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Scalar::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Empty => Ok(()),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Scalar::Number(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

/// A value assigned to a cell, either as a value or as a formula.
///
/// The set of accepted kinds is closed. Anything else has to be converted
/// by the caller, for example with [`CellValue::from_display`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value; clears the cell
    #[default]
    Empty,
    /// Real number
    Number(f64),
    /// Text (for formula writes, text starting with `=` is a formula)
    Text(String),
    /// Calendar date, stored as a whole day number
    Date(NaiveDate),
    /// Date and time of day, stored as a fractional day number
    DateTime(NaiveDateTime),
    /// Time of day, stored as a fraction of a day
    Time(NaiveTime),
}

impl CellValue {
    /// Create a text value from anything with a display representation
    pub fn from_display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        CellValue::Text(value.to_string())
    }

    /// Convert a dynamically typed JSON value.
    ///
    /// `null`, numbers and strings are accepted; booleans, arrays and objects
    /// are rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        const EXPECTED: &str = "null, number or string";
        match value {
            serde_json::Value::Null => Ok(CellValue::Empty),
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).ok_or(
                Error::InvalidValueType {
                    expected: EXPECTED,
                    actual: "out-of-range number",
                },
            ),
            serde_json::Value::String(s) => Ok(CellValue::Text(s.clone())),
            serde_json::Value::Bool(_) => Err(Error::InvalidValueType {
                expected: EXPECTED,
                actual: "boolean",
            }),
            serde_json::Value::Array(_) => Err(Error::InvalidValueType {
                expected: EXPECTED,
                actual: "array",
            }),
            serde_json::Value::Object(_) => Err(Error::InvalidValueType {
                expected: EXPECTED,
                actual: "object",
            }),
        }
    }

    /// Check if the value is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Coerce to the scalar stored by a value write
    pub fn to_scalar(&self, dates: &DateSystem) -> Scalar {
        match self {
            CellValue::Empty => Scalar::Empty,
            CellValue::Number(n) => Scalar::Number(*n),
            CellValue::Text(s) => Scalar::Text(s.clone()),
            CellValue::Date(d) => Scalar::Number(dates.date_to_number(*d)),
            CellValue::DateTime(dt) => Scalar::Number(dates.datetime_to_number(*dt)),
            CellValue::Time(t) => Scalar::Number(dates.time_to_number(*t)),
        }
    }

    /// Coerce to the text stored by a formula write
    pub fn to_formula(&self, dates: &DateSystem) -> String {
        match self.to_scalar(dates) {
            Scalar::Empty => String::new(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::Time(t)
    }
}

impl From<Scalar> for CellValue {
    fn from(s: Scalar) -> Self {
        match s {
            Scalar::Empty => CellValue::Empty,
            Scalar::Number(n) => CellValue::Number(n),
            Scalar::Text(t) => CellValue::Text(t),
        }
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}
