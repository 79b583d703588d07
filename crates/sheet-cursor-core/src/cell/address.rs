//! Cell address types and the column/row notation codec

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Convert a column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
///
/// Column names are a bijective base-26 numbering without a zero digit, so
/// the index is first reduced to a band of names of equal width
/// (26 one-letter names, 26² two-letter names, ...) and then written out
/// most significant letter first.
pub fn column_name(index: u32) -> String {
    let mut offset = u64::from(index);
    let mut width: u32 = 1;
    let mut band: u64 = 26;

    while offset >= band {
        offset -= band;
        width += 1;
        band *= 26;
    }

    (0..width)
        .rev()
        .map(|exp| {
            let digit = (offset / 26u64.pow(exp)) % 26;
            char::from(b'A' + digit as u8)
        })
        .collect()
}

/// Convert a row index to its 1-based display name
pub fn row_name(index: u32) -> String {
    (u64::from(index) + 1).to_string()
}

/// Convert column letters to an index (A = 0, Z = 25, AA = 26, etc.)
pub fn column_index(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u64 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col * 26 + u64::from(c.to_ascii_uppercase() as u8 - b'A') + 1;
        if col > u64::from(u32::MAX) + 1 {
            return Err(Error::InvalidAddress(format!(
                "column '{}' is too large",
                letters
            )));
        }
    }

    // Convert to 0-based
    Ok((col - 1) as u32)
}

/// Convert a 1-based row number to a 0-based row index
pub fn row_index(digits: &str) -> Result<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAddress(format!(
            "invalid row number '{}'",
            digits
        )));
    }

    let row: u64 = digits
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("row number '{}' is too large", digits)))?;

    if row == 0 || row > u64::from(u32::MAX) {
        return Err(Error::InvalidAddress(format!(
            "row number must be between 1 and {} in '{}'",
            u32::MAX,
            digits
        )));
    }

    Ok((row - 1) as u32)
}

/// Address of a cell or rectangular block of cells in a sheet.
///
/// The address is logical (row and column indices); see
/// [`SheetPosition`](crate::SheetPosition) for physical placement.
/// All fields are absolute and both counts are at least one.
///
/// ```
/// use sheet_cursor_core::SheetAddress;
///
/// assert_eq!(SheetAddress::cell(1, 2).to_string(), "$C$2");
/// assert_eq!(SheetAddress::new(1, 2, 3, 4).unwrap().to_string(), "$C$2:$F$4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetAddress {
    row: u32,
    col: u32,
    row_count: u32,
    col_count: u32,
}

impl SheetAddress {
    /// Create an address of `row_count` x `col_count` cells starting at (`row`, `col`)
    pub fn new(row: u32, col: u32, row_count: u32, col_count: u32) -> Result<Self> {
        if row_count == 0 || col_count == 0 {
            return Err(Error::EmptyRange(format!(
                "{}x{} cells at row {}, column {}",
                row_count, col_count, row, col
            )));
        }

        let fits = |start: u32, count: u32| u64::from(start) + u64::from(count) - 1 <= u64::from(u32::MAX);
        if !fits(row, row_count) || !fits(col, col_count) {
            return Err(Error::InvalidAddress(format!(
                "{}x{} cells at row {}, column {} exceed the addressable grid",
                row_count, col_count, row, col
            )));
        }

        Ok(Self {
            row,
            col,
            row_count,
            col_count,
        })
    }

    /// Create a single-cell address
    pub fn cell(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            row_count: 1,
            col_count: 1,
        }
    }

    /// Create an address from inclusive corner indices, as reported by a remote range
    pub fn from_range_address(range: &CellRangeAddress) -> Result<Self> {
        if range.end_row < range.start_row || range.end_col < range.start_col {
            return Err(Error::InvalidAddress(format!(
                "range end ({}, {}) precedes start ({}, {})",
                range.end_row, range.end_col, range.start_row, range.start_col
            )));
        }

        let count = |start: u32, end: u32| {
            (end - start).checked_add(1).ok_or_else(|| {
                Error::InvalidAddress(format!(
                    "range from {} to {} exceeds the addressable grid",
                    start, end
                ))
            })
        };
        Self::new(
            range.start_row,
            range.start_col,
            count(range.start_row, range.end_row)?,
            count(range.start_col, range.end_col)?,
        )
    }

    /// Convert to the corner-based descriptor for the sheet with the given index
    pub fn to_range_address(&self, sheet: u16) -> CellRangeAddress {
        CellRangeAddress {
            sheet,
            start_col: self.col,
            start_row: self.row,
            end_col: self.col_end(),
            end_row: self.row_end(),
        }
    }

    /// Parse an address from `A1`, `$A$1` or `A1:B10` notation
    ///
    /// # Examples
    /// ```
    /// use sheet_cursor_core::SheetAddress;
    ///
    /// let address = SheetAddress::parse("$C$12:$E$19").unwrap();
    /// assert_eq!(address.row(), 11);
    /// assert_eq!(address.col(), 2);
    /// assert_eq!(address.row_count(), 8);
    /// assert_eq!(address.col_count(), 3);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        match s.split_once(':') {
            Some((start, end)) => {
                let (start_row, start_col) = parse_corner(start)?;
                let (end_row, end_col) = parse_corner(end)?;
                Self::from_range_address(&CellRangeAddress {
                    sheet: 0,
                    start_col: start_col.min(end_col),
                    start_row: start_row.min(end_row),
                    end_col: start_col.max(end_col),
                    end_row: start_row.max(end_row),
                })
            }
            None => {
                let (row, col) = parse_corner(s)?;
                Ok(Self::cell(row, col))
            }
        }
    }

    /// First row (0-based)
    pub fn row(&self) -> u32 {
        self.row
    }

    /// First column (0-based)
    pub fn col(&self) -> u32 {
        self.col
    }

    /// Number of rows
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Number of columns
    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    /// Last row (inclusive)
    pub fn row_end(&self) -> u32 {
        self.row + self.row_count - 1
    }

    /// Last column (inclusive)
    pub fn col_end(&self) -> u32 {
        self.col + self.col_count - 1
    }

    /// Total number of cells
    pub fn cell_count(&self) -> u64 {
        u64::from(self.row_count) * u64::from(self.col_count)
    }

    /// Whether the address covers exactly one cell
    pub fn is_cell(&self) -> bool {
        self.row_count == 1 && self.col_count == 1
    }

    /// Check if a cell is within this address
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.row && row <= self.row_end() && col >= self.col && col <= self.col_end()
    }
}

/// Parse one `$A$1` style corner into (row, col)
fn parse_corner(s: &str) -> Result<(u32, u32)> {
    let s = s.trim();
    let body = s.strip_prefix('$').unwrap_or(s);

    let split = body
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(body.len());
    let (letters, rest) = body.split_at(split);
    if letters.is_empty() {
        return Err(Error::InvalidAddress(format!("no column letters in '{}'", s)));
    }

    let digits = rest.strip_prefix('$').unwrap_or(rest);
    if digits.is_empty() {
        return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
    }

    Ok((row_index(digits)?, column_index(letters)?))
}

impl fmt::Display for SheetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}${}", column_name(self.col), row_name(self.row))?;
        if !self.is_cell() {
            write!(
                f,
                ":${}${}",
                column_name(self.col_end()),
                row_name(self.row_end())
            )?;
        }
        Ok(())
    }
}

impl FromStr for SheetAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SheetAddress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for SheetAddress {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Corner-based range descriptor (`com.sun.star.table.CellRangeAddress`)
///
/// End row and column are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRangeAddress {
    /// Sheet index within the document
    pub sheet: u16,
    pub start_col: u32,
    pub start_row: u32,
    pub end_col: u32,
    pub end_row: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(1), "B");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(51), "AZ");
        assert_eq!(column_name(52), "BA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
        assert_eq!(column_name(1023), "AMJ"); // Last Calc column
        assert_eq!(column_name(16383), "XFD");
    }

    #[test]
    fn test_row_name() {
        assert_eq!(row_name(0), "1");
        assert_eq!(row_name(10), "11");
        assert_eq!(row_name(u32::MAX), "4294967296");
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("Z").unwrap(), 25);
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index("AZ").unwrap(), 51);
        assert_eq!(column_index("BA").unwrap(), 52);
        assert_eq!(column_index("AMJ").unwrap(), 1023);

        // Case insensitive
        assert_eq!(column_index("amj").unwrap(), 1023);

        assert!(column_index("").is_err());
        assert!(column_index("A1").is_err());
        assert!(column_index("ZZZZZZZZ").is_err());
    }

    #[test]
    fn test_row_index() {
        assert_eq!(row_index("1").unwrap(), 0);
        assert_eq!(row_index("1048576").unwrap(), 1_048_575);
        assert!(row_index("0").is_err());
        assert!(row_index("+1").is_err());
        assert!(row_index("").is_err());
    }

    #[test]
    fn test_address_display() {
        assert_eq!(SheetAddress::cell(0, 0).to_string(), "$A$1");
        assert_eq!(SheetAddress::cell(1, 2).to_string(), "$C$2");
        assert_eq!(SheetAddress::new(1, 2, 3, 4).unwrap().to_string(), "$C$2:$F$4");
        assert_eq!(
            SheetAddress::cell(1_048_575, 1023).to_string(),
            "$AMJ$1048576"
        );
    }

    #[test]
    fn test_address_rejects_empty_counts() {
        assert!(matches!(
            SheetAddress::new(0, 0, 0, 1),
            Err(Error::EmptyRange(_))
        ));
        assert!(matches!(
            SheetAddress::new(0, 0, 1, 0),
            Err(Error::EmptyRange(_))
        ));
    }

    #[test]
    fn test_address_derived_fields() {
        let address = SheetAddress::new(10, 1, 10, 5).unwrap();
        assert_eq!(address.row_end(), 19);
        assert_eq!(address.col_end(), 5);
        assert_eq!(address.cell_count(), 50);
        assert!(address.contains(10, 1));
        assert!(address.contains(19, 5));
        assert!(!address.contains(20, 5));
        assert!(!address.contains(10, 0));
    }

    #[test]
    fn test_address_parse() {
        assert_eq!(SheetAddress::parse("A1").unwrap(), SheetAddress::cell(0, 0));
        assert_eq!(SheetAddress::parse("$C$2").unwrap(), SheetAddress::cell(1, 2));
        assert_eq!(
            SheetAddress::parse("$B$11:$F$20").unwrap(),
            SheetAddress::new(10, 1, 10, 5).unwrap()
        );

        // Reversed corners are normalized
        assert_eq!(
            SheetAddress::parse("F20:B11").unwrap(),
            SheetAddress::new(10, 1, 10, 5).unwrap()
        );

        assert!(SheetAddress::parse("").is_err());
        assert!(SheetAddress::parse("A").is_err());
        assert!(SheetAddress::parse("1").is_err());
        assert!(SheetAddress::parse("A0").is_err());
    }

    #[test]
    fn test_range_address_conversion() {
        let address = SheetAddress::new(10, 1, 10, 5).unwrap();
        let range = address.to_range_address(2);
        assert_eq!(
            range,
            CellRangeAddress {
                sheet: 2,
                start_col: 1,
                start_row: 10,
                end_col: 5,
                end_row: 19,
            }
        );
        assert_eq!(SheetAddress::from_range_address(&range).unwrap(), address);

        let reversed = CellRangeAddress {
            end_row: 9,
            ..range
        };
        assert!(SheetAddress::from_range_address(&reversed).is_err());
    }

    #[test]
    fn test_range_address_spanning_whole_index_space() {
        let range = CellRangeAddress {
            sheet: 0,
            start_col: 0,
            start_row: 0,
            end_col: 3,
            end_row: u32::MAX,
        };
        assert!(matches!(
            SheetAddress::from_range_address(&range),
            Err(Error::InvalidAddress(_))
        ));
    }

    proptest! {
        #[test]
        fn column_name_round_trips(index in 0u32..=u32::MAX) {
            prop_assert_eq!(column_index(&column_name(index)).unwrap(), index);
        }

        #[test]
        fn address_text_round_trips(
            row in 0u32..2_000_000,
            col in 0u32..20_000,
            row_count in 1u32..1_000,
            col_count in 1u32..100,
        ) {
            let address = SheetAddress::new(row, col, row_count, col_count).unwrap();
            prop_assert_eq!(address.to_string().parse::<SheetAddress>().unwrap(), address);
        }
    }
}
