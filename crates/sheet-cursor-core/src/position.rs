//! Physical position of a rectangular area in a sheet

use std::fmt;

/// Position of a rectangular area in a sheet, in 1/100 mm.
///
/// This is the physical counterpart of [`SheetAddress`](crate::SheetAddress).
/// A zero width and height describe a point rather than a rectangle.
///
/// ```
/// use sheet_cursor_core::SheetPosition;
///
/// assert_eq!(SheetPosition::point(1000, 2000).to_string(), "x=1000, y=2000");
/// assert_eq!(
///     SheetPosition::new(1000, 2000, 3000, 4000).to_string(),
///     "x=1000, y=2000, width=3000, height=4000"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetPosition {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl SheetPosition {
    /// Create a rectangle
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a point
    pub fn point(x: i32, y: i32) -> Self {
        Self::new(x, y, 0, 0)
    }

    /// Combine a remote position `(x, y)` and size `(width, height)`
    pub fn from_parts(position: (i32, i32), size: (i32, i32)) -> Self {
        Self::new(position.0, position.1, size.0, size.1)
    }

    /// Whether this is a point rather than a rectangle
    pub fn is_point(&self) -> bool {
        self.width == 0 && self.height == 0
    }
}

impl fmt::Display for SheetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}", self.x, self.y)?;
        if !self.is_point() {
            write!(f, ", width={}, height={}", self.width, self.height)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let position = SheetPosition::point(1000, 2000);
        assert!(position.is_point());
        assert_eq!(position.to_string(), "x=1000, y=2000");
    }

    #[test]
    fn test_rectangle() {
        let position = SheetPosition::from_parts((1000, 2000), (3000, 4000));
        assert!(!position.is_point());
        assert_eq!(position, SheetPosition::new(1000, 2000, 3000, 4000));
        assert_eq!(
            position.to_string(),
            "x=1000, y=2000, width=3000, height=4000"
        );
    }

    #[test]
    fn test_one_dimensional_area_is_not_a_point() {
        assert!(!SheetPosition::new(0, 0, 10, 0).is_point());
    }
}
