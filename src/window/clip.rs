//! Column clipping spans.

/// A half-open column range `[col, col + width)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpan {
    pub col: i32,
    pub width: u32,
}

impl ColumnSpan {
    /// Create a new span.
    #[must_use]
    pub const fn new(col: i32, width: u32) -> Self {
        Self { col, width }
    }

    /// Exclusive end column, saturating instead of overflowing.
    #[must_use]
    pub fn end(&self) -> i32 {
        self.col.saturating_add_unsigned(self.width)
    }

    /// Check if a column is inside this span.
    #[must_use]
    pub fn contains(&self, col: i32) -> bool {
        col >= self.col && col < self.end()
    }

    /// Compute intersection with another span.
    #[must_use]
    pub fn intersect(&self, other: &ColumnSpan) -> Option<ColumnSpan> {
        let start = self.col.max(other.col);
        let end = self.end().min(other.end());
        if end > start {
            Some(ColumnSpan {
                col: start,
                width: start.abs_diff(end),
            })
        } else {
            None
        }
    }

    /// Check if this span covers no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0
    }
}

impl Default for ColumnSpan {
    /// Unbounded to the right of column 0.
    fn default() -> Self {
        Self::new(0, u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_contains() {
        let span = ColumnSpan::new(10, 20);
        assert!(span.contains(10));
        assert!(span.contains(29));
        assert!(!span.contains(30));
        assert!(!span.contains(9));
    }

    #[test]
    fn test_span_intersect() {
        let a = ColumnSpan::new(0, 20);
        let b = ColumnSpan::new(10, 20);
        assert_eq!(a.intersect(&b), Some(ColumnSpan::new(10, 10)));
        assert_eq!(a.intersect(&b), b.intersect(&a));
    }

    #[test]
    fn test_intersect_touching_is_none() {
        let a = ColumnSpan::new(0, 10);
        let b = ColumnSpan::new(10, 10);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn test_intersect_negative_start() {
        let a = ColumnSpan::new(-5, 10);
        let b = ColumnSpan::new(0, 40);
        assert_eq!(a.intersect(&b), Some(ColumnSpan::new(0, 5)));
    }

    #[test]
    fn test_default_is_unbounded() {
        let span = ColumnSpan::default();
        assert!(span.contains(0));
        assert!(span.contains(i32::MAX - 1));
        assert!(!span.contains(-1));
        assert_eq!(span.end(), i32::MAX);
    }

    #[test]
    fn test_large_width_does_not_overflow() {
        let span = ColumnSpan::new(i32::MAX - 2, u32::MAX);
        assert_eq!(span.end(), i32::MAX);
        assert!(!ColumnSpan::new(3, 0).contains(3));
        assert!(ColumnSpan::new(3, 0).is_empty());
    }
}
