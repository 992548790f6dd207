//! Pending draw updates.

use crate::style::StyleId;
use std::collections::BTreeMap;
use std::collections::btree_map;

/// A run of same-styled text queued for one row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Strip {
    pub text: String,
    pub style: StyleId,
    /// Column of the first character.
    pub col: i32,
}

impl Strip {
    /// Create a new strip.
    #[must_use]
    pub fn new(text: impl Into<String>, style: StyleId, col: i32) -> Self {
        Self {
            text: text.into(),
            style,
            col,
        }
    }
}

/// Strips accumulated by a window since its last drain, keyed by row.
///
/// Rows iterate in ascending order; strips within a row keep write order,
/// so later strips paint over earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Updates {
    rows: BTreeMap<i32, Vec<Strip>>,
}

impl Updates {
    /// Create an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a strip on `row`.
    pub fn push(&mut self, row: i32, strip: Strip) {
        self.rows.entry(row).or_default().push(strip);
    }

    /// Move every strip of `other` into this batch, shifted by the offsets.
    pub fn integrate(&mut self, row_offset: i32, col_offset: i32, other: Updates) {
        for (row, strips) in other.rows {
            let target = self.rows.entry(row + row_offset).or_default();
            target.extend(strips.into_iter().map(|mut s| {
                s.col += col_offset;
                s
            }));
        }
    }

    /// Strips queued on one row.
    #[must_use]
    pub fn row(&self, row: i32) -> &[Strip] {
        self.rows.get(&row).map_or(&[], Vec::as_slice)
    }

    /// Iterate rows in ascending order.
    pub fn rows(&self) -> impl Iterator<Item = (i32, &[Strip])> {
        self.rows.iter().map(|(&row, strips)| (row, strips.as_slice()))
    }

    /// Iterate every strip with its row.
    pub fn strips(&self) -> impl Iterator<Item = (i32, &Strip)> {
        self.rows
            .iter()
            .flat_map(|(&row, strips)| strips.iter().map(move |s| (row, s)))
    }

    /// Number of queued strips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for Updates {
    type Item = (i32, Vec<Strip>);
    type IntoIter = btree_map::IntoIter<i32, Vec<Strip>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: StyleId = StyleId(1);

    #[test]
    fn test_push_keeps_order_within_row() {
        let mut updates = Updates::new();
        updates.push(3, Strip::new("b", S, 5));
        updates.push(1, Strip::new("a", S, 0));
        updates.push(3, Strip::new("c", S, 0));

        let rows: Vec<i32> = updates.rows().map(|(r, _)| r).collect();
        assert_eq!(rows, vec![1, 3]);
        assert_eq!(updates.row(3), &[Strip::new("b", S, 5), Strip::new("c", S, 0)]);
        assert_eq!(updates.len(), 3);
    }

    #[test]
    fn test_integrate_offsets() {
        let mut child = Updates::new();
        child.push(0, Strip::new("x", S, 2));
        let mut parent = Updates::new();
        parent.integrate(4, 10, child);
        assert_eq!(parent.row(4), &[Strip::new("x", S, 12)]);
    }

    #[test]
    fn test_empty_row_lookup() {
        let updates = Updates::new();
        assert!(updates.row(7).is_empty());
        assert!(updates.is_empty());
    }
}
