use std::collections::{BTreeMap, BTreeSet};

use crate::table::RowId;

/// Cells that must be masked, keyed by row id and column name.
///
/// The set only grows: every operation is a union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    cells: BTreeMap<RowId, BTreeSet<String>>,
}

impl SuppressionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a cell; returns true if it was not already marked
    pub fn insert(&mut self, row: RowId, column: &str) -> bool {
        let columns = self.cells.entry(row).or_default();
        if columns.contains(column) {
            false
        } else {
            columns.insert(column.to_string())
        }
    }

    /// Mark several cells of one row; returns how many were new
    pub fn insert_all<'a, I>(&mut self, row: RowId, columns: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        columns
            .into_iter()
            .filter(|column| self.insert(row, column))
            .count()
    }

    pub fn contains(&self, row: RowId, column: &str) -> bool {
        self.cells
            .get(&row)
            .map_or(false, |columns| columns.contains(column))
    }

    /// Whether any of `columns` is marked in `row`
    pub fn contains_any<'a, I>(&self, row: RowId, columns: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        match self.cells.get(&row) {
            Some(marked) => columns.into_iter().any(|c| marked.contains(c)),
            None => false,
        }
    }

    /// Marked columns of a row, if any
    pub fn columns(&self, row: RowId) -> Option<&BTreeSet<String>> {
        self.cells.get(&row).filter(|columns| !columns.is_empty())
    }

    /// Rows with at least one marked cell
    pub fn rows(&self) -> impl Iterator<Item = RowId> + '_ {
        self.cells
            .iter()
            .filter(|(_, columns)| !columns.is_empty())
            .map(|(row, _)| *row)
    }

    /// Every marked cell as (row, column)
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &str)> + '_ {
        self.cells
            .iter()
            .flat_map(|(row, columns)| columns.iter().map(move |c| (*row, c.as_str())))
    }

    /// Add every cell of `other`; returns how many were new
    pub fn union(&mut self, other: &SuppressionSet) -> usize {
        other
            .iter()
            .filter(|(row, column)| self.insert(*row, column))
            .count()
    }

    pub fn is_superset_of(&self, other: &SuppressionSet) -> bool {
        other.iter().all(|(row, column)| self.contains(row, column))
    }

    /// Number of marked cells
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of rows with at least one marked cell
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = SuppressionSet::new();
        assert!(set.insert(RowId::new(0), "Count"));
        assert!(!set.insert(RowId::new(0), "Count"));
        assert_eq!(set.len(), 1);
        assert!(set.contains(RowId::new(0), "Count"));
        assert!(!set.contains(RowId::new(1), "Count"));
    }

    #[test]
    fn test_insert_all_counts_new_cells() {
        let mut set = SuppressionSet::new();
        set.insert(RowId::new(2), "a");
        let added = set.insert_all(RowId::new(2), ["a", "b", "c"]);
        assert_eq!(added, 2);
        assert!(set.contains_any(RowId::new(2), ["x", "c"]));
        assert!(!set.contains_any(RowId::new(3), ["a"]));
    }

    #[test]
    fn test_union_and_superset() {
        let mut first = SuppressionSet::new();
        first.insert(RowId::new(0), "a");

        let mut second = SuppressionSet::new();
        second.insert(RowId::new(0), "a");
        second.insert(RowId::new(1), "b");

        assert!(!first.is_superset_of(&second));
        assert_eq!(first.union(&second), 1);
        assert!(first.is_superset_of(&second));
        assert_eq!(first.row_count(), 2);
    }

    #[test]
    fn test_empty_rows_not_reported() {
        let mut set = SuppressionSet::new();
        set.insert_all(RowId::new(4), std::iter::empty());
        assert!(set.is_empty());
        assert_eq!(set.rows().count(), 0);
        assert!(set.columns(RowId::new(4)).is_none());
    }
}
