//! Lazy traversal over a resolved set of matching rows.
//!
//! A [`RecordSet`] holds the row identifiers a filter resolved, fixed at
//! construction. Iteration materializes one record at a time; it never
//! re-runs the filter. Random access by position never moves the cursor.

use crate::error::{QueryError, QueryResult};
use crate::manager::RecordManager;
use crate::record::Record;

/// The result of a filter: an ordered, fixed sequence of 1-based row
/// identifiers plus a cursor.
pub struct RecordSet<'a> {
    manager: &'a RecordManager,
    row_ids: Vec<usize>,
    cursor: usize,
}

impl<'a> RecordSet<'a> {
    pub(crate) fn new(manager: &'a RecordManager, row_ids: Vec<usize>) -> Self {
        Self {
            manager,
            row_ids,
            cursor: 0,
        }
    }

    /// Number of matching rows.
    pub fn size(&self) -> usize {
        self.row_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_ids.is_empty()
    }

    /// The matching 1-based row identifiers, ascending.
    pub fn row_ids(&self) -> &[usize] {
        &self.row_ids
    }

    /// Rewind the cursor without recomputing the filter.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Materialize the record at a position without moving the cursor.
    pub fn nth_record(&self, index: usize) -> QueryResult<Record> {
        match self.row_ids.get(index) {
            Some(&row_id) => self.manager.materialize(row_id),
            None => Err(QueryError::IndexOutOfRange {
                index,
                size: self.row_ids.len(),
            }),
        }
    }

    /// First matching record.
    pub fn first(&self) -> QueryResult<Record> {
        self.nth_record(0)
    }

    /// Last matching record.
    pub fn last(&self) -> QueryResult<Record> {
        match self.row_ids.len() {
            0 => Err(QueryError::IndexOutOfRange { index: 0, size: 0 }),
            len => self.nth_record(len - 1),
        }
    }
}

impl std::fmt::Debug for RecordSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSet")
            .field("row_ids", &self.row_ids)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl Iterator for RecordSet<'_> {
    type Item = QueryResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let &row_id = self.row_ids.get(self.cursor)?;
        self.cursor += 1;
        Some(self.manager.materialize(row_id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row_ids.len() - self.cursor;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::grid::memory::MemoryGrid;
    use crate::manager::Constraint;
    use crate::schema::SheetConfig;
    use std::sync::Arc;

    fn manager() -> RecordManager {
        let grid = MemoryGrid::from_rows(&[
            &["Name", "Family"],
            &["Devendra", "yes"],
            &["Asha", "no"],
            &["Ravi", "yes"],
            &["Meera", "yes"],
        ]);
        RecordManager::with_grid(
            "Users",
            SheetConfig::new("S", "Users"),
            vec![
                ("name".to_string(), Field::string().named("Name")),
                ("is_family".to_string(), Field::boolean().named("Family")),
            ],
            Arc::new(grid),
        )
        .unwrap()
    }

    #[test]
    fn test_iteration_and_reset_yield_identical_sequences() {
        let mut mgr = manager();
        let mut set = mgr.filter(&[Constraint::eq("is_family", true)]).unwrap();

        let first_pass: Vec<usize> = set
            .by_ref()
            .map(|record| record.unwrap().id())
            .collect();
        assert_eq!(first_pass, [2, 4, 5]);

        // Exhausted until reset.
        assert!(set.next().is_none());
        set.reset();
        let second_pass: Vec<usize> = set
            .by_ref()
            .map(|record| record.unwrap().id())
            .collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_random_access() {
        let mut mgr = manager();
        let set = mgr.filter(&[Constraint::eq("is_family", true)]).unwrap();

        assert_eq!(set.size(), 3);
        assert_eq!(set.first().unwrap().id(), 2);
        assert_eq!(RecordSet::last(&set).unwrap().id(), 5);
        assert_eq!(set.nth_record(1).unwrap().id(), 4);
        // first/last equal nth(0)/nth(size-1).
        assert_eq!(
            set.first().unwrap().id(),
            set.nth_record(0).unwrap().id()
        );
        assert_eq!(
            RecordSet::last(&set).unwrap().id(),
            set.nth_record(set.size() - 1).unwrap().id()
        );
    }

    #[test]
    fn test_nth_out_of_range() {
        let mut mgr = manager();
        let set = mgr.filter(&[Constraint::eq("is_family", true)]).unwrap();
        let err = set.nth_record(set.size()).unwrap_err();
        assert!(matches!(
            err,
            QueryError::IndexOutOfRange { index: 3, size: 3 }
        ));
    }

    #[test]
    fn test_random_access_does_not_move_cursor() {
        let mut mgr = manager();
        let mut set = mgr.filter(&[Constraint::eq("is_family", true)]).unwrap();

        set.first().unwrap();
        RecordSet::last(&set).unwrap();
        let ids: Vec<usize> = set.by_ref().map(|r| r.unwrap().id()).collect();
        assert_eq!(ids, [2, 4, 5]);
    }

    #[test]
    fn test_empty_set() {
        let mut mgr = manager();
        let mut set = mgr.filter(&[Constraint::eq("name", "Nobody")]).unwrap();
        assert!(set.is_empty());
        assert!(set.next().is_none());
        assert!(set.first().is_err());
        assert!(RecordSet::last(&set).is_err());
    }
}
