//! In-memory grid, backing fixtures and tests.

use crate::error::{GridError, GridResult};
use crate::grid::TabularGrid;

/// A grid held entirely in memory as rows of cell strings.
///
/// Rows may be ragged; column reads pad short rows with empty cells.
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    rows: Vec<Vec<String>>,
}

impl MemoryGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Convenience constructor for literal fixtures.
    pub fn from_rows(rows: &[&[&str]]) -> Self {
        Self::new(
            rows.iter()
                .map(|row| row.iter().map(ToString::to_string).collect())
                .collect(),
        )
    }

    /// Widest physical row.
    fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

impl TabularGrid for MemoryGrid {
    fn row_values(&self, row: usize) -> GridResult<Vec<String>> {
        if row == 0 || row > self.rows.len() {
            return Err(GridError::RowOutOfRange {
                row,
                rows: self.rows.len(),
            });
        }
        Ok(self.rows[row - 1].clone())
    }

    fn col_values(&self, col: usize) -> GridResult<Vec<String>> {
        let cols = self.col_count();
        if col == 0 || col > cols {
            return Err(GridError::ColOutOfRange { col, cols });
        }
        Ok(self
            .rows
            .iter()
            .map(|row| row.get(col - 1).cloned().unwrap_or_default())
            .collect())
    }

    fn row_count(&self) -> GridResult<usize> {
        Ok(self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> MemoryGrid {
        MemoryGrid::from_rows(&[
            &["Name", "Age", "Family"],
            &["Devendra", "29"],
            &["Asha", "31", "yes"],
        ])
    }

    #[test]
    fn test_row_values_one_based() {
        let g = grid();
        assert_eq!(g.row_values(1).unwrap(), vec!["Name", "Age", "Family"]);
        assert_eq!(g.row_values(2).unwrap(), vec!["Devendra", "29"]);
        assert!(matches!(
            g.row_values(0),
            Err(GridError::RowOutOfRange { .. })
        ));
        assert!(matches!(
            g.row_values(4),
            Err(GridError::RowOutOfRange { row: 4, rows: 3 })
        ));
    }

    #[test]
    fn test_col_values_pads_ragged_rows() {
        let g = grid();
        assert_eq!(g.col_values(3).unwrap(), vec!["Family", "", "yes"]);
        assert!(matches!(
            g.col_values(4),
            Err(GridError::ColOutOfRange { col: 4, cols: 3 })
        ));
    }

    #[test]
    fn test_row_count() {
        assert_eq!(grid().row_count().unwrap(), 3);
    }
}
