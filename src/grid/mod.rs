//! Grid access: the tabular-store boundary and the caller-owned registry.
//!
//! The query core only ever talks to a [`TabularGrid`]: fetch a row, fetch a
//! column, count rows. How a grid authenticates or connects is external
//! bootstrap. [`GridRegistry`] is the explicit, caller-owned session that
//! maps `(sheet, tab)` identifiers to opened grids, replacing any
//! process-wide handle cache.

pub mod csv;
pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GridResult;

/// An opened, spreadsheet-shaped tabular data source.
///
/// Row and column indices are 1-based, matching spreadsheet conventions.
/// Column values include every physical row, header rows included.
pub trait TabularGrid {
    /// All cell strings of one row.
    fn row_values(&self, row: usize) -> GridResult<Vec<String>>;

    /// All cell strings of one column, one entry per physical row.
    fn col_values(&self, col: usize) -> GridResult<Vec<String>>;

    /// Number of physical rows.
    fn row_count(&self) -> GridResult<usize>;
}

/// Caller-owned registry of opened grids.
///
/// Lifecycle is explicit: grids are inserted, optionally aliased under an
/// alternate sheet name, looked up by record managers at construction, and
/// closed when no longer needed.
#[derive(Default)]
pub struct GridRegistry {
    grids: HashMap<(String, String), Arc<dyn TabularGrid>>,
    aliases: HashMap<String, String>,
}

impl GridRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid under a sheet and tab name.
    pub fn insert(&mut self, sheet: &str, tab: &str, grid: impl TabularGrid + 'static) {
        self.insert_shared(sheet, tab, Arc::new(grid));
    }

    /// Register an already-shared grid handle.
    pub fn insert_shared(&mut self, sheet: &str, tab: &str, grid: Arc<dyn TabularGrid>) {
        self.grids
            .insert((sheet.to_string(), tab.to_string()), grid);
    }

    /// Make `alias` resolve to the same tabs as `sheet`.
    pub fn alias(&mut self, alias: &str, sheet: &str) {
        self.aliases.insert(alias.to_string(), sheet.to_string());
    }

    /// Look up an opened grid, resolving sheet aliases.
    pub fn get(&self, sheet: &str, tab: &str) -> Option<Arc<dyn TabularGrid>> {
        let sheet = self.resolve(sheet);
        self.grids
            .get(&(sheet.to_string(), tab.to_string()))
            .cloned()
    }

    /// Drop a grid handle. Returns whether one was registered.
    pub fn close(&mut self, sheet: &str, tab: &str) -> bool {
        let sheet = self.resolve(sheet).to_string();
        self.grids.remove(&(sheet, tab.to_string())).is_some()
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    fn resolve<'a>(&'a self, sheet: &'a str) -> &'a str {
        self.aliases.get(sheet).map_or(sheet, String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::memory::MemoryGrid;
    use super::*;

    fn sample_grid() -> MemoryGrid {
        MemoryGrid::from_rows(&[&["Name", "Age"], &["Devendra", "29"]])
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = GridRegistry::new();
        registry.insert("Test Sheet", "Users", sample_grid());

        assert!(registry.get("Test Sheet", "Users").is_some());
        assert!(registry.get("Test Sheet", "Missing").is_none());
        assert!(registry.get("Other", "Users").is_none());
    }

    #[test]
    fn test_registry_alias() {
        let mut registry = GridRegistry::new();
        registry.insert("Test Sheet", "Users", sample_grid());
        registry.alias("default", "Test Sheet");

        assert!(registry.get("default", "Users").is_some());
    }

    #[test]
    fn test_registry_close() {
        let mut registry = GridRegistry::new();
        registry.insert("Test Sheet", "Users", sample_grid());

        assert!(registry.close("Test Sheet", "Users"));
        assert!(!registry.close("Test Sheet", "Users"));
        assert!(registry.get("Test Sheet", "Users").is_none());
    }
}
